//! # Merge Command
//!
//! Merge a branch into the current branch: fast-forward when possible,
//! otherwise a three-way merge, landing conflicts as in-file markers
//! for the user to resolve and commit.
//!
//! ## Usage
//!
//! ```bash
//! corevcs merge feature
//! corevcs merge feature --no-ff -m "Merge feature"
//! ```

use anyhow::Result;

use crate::commands::commit_tree::resolve_identity;
use crate::commit_engine;
use crate::error::Error;
use crate::merge::{self, MergeResult};
use crate::Repository;

fn short(id: &str) -> &str {
    &id[..7.min(id.len())]
}

/// Execute the merge command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::merge::run;
///
/// run("feature", false, None).unwrap();
/// ```
pub fn run(branch: &str, no_ff: bool, message: Option<String>) -> Result<()> {
    let repo = Repository::find()?;
    let refs = repo.refs();

    if refs.is_detached()? {
        return Err(Error::DetachedMerge.into());
    }

    let current_branch = refs.current_branch()?.expect("HEAD is on a branch");
    if current_branch == branch {
        return Err(Error::SelfMerge.into());
    }

    let branch_tip = refs
        .read_branch(branch)?
        .ok_or_else(|| Error::UnknownBranch(branch.to_string()))?;
    let head_commit = refs
        .head_commit()?
        .ok_or_else(|| Error::ObjectNotFound("HEAD".to_string()))?;

    let store = repo.store();
    let result = merge::merge(&store, &repo.root, &repo.index_path(), &head_commit, &branch_tip, no_ff)?;

    let default_message = || format!("Merge branch '{branch}' into {current_branch}");

    match result {
        MergeResult::AlreadyUpToDate => {
            println!("Already up to date.");
        }
        MergeResult::FastForward { new_head } => {
            refs.advance_head(&new_head)?;
            println!("Updating {}..{}", short(&head_commit), short(&new_head));
            println!("Fast-forward");
        }
        MergeResult::Merged { commit_id } => {
            let msg = message.unwrap_or_else(default_message);
            commit_engine::start_merge(&repo.meta_dir, &commit_id, Some(&msg))?;
            let index = repo.load_index()?;
            let outcome = commit_engine::commit(&repo.meta_dir, &store, &refs, &index, resolve_identity(), &msg)?;
            println!("Merge made by the three-way merge strategy.");
            println!("[{}] {}", short(&outcome.commit_id), msg);
        }
        MergeResult::Conflicted { branch_tip, conflicts } => {
            let msg = message.unwrap_or_else(default_message);
            commit_engine::start_merge(&repo.meta_dir, &branch_tip, Some(&msg))?;
            println!("Auto-merging");
            for path in &conflicts {
                println!("CONFLICT (content): Merge conflict in {path}");
            }
            return Err(Error::MergeConflicts(conflicts).into());
        }
    }

    Ok(())
}
