//! # Checkout Command
//!
//! Switch branches or commits, or restore a single file from a commit.
//!
//! ## Usage
//!
//! ```bash
//! corevcs checkout feature               # switch to branch "feature"
//! corevcs checkout -b feature            # create and switch to "feature"
//! corevcs checkout abc1234                # detach HEAD at a commit
//! corevcs checkout main -- a.txt          # restore one file from "main"
//! ```

use anyhow::Result;

use crate::index::IndexEntry;
use crate::objects::Kind;
use crate::ops::checkout::checkout;
use crate::ops::resolve::resolve_commit;
use crate::tree_builder::tree_to_fileset;
use crate::Repository;

/// Restore a single file from `reference`'s tree into the workspace and
/// the index, without moving HEAD.
fn checkout_file(repo: &Repository, reference: &str, file_path: &str) -> Result<()> {
    let store = repo.store();
    let commit_id = resolve_commit(repo, reference)?;
    let commit_obj = store.get_kind(&commit_id, Kind::Commit)?;
    let text = String::from_utf8(commit_obj.payload)
        .map_err(|_| crate::error::Error::MalformedObject(format!("commit {commit_id} is not valid utf-8")))?;
    let commit = crate::objects::Commit::parse(&text)?;

    let fileset = tree_to_fileset(&store, &commit.tree)?;
    let blob_id = fileset
        .get(file_path)
        .ok_or_else(|| crate::error::Error::PathNotFound(file_path.to_string()))?;

    let content = store.get_kind(blob_id, Kind::Blob)?.payload;
    let dest = repo.root.join(file_path);
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&dest, &content)?;

    let mut index = repo.load_index()?;
    index.add_entry(file_path.to_string(), IndexEntry::new(blob_id.clone(), content.len() as u64, 0));
    repo.save_index(&index)?;

    Ok(())
}

/// Execute the checkout command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::checkout::run;
///
/// run("main", None, false).unwrap();
/// run("main", Some("a.txt".to_string()), false).unwrap();
/// ```
pub fn run(reference: &str, file_path: Option<String>, force: bool) -> Result<()> {
    let repo = Repository::find()?;

    if let Some(path) = file_path {
        checkout_file(&repo, reference, &path)?;
        println!("Updated 1 path from {reference}");
        return Ok(());
    }

    let _ = force; // workspace::switch_workspace always overwrites tracked paths
    let outcome = checkout(&repo, reference, false)?;
    match outcome.branch {
        Some(branch) => println!("Switched to branch '{branch}'"),
        None => println!("HEAD is now detached at {}", &outcome.commit_id[..7.min(outcome.commit_id.len())]),
    }

    Ok(())
}
