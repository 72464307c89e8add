//! # Branch Command
//!
//! List, create, or delete branches.
//!
//! ## Usage
//!
//! ```bash
//! corevcs branch                 # list branches
//! corevcs branch feature         # create "feature" at HEAD
//! corevcs branch -d feature      # delete "feature"
//! ```

use anyhow::Result;

use crate::error::Error;
use crate::ops::resolve::resolve_commit;
use crate::Repository;

/// Execute the branch command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::branch::run;
///
/// run(None, false, false).unwrap();               // list
/// run(Some("feature".to_string()), false, false).unwrap(); // create
/// ```
pub fn run(branch_name: Option<String>, delete: bool, force: bool) -> Result<()> {
    let repo = Repository::find()?;
    let refs = repo.refs();

    let Some(name) = branch_name else {
        let current = refs.current_branch()?;
        for branch in refs.list_branches()? {
            let marker = if Some(&branch) == current.as_ref() { "* " } else { "  " };
            println!("{marker}{branch}");
        }
        return Ok(());
    };

    if delete || force {
        if !refs.branch_exists(&name) {
            return Err(Error::UnknownBranch(name).into());
        }
        refs.delete_branch(&name)?;
        println!("Deleted branch {name}");
        return Ok(());
    }

    let commit_id = resolve_commit(&repo, "HEAD")?;
    refs.write_branch(&name, &commit_id)?;
    println!("Created branch {name} at {}", &commit_id[..7.min(commit_id.len())]);

    Ok(())
}
