//! # Commit Command
//!
//! Create a commit from the staging area (index).
//!
//! ## Usage
//!
//! ```bash
//! # Create commit from staged files
//! corevcs commit -m "Commit message"
//! ```

use anyhow::Result;

use crate::commands::commit_tree::resolve_identity;
use crate::commit_engine;
use crate::error::Error;
use crate::Repository;

/// Execute the commit command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::commit::run;
///
/// run("Initial commit", false).unwrap();
/// ```
pub fn run(message: &str, _auto_add: bool) -> Result<()> {
    let repo = Repository::find()?;
    let index = repo.load_index()?;

    let author = resolve_identity();

    let outcome = match commit_engine::commit(&repo.meta_dir, &repo.store(), &repo.refs(), &index, author, message) {
        Ok(outcome) => outcome,
        Err(Error::NothingToCommit) => {
            println!("nothing to commit, working tree clean");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let short_hash = &outcome.commit_id[..7.min(outcome.commit_id.len())];
    let entry_count = index.entries.len();
    println!("[{}] {}", short_hash, message);
    println!(" {} file(s) changed", entry_count);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::objects::Kind;
    use tempfile::tempdir;

    #[test]
    fn test_commit_from_staged_index() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let blob = repo.store().put(Kind::Blob, b"hello").unwrap();
        let mut index = repo.load_index().unwrap();
        index.add_entry("file1.txt", IndexEntry::new(blob, 5, 0));
        repo.save_index(&index).unwrap();

        run("Initial commit", false).unwrap();

        assert!(repo.refs().head_commit().unwrap().is_some());
    }

    #[test]
    fn test_commit_with_nothing_staged() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        run("empty", false).unwrap();

        assert!(repo.refs().head_commit().unwrap().is_none());
    }
}
