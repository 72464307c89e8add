//! # Reset Command
//!
//! Move HEAD, and optionally the index and working tree, to a commit.
//!
//! ## Usage
//!
//! ```bash
//! corevcs reset                  # mixed reset to HEAD (no-op on HEAD itself)
//! corevcs reset --soft abc1234
//! corevcs reset --hard abc1234
//! ```

use anyhow::Result;

use crate::ops::reset::{reset, ResetMode};
use crate::Repository;

fn short(id: &str) -> &str {
    &id[..7.min(id.len())]
}

/// Execute the reset command.
///
/// `soft` and `hard` are mutually exclusive; neither set means a mixed
/// reset (the default, matching git's behavior).
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::reset::run;
///
/// run(Some("abc1234".to_string()), false, true).unwrap();
/// ```
pub fn run(target: Option<String>, soft: bool, hard: bool) -> Result<()> {
    let repo = Repository::find()?;

    let mode = if soft {
        ResetMode::Soft
    } else if hard {
        ResetMode::Hard
    } else {
        ResetMode::Mixed
    };

    let target = target.unwrap_or_else(|| "HEAD".to_string());
    let outcome = reset(&repo, &target, mode)?;

    if outcome.detached {
        println!("note: resetting in a detached HEAD state");
    }
    println!("HEAD is now at {}", short(&outcome.commit_id));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::objects::{Author, Kind};
    use tempfile::tempdir;

    fn commit_file(repo: &Repository, content: &[u8], path: &str) -> String {
        let store = repo.store();
        let blob_id = store.put(Kind::Blob, content).unwrap();
        let mut index = repo.load_index().unwrap();
        index.add_entry(path, IndexEntry::new(blob_id, content.len() as u64, 0));
        repo.save_index(&index).unwrap();
        crate::commit_engine::commit(&repo.meta_dir, &store, &repo.refs(), &index, Author::with_timestamp("T", 1), "msg")
            .unwrap()
            .commit_id
    }

    #[test]
    fn reset_hard_to_explicit_commit() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let first = commit_file(&repo, b"one", "a.txt");
        commit_file(&repo, b"two", "b.txt");

        run(Some(first.clone()), false, true).unwrap();
        assert_eq!(repo.refs().head_commit().unwrap(), Some(first));
        assert!(!repo.root.join("b.txt").exists());
    }

    #[test]
    fn reset_with_no_target_defaults_to_head() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let first = commit_file(&repo, b"one", "a.txt");
        run(None, false, false).unwrap();
        assert_eq!(repo.refs().head_commit().unwrap(), Some(first));
    }
}
