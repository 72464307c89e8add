//! # Cherry-Pick Command
//!
//! Apply the change introduced by a single commit onto the current
//! branch, staging the result without creating the commit itself — the
//! user still runs `commit` (matching `ops::cherry_pick`'s contract).
//!
//! ## Usage
//!
//! ```bash
//! corevcs cherry-pick abc1234
//! ```

use anyhow::Result;

use crate::error::Error;
use crate::ops::cherry_pick::{cherry_pick, CherryPickResult};
use crate::Repository;

fn short(id: &str) -> &str {
    &id[..7.min(id.len())]
}

/// Execute the cherry-pick command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::cherry_pick::run;
///
/// run("abc1234").unwrap();
/// ```
pub fn run(commit: &str) -> Result<()> {
    let repo = Repository::find()?;

    match cherry_pick(&repo, commit)? {
        CherryPickResult::Applied(outcome) => {
            println!("[{}] {}", short(&outcome.commit_id), outcome.message);
            println!("Changes staged for commit.");
            Ok(())
        }
        CherryPickResult::Conflicted(conflicts) => {
            for path in &conflicts {
                println!("CONFLICT (content): Merge conflict in {path}");
            }
            Err(Error::CherryPickConflicts(conflicts).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::objects::{Author, Kind};
    use crate::ops::reset::{reset, ResetMode};
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
    fn clean_cherry_pick_stages_the_change() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let first = commit_file(&repo, b"one", "a.txt");
        let second = commit_file(&repo, b"two", "b.txt");

        reset(&repo, &first, ResetMode::Hard).unwrap();

        run(&second).unwrap();
        assert!(repo.load_index().unwrap().contains("b.txt"));
    }
}
