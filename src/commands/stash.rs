//! # Stash Command
//!
//! Shelve uncommitted staged changes and restore them later.
//!
//! ## Usage
//!
//! ```bash
//! corevcs stash                  # same as `stash save`
//! corevcs stash save -m "wip"
//! corevcs stash list
//! corevcs stash apply 0
//! corevcs stash pop 0
//! corevcs stash drop 0
//! ```

use anyhow::Result;

use crate::ops::stash;
use crate::Repository;

/// A parsed stash subcommand, independent of clap's `StashAction` so the
/// engine-facing layer doesn't depend on the CLI argument types.
pub enum Request {
    Save(Option<String>),
    List,
    Apply(usize),
    Pop(usize),
    Drop(usize),
}

/// Execute the stash command. `None` defaults to `Save(None)`, matching
/// `corevcs stash` with no subcommand.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::stash::{run, Request};
///
/// run(Some(Request::Save(Some("wip".to_string())))).unwrap();
/// run(Some(Request::List)).unwrap();
/// ```
pub fn run(action: Option<Request>) -> Result<()> {
    let repo = Repository::find()?;

    match action.unwrap_or(Request::Save(None)) {
        Request::Save(message) => {
            stash::save(&repo, message)?;
            println!("Saved working directory state");
        }
        Request::List => {
            for (i, entry) in stash::list(&repo)?.iter().enumerate() {
                println!("stash@{{{}}}: {}", i, entry.message);
            }
        }
        Request::Apply(n) => {
            stash::apply(&repo, n)?;
            println!("Applied stash@{{{n}}}");
        }
        Request::Pop(n) => {
            stash::pop(&repo, n)?;
            println!("Dropped stash@{{{n}}}");
        }
        Request::Drop(n) => {
            stash::drop_entry(&repo, n)?;
            println!("Dropped stash@{{{n}}}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::objects::Kind;
    use tempfile::tempdir;

    #[test]
    fn save_then_list_then_pop_roundtrips() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let store = repo.store();
        let blob_id = store.put(Kind::Blob, b"wip").unwrap();
        let mut index = repo.load_index().unwrap();
        index.add_entry("a.txt", IndexEntry::new(blob_id, 3, 0));
        repo.save_index(&index).unwrap();
        std::fs::write(repo.root.join("a.txt"), b"wip").unwrap();

        run(Some(Request::Save(Some("my wip".to_string())))).unwrap();
        assert!(repo.load_index().unwrap().is_empty());

        run(Some(Request::List)).unwrap();

        run(Some(Request::Pop(0))).unwrap();
        assert!(repo.load_index().unwrap().contains("a.txt"));
    }

    #[test]
    fn default_action_is_save() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let store = repo.store();
        let blob_id = store.put(Kind::Blob, b"x").unwrap();
        let mut index = repo.load_index().unwrap();
        index.add_entry("a.txt", IndexEntry::new(blob_id, 1, 0));
        repo.save_index(&index).unwrap();

        run(None).unwrap();
        assert_eq!(stash::list(&repo).unwrap().len(), 1);
    }
}
