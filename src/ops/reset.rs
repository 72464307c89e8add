//! `reset(commit, mode)`

use crate::error::Result;
use crate::index::Index;
use crate::objects::{Commit, Kind};
use crate::ops::resolve::resolve_commit;
use crate::workspace::switch_workspace;
use crate::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    Soft,
    Mixed,
    Hard,
}

pub struct ResetOutcome {
    pub commit_id: String,
    /// `true` if HEAD was detached at the time of the reset — not a
    /// failure, just informational (per the spec's `DetachedReset`,
    /// which is explicitly non-fatal).
    pub detached: bool,
}

fn load_commit(repo: &Repository, id: &str) -> Result<Commit> {
    let obj = repo.store().get_kind(id, Kind::Commit)?;
    let text = String::from_utf8(obj.payload)
        .map_err(|_| crate::error::Error::MalformedObject(format!("commit {id} is not valid utf-8")))?;
    Commit::parse(&text)
}

pub fn reset(repo: &Repository, target: &str, mode: ResetMode) -> Result<ResetOutcome> {
    let refs = repo.refs();
    let store = repo.store();

    let commit_id = resolve_commit(repo, target)?;
    let target_commit = load_commit(repo, &commit_id)?;

    let detached = refs.is_detached()?;
    let from_commit = refs.head_commit()?;

    refs.advance_head(&commit_id)?;

    if mode == ResetMode::Soft {
        return Ok(ResetOutcome { commit_id, detached });
    }

    let new_index = crate::tree_builder::tree_to_index(&store, &target_commit.tree)?;
    repo.save_index(&new_index)?;

    if mode == ResetMode::Hard {
        let from_tree = match from_commit {
            Some(id) => Some(load_commit(repo, &id)?.tree),
            None => None,
        };
        switch_workspace(&store, from_tree.as_deref(), &target_commit.tree, &repo.root)?;
    }

    Ok(ResetOutcome { commit_id, detached })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::objects::Author;
    use tempfile::tempdir;

    fn commit(repo: &Repository, content: &[u8], path: &str) -> String {
        let store = repo.store();
        let blob_id = store.put(Kind::Blob, content).unwrap();
        let mut index = repo.load_index().unwrap();
        index.add_entry(path, IndexEntry::new(blob_id, content.len() as u64, 0));
        repo.save_index(&index).unwrap();
        crate::commit_engine::commit(
            &repo.meta_dir,
            &store,
            &repo.refs(),
            &index,
            Author::with_timestamp("T", 1),
            "msg",
        )
        .unwrap()
        .commit_id
    }

    #[test]
    fn soft_reset_leaves_index_and_workspace() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let first = commit(&repo, b"one", "a.txt");
        commit(&repo, b"two", "b.txt");

        reset(&repo, &first, ResetMode::Soft).unwrap();

        assert_eq!(repo.refs().head_commit().unwrap(), Some(first));
        // b.txt is still staged/on disk: soft reset doesn't touch them
        assert!(repo.root.join("b.txt").exists());
    }

    #[test]
    fn hard_reset_restores_workspace() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let first = commit(&repo, b"one", "a.txt");
        commit(&repo, b"two", "b.txt");

        reset(&repo, &first, ResetMode::Hard).unwrap();

        assert!(!repo.root.join("b.txt").exists());
        assert!(repo.root.join("a.txt").exists());
        let index = repo.load_index().unwrap();
        assert!(!index.contains("b.txt"));
    }

    #[test]
    fn mixed_reset_updates_index_not_workspace() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let first = commit(&repo, b"one", "a.txt");
        commit(&repo, b"two", "b.txt");

        reset(&repo, &first, ResetMode::Mixed).unwrap();

        assert!(repo.root.join("b.txt").exists());
        let index = repo.load_index().unwrap();
        assert!(!index.contains("b.txt"));
    }
}
