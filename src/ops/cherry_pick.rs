//! `cherry_pick(commit)`

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::index::{Index, IndexEntry};
use crate::objects::{Commit, Kind};
use crate::ops::resolve::resolve_commit;
use crate::store::ObjectStore;
use crate::tree_builder::tree_to_fileset;
use crate::Repository;

pub struct CherryPickOutcome {
    pub commit_id: String,
    pub message: String,
}

pub enum CherryPickResult {
    Applied(CherryPickOutcome),
    Conflicted(Vec<String>),
}

fn load_commit(store: &ObjectStore, id: &str) -> Result<Commit> {
    let obj = store.get_kind(id, Kind::Commit)?;
    let text = String::from_utf8(obj.payload)
        .map_err(|_| Error::MalformedObject(format!("commit {id} is not valid utf-8")))?;
    Commit::parse(&text)
}

pub fn cherry_pick(repo: &Repository, target: &str) -> Result<CherryPickResult> {
    let store = repo.store();

    let commit_id = resolve_commit(repo, target)?;
    let commit = load_commit(&store, &commit_id)?;

    let parent_id = commit.first_parent().ok_or(Error::InitialCommitCherryPick)?;
    let parent_commit = load_commit(&store, parent_id)?;

    let parent_fs = tree_to_fileset(&store, &parent_commit.tree)?;
    let commit_fs = tree_to_fileset(&store, &commit.tree)?;

    let current_commit_id = repo.refs().head_commit()?;
    let current_fs: BTreeMap<String, String> = match &current_commit_id {
        Some(id) => tree_to_fileset(&store, &load_commit(&store, id)?.tree)?,
        None => BTreeMap::new(),
    };

    let mut changes: BTreeMap<String, Option<String>> = BTreeMap::new();
    let all_paths: std::collections::BTreeSet<&String> =
        parent_fs.keys().chain(commit_fs.keys()).collect();
    for path in all_paths {
        let parent_blob = parent_fs.get(path);
        let commit_blob = commit_fs.get(path);
        if parent_blob != commit_blob {
            changes.insert(path.clone(), commit_blob.cloned());
        }
    }

    let mut index = repo.load_index()?;
    let mut conflicts = Vec::new();

    for path in changes.keys() {
        let current_blob = current_fs.get(path);
        let parent_blob = parent_fs.get(path);
        if current_blob != parent_blob {
            conflicts.push(path.clone());
        }
    }

    if !conflicts.is_empty() {
        return Ok(CherryPickResult::Conflicted(conflicts));
    }

    for (path, new_blob) in &changes {
        match new_blob {
            Some(blob_id) => {
                let size = store.get_kind(blob_id, Kind::Blob)?.payload.len() as u64;
                index.add_entry(path.clone(), IndexEntry::new(blob_id.clone(), size, 0));
            }
            None => {
                index.remove_entry(path);
            }
        }
    }
    repo.save_index(&index)?;

    for (path, new_blob) in &changes {
        let dest = repo.root.join(path);
        match new_blob {
            Some(blob_id) => {
                let content = store.get_kind(blob_id, Kind::Blob)?.payload;
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&dest, &content)?;
            }
            None => {
                let _ = std::fs::remove_file(&dest);
            }
        }
    }

    Ok(CherryPickResult::Applied(CherryPickOutcome {
        commit_id,
        message: commit.message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Author;
    use tempfile::tempdir;

    fn commit_file(repo: &Repository, content: &[u8], path: &str) -> String {
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
    fn cherry_pick_initial_commit_fails() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let first = commit_file(&repo, b"one", "a.txt");

        let result = cherry_pick(&repo, &first);
        assert!(matches!(result, Err(Error::InitialCommitCherryPick)));
    }

    #[test]
    fn cherry_pick_clean_apply_stages_change() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let first = commit_file(&repo, b"one", "a.txt");
        let second = commit_file(&repo, b"two", "b.txt");

        // Move HEAD back to the cherry-picked commit's parent, so
        // applying it forward is a clean apply.
        crate::ops::reset::reset(&repo, &first, crate::ops::reset::ResetMode::Hard).unwrap();

        let result = cherry_pick(&repo, &second).unwrap();
        match result {
            CherryPickResult::Applied(outcome) => assert_eq!(outcome.commit_id, second),
            CherryPickResult::Conflicted(_) => panic!("expected clean apply"),
        }
        assert!(repo.root.join("b.txt").exists());
    }
}
