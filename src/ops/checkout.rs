//! `checkout(target, create?)`

use crate::error::Result;
use crate::index::Index;
use crate::objects::{Commit, Kind};
use crate::ops::resolve::{is_branch, resolve_commit};
use crate::workspace::switch_workspace;
use crate::Repository;

pub struct CheckoutOutcome {
    pub branch: Option<String>,
    pub commit_id: String,
}

fn load_commit(repo: &Repository, id: &str) -> Result<Commit> {
    let obj = repo.store().get_kind(id, Kind::Commit)?;
    let text = String::from_utf8(obj.payload)
        .map_err(|_| crate::error::Error::MalformedObject(format!("commit {id} is not valid utf-8")))?;
    Commit::parse(&text)
}

/// Switch to `target`. If it names a branch (or `create` is set and it
/// doesn't exist yet), HEAD becomes symbolic and lands on that branch.
/// Otherwise `target` is resolved to a commit (dereferencing tags) and
/// HEAD becomes detached there.
pub fn checkout(repo: &Repository, target: &str, create: bool) -> Result<CheckoutOutcome> {
    let refs = repo.refs();
    let store = repo.store();

    let from_tree = match refs.head_commit()? {
        Some(id) => Some(load_commit(repo, &id)?.tree),
        None => None,
    };

    if create && !refs.branch_exists(target) {
        let current = refs.head_commit()?;
        if let Some(id) = &current {
            refs.write_branch(target, id)?;
        } else {
            // Branch has no commits to point at yet; HEAD will simply
            // move to it symbolically and the ref is created on the
            // first commit, same as `init`'s default branch.
        }
    }

    if is_branch(repo, target) || create {
        let target_commit = refs.read_branch(target)?;
        if let Some(commit_id) = &target_commit {
            let to_tree = load_commit(repo, commit_id)?.tree;
            switch_workspace(&store, from_tree.as_deref(), &to_tree, &repo.root)?;
        }
        refs.set_head_branch(target)?;
        Index::new().save(&repo.index_path())?;
        return Ok(CheckoutOutcome { branch: Some(target.to_string()), commit_id: target_commit.unwrap_or_default() });
    }

    let commit_id = resolve_commit(repo, target)?;
    let to_tree = load_commit(repo, &commit_id)?.tree;
    switch_workspace(&store, from_tree.as_deref(), &to_tree, &repo.root)?;
    refs.set_head_detached(&commit_id)?;
    Index::new().save(&repo.index_path())?;

    Ok(CheckoutOutcome { branch: None, commit_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::objects::Author;
    use crate::tree_builder::index_to_tree;
    use tempfile::tempdir;

    fn commit_on_main(repo: &Repository, content: &[u8], path: &str) -> String {
        let store = repo.store();
        let blob_id = store.put(Kind::Blob, content).unwrap();
        let mut index = Index::new();
        index.add_entry(path, IndexEntry::new(blob_id, content.len() as u64, 0));
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
    fn checkout_new_branch_with_create_points_at_head() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let commit_id = commit_on_main(&repo, b"hello", "a.txt");

        let outcome = checkout(&repo, "feature", true).unwrap();
        assert_eq!(outcome.branch, Some("feature".to_string()));
        assert_eq!(outcome.commit_id, commit_id);
        assert_eq!(repo.refs().current_branch().unwrap(), Some("feature".to_string()));
    }

    #[test]
    fn checkout_detaches_at_commit_id() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let commit_id = commit_on_main(&repo, b"hello", "a.txt");

        let outcome = checkout(&repo, &commit_id, false).unwrap();
        assert_eq!(outcome.branch, None);
        assert!(repo.refs().is_detached().unwrap());
    }

    #[test]
    fn checkout_restores_workspace_files() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_on_main(&repo, b"hello", "a.txt");

        std::fs::remove_file(repo.root.join("a.txt")).ok();
        checkout(&repo, "main", false).unwrap();
        assert_eq!(std::fs::read(repo.root.join("a.txt")).unwrap(), b"hello");
    }
}
