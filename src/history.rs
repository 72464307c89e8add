//! # History Graph
//!
//! Ancestry queries over the commit DAG. `lowest_common_ancestor` is
//! deliberately weak: it walks `b` along first-parent only, so in a
//! history with criss-cross merges it may miss the "real" LCA. This
//! matches fast-forward detection (which only cares about the
//! first-parent chain) and is cheaper than a full merge-base search;
//! the tradeoff is accepted rather than "fixed" with a BFS over all
//! parents.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::objects::{Commit, Kind};
use crate::store::ObjectStore;

fn load_commit(store: &ObjectStore, id: &str) -> Result<Commit> {
    let obj = store.get_kind(id, Kind::Commit)?;
    let text = String::from_utf8(obj.payload)
        .map_err(|_| Error::MalformedObject(format!("commit {id} is not valid utf-8")))?;
    Commit::parse(&text)
}

/// All commits reachable from `commit_id` via any parent edge,
/// including `commit_id` itself. Iterative, with a visited set, so
/// cyclic or self-referential history can't loop forever.
pub fn ancestors(store: &ObjectStore, commit_id: &str) -> Result<HashSet<String>> {
    let mut visited = HashSet::new();
    let mut stack = vec![commit_id.to_string()];

    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        let commit = load_commit(store, &id)?;
        for parent in &commit.parents {
            if !visited.contains(parent) {
                stack.push(parent.clone());
            }
        }
    }

    Ok(visited)
}

/// Does `a` appear on `b`'s first-parent chain (including `b` itself)?
/// Used for fast-forward detection: `a` is fast-forwardable to `b` iff
/// `is_ancestor(a, b)`.
pub fn is_ancestor(store: &ObjectStore, a: &str, b: &str) -> Result<bool> {
    let mut current = b.to_string();
    loop {
        if current == a {
            return Ok(true);
        }
        let commit = load_commit(store, &current)?;
        match commit.first_parent() {
            Some(parent) => current = parent.to_string(),
            None => return Ok(false),
        }
    }
}

/// A common ancestor of `a` and `b`, found by walking `b`'s
/// first-parent chain against the full ancestor set of `a`. Not
/// guaranteed to be the unique lowest common ancestor in a DAG with
/// criss-cross merges — see the module note.
pub fn lowest_common_ancestor(store: &ObjectStore, a: &str, b: &str) -> Result<Option<String>> {
    let ancestors_of_a = ancestors(store, a)?;

    let mut current = b.to_string();
    loop {
        if ancestors_of_a.contains(&current) {
            return Ok(Some(current));
        }
        let commit = load_commit(store, &current)?;
        match commit.first_parent() {
            Some(parent) => current = parent.to_string(),
            None => return Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Author;

    fn store() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path());
        (dir, store)
    }

    fn commit(store: &ObjectStore, parents: Vec<String>, n: i64) -> String {
        let author = Author::with_timestamp("T", n);
        let c = Commit::simple("t".repeat(40), parents, author, format!("commit {n}"));
        store.put(Kind::Commit, c.serialize().as_bytes()).unwrap()
    }

    #[test]
    fn ancestors_follows_all_parents() {
        let (_dir, store) = store();
        let root = commit(&store, vec![], 1);
        let left = commit(&store, vec![root.clone()], 2);
        let right = commit(&store, vec![root.clone()], 3);
        let merge = commit(&store, vec![left.clone(), right.clone()], 4);

        let all = ancestors(&store, &merge).unwrap();
        assert!(all.contains(&root));
        assert!(all.contains(&left));
        assert!(all.contains(&right));
        assert!(all.contains(&merge));
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn is_ancestor_true_for_self_and_first_parent_chain() {
        let (_dir, store) = store();
        let root = commit(&store, vec![], 1);
        let child = commit(&store, vec![root.clone()], 2);

        assert!(is_ancestor(&store, &root, &child).unwrap());
        assert!(is_ancestor(&store, &child, &child).unwrap());
        assert!(!is_ancestor(&store, &child, &root).unwrap());
    }

    #[test]
    fn lowest_common_ancestor_finds_fork_point() {
        let (_dir, store) = store();
        let root = commit(&store, vec![], 1);
        let left = commit(&store, vec![root.clone()], 2);
        let right = commit(&store, vec![root.clone()], 3);

        let lca = lowest_common_ancestor(&store, &left, &right).unwrap();
        assert_eq!(lca, Some(root));
    }

    #[test]
    fn no_common_ancestor_between_disjoint_histories() {
        let (_dir, store) = store();
        let a = commit(&store, vec![], 1);
        let b = commit(&store, vec![], 2);
        assert_eq!(lowest_common_ancestor(&store, &a, &b).unwrap(), None);
    }
}
