//! # Commit Engine
//!
//! Turns the staged index into a commit object, determines its
//! parents (including an in-progress merge), enforces the
//! no-empty-commit rule, and advances HEAD.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::index::Index;
use crate::objects::{Author, Commit, Kind};
use crate::refs::RefStore;
use crate::store::ObjectStore;
use crate::tree_builder::index_to_tree;

const MERGE_HEAD: &str = "MERGE_HEAD";
const MERGE_MSG: &str = "MERGE_MSG";

pub struct CommitOutcome {
    pub commit_id: String,
    pub tree_id: String,
}

/// `meta_dir` is the repository's metadata directory, holding
/// `MERGE_HEAD`/`MERGE_MSG` alongside `HEAD`/`refs/`/`index`.
pub fn commit(
    meta_dir: &Path,
    store: &ObjectStore,
    refs: &RefStore,
    index: &Index,
    author: Author,
    message: &str,
) -> Result<CommitOutcome> {
    let tree_id = index_to_tree(index, store)?;

    let merge_head_path = meta_dir.join(MERGE_HEAD);
    let merge_head = read_optional(&merge_head_path)?;

    let head_commit = refs.head_commit()?;

    let parents: Vec<String> = match (&head_commit, &merge_head) {
        (Some(head), Some(merge)) => vec![head.clone(), merge.clone()],
        (None, Some(merge)) => vec![merge.clone()],
        (Some(head), None) => vec![head.clone()],
        (None, None) => Vec::new(),
    };

    let is_merge_commit = merge_head.is_some();

    if !is_merge_commit && parents.len() == 1 {
        let parent_commit = load_commit(store, &parents[0])?;
        if parent_commit.tree == tree_id {
            return Err(Error::NothingToCommit);
        }
    }

    let commit = Commit::simple(tree_id.clone(), parents, author, message);
    let commit_bytes = commit.serialize();
    let commit_id = store.put(Kind::Commit, commit_bytes.as_bytes())?;

    refs.advance_head(&commit_id)?;
    Index::new().save(&meta_dir.join("index"))?;

    let _ = fs::remove_file(&merge_head_path);
    let _ = fs::remove_file(meta_dir.join(MERGE_MSG));

    Ok(CommitOutcome { commit_id, tree_id })
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?.trim().to_string()))
}

fn load_commit(store: &ObjectStore, id: &str) -> Result<Commit> {
    let obj = store.get_kind(id, Kind::Commit)?;
    let text = String::from_utf8(obj.payload)
        .map_err(|_| Error::MalformedObject(format!("commit {id} is not valid utf-8")))?;
    Commit::parse(&text)
}

/// Begin a merge: write `MERGE_HEAD` (and `MERGE_MSG` if given) so the
/// next `commit` picks up the second parent.
pub fn start_merge(meta_dir: &Path, merge_head_commit: &str, message: Option<&str>) -> Result<()> {
    fs::write(meta_dir.join(MERGE_HEAD), format!("{merge_head_commit}\n"))?;
    if let Some(msg) = message {
        fs::write(meta_dir.join(MERGE_MSG), msg)?;
    }
    Ok(())
}

pub fn is_merge_in_progress(meta_dir: &Path) -> bool {
    meta_dir.join(MERGE_HEAD).is_file()
}

pub fn merge_message(meta_dir: &Path) -> Result<Option<String>> {
    read_optional(&meta_dir.join(MERGE_MSG))
}

pub fn abort_merge(meta_dir: &Path) -> Result<()> {
    let _ = fs::remove_file(meta_dir.join(MERGE_HEAD));
    let _ = fs::remove_file(meta_dir.join(MERGE_MSG));
    Ok(())
}
