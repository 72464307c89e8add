//! `stash(save/list/pop/apply/drop)`
//!
//! Stash entries are an ordered JSON list, most recent first, stored
//! in a single `stash` file in the metadata directory (per the on-disk
//! layout) rather than one file per entry.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::index::Index;
use crate::objects::Kind;
use crate::Repository;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StashEntry {
    pub index: Index,
    pub message: String,
    pub branch: Option<String>,
    pub parent_commit: Option<String>,
}

fn stash_path(repo: &Repository) -> std::path::PathBuf {
    repo.meta_dir.join("stash")
}

fn load_stashes(repo: &Repository) -> Result<Vec<StashEntry>> {
    let path = stash_path(repo);
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|e| Error::IndexCorrupt(format!("stash corrupt: {e}")))
}

fn save_stashes(repo: &Repository, stashes: &[StashEntry]) -> Result<()> {
    let content = serde_json::to_string_pretty(stashes)
        .map_err(|e| Error::IndexCorrupt(format!("failed to serialize stash: {e}")))?;
    fs::write(stash_path(repo), content)?;
    Ok(())
}

/// Snapshot the current index, clear the workspace for currently
/// staged paths, restore HEAD's tree, and push a stash entry at
/// position 0.
pub fn save(repo: &Repository, message: Option<String>) -> Result<()> {
    let index = repo.load_index()?;
    if index.is_empty() {
        return Err(Error::NothingToCommit);
    }

    let refs = repo.refs();
    let branch = refs.current_branch()?;
    let parent_commit = refs.head_commit()?;

    let message = message.unwrap_or_else(|| match &branch {
        Some(b) => format!("WIP on {b}"),
        None => "WIP on detached HEAD".to_string(),
    });

    let entry = StashEntry { index: index.clone(), message, branch, parent_commit: parent_commit.clone() };

    let mut stashes = load_stashes(repo)?;
    stashes.insert(0, entry);
    save_stashes(repo, &stashes)?;

    let paths: Vec<String> = index.paths().map(str::to_string).collect();
    crate::workspace::clean_paths(&repo.root, &paths)?;

    if let Some(commit_id) = parent_commit {
        let obj = repo.store().get_kind(&commit_id, Kind::Commit)?;
        let text = String::from_utf8(obj.payload)
            .map_err(|_| Error::MalformedObject(format!("commit {commit_id} is not valid utf-8")))?;
        let commit = crate::objects::Commit::parse(&text)?;
        crate::workspace::restore_tree(&repo.store(), &commit.tree, &repo.root)?;
    }

    repo.save_index(&Index::new())?;
    Ok(())
}

pub fn list(repo: &Repository) -> Result<Vec<StashEntry>> {
    load_stashes(repo)
}

fn get_entry(stashes: &[StashEntry], n: usize) -> Result<&StashEntry> {
    stashes.get(n).ok_or(Error::StashIndexOOR)
}

/// Restore `n`'s blob ids to disk and merge its index into the current
/// index (stashed entries overwrite current entries of the same path).
fn apply_entry(repo: &Repository, entry: &StashEntry) -> Result<()> {
    let store = repo.store();
    for (path, stash_entry) in &entry.index.entries {
        let obj = store.get_kind(&stash_entry.hash, Kind::Blob)?;
        let dest = repo.root.join(path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &obj.payload)?;
    }

    let mut index = repo.load_index()?;
    for (path, stash_entry) in &entry.index.entries {
        index.add_entry(path.clone(), stash_entry.clone());
    }
    repo.save_index(&index)?;
    Ok(())
}

pub fn apply(repo: &Repository, n: usize) -> Result<()> {
    let stashes = load_stashes(repo)?;
    if stashes.is_empty() {
        return Err(Error::StashEmpty);
    }
    let entry = get_entry(&stashes, n)?;
    apply_entry(repo, entry)
}

pub fn pop(repo: &Repository, n: usize) -> Result<()> {
    let mut stashes = load_stashes(repo)?;
    if stashes.is_empty() {
        return Err(Error::StashEmpty);
    }
    if n >= stashes.len() {
        return Err(Error::StashIndexOOR);
    }
    apply_entry(repo, &stashes[n])?;
    stashes.remove(n);
    save_stashes(repo, &stashes)
}

pub fn drop_entry(repo: &Repository, n: usize) -> Result<()> {
    let mut stashes = load_stashes(repo)?;
    if stashes.is_empty() {
        return Err(Error::StashEmpty);
    }
    if n >= stashes.len() {
        return Err(Error::StashIndexOOR);
    }
    stashes.remove(n);
    save_stashes(repo, &stashes)
}
