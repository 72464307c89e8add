//! # Index (Staging Area)
//!
//! A flat map of repository-relative paths to blob ids, persisted as
//! JSON. This is the engine's one and only staging area: `add`/`rm`
//! mutate it, `commit` converts it into a tree, `checkout`/`reset`
//! rebuild it from a tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::atomic_write;

/// A single staged file: its blob id plus the workspace metadata
/// needed to shortcut `status`/`add` without rehashing unchanged files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexEntry {
    pub hash: String,
    pub size: u64,
    pub mtime: u64,
}

impl IndexEntry {
    pub fn new(hash: impl Into<String>, size: u64, mtime: u64) -> Self {
        Self { hash: hash.into(), size, mtime }
    }
}

/// The staging area: path -> entry. A `BTreeMap` so iteration order is
/// deterministic, matching the determinism guarantee index-to-tree
/// conversion depends on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    pub entries: BTreeMap<String, IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(index_path: &Path) -> Result<Self> {
        if !index_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(index_path)?;
        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| Error::IndexCorrupt(format!("failed to parse index: {e}")))
    }

    pub fn save(&self, index_path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::IndexCorrupt(format!("failed to serialize index: {e}")))?;
        atomic_write(index_path, content.as_bytes())
    }

    pub fn add_entry(&mut self, path: impl Into<String>, entry: IndexEntry) {
        self.entries.insert(path.into(), entry);
    }

    pub fn remove_entry(&mut self, path: &str) -> Option<IndexEntry> {
        self.entries.remove(path)
    }

    pub fn get_entry(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn new_index_is_empty() {
        let index = Index::new();
        assert!(index.is_empty());
    }

    #[test]
    fn add_and_get_entry() {
        let mut index = Index::new();
        let entry = IndexEntry::new("abc123", 100, 1234567890);
        index.add_entry("test.txt", entry.clone());
        assert_eq!(index.get_entry("test.txt"), Some(&entry));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let index_path = temp.path().join("index");

        let mut index = Index::new();
        index.add_entry("test.txt", IndexEntry::new("abc123", 100, 1234567890));
        index.add_entry("dir/nested.txt", IndexEntry::new("def456", 50, 1234567891));

        index.save(&index_path).unwrap();
        let loaded = Index::load(&index_path).unwrap();

        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.get_entry("test.txt").unwrap().hash, "abc123");
    }

    #[test]
    fn loading_missing_file_is_empty_index() {
        let temp = tempdir().unwrap();
        let index = Index::load(&temp.path().join("no-such-index")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn corrupt_index_is_index_corrupt_error() {
        let temp = tempdir().unwrap();
        let index_path = temp.path().join("index");
        fs::write(&index_path, "not json at all {{{").unwrap();
        let err = Index::load(&index_path).unwrap_err();
        assert!(matches!(err, Error::IndexCorrupt(_)));
    }

    #[test]
    fn remove_entry() {
        let mut index = Index::new();
        index.add_entry("a.txt", IndexEntry::new("h1", 1, 1));
        assert!(index.contains("a.txt"));
        index.remove_entry("a.txt");
        assert!(!index.contains("a.txt"));
    }
}
