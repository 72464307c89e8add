//! # Tree Object
//!
//! A tree represents a directory snapshot: an ordered, unique-by-name set
//! of `(mode, name, child-id)` entries.
//!
//! ## Binary Format
//!
//! ```text
//! <mode> <name>\0<20-byte-sha1>
//! <mode> <name>\0<20-byte-sha1>
//! ...
//! ```
//!
//! The id is stored as raw 20 bytes, not hex — this is the one place in
//! the object model that isn't plain text.
//!
//! ## Modes
//!
//! - `100644` - regular file
//! - `40000` - directory (subtree)

use crate::error::{Error, Result};

/// File mode for a regular file.
pub const MODE_FILE: &str = "100644";
/// File mode for a directory (subtree). No leading zero, per the wire format.
pub const MODE_DIR: &str = "40000";

/// A single entry in a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: String,
    pub name: String,
    pub id: String,
}

impl TreeEntry {
    pub fn new(mode: impl Into<String>, name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            name: name.into(),
            id: id.into(),
        }
    }

    pub fn file(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(MODE_FILE, name, id)
    }

    pub fn directory(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(MODE_DIR, name, id)
    }

    pub fn is_tree(&self) -> bool {
        self.mode == MODE_DIR
    }

    pub fn is_blob(&self) -> bool {
        self.mode == MODE_FILE
    }

    /// Serialize this entry: `<mode> <name>\0<20-byte-id>`.
    fn serialize(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.extend_from_slice(self.mode.as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.name.as_bytes());
        buf.push(0);

        let id_bytes = hex::decode(&self.id)
            .map_err(|e| Error::MalformedObject(format!("invalid tree entry id: {e}")))?;
        if id_bytes.len() != 20 {
            return Err(Error::MalformedObject(format!(
                "tree entry id must decode to 20 bytes, got {}",
                id_bytes.len()
            )));
        }
        buf.extend_from_slice(&id_bytes);
        Ok(())
    }
}

/// A directory snapshot: an ordered set of entries.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    /// Sort entries by the triple `(mode, name, id)`, lexicographically.
    /// This is the ordering the data model requires before serialization
    /// so that identical sets of entries always produce the same bytes
    /// (and therefore the same id).
    pub fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| (&a.mode, &a.name, &a.id).cmp(&(&b.mode, &b.name, &b.id)));
    }

    /// Serialize the tree to its binary frame format. Entries must
    /// already be sorted (callers go through [`Tree::sorted`] or call
    /// [`Tree::sort`] themselves).
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        for entry in &self.entries {
            entry.serialize(&mut buf)?;
        }
        Ok(buf)
    }

    /// Build a sorted tree from a set of entries, consuming it.
    pub fn sorted(entries: Vec<TreeEntry>) -> Self {
        let mut tree = Tree { entries };
        tree.sort();
        tree
    }

    /// Parse a tree from its raw (decompressed) payload bytes.
    pub fn parse(content: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            let space_pos = content[pos..]
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| Error::MalformedObject("invalid tree entry: no mode separator".into()))?;
            let mode = String::from_utf8_lossy(&content[pos..pos + space_pos]).to_string();
            pos += space_pos + 1;

            let null_pos = content[pos..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| Error::MalformedObject("invalid tree entry: no name terminator".into()))?;
            let name = String::from_utf8_lossy(&content[pos..pos + null_pos]).to_string();
            pos += null_pos + 1;

            if pos + 20 > content.len() {
                return Err(Error::MalformedObject("truncated tree entry".into()));
            }
            let id = hex::encode(&content[pos..pos + 20]);
            pos += 20;

            entries.push(TreeEntry { mode, name, id });
        }

        Ok(Self { entries })
    }
}
