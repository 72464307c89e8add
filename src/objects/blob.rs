//! # Blob Object
//!
//! A blob stores file contents: no filename, no permissions, just raw
//! bytes.
//!
//! ## Format
//!
//! ```text
//! blob <size>\0<content>
//! ```

use crate::error::Result;
use crate::objects::{hash, Kind};
use crate::store::ObjectStore;

/// Raw, uninterpreted file contents.
#[derive(Debug, Clone)]
pub struct Blob {
    pub content: Vec<u8>,
}

impl Blob {
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    /// Compute the object id of this blob without storing it.
    pub fn id(&self) -> String {
        hash(Kind::Blob, &self.content)
    }

    /// Store this blob in the given object store, returning its id.
    pub fn store(&self, store: &ObjectStore) -> Result<String> {
        store.put(Kind::Blob, &self.content)
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// `Some(String)` if the content is valid UTF-8 text, `None` otherwise.
    /// Used by `diff` to decide whether a file can be diffed as text.
    pub fn as_text(&self) -> Option<String> {
        String::from_utf8(self.content.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_id() {
        let blob = Blob::new(b"test content\n".to_vec());
        assert_eq!(blob.id(), "d670460b4b4aece5915caf5c68d12f560a9fe3e4");
    }

    #[test]
    fn blob_as_text() {
        let text = Blob::new(b"Hello, World!".to_vec());
        assert_eq!(text.as_text(), Some("Hello, World!".to_string()));

        let binary = Blob::new(vec![0xFF, 0xFE, 0x00]);
        assert!(binary.as_text().is_none());
    }
}

