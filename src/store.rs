//! # Object Store
//!
//! The on-disk object database: a two-level directory fan-out under
//! `objects/`, keyed by the object's hex id (`objects/<first-2>/<rest>`).
//! Writes are content-addressed and therefore naturally idempotent —
//! storing the same bytes twice is a no-op the second time.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::objects::{self, Kind, Object};

#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// `root` is the repository's `objects/` directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(&id[..2]).join(&id[2..])
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Compress and store `payload` under its computed id, returning
    /// that id. Writing is a temp-file-then-rename so a reader never
    /// observes a partially written object.
    pub fn put(&self, kind: Kind, payload: &[u8]) -> Result<String> {
        let id = objects::hash(kind, payload);
        let dest = self.path_for(&id);

        if dest.is_file() {
            return Ok(id);
        }

        let bytes = objects::serialize(kind, payload)?;
        atomic_write(&dest, &bytes)?;

        Ok(id)
    }

    /// Load and decode the object for `id`.
    pub fn get(&self, id: &str) -> Result<Object> {
        let path = self.path_for(id);
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ObjectNotFound(id.to_string()),
            _ => Error::Io(e),
        })?;
        objects::deserialize(&bytes)
    }

    pub fn get_kind(&self, id: &str, expected: Kind) -> Result<Object> {
        let obj = self.get(id)?;
        if obj.kind != expected {
            return Err(Error::MalformedObject(format!(
                "expected {expected} object, found {} at {id}",
                obj.kind
            )));
        }
        Ok(obj)
    }
}

/// Write `contents` to `path` via temp-file-then-rename, so a reader
/// never observes a partially written file. Used for objects, refs,
/// and the index alike — anything that must never be read half-written.
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().expect("path always has a parent");
    fs::create_dir_all(dir)?;

    let tmp = tmp_path(dir);
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(contents)?;
        f.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(dir: &Path) -> PathBuf {
    let pid = std::process::id();
    let nonce = format!("tmp-{pid}-{}", tmp_counter());
    dir.join(nonce)
}

fn tmp_counter() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn put_get_roundtrip() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path());

        let id = store.put(Kind::Blob, b"hello").unwrap();
        assert_eq!(id.len(), 40);

        let obj = store.get(&id).unwrap();
        assert_eq!(obj.kind, Kind::Blob);
        assert_eq!(obj.payload, b"hello");
    }

    #[test]
    fn put_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path());

        let id1 = store.put(Kind::Blob, b"same content").unwrap();
        let id2 = store.put(Kind::Blob, b"same content").unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn missing_object_is_object_not_found() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path());
        let err = store.get(&"0".repeat(40)).unwrap_err();
        assert!(matches!(err, Error::ObjectNotFound(_)));
    }

    #[test]
    fn wrong_kind_is_malformed() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path());
        let id = store.put(Kind::Blob, b"hello").unwrap();
        assert!(store.get_kind(&id, Kind::Tree).is_err());
    }

    #[test]
    fn atomic_write_creates_parent_dirs_and_leaves_no_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("ref");
        atomic_write(&path, b"abc\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "abc\n");
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("tmp-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn atomic_write_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ref");
        atomic_write(&path, b"one\n").unwrap();
        atomic_write(&path, b"two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two\n");
    }
}
