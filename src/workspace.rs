//! # Workspace Materializer
//!
//! Writes tree contents onto disk and clears stale files when switching
//! between them. This is the one place that touches the working
//! directory outside of staging (`add`) reading it.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::store::ObjectStore;
use crate::tree_builder::tree_to_fileset;

/// Write every blob named by `tree_id` to its path under `root`,
/// creating parent directories as needed. Overwrites whatever is there.
pub fn restore_tree(store: &ObjectStore, tree_id: &str, root: &Path) -> Result<()> {
    let fileset = tree_to_fileset(store, tree_id)?;
    for (path, blob_id) in fileset {
        let obj = store.get_kind(&blob_id, crate::objects::Kind::Blob)?;
        let dest = root.join(&path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &obj.payload)?;
    }
    Ok(())
}

/// Remove `paths` from the working directory, relative to `root`.
/// Silently ignores paths that are already gone. Empty parent
/// directories left behind are removed too.
pub fn clean_paths(root: &Path, paths: impl IntoIterator<Item = impl AsRef<str>>) -> Result<()> {
    for path in paths {
        let full = root.join(path.as_ref());
        if full.is_file() {
            fs::remove_file(&full)?;
        }
        let mut dir = full.parent().map(Path::to_path_buf);
        while let Some(d) = dir {
            if d == *root {
                break;
            }
            if d.read_dir().map(|mut i| i.next().is_none()).unwrap_or(false) {
                let _ = fs::remove_dir(&d);
                dir = d.parent().map(Path::to_path_buf);
            } else {
                break;
            }
        }
    }
    Ok(())
}

/// Switch the working directory from `from_tree_id` to `to_tree_id`:
/// remove files that `from` had and `to` doesn't, then write everything
/// in `to`. `from_tree_id` is `None` for an empty starting point (e.g.
/// the very first checkout of the initial commit).
pub fn switch_workspace(
    store: &ObjectStore,
    from_tree_id: Option<&str>,
    to_tree_id: &str,
    root: &Path,
) -> Result<()> {
    let from_paths: BTreeSet<String> = match from_tree_id {
        Some(id) => tree_to_fileset(store, id)?.into_keys().collect(),
        None => BTreeSet::new(),
    };
    let to_fileset = tree_to_fileset(store, to_tree_id)?;
    let to_paths: BTreeSet<&String> = to_fileset.keys().collect();

    let stale: Vec<&String> = from_paths
        .iter()
        .filter(|p| !to_paths.contains(p))
        .collect();
    clean_paths(root, stale)?;

    restore_tree(store, to_tree_id, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Index, IndexEntry};
    use crate::objects::Kind;
    use crate::tree_builder::index_to_tree;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn restore_tree_writes_files() {
        let (_dir, store) = store();
        let blob_id = store.put(Kind::Blob, b"hello").unwrap();
        let mut index = Index::new();
        index.add_entry("a.txt", IndexEntry::new(blob_id, 5, 0));
        let tree_id = index_to_tree(&index, &store).unwrap();

        let workdir = tempdir().unwrap();
        restore_tree(&store, &tree_id, workdir.path()).unwrap();

        assert_eq!(fs::read(workdir.path().join("a.txt")).unwrap(), b"hello");
    }

    #[test]
    fn switch_workspace_removes_stale_files() {
        let (_dir, store) = store();
        let id1 = store.put(Kind::Blob, b"one").unwrap();
        let id2 = store.put(Kind::Blob, b"two").unwrap();

        let mut index_a = Index::new();
        index_a.add_entry("keep.txt", IndexEntry::new(id1.clone(), 3, 0));
        index_a.add_entry("gone.txt", IndexEntry::new(id2, 3, 0));
        let tree_a = index_to_tree(&index_a, &store).unwrap();

        let mut index_b = Index::new();
        index_b.add_entry("keep.txt", IndexEntry::new(id1, 3, 0));
        let tree_b = index_to_tree(&index_b, &store).unwrap();

        let workdir = tempdir().unwrap();
        restore_tree(&store, &tree_a, workdir.path()).unwrap();
        assert!(workdir.path().join("gone.txt").exists());

        switch_workspace(&store, Some(&tree_a), &tree_b, workdir.path()).unwrap();

        assert!(!workdir.path().join("gone.txt").exists());
        assert!(workdir.path().join("keep.txt").exists());
    }

    #[test]
    fn clean_paths_removes_empty_parent_dirs() {
        let workdir = tempdir().unwrap();
        fs::create_dir_all(workdir.path().join("sub")).unwrap();
        fs::write(workdir.path().join("sub/file.txt"), b"x").unwrap();

        clean_paths(workdir.path(), ["sub/file.txt"]).unwrap();

        assert!(!workdir.path().join("sub/file.txt").exists());
        assert!(!workdir.path().join("sub").exists());
    }
}
