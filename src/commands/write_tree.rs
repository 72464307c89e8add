//! # Write-Tree Command
//!
//! Create a tree object from the staged index.
//!
//! ## How it works
//!
//! 1. Load the index
//! 2. Build a directory structure out of its flat path -> blob mapping
//! 3. Store a tree object per directory, bottom-up
//! 4. Return the root tree hash
//!
//! ## Usage
//!
//! ```bash
//! # Create tree from the staged index
//! corevcs write-tree
//! ```

use anyhow::Result;

use crate::tree_builder::index_to_tree;
use crate::Repository;

/// Execute the write-tree command
///
/// Creates a tree object from whatever is currently staged in the index.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::write_tree::run;
///
/// let hash = run().unwrap();
/// println!("Tree hash: {}", hash);
/// ```
pub fn run() -> Result<String> {
    let repo = Repository::find()?;
    let index = repo.load_index()?;

    let tree_hash = index_to_tree(&index, &repo.store())?;

    println!("{}", tree_hash);
    Ok(tree_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::objects::Kind;
    use tempfile::tempdir;

    #[test]
    fn test_write_tree_simple() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let store = repo.store();
        let blob1 = store.put(Kind::Blob, b"content1").unwrap();
        let blob2 = store.put(Kind::Blob, b"content2").unwrap();

        let mut index = repo.load_index().unwrap();
        index.add_entry("file1.txt", IndexEntry::new(blob1, 8, 0));
        index.add_entry("file2.txt", IndexEntry::new(blob2, 8, 0));
        repo.save_index(&index).unwrap();

        let hash = run().unwrap();
        assert_eq!(hash.len(), 40);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_write_tree_with_subdir() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let store = repo.store();
        let root_blob = store.put(Kind::Blob, b"root").unwrap();
        let sub_blob = store.put(Kind::Blob, b"sub").unwrap();

        let mut index = repo.load_index().unwrap();
        index.add_entry("root.txt", IndexEntry::new(root_blob, 4, 0));
        index.add_entry("subdir/sub.txt", IndexEntry::new(sub_blob, 3, 0));
        repo.save_index(&index).unwrap();

        let hash = run().unwrap();
        assert_eq!(hash.len(), 40);

        let object = store.get_kind(&hash, Kind::Tree).unwrap();
        assert_eq!(object.kind, Kind::Tree);
    }
}
