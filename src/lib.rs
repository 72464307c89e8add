//! # corevcs
//!
//! A local, single-user, content-addressable version control engine,
//! built from scratch in Rust.
//!
//! ## Architecture Overview
//!
//! Everything is stored as an "object" identified by its SHA-1 hash —
//! blobs, trees, commits, and annotated tags.
//!
//! ### Object Types
//!
//! - **Blob**: Raw file contents
//! - **Tree**: Directory listing (maps names to blob/tree ids)
//! - **Commit**: Snapshot with metadata (author, message, parent ids, tree id)
//! - **Tag**: An annotated pointer at another object
//!
//! ### Repository Structure
//!
//! ```text
//! .corevcs/
//! ├── HEAD            # Points to current branch (e.g., "ref: refs/heads/main")
//! ├── index           # Staging area (JSON)
//! ├── objects/        # Object database
//! │   ├── ab/         # First 2 chars of id
//! │   │   └── cdef... # Remaining id chars (zlib compressed)
//! │   └── ...
//! ├── refs/
//! │   ├── heads/      # Branch pointers
//! │   │   └── main    # Contains commit id
//! │   └── tags/       # Tag pointers
//! ├── MERGE_HEAD       # present only mid-merge
//! └── MERGE_MSG        # present only mid-merge
//! ```

pub mod commands;
pub mod commit_engine;
pub mod error;
pub mod history;
pub mod index;
pub mod merge;
pub mod objects;
pub mod ops;
pub mod refs;
pub mod store;
pub mod tree_builder;
pub mod workspace;

use std::path::{Path, PathBuf};

use error::{Error, Result};
use refs::RefStore;
use store::ObjectStore;

/// The name of the metadata directory (analogous to `.git`).
pub const META_DIR: &str = ".corevcs";

/// A repository: a workspace root plus its metadata directory.
#[derive(Debug, Clone)]
pub struct Repository {
    /// The root directory of the repository (where the metadata dir lives).
    pub root: PathBuf,
    /// The metadata directory path.
    pub meta_dir: PathBuf,
}

impl Repository {
    /// Find the repository root by walking up from the current directory.
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        Self::find_from(&current_dir)
    }

    /// Find the repository root by walking up from a specific path.
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            let meta_dir = current.join(META_DIR);
            if meta_dir.is_dir() {
                return Ok(Self { root: current, meta_dir });
            }

            if !current.pop() {
                return Err(Error::NotARepository);
            }
        }
    }

    /// Initialize a new repository at `path`.
    ///
    /// Creates the metadata directory structure:
    /// - `objects/` - object database
    /// - `refs/heads/`, `refs/tags/` - branch and tag references
    /// - `HEAD` - symbolic ref to `refs/heads/main`
    pub fn init(path: &Path) -> Result<Self> {
        let root = path.to_path_buf();
        let meta_dir = root.join(META_DIR);

        if meta_dir.exists() {
            return Err(Error::RepositoryExists(meta_dir));
        }

        std::fs::create_dir_all(meta_dir.join("objects"))?;
        std::fs::create_dir_all(meta_dir.join("refs").join("heads"))?;
        std::fs::create_dir_all(meta_dir.join("refs").join("tags"))?;
        std::fs::write(meta_dir.join("HEAD"), "ref: refs/heads/main\n")?;

        Ok(Self { root, meta_dir })
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.meta_dir.join("objects")
    }

    pub fn index_path(&self) -> PathBuf {
        self.meta_dir.join("index")
    }

    pub fn store(&self) -> ObjectStore {
        ObjectStore::new(self.objects_dir())
    }

    pub fn refs(&self) -> RefStore {
        RefStore::new(self.meta_dir.clone())
    }

    pub fn load_index(&self) -> Result<index::Index> {
        index::Index::load(&self.index_path())
    }

    pub fn save_index(&self, idx: &index::Index) -> Result<()> {
        idx.save(&self.index_path())
    }
}
