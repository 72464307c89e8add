//! # Reference Store
//!
//! Everything that names a commit without being one: HEAD (symbolic or
//! detached), branch heads, and tags (lightweight or annotated-object
//! backed). Consolidated here so HEAD-reading logic lives in exactly
//! one place instead of being re-implemented at every call site that
//! needs it.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::store::atomic_write;

const HEADS_DIR: &str = "heads";
const TAGS_DIR: &str = "tags";

/// Where HEAD currently points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// On a branch, which may or may not have any commits yet.
    Branch { name: String, target: Option<String> },
    /// Detached: pointing directly at a commit.
    Detached(String),
}

impl Head {
    pub fn commit(&self) -> Option<&str> {
        match self {
            Head::Branch { target, .. } => target.as_deref(),
            Head::Detached(id) => Some(id),
        }
    }

    pub fn branch_name(&self) -> Option<&str> {
        match self {
            Head::Branch { name, .. } => Some(name),
            Head::Detached(_) => None,
        }
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, Head::Detached(_))
    }
}

#[derive(Debug, Clone)]
pub struct RefStore {
    /// The repository metadata directory (where `HEAD` and `refs/` live).
    meta_dir: PathBuf,
}

impl RefStore {
    pub fn new(meta_dir: impl Into<PathBuf>) -> Self {
        Self { meta_dir: meta_dir.into() }
    }

    fn head_path(&self) -> PathBuf {
        self.meta_dir.join("HEAD")
    }

    fn heads_dir(&self) -> PathBuf {
        self.meta_dir.join("refs").join(HEADS_DIR)
    }

    fn tags_dir(&self) -> PathBuf {
        self.meta_dir.join("refs").join(TAGS_DIR)
    }

    pub fn branch_path(&self, name: &str) -> PathBuf {
        self.heads_dir().join(name)
    }

    pub fn tag_path(&self, name: &str) -> PathBuf {
        self.tags_dir().join(name)
    }

    /// Read HEAD, resolving a symbolic ref to its branch's current
    /// target (which may be absent if the branch has no commits yet).
    pub fn read_head(&self) -> Result<Head> {
        let content = fs::read_to_string(self.head_path())?.trim().to_string();

        if let Some(ref_path) = content.strip_prefix("ref: ") {
            let ref_path = ref_path.trim();
            let name = ref_path
                .strip_prefix("refs/heads/")
                .ok_or_else(|| Error::IndexCorrupt(format!("unsupported HEAD ref: {ref_path}")))?
                .to_string();
            let target = self.read_branch(&name)?;
            return Ok(Head::Branch { name, target });
        }

        Ok(Head::Detached(content))
    }

    /// Point HEAD at a branch (creating the symbolic ref; the branch
    /// itself need not yet exist).
    pub fn set_head_branch(&self, name: &str) -> Result<()> {
        atomic_write(&self.head_path(), format!("ref: refs/heads/{name}\n").as_bytes())
    }

    /// Detach HEAD to point directly at a commit.
    pub fn set_head_detached(&self, commit_id: &str) -> Result<()> {
        atomic_write(&self.head_path(), format!("{commit_id}\n").as_bytes())
    }

    /// Advance whatever HEAD currently points at (the current branch,
    /// or HEAD itself if detached) to `commit_id`.
    pub fn advance_head(&self, commit_id: &str) -> Result<()> {
        match self.read_head()? {
            Head::Branch { name, .. } => self.write_branch(&name, commit_id),
            Head::Detached(_) => self.set_head_detached(commit_id),
        }
    }

    pub fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.read_head()?.branch_name().map(str::to_string))
    }

    pub fn is_detached(&self) -> Result<bool> {
        Ok(self.read_head()?.is_detached())
    }

    /// The commit HEAD resolves to, if any (`None` for a branch with no commits).
    pub fn head_commit(&self) -> Result<Option<String>> {
        Ok(self.read_head()?.commit().map(str::to_string))
    }

    pub fn read_branch(&self, name: &str) -> Result<Option<String>> {
        let path = self.branch_path(name);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?.trim().to_string()))
    }

    pub fn write_branch(&self, name: &str, commit_id: &str) -> Result<()> {
        atomic_write(&self.branch_path(name), format!("{commit_id}\n").as_bytes())
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.branch_path(name).is_file()
    }

    pub fn delete_branch(&self, name: &str) -> Result<()> {
        fs::remove_file(self.branch_path(name))
            .map_err(|_| Error::UnknownBranch(name.to_string()))
    }

    /// All branch names, sorted.
    pub fn list_branches(&self) -> Result<Vec<String>> {
        list_ref_names(&self.heads_dir())
    }

    pub fn read_tag(&self, name: &str) -> Result<Option<String>> {
        let path = self.tag_path(name);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?.trim().to_string()))
    }

    /// Write a tag ref pointing at `target_id` — a commit id for a
    /// lightweight tag, or a tag object's own id for an annotated tag.
    pub fn write_tag(&self, name: &str, target_id: &str) -> Result<()> {
        atomic_write(&self.tag_path(name), format!("{target_id}\n").as_bytes())
    }

    pub fn tag_exists(&self, name: &str) -> bool {
        self.tag_path(name).is_file()
    }

    pub fn delete_tag(&self, name: &str) -> Result<()> {
        fs::remove_file(self.tag_path(name)).map_err(|_| Error::UnknownTag(name.to_string()))
    }

    pub fn list_tags(&self) -> Result<Vec<String>> {
        list_ref_names(&self.tags_dir())
    }
}

fn list_ref_names(dir: &std::path::Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn init(meta_dir: &std::path::Path) -> RefStore {
        fs::create_dir_all(meta_dir.join("refs").join(HEADS_DIR)).unwrap();
        fs::write(meta_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        RefStore::new(meta_dir)
    }

    #[test]
    fn head_on_branch_with_no_commits() {
        let dir = tempdir().unwrap();
        let refs = init(dir.path());
        let head = refs.read_head().unwrap();
        assert_eq!(head.branch_name(), Some("main"));
        assert_eq!(head.commit(), None);
        assert!(!head.is_detached());
    }

    #[test]
    fn advance_head_on_branch_writes_branch_ref() {
        let dir = tempdir().unwrap();
        let refs = init(dir.path());
        refs.advance_head(&"a".repeat(40)).unwrap();
        assert_eq!(refs.read_branch("main").unwrap(), Some("a".repeat(40)));
    }

    #[test]
    fn detached_head_roundtrip() {
        let dir = tempdir().unwrap();
        let refs = init(dir.path());
        refs.set_head_detached(&"b".repeat(40)).unwrap();
        let head = refs.read_head().unwrap();
        assert!(head.is_detached());
        assert_eq!(head.commit(), Some("b".repeat(40)).as_deref());
    }

    #[test]
    fn advance_head_detached_moves_head_not_a_branch() {
        let dir = tempdir().unwrap();
        let refs = init(dir.path());
        refs.set_head_detached(&"c".repeat(40)).unwrap();
        refs.advance_head(&"d".repeat(40)).unwrap();
        let head = refs.read_head().unwrap();
        assert_eq!(head.commit(), Some("d".repeat(40)).as_deref());
        assert!(refs.read_branch("main").unwrap().is_none());
    }

    #[test]
    fn list_branches_sorted() {
        let dir = tempdir().unwrap();
        let refs = init(dir.path());
        refs.write_branch("zeta", &"a".repeat(40)).unwrap();
        refs.write_branch("alpha", &"a".repeat(40)).unwrap();
        assert_eq!(refs.list_branches().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn tag_roundtrip() {
        let dir = tempdir().unwrap();
        let refs = init(dir.path());
        assert!(!refs.tag_exists("v1"));
        refs.write_tag("v1", &"a".repeat(40)).unwrap();
        assert!(refs.tag_exists("v1"));
        assert_eq!(refs.read_tag("v1").unwrap(), Some("a".repeat(40)));
        refs.delete_tag("v1").unwrap();
        assert!(!refs.tag_exists("v1"));
    }
}
