//! # Add Command
//!
//! Stage files for the next commit by adding them to the index.
//!
//! ## Usage
//!
//! ```bash
//! # Stage a single file
//! corevcs add file.txt
//!
//! # Stage multiple files
//! corevcs add file1.txt file2.txt
//!
//! # Stage everything under the current directory
//! corevcs add .
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::index::{Index, IndexEntry};
use crate::objects::Kind;
use crate::Repository;

fn read_file(path: &Path) -> Result<(Vec<u8>, u64)> {
    let content = fs::read(path).context(format!("failed to read file: {}", path.display()))?;
    let metadata = fs::metadata(path)?;
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Ok((content, mtime))
}

/// Stage a single path (a file, or every file under a directory)
/// relative to `repo.root`. The metadata directory is always skipped.
fn add_path(repo: &Repository, index: &mut Index, path: &Path) -> Result<()> {
    if path.is_file() {
        let relative = path
            .strip_prefix(&repo.root)
            .context("path is outside the repository")?
            .to_string_lossy()
            .replace('\\', "/");

        let (content, mtime) = read_file(path)?;
        let blob_id = repo.store().put(Kind::Blob, &content)?;
        index.add_entry(relative, IndexEntry::new(blob_id, content.len() as u64, mtime));
        return Ok(());
    }

    if path.is_dir() {
        for walked in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let entry_path = walked.path();
            if !entry_path.is_file() {
                continue;
            }
            let relative = entry_path
                .strip_prefix(&repo.root)
                .context("path is outside the repository")?
                .to_string_lossy()
                .replace('\\', "/");
            if relative.starts_with(&format!("{}/", crate::META_DIR)) {
                continue;
            }
            let (content, mtime) = read_file(entry_path)?;
            let blob_id = repo.store().put(Kind::Blob, &content)?;
            index.add_entry(relative, IndexEntry::new(blob_id, content.len() as u64, mtime));
        }
        return Ok(());
    }

    anyhow::bail!("path does not exist: {}", path.display());
}

/// Execute the add command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::add::run;
///
/// run(vec!["file.txt".to_string()]).unwrap();
/// run(vec![".".to_string()]).unwrap();
/// ```
pub fn run(paths: Vec<String>) -> Result<()> {
    let repo = Repository::find()?;
    let mut index = repo.load_index()?;

    for path_str in paths {
        let path = PathBuf::from(&path_str);
        let full_path = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()?.join(&path)
        };
        add_path(&repo, &mut index, &full_path)?;
    }

    repo.save_index(&index)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn add_single_file_stages_it() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        fs::write(temp.path().join("a.txt"), b"hello").unwrap();

        let mut index = Index::new();
        add_path(&repo, &mut index, &temp.path().join("a.txt")).unwrap();

        assert!(index.contains("a.txt"));
        assert_eq!(index.get_entry("a.txt").unwrap().size, 5);
    }

    #[test]
    fn add_directory_stages_all_files_and_skips_metadata_dir() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/a.txt"), b"a").unwrap();
        fs::write(temp.path().join("src/b.txt"), b"b").unwrap();

        let mut index = Index::new();
        add_path(&repo, &mut index, temp.path()).unwrap();

        assert!(index.contains("src/a.txt"));
        assert!(index.contains("src/b.txt"));
        assert!(index.entries.keys().all(|p| !p.starts_with(".corevcs")));
    }

    #[test]
    fn add_missing_path_fails() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        let mut index = Index::new();
        assert!(add_path(&repo, &mut index, &temp.path().join("missing.txt")).is_err());
    }
}
