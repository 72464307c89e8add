//! # Diff Command
//!
//! Show changes between commits, the index, and the working directory.
//!
//! ## Usage
//!
//! ```bash
//! # Working directory vs index
//! corevcs diff
//!
//! # Staged changes: index vs HEAD
//! corevcs diff --cached
//!
//! # Two commits
//! corevcs diff <commit1> <commit2>
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::index::Index;
use crate::objects::{Blob, Kind};
use crate::ops::resolve::resolve_commit;
use crate::tree_builder::tree_to_fileset;
use crate::Repository;

/// A single edit operation in a line-level diff.
#[derive(Debug, Clone, PartialEq)]
enum Edit {
    Keep(String),
    Delete(String),
    Insert(String),
}

/// A simplified, greedy line-matcher in the spirit of Myers' shortest
/// edit script: exact match extends the common run, otherwise it looks
/// a short distance ahead in either sequence for a resync point before
/// falling back to a straight delete+insert pair.
fn myers_diff(old: &[String], new: &[String]) -> Vec<Edit> {
    let n = old.len();
    let m = new.len();

    if n == 0 {
        return new.iter().map(|s| Edit::Insert(s.clone())).collect();
    }
    if m == 0 {
        return old.iter().map(|s| Edit::Delete(s.clone())).collect();
    }

    let mut edits = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < n || j < m {
        if i >= n {
            edits.push(Edit::Insert(new[j].clone()));
            j += 1;
        } else if j >= m {
            edits.push(Edit::Delete(old[i].clone()));
            i += 1;
        } else if old[i] == new[j] {
            edits.push(Edit::Keep(old[i].clone()));
            i += 1;
            j += 1;
        } else {
            let mut found = false;

            for k in (j + 1)..m.min(j + 10) {
                if old[i] == new[k] {
                    for l in j..k {
                        edits.push(Edit::Insert(new[l].clone()));
                    }
                    edits.push(Edit::Keep(old[i].clone()));
                    i += 1;
                    j = k + 1;
                    found = true;
                    break;
                }
            }

            if !found {
                for k in (i + 1)..n.min(i + 10) {
                    if old[k] == new[j] {
                        for l in i..k {
                            edits.push(Edit::Delete(old[l].clone()));
                        }
                        edits.push(Edit::Keep(new[j].clone()));
                        i = k + 1;
                        j += 1;
                        found = true;
                        break;
                    }
                }
            }

            if !found {
                edits.push(Edit::Delete(old[i].clone()));
                edits.push(Edit::Insert(new[j].clone()));
                i += 1;
                j += 1;
            }
        }
    }

    edits
}

/// Render edits as a unified diff hunk set.
fn format_unified_diff(path: &str, edits: &[Edit]) -> String {
    let mut output = Vec::new();

    output.push(format!("--- a/{path}"));
    output.push(format!("+++ b/{path}"));

    let mut old_line = 1;
    let mut new_line = 1;
    let mut in_hunk = false;
    let mut hunk_start_old = 0;
    let mut hunk_start_new = 0;
    let mut hunk_lines = Vec::new();

    for edit in edits {
        match edit {
            Edit::Keep(_) => {
                if in_hunk {
                    let old_count = old_line - hunk_start_old;
                    let new_count = new_line - hunk_start_new;
                    output.push(format!("@@ -{hunk_start_old},{old_count} +{hunk_start_new},{new_count} @@"));
                    output.extend(hunk_lines.drain(..));
                    in_hunk = false;
                }
                old_line += 1;
                new_line += 1;
            }
            Edit::Delete(s) => {
                if !in_hunk {
                    hunk_start_old = old_line;
                    hunk_start_new = new_line;
                    in_hunk = true;
                }
                hunk_lines.push(format!("-{s}"));
                old_line += 1;
            }
            Edit::Insert(s) => {
                if !in_hunk {
                    hunk_start_old = old_line;
                    hunk_start_new = new_line;
                    in_hunk = true;
                }
                hunk_lines.push(format!("+{s}"));
                new_line += 1;
            }
        }
    }

    if in_hunk {
        let old_count = old_line - hunk_start_old;
        let new_count = new_line - hunk_start_new;
        output.push(format!("@@ -{hunk_start_old},{old_count} +{hunk_start_new},{new_count} @@"));
        output.extend(hunk_lines);
    }

    output.join("\n")
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Print a unified diff for one path, given its old/new content. A
/// `None` side means the path doesn't exist there (added or deleted).
/// Content that isn't valid UTF-8 on either side is reported but not
/// diffed line-by-line, matching how binary files are handled.
fn diff_file(path: &str, old_content: Option<&[u8]>, new_content: Option<&[u8]>) {
    let old_text = old_content.map(|c| Blob::new(c.to_vec()).as_text());
    let new_text = new_content.map(|c| Blob::new(c.to_vec()).as_text());

    if old_text.as_ref().is_some_and(|t| t.is_none()) || new_text.as_ref().is_some_and(|t| t.is_none()) {
        println!("Binary files a/{path} and b/{path} differ");
        return;
    }

    let old_lines = old_text.flatten().as_deref().map(split_lines).unwrap_or_default();
    let new_lines = new_text.flatten().as_deref().map(split_lines).unwrap_or_default();

    let edits = myers_diff(&old_lines, &new_lines);
    if edits.iter().all(|e| matches!(e, Edit::Keep(_))) {
        return;
    }

    println!("{}", format_unified_diff(path, &edits));
}

fn blob_content(repo: &Repository, id: &str) -> Result<Vec<u8>> {
    Ok(repo.store().get_kind(id, Kind::Blob)?.payload)
}

fn commit_fileset(repo: &Repository, commit_id: &str) -> Result<BTreeMap<String, String>> {
    let obj = repo.store().get_kind(commit_id, Kind::Commit)?;
    let text = String::from_utf8(obj.payload)
        .map_err(|_| crate::error::Error::MalformedObject(format!("commit {commit_id} is not valid utf-8")))?;
    let commit = crate::objects::Commit::parse(&text)?;
    Ok(tree_to_fileset(&repo.store(), &commit.tree)?)
}

fn index_fileset(index: &Index) -> BTreeMap<String, String> {
    index.entries.iter().map(|(p, e)| (p.clone(), e.hash.clone())).collect()
}

fn workspace_paths(repo: &Repository) -> Result<BTreeSet<String>> {
    let mut paths = BTreeSet::new();
    for entry in WalkDir::new(&repo.root).into_iter().filter_map(|e| e.ok()) {
        if !entry.path().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&repo.root)?
            .to_string_lossy()
            .replace('\\', "/");
        if relative.starts_with(&format!("{}/", crate::META_DIR)) {
            continue;
        }
        paths.insert(relative);
    }
    Ok(paths)
}

/// Diff two `path -> blob id` filesets, resolving blob content through
/// `resolve`. Used for commit-vs-commit and commit-vs-index diffs,
/// where both sides are fully content-addressed.
fn diff_filesets(
    repo: &Repository,
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
) -> Result<()> {
    let paths: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    for path in paths {
        let old_id = old.get(path);
        let new_id = new.get(path);
        if old_id == new_id {
            continue;
        }
        let old_content = old_id.map(|id| blob_content(repo, id)).transpose()?;
        let new_content = new_id.map(|id| blob_content(repo, id)).transpose()?;
        diff_file(path, old_content.as_deref(), new_content.as_deref());
    }
    Ok(())
}

/// Working directory vs index: what `add` would stage if run now.
fn diff_working_vs_index(repo: &Repository) -> Result<()> {
    let index = repo.load_index()?;
    let tracked: BTreeSet<String> = index.entries.keys().cloned().collect();
    let workspace = workspace_paths(repo)?;
    let paths: BTreeSet<&String> = tracked.iter().chain(workspace.iter()).collect();

    for path in paths {
        let index_content = index
            .get_entry(path)
            .map(|e| blob_content(repo, &e.hash))
            .transpose()?;
        let working_content = fs::read(repo.root.join(path))
            .ok()
            .map(Some)
            .unwrap_or(None);

        if index_content.as_deref() == working_content.as_deref() {
            continue;
        }
        diff_file(path, index_content.as_deref(), working_content.as_deref());
    }

    Ok(())
}

/// Index vs HEAD: staged changes (`diff --cached`).
fn diff_index_vs_head(repo: &Repository) -> Result<()> {
    let index_fs = index_fileset(&repo.load_index()?);
    let head_fs = match repo.refs().head_commit()? {
        Some(id) => commit_fileset(repo, &id)?,
        None => BTreeMap::new(),
    };
    diff_filesets(repo, &head_fs, &index_fs)
}

/// Two arbitrary commits (or anything `resolve_commit` accepts).
fn diff_commits(repo: &Repository, commit1: &str, commit2: &str) -> Result<()> {
    let id1 = resolve_commit(repo, commit1).context("failed to resolve first commit")?;
    let id2 = resolve_commit(repo, commit2).context("failed to resolve second commit")?;
    let fs1 = commit_fileset(repo, &id1)?;
    let fs2 = commit_fileset(repo, &id2)?;
    diff_filesets(repo, &fs1, &fs2)
}

/// A single commit vs the index (`--cached`) or the working tree.
fn diff_commit_vs_other(repo: &Repository, commit: &str, cached: bool) -> Result<()> {
    let id = resolve_commit(repo, commit).context("failed to resolve commit")?;
    let commit_fs = commit_fileset(repo, &id)?;
    if cached {
        diff_filesets(repo, &commit_fs, &index_fileset(&repo.load_index()?))
    } else {
        let paths: BTreeSet<String> = commit_fs.keys().cloned().chain(workspace_paths(repo)?).collect();
        for path in paths {
            let old_content = commit_fs.get(&path).map(|id| blob_content(repo, id)).transpose()?;
            let new_content = fs::read(repo.root.join(&path)).ok();
            if old_content.as_deref() == new_content.as_deref() {
                continue;
            }
            diff_file(&path, old_content.as_deref(), new_content.as_deref());
        }
        Ok(())
    }
}

/// Execute the diff command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::diff::run;
///
/// run(false, None, None).unwrap();   // working dir vs index
/// run(true, None, None).unwrap();    // staged vs HEAD
/// ```
pub fn run(cached: bool, commit1: Option<String>, commit2: Option<String>) -> Result<()> {
    let repo = Repository::find()?;

    match (commit1, commit2) {
        (Some(c1), Some(c2)) => diff_commits(&repo, &c1, &c2),
        (Some(c1), None) => diff_commit_vs_other(&repo, &c1, cached),
        (None, _) if cached => diff_index_vs_head(&repo),
        (None, _) => diff_working_vs_index(&repo),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn myers_diff_identical_sequences_is_all_keep() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let edits = myers_diff(&lines, &lines);
        assert!(edits.iter().all(|e| matches!(e, Edit::Keep(_))));
    }

    #[test]
    fn myers_diff_detects_a_single_substitution() {
        let old = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let new = vec!["a".to_string(), "x".to_string(), "c".to_string()];
        let edits = myers_diff(&old, &new);
        assert!(edits.contains(&Edit::Delete("b".to_string())));
        assert!(edits.contains(&Edit::Insert("x".to_string())));
    }

    #[test]
    fn format_unified_diff_includes_hunk_header() {
        let edits = vec![Edit::Keep("a".to_string()), Edit::Delete("b".to_string()), Edit::Insert("c".to_string())];
        let out = format_unified_diff("file.txt", &edits);
        assert!(out.contains("--- a/file.txt"));
        assert!(out.contains("+++ b/file.txt"));
        assert!(out.contains("@@"));
    }

    #[test]
    fn diff_file_on_non_utf8_content_does_not_panic() {
        let binary = vec![0xFF, 0xFE, 0x00, 0x01];
        diff_file("blob.bin", Some(b"text"), Some(&binary));
        diff_file("blob.bin", None, Some(&binary));
    }

    #[test]
    fn diff_working_vs_index_on_clean_repo_does_not_fail() {
        use crate::index::IndexEntry;
        use crate::objects::Author;
        use tempfile::tempdir;

        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let store = repo.store();
        let blob_id = store.put(Kind::Blob, b"hello").unwrap();
        let mut index = repo.load_index().unwrap();
        index.add_entry("a.txt", IndexEntry::new(blob_id, 5, 0));
        repo.save_index(&index).unwrap();
        fs::write(repo.root.join("a.txt"), b"hello").unwrap();
        crate::commit_engine::commit(&repo.meta_dir, &store, &repo.refs(), &index, Author::with_timestamp("T", 1), "msg").unwrap();

        run(false, None, None).unwrap();
        run(true, None, None).unwrap();
    }
}
