//! # Merge Engine
//!
//! Fast-forward detection plus a three-way merge over per-commit
//! flattened indices, with conflicts materialized as in-file markers
//! rather than resolved automatically.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::history;
use crate::index::{Index, IndexEntry};
use crate::objects::{Commit, Kind};
use crate::store::ObjectStore;
use crate::tree_builder::tree_to_fileset;
use crate::workspace::restore_tree;

pub enum MergeResult {
    AlreadyUpToDate,
    FastForward { new_head: String },
    Merged { commit_id: String },
    Conflicted { branch_tip: String, conflicts: Vec<String> },
}

fn load_commit(store: &ObjectStore, id: &str) -> Result<Commit> {
    let obj = store.get_kind(id, Kind::Commit)?;
    let text = String::from_utf8(obj.payload)
        .map_err(|_| Error::MalformedObject(format!("commit {id} is not valid utf-8")))?;
    Commit::parse(&text)
}

/// Classify each path across base/current/branch per the three-way
/// merge rule, returning the merged path->blob map and the conflicted
/// path set. Conflicted entries keep a provisional value (current's if
/// present, else branch's) so the index stays complete even with
/// unresolved conflicts.
pub fn three_way_merge(
    base: &std::collections::BTreeMap<String, String>,
    current: &std::collections::BTreeMap<String, String>,
    branch: &std::collections::BTreeMap<String, String>,
) -> (std::collections::BTreeMap<String, String>, BTreeSet<String>) {
    let mut merged = std::collections::BTreeMap::new();
    let mut conflicts = BTreeSet::new();

    let all_paths: BTreeSet<&String> = base.keys().chain(current.keys()).chain(branch.keys()).collect();

    for path in all_paths {
        let base_id = base.get(path);
        let current_id = current.get(path);
        let branch_id = branch.get(path);

        if current_id == branch_id {
            if let Some(id) = current_id {
                merged.insert(path.clone(), id.clone());
            }
        } else if current_id == base_id {
            // current unchanged vs base, branch changed -> take branch
            if let Some(id) = branch_id {
                merged.insert(path.clone(), id.clone());
            }
        } else if branch_id == base_id {
            // branch unchanged vs base, current changed -> take current
            if let Some(id) = current_id {
                merged.insert(path.clone(), id.clone());
            }
        } else {
            // both changed (including modify/delete) -> conflict
            conflicts.insert(path.clone());
            let provisional = current_id.or(branch_id);
            if let Some(id) = provisional {
                merged.insert(path.clone(), id.clone());
            }
        }
    }

    (merged, conflicts)
}

/// Write conflict markers for a conflicted path, current content
/// labeled `HEAD`, branch content labeled `MERGE_HEAD`.
fn write_conflict_marker(
    store: &ObjectStore,
    current: &std::collections::BTreeMap<String, String>,
    branch: &std::collections::BTreeMap<String, String>,
    path: &str,
    dest: &Path,
) -> Result<()> {
    let current_content = match current.get(path) {
        Some(id) => store.get_kind(id, Kind::Blob)?.payload,
        None => Vec::new(),
    };
    let branch_content = match branch.get(path) {
        Some(id) => store.get_kind(id, Kind::Blob)?.payload,
        None => Vec::new(),
    };

    let mut content = Vec::new();
    content.extend_from_slice(b"<<<<<<< HEAD\n");
    content.extend_from_slice(&current_content);
    content.extend_from_slice(b"\n=======\n");
    content.extend_from_slice(&branch_content);
    content.extend_from_slice(b"\n>>>>>>> MERGE_HEAD\n");

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, content)?;
    Ok(())
}

/// Perform `merge(branch_tip, no_ff)` against the given HEAD commit
/// (which must exist — callers resolve `DetachedMerge`/self-merge/
/// unknown-branch before calling in). `root` is the workspace root;
/// `meta_dir` holds the index to materialize into.
pub fn merge(
    store: &ObjectStore,
    root: &Path,
    index_path: &Path,
    head_commit: &str,
    branch_tip: &str,
    no_ff: bool,
) -> Result<MergeResult> {
    if head_commit == branch_tip {
        return Ok(MergeResult::AlreadyUpToDate);
    }

    if !no_ff && history::is_ancestor(store, head_commit, branch_tip)? {
        let head = load_commit(store, head_commit)?;
        restore_tree_diff(store, root, Some(&head.tree), &load_commit(store, branch_tip)?.tree)?;
        Index::new().save(index_path)?;
        return Ok(MergeResult::FastForward { new_head: branch_tip.to_string() });
    }

    let base = history::lowest_common_ancestor(store, head_commit, branch_tip)?
        .ok_or(Error::NoCommonAncestor)?;

    let base_commit = load_commit(store, &base)?;
    let current_commit = load_commit(store, head_commit)?;
    let branch_commit = load_commit(store, branch_tip)?;

    let base_fs = tree_to_fileset(store, &base_commit.tree)?;
    let current_fs = tree_to_fileset(store, &current_commit.tree)?;
    let branch_fs = tree_to_fileset(store, &branch_commit.tree)?;

    let (merged, conflicts) = three_way_merge(&base_fs, &current_fs, &branch_fs);

    let mut index = Index::new();
    for (path, blob_id) in &merged {
        let size = store.get_kind(blob_id, Kind::Blob)?.payload.len() as u64;
        index.add_entry(path.clone(), IndexEntry::new(blob_id.clone(), size, 0));
    }
    index.save(index_path)?;

    for (path, blob_id) in &merged {
        let dest = root.join(path);
        if conflicts.contains(path) {
            write_conflict_marker(store, &current_fs, &branch_fs, path, &dest)?;
        } else {
            let obj = store.get_kind(blob_id, Kind::Blob)?;
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, &obj.payload)?;
        }
    }

    if !conflicts.is_empty() {
        return Ok(MergeResult::Conflicted {
            branch_tip: branch_tip.to_string(),
            conflicts: conflicts.into_iter().collect(),
        });
    }

    Ok(MergeResult::Merged { commit_id: branch_tip.to_string() })
}

/// Restore the workspace from one tree to another, cleaning files that
/// existed in the old tree but not the new one.
fn restore_tree_diff(store: &ObjectStore, root: &Path, from_tree: Option<&str>, to_tree: &str) -> Result<()> {
    crate::workspace::switch_workspace(store, from_tree, to_tree, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn unchanged_on_both_sides_is_kept() {
        let base = map(&[("a.txt", "1")]);
        let current = map(&[("a.txt", "1")]);
        let branch = map(&[("a.txt", "1")]);
        let (merged, conflicts) = three_way_merge(&base, &current, &branch);
        assert_eq!(merged.get("a.txt"), Some(&"1".to_string()));
        assert!(conflicts.is_empty());
    }

    #[test]
    fn branch_only_change_is_taken() {
        let base = map(&[("a.txt", "1")]);
        let current = map(&[("a.txt", "1")]);
        let branch = map(&[("a.txt", "2")]);
        let (merged, conflicts) = three_way_merge(&base, &current, &branch);
        assert_eq!(merged.get("a.txt"), Some(&"2".to_string()));
        assert!(conflicts.is_empty());
    }

    #[test]
    fn current_only_change_is_taken() {
        let base = map(&[("a.txt", "1")]);
        let current = map(&[("a.txt", "3")]);
        let branch = map(&[("a.txt", "1")]);
        let (merged, conflicts) = three_way_merge(&base, &current, &branch);
        assert_eq!(merged.get("a.txt"), Some(&"3".to_string()));
        assert!(conflicts.is_empty());
    }

    #[test]
    fn both_changed_differently_is_conflict() {
        let base = map(&[("a.txt", "1")]);
        let current = map(&[("a.txt", "2")]);
        let branch = map(&[("a.txt", "3")]);
        let (merged, conflicts) = three_way_merge(&base, &current, &branch);
        assert!(conflicts.contains("a.txt"));
        assert_eq!(merged.get("a.txt"), Some(&"2".to_string()));
    }

    #[test]
    fn modify_delete_is_conflict() {
        let base = map(&[("a.txt", "1")]);
        let current = map(&[("a.txt", "2")]);
        let branch: BTreeMap<String, String> = BTreeMap::new();
        let (merged, conflicts) = three_way_merge(&base, &current, &branch);
        assert!(conflicts.contains("a.txt"));
        assert_eq!(merged.get("a.txt"), Some(&"2".to_string()));
    }
}
