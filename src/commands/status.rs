//! # Status Command
//!
//! Show the working tree status: staged changes, unstaged changes, and
//! untracked files, relative to HEAD and the index.
//!
//! ## Usage
//!
//! ```bash
//! corevcs status
//! ```

use std::collections::BTreeMap;

use anyhow::Result;
use walkdir::WalkDir;

use crate::commit_engine;
use crate::objects::{hash, Kind};
use crate::tree_builder::tree_to_fileset;
use crate::Repository;

fn head_fileset(repo: &Repository) -> Result<BTreeMap<String, String>> {
    match repo.refs().head_commit()? {
        None => Ok(BTreeMap::new()),
        Some(id) => {
            let obj = repo.store().get_kind(&id, Kind::Commit)?;
            let text = String::from_utf8(obj.payload)
                .map_err(|_| crate::error::Error::MalformedObject(format!("commit {id} is not valid utf-8")))?;
            let commit = crate::objects::Commit::parse(&text)?;
            Ok(tree_to_fileset(&repo.store(), &commit.tree)?)
        }
    }
}

fn workspace_files(repo: &Repository) -> Result<Vec<String>> {
    let mut files = Vec::new();
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
        files.push(relative);
    }
    Ok(files)
}

/// Execute the status command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::status::run;
///
/// run().unwrap();
/// ```
pub fn run() -> Result<()> {
    let repo = Repository::find()?;
    let refs = repo.refs();

    match refs.current_branch()? {
        Some(branch) => println!("On branch {branch}"),
        None => println!("HEAD detached at {}", refs.head_commit()?.unwrap_or_default()),
    }

    if commit_engine::is_merge_in_progress(&repo.meta_dir) {
        println!("You have unmerged paths.");
        println!("  (fix conflicts and run \"corevcs commit\")");
        println!();
    }

    let head = head_fileset(&repo)?;
    let index = repo.load_index()?;

    let mut staged_new = Vec::new();
    let mut staged_modified = Vec::new();
    let mut staged_deleted = Vec::new();

    for (path, entry) in &index.entries {
        match head.get(path) {
            None => staged_new.push(path.clone()),
            Some(head_hash) if head_hash != &entry.hash => staged_modified.push(path.clone()),
            _ => {}
        }
    }
    for path in head.keys() {
        if !index.contains(path) {
            staged_deleted.push(path.clone());
        }
    }

    if !staged_new.is_empty() || !staged_modified.is_empty() || !staged_deleted.is_empty() {
        println!("Changes to be committed:");
        for path in &staged_new {
            println!("\tnew file:   {path}");
        }
        for path in &staged_modified {
            println!("\tmodified:   {path}");
        }
        for path in &staged_deleted {
            println!("\tdeleted:    {path}");
        }
        println!();
    }

    let workspace = workspace_files(&repo)?;
    let workspace_set: std::collections::BTreeSet<&String> = workspace.iter().collect();

    let mut unstaged_modified = Vec::new();
    let mut unstaged_deleted = Vec::new();
    for (path, entry) in &index.entries {
        let full = repo.root.join(path);
        match std::fs::read(&full) {
            Ok(content) => {
                if hash(Kind::Blob, &content) != entry.hash {
                    unstaged_modified.push(path.clone());
                }
            }
            Err(_) => unstaged_deleted.push(path.clone()),
        }
    }

    if !unstaged_modified.is_empty() || !unstaged_deleted.is_empty() {
        println!("Changes not staged for commit:");
        for path in &unstaged_modified {
            println!("\tmodified:   {path}");
        }
        for path in &unstaged_deleted {
            println!("\tdeleted:    {path}");
        }
        println!();
    }

    let untracked: Vec<&String> = workspace_set
        .into_iter()
        .filter(|path| !index.contains(path))
        .collect();

    if !untracked.is_empty() {
        println!("Untracked files:");
        for path in &untracked {
            println!("\t{path}");
        }
        println!();
    }

    if staged_new.is_empty()
        && staged_modified.is_empty()
        && staged_deleted.is_empty()
        && unstaged_modified.is_empty()
        && unstaged_deleted.is_empty()
        && untracked.is_empty()
    {
        println!("nothing to commit, working tree clean");
    }

    Ok(())
}
