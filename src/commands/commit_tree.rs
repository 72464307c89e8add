//! # Commit-Tree Command
//!
//! Create a commit object from a tree hash.
//!
//! This is also where identity resolution lives: the engine itself has
//! no notion of "who is committing", so every porcelain command that
//! needs an author/committer identity (`commit`, `tag -a`) goes through
//! [`resolve_identity`] rather than reading environment variables
//! directly.
//!
//! ## Usage
//!
//! ```bash
//! # Create initial commit (no parent)
//! corevcs commit-tree <tree-hash> -m "Initial commit"
//!
//! # Create commit with parent
//! corevcs commit-tree <tree-hash> -p <parent-hash> -m "Second commit"
//!
//! # Create merge commit (multiple parents)
//! corevcs commit-tree <tree-hash> -p <parent1> -p <parent2> -m "Merge"
//! ```

use std::env;

use anyhow::{Context, Result};

use crate::objects::commit::{Author, Commit};
use crate::objects::Kind;
use crate::Repository;

/// Resolve the identity to stamp on a commit or annotated tag.
///
/// Checks `GIT_AUTHOR_NAME`/`GIT_AUTHOR_EMAIL`, then
/// `GIT_COMMITTER_NAME`/`GIT_COMMITTER_EMAIL`, falling back to the
/// `$USER`/`$USERNAME` environment variables and a synthesized
/// `name@localhost` address. The result is a single free-form string
/// (`"Jane Doe <jane@x.com>"`) since [`Author`] has no separate name and
/// email fields.
pub fn resolve_identity() -> Author {
    let name = env::var("GIT_AUTHOR_NAME")
        .or_else(|_| env::var("GIT_COMMITTER_NAME"))
        .or_else(|_| env::var("USER"))
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "Unknown".to_string());

    let email = env::var("GIT_AUTHOR_EMAIL")
        .or_else(|_| env::var("GIT_COMMITTER_EMAIL"))
        .unwrap_or_else(|_| format!("{}@localhost", name.to_lowercase().replace(' ', ".")));

    Author::new(format!("{} <{}>", name, email))
}

/// Execute the commit-tree command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::commit_tree::run;
///
/// run("abc123...", vec![], "Initial commit").unwrap();
/// run("def456...", vec!["abc123...".to_string()], "Second commit").unwrap();
/// ```
pub fn run(tree_hash: &str, parents: Vec<String>, message: &str) -> Result<String> {
    let repo = Repository::find()?;

    if !repo.store().exists(tree_hash) {
        anyhow::bail!("tree object not found: {}", tree_hash);
    }

    let author = resolve_identity();
    let committer = author.clone();

    let commit = Commit::new(tree_hash.to_string(), parents, author, committer, message.to_string());
    let commit_hash = repo
        .store()
        .put(Kind::Commit, commit.serialize().as_bytes())
        .context("failed to store commit object")?;

    println!("{}", commit_hash);
    Ok(commit_hash)
}
