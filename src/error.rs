//! # Error Kinds
//!
//! The core engine returns this closed enumeration rather than opaque
//! strings, so callers (the CLI layer, tests) can match on failure mode
//! instead of scraping messages. The CLI boundary (`commands/`,
//! `main.rs`) still works in terms of `anyhow::Result`; `Error`
//! implements `std::error::Error` so it converts into `anyhow::Error` for
//! free at every `?`.

use std::path::PathBuf;

/// All failure modes the engine can surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("fatal: not a repository (or any of the parent directories)")]
    NotARepository,

    #[error("fatal: repository already exists at {0}")]
    RepositoryExists(PathBuf),

    #[error("fatal: object not found: {0}")]
    ObjectNotFound(String),

    #[error("fatal: malformed object: {0}")]
    MalformedObject(String),

    #[error("fatal: path not found: {0}")]
    PathNotFound(String),

    #[error("fatal: index corrupt: {0}")]
    IndexCorrupt(String),

    #[error("nothing to commit, working tree clean")]
    NothingToCommit,

    #[error("fatal: cannot merge while in a detached HEAD state")]
    DetachedMerge,

    #[error("fatal: cannot merge branch '{0}' into itself")]
    SelfMerge,

    #[error("fatal: unknown branch: {0}")]
    UnknownBranch(String),

    #[error("fatal: unknown tag: {0}")]
    UnknownTag(String),

    #[error("fatal: tag already exists: {0}")]
    TagExists(String),

    #[error("Already up to date.")]
    AlreadyUpToDate,

    #[error("fatal: no common ancestor between the two histories")]
    NoCommonAncestor,

    #[error("Automatic merge failed; fix conflicts and then commit the result.")]
    MergeConflicts(Vec<String>),

    #[error("error: could not apply commit cleanly; fix conflicts and then commit the result.")]
    CherryPickConflicts(Vec<String>),

    #[error("No stash entries found.")]
    StashEmpty,

    #[error("fatal: stash index out of range")]
    StashIndexOOR,

    #[error("note: resetting in a detached HEAD state")]
    DetachedReset,

    #[error("fatal: cannot cherry-pick a commit with no parents")]
    InitialCommitCherryPick,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
