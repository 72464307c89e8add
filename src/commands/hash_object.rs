//! # Hash-Object Command
//!
//! Compute the object id of a file and optionally store it in the
//! object database.
//!
//! ## Usage
//!
//! ```bash
//! # Just compute hash (don't store)
//! corevcs hash-object README.md
//!
//! # Compute hash and store in object database
//! corevcs hash-object -w README.md
//! ```

use anyhow::{Context, Result};

use crate::objects::Kind;
use crate::Repository;

/// Execute the hash-object command
///
/// # Arguments
///
/// * `file_path` - Path to the file to hash
/// * `write` - If true, store the object in the database
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::hash_object::run;
///
/// // Just print hash
/// run("README.md", false).unwrap();
///
/// // Store in database
/// run("README.md", true).unwrap();
/// ```
pub fn run(file_path: &str, write: bool) -> Result<String> {
    let content = std::fs::read(file_path)
        .context(format!("Failed to read file: {}", file_path))?;

    let hash = if write {
        let repo = Repository::find()?;
        repo.store().put(Kind::Blob, &content)?
    } else {
        crate::objects::hash(Kind::Blob, &content)
    };

    println!("{}", hash);
    Ok(hash)
}
