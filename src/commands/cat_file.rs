//! # Cat-File Command
//!
//! Read and display the contents of a repository object.
//!
//! ## Usage
//!
//! ```bash
//! # Pretty-print object contents
//! corevcs cat-file -p abc123def456...
//! ```

use anyhow::{Context, Result};

use crate::objects::{Kind, Tree};
use crate::Repository;

/// Execute the cat-file command
///
/// # Arguments
///
/// * `hash` - The object hash to read
/// * `pretty_print` - If true, format tree entries for readability
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::cat_file::run;
///
/// run("abc123...", true).unwrap();
/// ```
pub fn run(hash: &str, pretty_print: bool) -> Result<()> {
    let repo = Repository::find()?;
    let object = repo.store().get(hash).context(format!("Failed to read object: {}", hash))?;

    match object.kind {
        Kind::Blob | Kind::Commit | Kind::Tag => {
            print!("{}", String::from_utf8_lossy(&object.payload));
        }
        Kind::Tree => {
            if pretty_print {
                let tree = Tree::parse(&object.payload)?;
                for entry in &tree.entries {
                    let kind = if entry.is_tree() { "tree" } else { "blob" };
                    println!("{} {} {}    {}", entry.mode, kind, entry.id, entry.name);
                }
            } else {
                print!("{}", String::from_utf8_lossy(&object.payload));
            }
        }
    }

    Ok(())
}
