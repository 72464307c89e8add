//! # Ls-Tree Command
//!
//! List the contents of a tree object in a human-readable format.
//!
//! ## Usage
//!
//! ```bash
//! # List tree contents
//! corevcs ls-tree <tree-hash>
//!
//! # Recursive listing
//! corevcs ls-tree -r <tree-hash>
//!
//! # Show only names
//! corevcs ls-tree --name-only <tree-hash>
//! ```

use anyhow::{Context, Result};

use crate::objects::{Kind, Tree, TreeEntry};
use crate::Repository;

/// Format a tree entry for display.
///
/// `<mode> <type> <hash>    <name>`
fn format_entry(entry: &TreeEntry, name_only: bool) -> String {
    if name_only {
        return entry.name.clone();
    }

    let object_type = if entry.is_tree() { "tree" } else { "blob" };
    format!("{} {} {}    {}", entry.mode, object_type, entry.id, entry.name)
}

/// List tree contents, recursing into subtrees when `recursive` is set.
fn list_tree_recursive(
    repo: &Repository,
    tree_hash: &str,
    recursive: bool,
    name_only: bool,
    prefix: &str,
) -> Result<Vec<String>> {
    let object = repo
        .store()
        .get_kind(tree_hash, Kind::Tree)
        .context(format!("Failed to read tree object: {}", tree_hash))?;

    let tree = Tree::parse(&object.payload)?;

    let mut output = Vec::new();

    for entry in &tree.entries {
        let full_path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{}/{}", prefix, entry.name)
        };

        if entry.is_tree() {
            if recursive {
                let subtree_output =
                    list_tree_recursive(repo, &entry.id, recursive, name_only, &full_path)?;
                output.extend(subtree_output);
            } else if name_only {
                output.push(full_path);
            } else {
                output.push(format_entry(entry, name_only));
            }
        } else {
            let display_name = if recursive { full_path } else { entry.name.clone() };

            if name_only {
                output.push(display_name);
            } else {
                output.push(format!("{} blob {}    {}", entry.mode, entry.id, display_name));
            }
        }
    }

    Ok(output)
}

/// Execute the ls-tree command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::ls_tree::run;
///
/// run("abc123...", false, false).unwrap();
/// run("abc123...", true, false).unwrap();
/// ```
pub fn run(tree_hash: &str, recursive: bool, name_only: bool) -> Result<()> {
    let repo = Repository::find()?;

    let output = list_tree_recursive(&repo, tree_hash, recursive, name_only, "")?;

    for line in output {
        println!("{}", line);
    }

    Ok(())
}
