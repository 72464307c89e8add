//! # Init Command
//!
//! Initialize a new repository.
//!
//! ## What it does
//!
//! Creates the `.corevcs` directory structure:
//!
//! ```text
//! .corevcs/
//! ├── HEAD           # "ref: refs/heads/main\n"
//! ├── objects/       # Object database (empty)
//! └── refs/
//!     ├── heads/     # Branch references
//!     └── tags/      # Tag references
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Initialize in current directory
//! corevcs init
//!
//! # Initialize in specific directory
//! corevcs init /path/to/repo
//! ```

use std::path::Path;
use anyhow::Result;
use crate::Repository;

/// Execute the init command
///
/// # Arguments
///
/// * `path` - Optional path where to initialize. Defaults to current directory.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::init::run;
///
/// run(None).expect("Failed to initialize repository");
/// ```
pub fn run(path: Option<&Path>) -> Result<()> {
    let target = path.unwrap_or(Path::new("."));
    Repository::init(target)?;
    Ok(())
}
