//! # Log Command
//!
//! Display commit history by walking the first-parent chain from HEAD.
//!
//! ## Usage
//!
//! ```bash
//! corevcs log
//! corevcs log --oneline
//! corevcs log --oneline --graph
//! corevcs log -n 5
//! ```

use anyhow::Result;

use crate::objects::{Commit, Kind};
use crate::Repository;

fn load_commit(repo: &Repository, id: &str) -> Result<Commit> {
    let obj = repo.store().get_kind(id, Kind::Commit)?;
    let text = String::from_utf8(obj.payload)
        .map_err(|_| crate::error::Error::MalformedObject(format!("commit {id} is not valid utf-8")))?;
    Ok(Commit::parse(&text)?)
}

fn print_oneline(id: &str, commit: &Commit, graph: bool) {
    let prefix = if graph { "* " } else { "" };
    let first_line = commit.message.lines().next().unwrap_or("");
    println!("{prefix}{} {}", &id[..7.min(id.len())], first_line);
}

fn print_full(id: &str, commit: &Commit, graph: bool) {
    let prefix = if graph { "* " } else { "" };
    println!("{prefix}commit {id}");
    if commit.is_merge() {
        println!("Merge: {}", commit.parents.join(" "));
    }
    println!("Author: {}", commit.author.name);
    println!();
    for line in commit.message.lines() {
        println!("    {line}");
    }
    println!();
}

/// Execute the log command.
///
/// `max_count`, if given, follows the first-parent chain for at most
/// that many commits rather than walking all the way to the root.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::log::run;
///
/// run(true, false, None).unwrap();
/// run(true, false, Some(5)).unwrap();
/// ```
pub fn run(oneline: bool, graph: bool, max_count: Option<usize>) -> Result<()> {
    let repo = Repository::find()?;
    let refs = repo.refs();

    let Some(mut current) = refs.head_commit()? else {
        println!("fatal: your current branch does not have any commits yet");
        return Ok(());
    };

    let mut shown = 0;
    loop {
        if max_count.is_some_and(|max| shown >= max) {
            break;
        }

        let commit = load_commit(&repo, &current)?;

        if oneline {
            print_oneline(&current, &commit, graph);
        } else {
            print_full(&current, &commit, graph);
        }
        shown += 1;

        match commit.first_parent() {
            Some(parent) => current = parent.to_string(),
            None => break,
        }
    }

    Ok(())
}
