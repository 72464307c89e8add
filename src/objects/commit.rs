//! # Commit Object
//!
//! A commit is a snapshot pointer (tree) plus ordered parent pointers and
//! metadata.
//!
//! ## Format
//!
//! ```text
//! tree <tree-id>
//! parent <parent-id>     # 0 or more parent lines, first parent first
//! author <name> <timestamp> +0000
//! committer <name> <timestamp> +0000
//!
//! <commit message>
//! ```
//!
//! Author/committer are free-form strings, not a structured name+email
//! pair — the codec doesn't care what's inside them. The timezone field
//! is always emitted as `+0000`; parsing accepts any `+HHMM`-shaped
//! suffix but the value itself is not retained (this crate has no
//! concept of "local time").

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// An author or committer identity: a free-form name plus a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub timestamp: i64,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self { name: name.into(), timestamp }
    }

    pub fn with_timestamp(name: impl Into<String>, timestamp: i64) -> Self {
        Self { name: name.into(), timestamp }
    }

    /// `<name> <timestamp> +0000`.
    fn serialize(&self) -> String {
        format!("{} {} +0000", self.name, self.timestamp)
    }

    /// Parse `<name> <timestamp> <timezone>`. The name may itself
    /// contain spaces and angle brackets (e.g. `"Jane Doe <jane@x.com>"`)
    /// since it's free-form text, so the timestamp and timezone are
    /// peeled off the right-hand end instead of the name being parsed
    /// from the left.
    fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut tokens: Vec<&str> = s.rsplitn(3, ' ').collect();
        if tokens.len() < 3 {
            return Err(Error::MalformedObject(format!(
                "invalid author/committer line: {s}"
            )));
        }
        // rsplitn yields [timezone, timestamp, name] in that order
        let _timezone = tokens.remove(0);
        let timestamp_str = tokens.remove(0);
        let name = tokens.remove(0);

        let timestamp: i64 = timestamp_str
            .parse()
            .map_err(|_| Error::MalformedObject(format!("invalid timestamp: {timestamp_str}")))?;

        Ok(Self { name: name.to_string(), timestamp })
    }
}

/// A snapshot: tree plus ordered parents plus metadata.
#[derive(Debug, Clone)]
pub struct Commit {
    pub tree: String,
    /// Ordered parent ids. `parents[0]` is the first parent, used for
    /// linear (first-parent) walks.
    pub parents: Vec<String>,
    pub author: Author,
    pub committer: Author,
    pub message: String,
}

impl Commit {
    pub fn new(
        tree: impl Into<String>,
        parents: Vec<String>,
        author: Author,
        committer: Author,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tree: tree.into(),
            parents,
            author,
            committer,
            message: message.into(),
        }
    }

    /// A commit whose author and committer are the same identity.
    pub fn simple(tree: impl Into<String>, parents: Vec<String>, author: Author, message: impl Into<String>) -> Self {
        Self {
            tree: tree.into(),
            parents,
            author: author.clone(),
            committer: author,
            message: message.into(),
        }
    }

    pub fn serialize(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("tree {}", self.tree));
        for parent in &self.parents {
            lines.push(format!("parent {}", parent));
        }
        lines.push(format!("author {}", self.author.serialize()));
        lines.push(format!("committer {}", self.committer.serialize()));
        lines.push(String::new());
        lines.push(self.message.clone());
        lines.join("\n")
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut tree = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;

        let mut lines = content.lines();
        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }
            if let Some(id) = line.strip_prefix("tree ") {
                tree = Some(id.to_string());
            } else if let Some(id) = line.strip_prefix("parent ") {
                parents.push(id.to_string());
            } else if let Some(rest) = line.strip_prefix("author ") {
                author = Some(Author::parse(rest)?);
            } else if let Some(rest) = line.strip_prefix("committer ") {
                committer = Some(Author::parse(rest)?);
            }
        }

        let message: String = lines.collect::<Vec<_>>().join("\n");

        Ok(Self {
            tree: tree.ok_or_else(|| Error::MalformedObject("commit missing tree".into()))?,
            parents,
            author: author.ok_or_else(|| Error::MalformedObject("commit missing author".into()))?,
            committer: committer.ok_or_else(|| Error::MalformedObject("commit missing committer".into()))?,
            message,
        })
    }

    pub fn is_initial(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() >= 2
    }

    /// The first parent, used for first-parent (linear) walks.
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }
}
