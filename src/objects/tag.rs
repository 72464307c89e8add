//! # Tag Object (annotated)
//!
//! An annotated tag is its own object: it points at another object
//! (usually a commit) and carries a name, a tagger identity, and a
//! message. A lightweight tag has no object of this kind at all — it's
//! just a ref pointing straight at a commit (see [`crate::refs`]).
//!
//! ## Format
//!
//! ```text
//! object <object-id>
//! type <object-kind>
//! tag <name>
//! tagger <name> <timestamp> +0000
//!
//! <message>
//! ```

use crate::error::{Error, Result};
use crate::objects::{Author, Kind};

#[derive(Debug, Clone)]
pub struct Tag {
    /// The id of the object this tag points at.
    pub object: String,
    /// The kind of object this tag points at.
    pub object_kind: Kind,
    pub name: String,
    pub tagger: Author,
    pub message: String,
}

impl Tag {
    pub fn new(
        object: impl Into<String>,
        object_kind: Kind,
        name: impl Into<String>,
        tagger: Author,
        message: impl Into<String>,
    ) -> Self {
        Self {
            object: object.into(),
            object_kind,
            name: name.into(),
            tagger,
            message: message.into(),
        }
    }

    pub fn serialize(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("object {}", self.object));
        lines.push(format!("type {}", self.object_kind));
        lines.push(format!("tag {}", self.name));
        lines.push(format!("tagger {}", self.tagger_line()));
        lines.push(String::new());
        lines.push(self.message.clone());
        lines.join("\n")
    }

    fn tagger_line(&self) -> String {
        format!("{} {} +0000", self.tagger.name, self.tagger.timestamp)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut object = None;
        let mut object_kind = None;
        let mut name = None;
        let mut tagger = None;

        let mut lines = content.lines();
        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }
            if let Some(id) = line.strip_prefix("object ") {
                object = Some(id.to_string());
            } else if let Some(kind) = line.strip_prefix("type ") {
                object_kind = Some(Kind::parse(kind)?);
            } else if let Some(n) = line.strip_prefix("tag ") {
                name = Some(n.to_string());
            } else if let Some(rest) = line.strip_prefix("tagger ") {
                tagger = Some(parse_tagger(rest)?);
            }
        }

        let message: String = lines.collect::<Vec<_>>().join("\n");

        Ok(Self {
            object: object.ok_or_else(|| Error::MalformedObject("tag missing object".into()))?,
            object_kind: object_kind
                .ok_or_else(|| Error::MalformedObject("tag missing type".into()))?,
            name: name.ok_or_else(|| Error::MalformedObject("tag missing name".into()))?,
            tagger: tagger.ok_or_else(|| Error::MalformedObject("tag missing tagger".into()))?,
            message,
        })
    }
}

/// Same free-form-name-plus-trailing-timestamp-and-timezone shape as
/// [`crate::objects::commit::Author`]'s wire format.
fn parse_tagger(s: &str) -> Result<Author> {
    let s = s.trim();
    let mut tokens: Vec<&str> = s.rsplitn(3, ' ').collect();
    if tokens.len() < 3 {
        return Err(Error::MalformedObject(format!("invalid tagger line: {s}")));
    }
    let _timezone = tokens.remove(0);
    let timestamp_str = tokens.remove(0);
    let name = tokens.remove(0);
    let timestamp: i64 = timestamp_str
        .parse()
        .map_err(|_| Error::MalformedObject(format!("invalid timestamp: {timestamp_str}")))?;
    Ok(Author::with_timestamp(name, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let tagger = Author::with_timestamp("Jane Doe", 1000);
        let tag = Tag::new("a".repeat(40), Kind::Commit, "v1.0", tagger, "Release 1.0");

        let serialized = tag.serialize();
        let parsed = Tag::parse(&serialized).unwrap();

        assert_eq!(parsed.object, "a".repeat(40));
        assert_eq!(parsed.object_kind, Kind::Commit);
        assert_eq!(parsed.name, "v1.0");
        assert_eq!(parsed.message, "Release 1.0");
        assert_eq!(parsed.tagger.name, "Jane Doe");
    }

    #[test]
    fn rejects_missing_object() {
        let content = "type commit\ntag v1\ntagger X 1 +0000\n\nmsg";
        assert!(Tag::parse(content).is_err());
    }
}
