//! # Object Codec
//!
//! Defines the four object kinds in the content-addressed model and the
//! single hash/serialize/deserialize triplet shared by all of them.
//!
//! ## Object Types Overview
//!
//! ### Blob
//! A blob stores file contents. It's just raw bytes with no filename or metadata.
//!
//! ```text
//! blob <size>\0<raw file contents>
//! ```
//!
//! ### Tree
//! A tree represents a directory. It maps names to object hashes.
//!
//! ```text
//! tree <size>\0
//! <mode> <name>\0<20-byte hash>
//! <mode> <name>\0<20-byte hash>
//! ...
//! ```
//!
//! Modes: `100644` regular file, `40000` directory.
//!
//! ### Commit
//! A commit is a snapshot with metadata.
//!
//! ```text
//! tree <tree-hash>
//! parent <parent-hash>     # 0+ parent lines
//! author <name> <timestamp> +0000
//! committer <name> <timestamp> +0000
//!
//! <commit message>
//! ```
//!
//! ### Tag (annotated)
//!
//! ```text
//! object <object-hash>
//! type <object-kind>
//! tag <name>
//! tagger <name> <timestamp> +0000
//!
//! <message>
//! ```

pub mod blob;
pub mod commit;
pub mod tag;
pub mod tree;

pub use blob::Blob;
pub use commit::{Author, Commit};
pub use tag::Tag;
pub use tree::{Tree, TreeEntry};

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use sha1::{Digest, Sha1};

use crate::error::{Error, Result};

/// The four object kinds in the data model. A closed enumeration, per
/// the data model's "dynamic typing -> tagged variant" design note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Blob => "blob",
            Kind::Tree => "tree",
            Kind::Commit => "commit",
            Kind::Tag => "tag",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(Kind::Blob),
            "tree" => Ok(Kind::Tree),
            "commit" => Ok(Kind::Commit),
            "tag" => Ok(Kind::Tag),
            other => Err(Error::MalformedObject(format!("unknown object kind: {other}"))),
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded object: its kind and raw payload.
#[derive(Debug, Clone)]
pub struct Object {
    pub kind: Kind,
    pub payload: Vec<u8>,
}

/// Build the canonical header for an object: `"<kind> <len>\0"`.
fn header(kind: Kind, len: usize) -> Vec<u8> {
    format!("{} {}\0", kind.as_str(), len).into_bytes()
}

/// Compute the SHA-1 object id over the canonical `"<kind> <len>\0<payload>"` form.
///
/// # Example
///
/// ```
/// use corevcs::objects::{hash, Kind};
///
/// let id = hash(Kind::Blob, b"Hello, World!");
/// assert_eq!(id.len(), 40);
/// ```
pub fn hash(kind: Kind, payload: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(header(kind, payload.len()));
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

/// Zlib-compress the canonical form. This is what gets written to disk.
pub fn serialize(kind: Kind, payload: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&header(kind, payload.len()))?;
    encoder.write_all(payload)?;
    Ok(encoder.finish()?)
}

/// Inverse of [`serialize`]: decompress and split header from payload.
///
/// Fails with [`Error::MalformedObject`] if the header separator is
/// absent, the declared size is inconsistent with the payload, or
/// decompression fails.
pub fn deserialize(bytes: &[u8]) -> Result<Object> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut raw = Vec::new();
    decoder
        .read_to_end(&mut raw)
        .map_err(|e| Error::MalformedObject(format!("zlib decompression failed: {e}")))?;

    let null_pos = raw
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::MalformedObject("missing header separator".into()))?;

    let header_str = String::from_utf8_lossy(&raw[..null_pos]);
    let mut parts = header_str.splitn(2, ' ');
    let kind = Kind::parse(
        parts
            .next()
            .ok_or_else(|| Error::MalformedObject("missing object kind".into()))?,
    )?;
    let declared_len: usize = parts
        .next()
        .ok_or_else(|| Error::MalformedObject("missing object length".into()))?
        .parse()
        .map_err(|_| Error::MalformedObject("object length is not a number".into()))?;

    let payload = raw[null_pos + 1..].to_vec();
    if payload.len() != declared_len {
        return Err(Error::MalformedObject(format!(
            "size mismatch: header says {declared_len} but payload is {} bytes",
            payload.len()
        )));
    }

    Ok(Object { kind, payload })
}
