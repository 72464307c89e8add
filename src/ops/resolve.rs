//! Resolve a user-supplied reference string (branch name, tag name, "HEAD",
//! or a raw object id) down to a commit id.

use crate::error::{Error, Result};
use crate::objects::Kind;
use crate::store::ObjectStore;
use crate::Repository;

fn is_object_id(s: &str) -> bool {
    s.len() == 40 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Dereference a tag object chain down to whatever it ultimately
/// points at (a commit, in the common case). Per the spec's guidance,
/// checkout and friends resolve tag objects before treating the
/// target as "detach HEAD at this object id" — otherwise an annotated
/// tag would incorrectly detach HEAD at the tag object itself rather
/// than the commit it names.
fn deref_tags(store: &ObjectStore, mut id: String) -> Result<String> {
    loop {
        let obj = store.get(&id)?;
        match obj.kind {
            Kind::Tag => {
                let text = String::from_utf8(obj.payload)
                    .map_err(|_| Error::MalformedObject(format!("tag {id} is not valid utf-8")))?;
                let tag = crate::objects::Tag::parse(&text)?;
                id = tag.object;
            }
            Kind::Commit => return Ok(id),
            other => {
                return Err(Error::MalformedObject(format!(
                    "reference resolves to a {other} object, not a commit"
                )))
            }
        }
    }
}

/// Resolve `target` to a commit id. Checked in order: `HEAD`, branch
/// names, tag names (dereferenced through any annotated tag object),
/// then a raw 40-hex object id (also dereferenced if it names a tag).
pub fn resolve_commit(repo: &Repository, target: &str) -> Result<String> {
    let refs = repo.refs();
    let store = repo.store();

    if target == "HEAD" {
        return refs
            .head_commit()?
            .ok_or_else(|| Error::ObjectNotFound("HEAD".to_string()));
    }

    if let Some(commit_id) = refs.read_branch(target)? {
        return Ok(commit_id);
    }

    if let Some(tag_target) = refs.read_tag(target)? {
        return deref_tags(&store, tag_target);
    }

    if is_object_id(target) && store.exists(target) {
        return deref_tags(&store, target.to_string());
    }

    Err(Error::ObjectNotFound(target.to_string()))
}

/// `true` if `target` names an existing branch (used to decide whether
/// checkout/reset land on a branch or go detached).
pub fn is_branch(repo: &Repository, target: &str) -> bool {
    repo.refs().branch_exists(target)
}
