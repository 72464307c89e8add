//! `tag [-a] [-m <msg>] [-d] <name>`
//!
//! A lightweight tag is just a ref pointing at a commit. An annotated
//! tag is a ref pointing at a [`crate::objects::Tag`] object, which in
//! turn points at the commit.

use crate::error::{Error, Result};
use crate::objects::{Author, Kind, Tag};
use crate::ops::resolve::resolve_commit;
use crate::Repository;

pub fn create_lightweight(repo: &Repository, name: &str, target: Option<&str>) -> Result<String> {
    let refs = repo.refs();
    if refs.tag_exists(name) {
        return Err(Error::TagExists(name.to_string()));
    }

    let commit_id = resolve_commit(repo, target.unwrap_or("HEAD"))?;
    refs.write_tag(name, &commit_id)?;
    Ok(commit_id)
}

pub fn create_annotated(
    repo: &Repository,
    name: &str,
    target: Option<&str>,
    tagger: Author,
    message: &str,
) -> Result<String> {
    let refs = repo.refs();
    if refs.tag_exists(name) {
        return Err(Error::TagExists(name.to_string()));
    }

    let commit_id = resolve_commit(repo, target.unwrap_or("HEAD"))?;
    let tag = Tag::new(commit_id, Kind::Commit, name, tagger, message);
    let tag_id = repo.store().put(Kind::Tag, tag.serialize().as_bytes())?;
    refs.write_tag(name, &tag_id)?;
    Ok(tag_id)
}

pub fn delete(repo: &Repository, name: &str) -> Result<()> {
    let refs = repo.refs();
    if !refs.tag_exists(name) {
        return Err(Error::UnknownTag(name.to_string()));
    }
    refs.delete_tag(name)
}

pub fn list(repo: &Repository) -> Result<Vec<String>> {
    repo.refs().list_tags()
}
