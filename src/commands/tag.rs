//! # Tag Command
//!
//! Create, list, or delete tags.
//!
//! ## Usage
//!
//! ```bash
//! corevcs tag                              # list tags
//! corevcs tag v1.0                         # lightweight tag at HEAD
//! corevcs tag -a v1.0 -m "release"          # annotated tag
//! corevcs tag -d v1.0                      # delete
//! ```

use anyhow::Result;

use crate::commands::commit_tree::resolve_identity;
use crate::ops::tag;
use crate::Repository;

/// Execute the tag command.
///
/// # Example
///
/// ```no_run
/// use corevcs::commands::tag::run;
///
/// run(None, false, false, None).unwrap();                                  // list
/// run(Some("v1.0".to_string()), false, false, None).unwrap();              // lightweight
/// run(Some("v1.0".to_string()), false, true, Some("release".to_string())).unwrap(); // annotated
/// ```
pub fn run(tag_name: Option<String>, delete: bool, annotated: bool, message: Option<String>) -> Result<()> {
    let repo = Repository::find()?;

    let Some(name) = tag_name else {
        for name in tag::list(&repo)? {
            println!("{name}");
        }
        return Ok(());
    };

    if delete {
        tag::delete(&repo, &name)?;
        println!("Deleted tag {name}");
        return Ok(());
    }

    if annotated {
        let message = message.unwrap_or_default();
        tag::create_annotated(&repo, &name, None, resolve_identity(), &message)?;
    } else {
        tag::create_lightweight(&repo, &name, None)?;
    }

    println!("Created tag {name}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::objects::{Author, Kind};
    use crate::ops::resolve::resolve_commit;
    use tempfile::tempdir;

    fn commit_file(repo: &Repository) -> String {
        let store = repo.store();
        let blob_id = store.put(Kind::Blob, b"content").unwrap();
        let mut index = repo.load_index().unwrap();
        index.add_entry("a.txt", IndexEntry::new(blob_id, 7, 0));
        repo.save_index(&index).unwrap();
        crate::commit_engine::commit(&repo.meta_dir, &store, &repo.refs(), &index, Author::with_timestamp("T", 1), "msg")
            .unwrap()
            .commit_id
    }

    #[test]
    fn lightweight_tag_resolves_to_head_commit() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        let commit_id = commit_file(&repo);

        run(Some("v1".to_string()), false, false, None).unwrap();
        assert_eq!(resolve_commit(&repo, "v1").unwrap(), commit_id);
    }

    #[test]
    fn annotated_tag_keeps_its_message() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        commit_file(&repo);

        run(Some("v1".to_string()), false, true, Some("release notes".to_string())).unwrap();

        let tag_id = repo.refs().read_tag("v1").unwrap().unwrap();
        let obj = repo.store().get_kind(&tag_id, Kind::Tag).unwrap();
        let text = String::from_utf8(obj.payload).unwrap();
        let tag_obj = crate::objects::Tag::parse(&text).unwrap();
        assert_eq!(tag_obj.message, "release notes");
    }

    #[test]
    fn delete_tag_removes_it() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        commit_file(&repo);

        run(Some("v1".to_string()), false, false, None).unwrap();
        run(Some("v1".to_string()), true, false, None).unwrap();
        assert!(!repo.refs().tag_exists("v1"));
    }
}
