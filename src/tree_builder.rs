//! # Index <-> Tree Conversion
//!
//! The index is flat (`path -> blob id`); trees are nested (one level
//! of entries per directory, subtrees referenced by id). This module is
//! the only place that crosses between the two shapes.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::index::{Index, IndexEntry};
use crate::objects::{Kind, Tree, TreeEntry};
use crate::store::ObjectStore;

enum Node {
    File(String),
    Dir(BTreeMap<String, Node>),
}

fn insert_path(root: &mut BTreeMap<String, Node>, path: &str, blob_id: &str) {
    let mut parts = path.split('/').peekable();
    let mut current = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            current.insert(part.to_string(), Node::File(blob_id.to_string()));
        } else {
            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| Node::Dir(BTreeMap::new()));
            match entry {
                Node::Dir(map) => current = map,
                Node::File(_) => {
                    // a file exists where a directory is now required;
                    // replace it, since the index is the source of truth
                    *entry = Node::Dir(BTreeMap::new());
                    match entry {
                        Node::Dir(map) => current = map,
                        Node::File(_) => unreachable!(),
                    }
                }
            }
        }
    }
}

fn write_node(store: &ObjectStore, map: &BTreeMap<String, Node>) -> Result<String> {
    let mut entries = Vec::with_capacity(map.len());
    for (name, node) in map {
        let entry = match node {
            Node::File(blob_id) => TreeEntry::file(name.clone(), blob_id.clone()),
            Node::Dir(sub) => {
                let sub_id = write_node(store, sub)?;
                TreeEntry::directory(name.clone(), sub_id)
            }
        };
        entries.push(entry);
    }

    let tree = Tree::sorted(entries);
    let payload = tree.serialize()?;
    store.put(Kind::Tree, &payload)
}

/// Build a tree (and all subtrees) from the index's staged paths,
/// storing each object. Returns the root tree's id.
///
/// An empty index produces an empty tree, not an error — callers that
/// want to forbid empty commits check that separately.
pub fn index_to_tree(index: &Index, store: &ObjectStore) -> Result<String> {
    let mut root: BTreeMap<String, Node> = BTreeMap::new();
    for (path, entry) in &index.entries {
        insert_path(&mut root, path, &entry.hash);
    }
    write_node(store, &root)
}

/// Flatten a tree (recursively) into `path -> blob id` pairs.
pub fn tree_to_fileset(store: &ObjectStore, tree_id: &str) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    walk_tree(store, tree_id, "", &mut out)?;
    Ok(out)
}

fn walk_tree(
    store: &ObjectStore,
    tree_id: &str,
    prefix: &str,
    out: &mut BTreeMap<String, String>,
) -> Result<()> {
    let obj = store.get_kind(tree_id, Kind::Tree)?;
    let tree = Tree::parse(&obj.payload)?;

    for entry in &tree.entries {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{prefix}/{}", entry.name)
        };

        if entry.is_tree() {
            walk_tree(store, &entry.id, &path, out)?;
        } else {
            out.insert(path, entry.id.clone());
        }
    }

    Ok(())
}

/// Rebuild an index from a tree. Blob sizes come from the object
/// store; `mtime` is set to 0 since a tree carries no timestamp for
/// its entries (the workspace materializer sets real mtimes when it
/// writes files to disk).
pub fn tree_to_index(store: &ObjectStore, tree_id: &str) -> Result<Index> {
    let fileset = tree_to_fileset(store, tree_id)?;
    let mut index = Index::new();
    for (path, blob_id) in fileset {
        let obj = store.get_kind(&blob_id, Kind::Blob).map_err(|_| {
            Error::MalformedObject(format!("tree references missing blob {blob_id}"))
        })?;
        index.add_entry(path, IndexEntry::new(blob_id, obj.payload.len() as u64, 0));
    }
    Ok(index)
}
