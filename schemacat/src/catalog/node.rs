// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Base catalog node
//!
//! Nodes live in the catalog's arena and are addressed by [`NodeId`] handles.
//! A handle carries a generation, so a handle to a purged node never resolves
//! to whatever node later reuses its slot. Parent links, reference fields and
//! the `$PREV` cursor are all handles; the only owner of a node is the
//! collection it was added to.

use std::collections::HashMap;
use std::fmt;

use super::catalog::Catalog;
use super::collection::{Collection, CollectionRef};
use super::error::{CatalogError, CatalogResult};
use super::field::FieldValue;
use crate::codec::hex;
use crate::schema::kinds::{FieldType, NodeKind};

/// Generational handle to a node in a catalog arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Join a parent path and a collection name into the collection's path
pub(crate) fn collection_path(parent_path: &str, collection: &str) -> String {
    if parent_path == "/" {
        format!("/{}", collection)
    } else {
        format!("{}/{}", parent_path, collection)
    }
}

/// Path of the child `name` in the collection at `collection_path`
pub(crate) fn child_path(collection_path: &str, name: &str) -> String {
    format!("{}#{}", collection_path, name)
}

#[derive(Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) relative_index: usize,
    pub(crate) fields: HashMap<String, FieldValue>,
    pub(crate) collections: Vec<Collection>,
    /// Decoded contents of payload fields
    pub(crate) payloads: HashMap<String, Vec<u8>>,
    pub(crate) was_added: bool,
    pub(crate) was_updated: bool,
}

impl Node {
    /// Create a node with the fields and collections its kind declares
    pub(crate) fn new(kind: NodeKind, name: &str, path: String, parent: Option<NodeId>) -> Self {
        let fields = kind
            .fields()
            .iter()
            .map(|decl| (decl.name.to_string(), FieldValue::default_for(decl.ty)))
            .collect();

        let collections = kind
            .collections()
            .iter()
            .map(|decl| Collection::new(decl.name, collection_path(&path, decl.name), decl.kind))
            .collect();

        Self {
            kind,
            name: name.to_string(),
            path,
            parent,
            relative_index: 0,
            fields,
            collections,
            payloads: HashMap::new(),
            was_added: false,
            was_updated: false,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name() == name)
    }

    pub(crate) fn collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.iter_mut().find(|c| c.name() == name)
    }

    /// Every child handle across all collections
    pub(crate) fn child_ids(&self) -> Vec<NodeId> {
        self.collections.iter().flat_map(|c| c.ids()).collect()
    }

    /// Store `value` in `field` and refresh derived state.
    ///
    /// A value `on_update` rejects is not kept; the field holds its old value.
    pub(crate) fn update_field(&mut self, field: &str, value: FieldValue) -> CatalogResult<()> {
        let previous = self.fields.insert(field.to_string(), value);
        if let Err(e) = self.on_update(field) {
            match previous {
                Some(old) => self.fields.insert(field.to_string(), old),
                None => self.fields.remove(field),
            };
            return Err(e);
        }
        Ok(())
    }

    pub(crate) fn mark_added(&mut self) {
        self.was_added = true;
    }

    pub(crate) fn mark_updated(&mut self) {
        self.was_updated = true;
    }

    pub(crate) fn clear_batch_flags(&mut self) {
        self.was_added = false;
        self.was_updated = false;
    }

    /// Keep derived state in line with `field` after it was set
    pub(crate) fn on_update(&mut self, field: &str) -> CatalogResult<()> {
        if self.kind.field_type(field) != Some(FieldType::Payload) {
            return Ok(());
        }

        match self.fields.get(field) {
            Some(FieldValue::Str(encoded)) if !encoded.is_empty() => {
                let decoded = hex::hex_decode(encoded).map_err(|e| match e {
                    CatalogError::InvalidHex(msg) => {
                        CatalogError::InvalidHex(format!("{}.{}: {}", self.path, field, msg))
                    }
                    other => other,
                })?;
                self.payloads.insert(field.to_string(), decoded);
            }
            _ => {
                self.payloads.remove(field);
            }
        }
        Ok(())
    }
}

/// Read-only view of a node inside a catalog
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    catalog: &'a Catalog,
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(catalog: &'a Catalog, id: NodeId, node: &'a Node) -> Self {
        Self { catalog, id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind
    }

    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    pub fn path(&self) -> &'a str {
        &self.node.path
    }

    /// Dense 1-based rank among siblings by uppercased name; 0 for the root
    pub fn relative_index(&self) -> usize {
        self.node.relative_index
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent.and_then(|id| self.catalog.node(id))
    }

    pub fn was_added(&self) -> bool {
        self.node.was_added
    }

    pub fn was_updated(&self) -> bool {
        self.node.was_updated
    }

    pub fn field(&self, name: &str) -> Option<&'a FieldValue> {
        self.node.fields.get(name)
    }

    /// Names of fields that are set but not declared by the node's kind, sorted
    pub fn extra_field_names(&self) -> Vec<&'a str> {
        let mut names: Vec<&str> = self
            .node
            .fields
            .keys()
            .map(|k| k.as_str())
            .filter(|k| self.node.kind.field_decl(k).is_none())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn field_str(&self, name: &str) -> Option<&'a str> {
        self.field(name).and_then(|v| v.as_str())
    }

    pub fn field_int(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(|v| v.as_int())
    }

    pub fn field_bool(&self, name: &str) -> bool {
        self.field(name).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    /// Follow a reference field; `None` when null or the target was purged
    pub fn field_ref(&self, name: &str) -> Option<NodeRef<'a>> {
        self.field(name)
            .and_then(|v| v.as_ref_id())
            .and_then(|id| self.catalog.node(id))
    }

    /// Decoded bytes of a payload field
    pub fn payload(&self, name: &str) -> Option<&'a [u8]> {
        self.node.payloads.get(name).map(|p| p.as_slice())
    }

    pub fn collection(&self, name: &str) -> Option<CollectionRef<'a>> {
        self.node
            .collection(name)
            .map(|c| CollectionRef::new(self.catalog, c))
    }

    /// Collections in declaration order
    pub fn collections(&self) -> impl Iterator<Item = CollectionRef<'a>> + 'a {
        let catalog = self.catalog;
        self.node
            .collections
            .iter()
            .map(move |c| CollectionRef::new(catalog, c))
    }

    pub fn child(&self, collection: &str, name: &str) -> Option<NodeRef<'a>> {
        self.collection(collection).and_then(|c| c.get(name))
    }

    /// Every child, collection by collection in declaration order
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.collections().flat_map(|c| c.iter())
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.node.kind)
            .field("path", &self.node.path)
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.catalog, other.catalog) && self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::hex::hex_encode;

    #[test]
    fn test_paths() {
        assert_eq!(collection_path("/", "clusters"), "/clusters");
        assert_eq!(
            collection_path("/clusters#cluster", "databases"),
            "/clusters#cluster/databases"
        );
        assert_eq!(
            child_path("/clusters#cluster/databases", "database"),
            "/clusters#cluster/databases#database"
        );
    }

    #[test]
    fn test_new_node_has_declared_defaults() {
        let node = Node::new(NodeKind::Table, "T", "/t#T".to_string(), None);
        assert_eq!(node.fields.get("isreplicated"), Some(&FieldValue::Int(0)));
        assert_eq!(node.fields.get("partitioncolumn"), Some(&FieldValue::Ref(None)));
        assert_eq!(
            node.fields.get("signature"),
            Some(&FieldValue::Str(String::new()))
        );
        assert!(node.collection("columns").is_some());
        assert_eq!(node.collection("columns").unwrap().path(), "/t#T/columns");
        assert!(node.collection("databases").is_none());
    }

    #[test]
    fn test_batch_flags() {
        let mut node = Node::new(NodeKind::Column, "C", "/c#C".to_string(), None);
        node.mark_added();
        node.mark_updated();
        assert!(node.was_added && node.was_updated);
        node.clear_batch_flags();
        assert!(!node.was_added && !node.was_updated);
    }

    #[test]
    fn test_on_update_decodes_payload() {
        let mut node = Node::new(NodeKind::PlanFragment, "1", "/f#1".to_string(), None);
        node.update_field("plannodetree", FieldValue::Str(hex_encode(b"{}")))
            .unwrap();
        assert_eq!(node.payloads.get("plannodetree").map(|p| p.as_slice()), Some(&b"{}"[..]));

        node.update_field("plannodetree", FieldValue::Int(0)).unwrap();
        assert!(node.payloads.get("plannodetree").is_none());
    }

    #[test]
    fn test_on_update_rejects_bad_payload() {
        let mut node = Node::new(NodeKind::PlanFragment, "1", "/f#1".to_string(), None);
        node.fields
            .insert("plannodetree".to_string(), FieldValue::Str("XYZ".to_string()));
        let err = node.on_update("plannodetree").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidHex(_)));
    }

    #[test]
    fn test_rejected_payload_keeps_old_value() {
        let mut node = Node::new(NodeKind::PlanFragment, "1", "/f#1".to_string(), None);
        let good = FieldValue::Str(hex_encode(b"[1]"));
        node.update_field("plannodetree", good.clone()).unwrap();

        let err = node
            .update_field("plannodetree", FieldValue::Str("XYZ".to_string()))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidHex(_)));
        assert_eq!(node.fields.get("plannodetree"), Some(&good));
        assert_eq!(node.payloads.get("plannodetree").map(|p| p.as_slice()), Some(&b"[1]"[..]));
    }
}
