// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Ordered, named containers of sibling nodes
//!
//! Members are keyed by their uppercased name, so lookups ignore case while
//! the node keeps the name it was added with. Iteration follows key order,
//! which is also the order `relative_index` is assigned in.

use std::collections::BTreeMap;
use std::fmt;

use super::catalog::Catalog;
use super::node::{child_path, NodeId, NodeRef};
use crate::schema::kinds::NodeKind;

fn key(name: &str) -> String {
    name.to_uppercase()
}

#[derive(Debug, Clone)]
pub struct Collection {
    name: &'static str,
    path: String,
    child_kind: NodeKind,
    items: BTreeMap<String, NodeId>,
}

impl Collection {
    pub(crate) fn new(name: &'static str, path: String, child_kind: NodeKind) -> Self {
        Self {
            name,
            path,
            child_kind,
            items: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn child_kind(&self) -> NodeKind {
        self.child_kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Path a member called `name` has or would have
    pub(crate) fn child_path(&self, name: &str) -> String {
        child_path(&self.path, name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(&key(name))
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.items.get(&key(name)).copied()
    }

    /// Member ranked `index` (1-based) in uppercase-key order
    pub fn get_at_relative_index(&self, index: usize) -> Option<NodeId> {
        if index == 0 {
            return None;
        }
        self.items.values().nth(index - 1).copied()
    }

    /// Member handles in key order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.values().copied()
    }

    /// Insert a member; returns false if the name is already taken
    pub(crate) fn insert(&mut self, name: &str, id: NodeId) -> bool {
        let k = key(name);
        if self.items.contains_key(&k) {
            return false;
        }
        self.items.insert(k, id);
        true
    }

    /// Detach a member without destroying it
    pub(crate) fn remove(&mut self, name: &str) -> Option<NodeId> {
        self.items.remove(&key(name))
    }

    /// Member handles in rank order, for `NodeArena::assign_relative_indexes`
    pub(crate) fn ranked(&self) -> Vec<NodeId> {
        self.items.values().copied().collect()
    }
}

/// Read-only view of a collection inside a catalog
#[derive(Clone, Copy)]
pub struct CollectionRef<'a> {
    catalog: &'a Catalog,
    collection: &'a Collection,
}

impl<'a> CollectionRef<'a> {
    pub(crate) fn new(catalog: &'a Catalog, collection: &'a Collection) -> Self {
        Self {
            catalog,
            collection,
        }
    }

    pub fn name(&self) -> &'static str {
        self.collection.name()
    }

    pub fn path(&self) -> &'a str {
        self.collection.path()
    }

    pub fn child_kind(&self) -> NodeKind {
        self.collection.child_kind()
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<NodeRef<'a>> {
        self.collection
            .get(name)
            .and_then(|id| self.catalog.node(id))
    }

    pub fn get_at_relative_index(&self, index: usize) -> Option<NodeRef<'a>> {
        self.collection
            .get_at_relative_index(index)
            .and_then(|id| self.catalog.node(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let catalog = self.catalog;
        self.collection
            .ids()
            .filter_map(move |id| catalog.node(id))
    }
}

impl fmt::Debug for CollectionRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionRef")
            .field("path", &self.collection.path)
            .field("len", &self.collection.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::node::Node;
    use crate::catalog::registry::NodeArena;

    fn member(arena: &mut NodeArena, coll: &mut Collection, name: &str) -> NodeId {
        let node = Node::new(NodeKind::Table, name, coll.child_path(name), None);
        let id = arena.insert(node);
        assert!(coll.insert(name, id));
        arena.assign_relative_indexes(&coll.ranked());
        id
    }

    fn ranks(arena: &NodeArena, coll: &Collection) -> Vec<(String, usize)> {
        coll.ids()
            .map(|id| {
                let node = arena.get(id).unwrap();
                (node.name.clone(), node.relative_index)
            })
            .collect()
    }

    #[test]
    fn test_relative_index_follows_uppercase_order() {
        let mut arena = NodeArena::new();
        let mut coll = Collection::new("tables", "/tables".to_string(), NodeKind::Table);

        member(&mut arena, &mut coll, "orders");
        member(&mut arena, &mut coll, "Customers");
        member(&mut arena, &mut coll, "ITEMS");

        assert_eq!(
            ranks(&arena, &coll),
            vec![
                ("Customers".to_string(), 1),
                ("ITEMS".to_string(), 2),
                ("orders".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_remove_renumbers_without_gaps() {
        let mut arena = NodeArena::new();
        let mut coll = Collection::new("tables", "/tables".to_string(), NodeKind::Table);
        for name in ["a", "b", "c", "d"] {
            member(&mut arena, &mut coll, name);
        }

        let removed = coll.remove("B").unwrap();
        arena.assign_relative_indexes(&coll.ranked());

        // The detached node keeps its last rank until it is purged
        assert_eq!(arena.get(removed).unwrap().relative_index, 2);
        assert_eq!(
            ranks(&arena, &coll),
            vec![
                ("a".to_string(), 1),
                ("c".to_string(), 2),
                ("d".to_string(), 3)
            ]
        );
        assert!(coll.remove("b").is_none());
    }

    #[test]
    fn test_case_insensitive_lookup_and_duplicates() {
        let mut arena = NodeArena::new();
        let mut coll = Collection::new("tables", "/tables".to_string(), NodeKind::Table);
        let id = member(&mut arena, &mut coll, "TableA");

        assert_eq!(coll.get("tablea"), Some(id));
        assert_eq!(coll.get("TABLEA"), Some(id));
        assert!(coll.contains("tableA"));
        assert!(!coll.insert("TABLEA", id));
        assert_eq!(coll.len(), 1);
    }

    #[test]
    fn test_get_at_relative_index() {
        let mut arena = NodeArena::new();
        let mut coll = Collection::new("tables", "/tables".to_string(), NodeKind::Table);
        let b = member(&mut arena, &mut coll, "b");
        let a = member(&mut arena, &mut coll, "a");

        assert_eq!(coll.get_at_relative_index(1), Some(a));
        assert_eq!(coll.get_at_relative_index(2), Some(b));
        assert_eq!(coll.get_at_relative_index(0), None);
        assert_eq!(coll.get_at_relative_index(3), None);
    }
}
