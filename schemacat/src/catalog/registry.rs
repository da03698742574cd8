// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Node storage and the global path registry
//!
//! `NodeArena` holds every node of one catalog in generational slots.
//! `PathRegistry` maps each registered path to the handle of the node that
//! owns it. Both are scoped to a single `Catalog`; there is no process-wide
//! state.

use std::collections::HashMap;

use super::node::{Node, NodeId};

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Take a node out of the arena; every outstanding handle to it goes stale
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.slots.iter_mut().filter_map(|slot| slot.node.as_mut())
    }

    /// Give the listed nodes ranks 1..N in list order
    pub fn assign_relative_indexes(&mut self, ranked: &[NodeId]) {
        for (rank, id) in ranked.iter().enumerate() {
            if let Some(node) = self.get_mut(*id) {
                node.relative_index = rank + 1;
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct PathRegistry {
    paths: HashMap<String, NodeId>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` for `id`.
    ///
    /// # Panics
    /// Panics if the path already belongs to a different node. That can only
    /// happen when catalog bookkeeping is corrupt.
    pub fn register(&mut self, path: &str, id: NodeId) {
        if let Some(existing) = self.paths.get(path) {
            if *existing != id {
                panic!(
                    "catalog path {} is already registered to {:?}, cannot register {:?}",
                    path, existing, id
                );
            }
            return;
        }
        log::trace!("Registered catalog path {}", path);
        self.paths.insert(path.to_string(), id);
    }

    /// Drop `path` if it still belongs to `id`
    pub fn unregister(&mut self, path: &str, id: NodeId) {
        if self.paths.get(path) == Some(&id) {
            self.paths.remove(path);
            log::trace!("Unregistered catalog path {}", path);
        }
    }

    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        self.paths.get(path).copied()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::kinds::NodeKind;

    fn node(name: &str) -> Node {
        Node::new(NodeKind::Table, name, format!("/tables#{}", name), None)
    }

    #[test]
    fn test_stale_handles_do_not_resolve() {
        let mut arena = NodeArena::new();
        let first = arena.insert(node("a"));
        assert!(arena.remove(first).is_some());

        let second = arena.insert(node("b"));
        assert_eq!(first.index, second.index);
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second).unwrap().name, "b");
        assert!(arena.remove(first).is_none());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_register_same_node_twice_is_harmless() {
        let mut arena = NodeArena::new();
        let id = arena.insert(node("a"));
        let mut registry = PathRegistry::new();
        registry.register("/tables#a", id);
        registry.register("/tables#a", id);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("/tables#a"), Some(id));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_register_conflict_panics() {
        let mut arena = NodeArena::new();
        let a = arena.insert(node("a"));
        let b = arena.insert(node("b"));
        let mut registry = PathRegistry::new();
        registry.register("/tables#a", a);
        registry.register("/tables#a", b);
    }

    #[test]
    fn test_unregister_only_removes_owner() {
        let mut arena = NodeArena::new();
        let a = arena.insert(node("a"));
        let b = arena.insert(node("b"));
        let mut registry = PathRegistry::new();
        registry.register("/tables#a", a);

        registry.unregister("/tables#a", b);
        assert_eq!(registry.lookup("/tables#a"), Some(a));

        registry.unregister("/tables#a", a);
        assert!(registry.is_empty());
    }
}
