// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog root and command interpreter
//!
//! A `Catalog` owns the node arena, the path registry, the table of pending
//! forward references and the list of pending deletions. It is built and
//! changed only through command batches:
//!
//! ```text
//! add / clusters cluster
//! add /clusters#cluster databases database
//! set /clusters#cluster/databases#database schema "ABCD"
//! delete /clusters#cluster/databases#database tables orders
//! ```
//!
//! Commands whose target path, `$PREV` context or collection is unknown are
//! dropped without error so that newer command producers can talk to older
//! catalogs. Malformed literals, unknown command words, duplicate adds and
//! references still dangling at the end of a batch abort the batch. Work done
//! before the failing line is not rolled back.

use std::collections::BTreeMap;

use super::collection::CollectionRef;
use super::command::{parse_command, Command, CommandKind, CommandRef};
use super::error::{CatalogError, CatalogResult};
use super::field::{FieldValue, Literal};
use super::node::{Node, NodeId, NodeRef};
use super::registry::{NodeArena, PathRegistry};
use crate::config::CatalogConfig;
use crate::schema::kinds::NodeKind;
use crate::schema::types::{Cluster, TypedCollection};

/// A field waiting for the node at some path to be added
#[derive(Debug, Clone, PartialEq, Eq)]
struct UnresolvedInfo {
    node: NodeId,
    field: String,
}

#[derive(Debug)]
pub struct Catalog {
    config: CatalogConfig,
    nodes: NodeArena,
    paths: PathRegistry,
    root: NodeId,
    /// Pending forward references keyed by the missing path
    unresolved: BTreeMap<String, Vec<UnresolvedInfo>>,
    /// Paths removed from their collection during the current batch
    deletions: Vec<String>,
    /// Paths removed in earlier batches and not purged yet
    detached: Vec<String>,
    last_touched: Option<NodeId>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        let mut nodes = NodeArena::new();
        let mut paths = PathRegistry::new();
        let root = nodes.insert(Node::new(NodeKind::Catalog, "catalog", "/".to_string(), None));
        paths.register("/", root);

        Self {
            config,
            nodes,
            paths,
            root,
            unresolved: BTreeMap::new(),
            deletions: Vec::new(),
            detached: Vec::new(),
            last_touched: None,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    pub fn root(&self) -> NodeRef<'_> {
        let node = self
            .nodes
            .get(self.root)
            .unwrap_or_else(|| unreachable!("catalog root is never removed"));
        NodeRef::new(self, self.root, node)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Resolve a handle; `None` once the node has been purged
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes.get(id).map(|node| NodeRef::new(self, id, node))
    }

    /// Exact path lookup in the registry, including nodes pending deletion
    pub fn get(&self, path: &str) -> Option<NodeRef<'_>> {
        self.paths.lookup(path).and_then(|id| self.node(id))
    }

    pub fn clusters(&self) -> TypedCollection<'_, Cluster<'_>> {
        TypedCollection::new(self.root().collection("clusters"))
    }

    pub fn get_child(&self, parent: NodeId, collection: &str, name: &str) -> Option<NodeRef<'_>> {
        self.node(parent)
            .and_then(|node| node.collection(collection))
            .and_then(|coll| coll.get(name))
    }

    pub fn collection(&self, parent: NodeId, name: &str) -> Option<CollectionRef<'_>> {
        self.node(parent).and_then(|node| node.collection(name))
    }

    /// Live nodes, including the root and nodes waiting to be purged
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Copy of the paths deleted during the current batch
    pub fn get_deleted_paths(&self) -> Vec<String> {
        self.deletions.clone()
    }

    /// Paths that some field is waiting on
    pub fn pending_reference_paths(&self) -> Vec<String> {
        self.unresolved.keys().cloned().collect()
    }

    /// The node `$PREV` currently refers to
    pub fn last_touched(&self) -> Option<NodeRef<'_>> {
        self.last_touched.and_then(|id| self.node(id))
    }

    // ---------------------------------------------------------------------
    // Command execution
    // ---------------------------------------------------------------------

    /// Execute a newline-separated batch of commands
    pub fn execute(&mut self, batch: &str) -> CatalogResult<()> {
        self.begin_batch();

        let mut executed = 0usize;
        for (number, line) in batch.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if let Err(e) = self.execute_one(line) {
                self.unresolved.clear();
                return Err(CatalogError::Batch {
                    line: number + 1,
                    command: line.to_string(),
                    source: Box::new(e),
                });
            }
            executed += 1;
        }

        if !self.unresolved.is_empty() {
            let dangling: Vec<String> = std::mem::take(&mut self.unresolved).into_keys().collect();
            log::error!(
                "Catalog batch ended with {} unresolved reference(s)",
                dangling.len()
            );
            return Err(CatalogError::UnresolvedReferences(dangling));
        }

        log::info!(
            "Executed catalog batch: {} command(s), {} deletion(s), {} node(s)",
            executed,
            self.deletions.len(),
            self.nodes.len()
        );

        if self.config.purge_after_execute {
            self.purge_deletions()?;
        }
        Ok(())
    }

    fn begin_batch(&mut self) {
        for node in self.nodes.iter_mut() {
            node.clear_batch_flags();
        }
        let previous = std::mem::take(&mut self.deletions);
        self.detached.extend(previous);
        self.last_touched = None;
    }

    fn execute_one(&mut self, line: &str) -> CatalogResult<()> {
        let command = parse_command(line)?;

        let target = match command.target {
            CommandRef::Prev => match self.last_touched.filter(|id| self.nodes.contains(*id)) {
                Some(id) => id,
                None => {
                    self.ignore(line, "no previous node in this batch");
                    return Ok(());
                }
            },
            CommandRef::Path(path) => match self.paths.lookup(path) {
                Some(id) => id,
                None => {
                    self.last_touched = None;
                    self.ignore(line, "target path not found");
                    return Ok(());
                }
            },
        };

        self.last_touched = Some(target);
        log::debug!("Catalog command: {}", line);
        self.dispatch(target, &command, line)
    }

    fn dispatch(&mut self, target: NodeId, command: &Command<'_>, line: &str) -> CatalogResult<()> {
        match command.kind {
            CommandKind::Add => match self.add_child(target, command.arg, command.value)? {
                Some(id) => {
                    let path = match self.nodes.get_mut(id) {
                        Some(node) => {
                            node.mark_added();
                            node.path.clone()
                        }
                        None => return Ok(()),
                    };
                    self.resolve_unresolved_info(&path)
                }
                None => {
                    self.ignore(line, "unknown collection");
                    Ok(())
                }
            },
            CommandKind::Set => {
                self.set_field(target, command.arg, command.value)?;
                if let Some(node) = self.nodes.get_mut(target) {
                    node.mark_updated();
                }
                Ok(())
            }
            CommandKind::Delete => {
                match self.remove_child(target, command.arg, command.value) {
                    Some(path) => self.deletions.push(path),
                    None => self.ignore(line, "no such child"),
                }
                Ok(())
            }
        }
    }

    fn ignore(&self, line: &str, reason: &str) {
        if self.config.warn_on_ignored_commands {
            log::warn!("Ignoring catalog command '{}': {}", line, reason);
        } else {
            log::debug!("Ignoring catalog command '{}': {}", line, reason);
        }
    }

    // ---------------------------------------------------------------------
    // Node operations
    // ---------------------------------------------------------------------

    /// Add a child to `parent`'s collection.
    ///
    /// Returns `Ok(None)` when the parent's kind has no such collection and
    /// `DuplicateChild` when the name is taken (case-insensitively).
    pub fn add_child(
        &mut self,
        parent: NodeId,
        collection: &str,
        name: &str,
    ) -> CatalogResult<Option<NodeId>> {
        let (path, kind) = {
            let Some(coll) = self.nodes.get(parent).and_then(|n| n.collection(collection)) else {
                return Ok(None);
            };
            if coll.contains(name) {
                return Err(CatalogError::DuplicateChild {
                    path: coll.child_path(name),
                });
            }
            (coll.child_path(name), coll.child_kind())
        };

        self.reclaim_detached(&path)?;

        let id = self.nodes.insert(Node::new(kind, name, path.clone(), Some(parent)));
        self.paths.register(&path, id);

        let ranked = match self
            .nodes
            .get_mut(parent)
            .and_then(|n| n.collection_mut(collection))
        {
            Some(coll) => {
                coll.insert(name, id);
                coll.ranked()
            }
            None => Vec::new(),
        };
        self.nodes.assign_relative_indexes(&ranked);

        log::trace!("Added {} {}", kind, path);
        Ok(Some(id))
    }

    /// Detach a child from `parent`'s collection without destroying it.
    ///
    /// Returns the detached node's path, or `None` if there was nothing to
    /// remove.
    pub fn remove_child(&mut self, parent: NodeId, collection: &str, name: &str) -> Option<String> {
        let (removed, ranked) = {
            let coll = self.nodes.get_mut(parent)?.collection_mut(collection)?;
            let removed = coll.remove(name)?;
            (removed, coll.ranked())
        };
        self.nodes.assign_relative_indexes(&ranked);
        self.nodes.get(removed).map(|node| node.path.clone())
    }

    /// Parse `literal` and store it in `field` of `id`.
    ///
    /// A path that does not resolve yet is queued and re-applied once a node
    /// with that path is added.
    pub fn set_field(&mut self, id: NodeId, field: &str, literal: &str) -> CatalogResult<()> {
        let literal = Literal::parse(field, literal)?;

        let (declared, node_path) = match self.nodes.get(id) {
            Some(node) => (node.kind.field_type(field), node.path.clone()),
            None => return Ok(()),
        };

        if declared.is_none() && self.config.strict_fields {
            return Err(CatalogError::UnknownField {
                path: node_path,
                field: field.to_string(),
            });
        }

        // A newer value for the field replaces any reference still waiting on it
        self.forget_unresolved(id, field);

        let value = match literal {
            Literal::Path(path) => match self.paths.lookup(path) {
                Some(target) => Some(FieldValue::Ref(Some(target))),
                None => {
                    self.add_unresolved_info(path, id, field);
                    None
                }
            },
            Literal::Null => Some(FieldValue::null_for(declared)),
            Literal::Str(s) => Some(FieldValue::Str(s.to_string())),
            Literal::Bool(b) => Some(FieldValue::Int(i64::from(b))),
            Literal::Int(i) => Some(FieldValue::Int(i)),
        };

        match self.nodes.get_mut(id) {
            Some(node) => match value {
                Some(value) => node.update_field(field, value),
                None => node.on_update(field),
            },
            None => Ok(()),
        }
    }

    fn add_unresolved_info(&mut self, path: &str, node: NodeId, field: &str) {
        log::debug!("Deferring reference to {} for field {}", path, field);
        self.unresolved
            .entry(path.to_string())
            .or_default()
            .push(UnresolvedInfo {
                node,
                field: field.to_string(),
            });
    }

    fn forget_unresolved(&mut self, node: NodeId, field: &str) {
        self.unresolved.retain(|_, waiting| {
            waiting.retain(|info| !(info.node == node && info.field == field));
            !waiting.is_empty()
        });
    }

    /// Re-apply every field waiting on `path` now that it exists
    fn resolve_unresolved_info(&mut self, path: &str) -> CatalogResult<()> {
        let Some(waiting) = self.unresolved.remove(path) else {
            return Ok(());
        };

        let saved = self.last_touched;
        for info in waiting {
            let Some(node_path) = self.nodes.get(info.node).map(|n| n.path.clone()) else {
                continue;
            };
            let command = format!("set {} {} {}", node_path, info.field, path);
            self.execute_one(&command)?;
        }
        self.last_touched = saved;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Deletion
    // ---------------------------------------------------------------------

    /// Destroy every node deleted since the last purge.
    ///
    /// Calling it again right away is a no-op.
    pub fn purge_deletions(&mut self) -> CatalogResult<()> {
        let mut pending = std::mem::take(&mut self.detached);
        pending.append(&mut self.deletions);

        let mut purged = 0usize;
        let mut remaining = pending.into_iter();
        while let Some(path) = remaining.next() {
            let Some(id) = self.paths.lookup(&path) else {
                self.detached.extend(remaining);
                return Err(CatalogError::PurgeTargetMissing(path));
            };
            purged += self.destroy(id);
        }

        if purged > 0 {
            log::info!("Purged {} catalog node(s)", purged);
        }
        Ok(())
    }

    /// A path deleted earlier is being added again: destroy the old node now
    fn reclaim_detached(&mut self, path: &str) -> CatalogResult<()> {
        let pending = self.deletions.iter().chain(self.detached.iter()).any(|p| p == path);
        if !pending {
            return Ok(());
        }

        let id = self
            .paths
            .lookup(path)
            .ok_or_else(|| CatalogError::PurgeTargetMissing(path.to_string()))?;
        self.deletions.retain(|p| p != path);
        self.detached.retain(|p| p != path);
        let purged = self.destroy(id);
        log::debug!("Reclaimed {} node(s) under re-added path {}", purged, path);
        Ok(())
    }

    /// Remove a node and all of its descendants; returns how many were destroyed
    fn destroy(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut destroyed = 0;

        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            self.paths.unregister(&node.path, current);
            self.unresolved.retain(|_, waiting| {
                waiting.retain(|info| info.node != current);
                !waiting.is_empty()
            });
            if self.last_touched == Some(current) {
                self.last_touched = None;
            }
            stack.extend(node.child_ids());
            destroyed += 1;
        }
        destroyed
    }
}
