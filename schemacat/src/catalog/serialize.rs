// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-log serialization
//!
//! Writes a catalog back out as the command batch that rebuilds it. Nodes are
//! visited depth first, collections in declaration order and members in
//! uppercase-key order, so two catalogs with the same content produce the
//! same text.

use std::collections::HashSet;
use std::fmt::Write;

use super::catalog::Catalog;
use super::command::{CommandKind, PREV_REF};
use super::field::{quote, FieldValue};
use super::node::{NodeId, NodeRef};
use crate::schema::kinds::FieldType;

/// Handles of every node reachable from the root through collections.
///
/// Nodes that were deleted but not purged yet are not reachable.
pub(crate) fn reachable(catalog: &Catalog) -> HashSet<NodeId> {
    let mut seen = HashSet::new();
    let mut stack = vec![catalog.root()];
    while let Some(node) = stack.pop() {
        seen.insert(node.id());
        stack.extend(node.children());
    }
    seen
}

/// Protocol literal for a field value.
///
/// References to nodes that are gone or detached are written as `null`.
pub(crate) fn literal(
    node: &NodeRef<'_>,
    field: &str,
    value: &FieldValue,
    reachable: &HashSet<NodeId>,
) -> String {
    match value {
        FieldValue::Str(s) => quote(s),
        FieldValue::Int(i) => match node.kind().field_type(field) {
            Some(FieldType::Boolean) if *i == 0 || *i == 1 => (*i == 1).to_string(),
            _ => i.to_string(),
        },
        FieldValue::Ref(Some(id)) if reachable.contains(id) => node
            .catalog()
            .node(*id)
            .map(|target| target.path().to_string())
            .unwrap_or_else(|| "null".to_string()),
        FieldValue::Ref(_) => "null".to_string(),
    }
}

/// Fields of a node as (name, literal), declared fields first then the rest by name
pub(crate) fn field_literals<'a>(
    node: &NodeRef<'a>,
    reachable: &HashSet<NodeId>,
) -> Vec<(&'a str, String)> {
    let mut names: Vec<&'a str> = node.kind().fields().iter().map(|decl| decl.name).collect();
    names.extend(node.extra_field_names());
    names
        .into_iter()
        .filter_map(|name| {
            node.field(name)
                .map(|value| (name, literal(node, name, value, reachable)))
        })
        .collect()
}

/// Emits `add`/`set` lines for whole subtrees
pub(crate) struct CommandWriter<'r> {
    out: String,
    reachable: &'r HashSet<NodeId>,
    nodes_written: usize,
}

impl<'r> CommandWriter<'r> {
    pub(crate) fn new(reachable: &'r HashSet<NodeId>) -> Self {
        Self {
            out: String::new(),
            reachable,
            nodes_written: 0,
        }
    }

    pub(crate) fn line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    /// `set` lines for every field of `node`; the first addresses the node by
    /// path, the rest through `$PREV`
    pub(crate) fn fields(&mut self, node: &NodeRef<'_>) {
        for (i, (field, value)) in field_literals(node, self.reachable).into_iter().enumerate() {
            let target = if i == 0 { node.path() } else { PREV_REF };
            let _ = writeln!(
                self.out,
                "{} {} {} {}",
                CommandKind::Set.as_str(),
                target,
                field,
                value
            );
        }
    }

    /// Add `node` under `parent_path` and write its fields and descendants
    pub(crate) fn subtree(&mut self, parent_path: &str, collection: &str, node: &NodeRef<'_>) {
        let _ = writeln!(
            self.out,
            "{} {} {} {}",
            CommandKind::Add.as_str(),
            parent_path,
            collection,
            node.name()
        );
        self.nodes_written += 1;
        self.fields(node);
        self.children(node);
    }

    pub(crate) fn children(&mut self, node: &NodeRef<'_>) {
        for coll in node.collections() {
            for child in coll.iter() {
                self.subtree(node.path(), coll.name(), &child);
            }
        }
    }

    pub(crate) fn nodes_written(&self) -> usize {
        self.nodes_written
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

impl Catalog {
    /// Render the catalog as a command batch that rebuilds it on an empty catalog
    pub fn serialize(&self) -> String {
        let reachable = reachable(self);
        let mut writer = CommandWriter::new(&reachable);
        let root = self.root();
        writer.fields(&root);
        writer.children(&root);
        writer.finish()
    }

    /// CRC32 of [`Catalog::serialize`]
    pub fn signature(&self) -> u32 {
        crc32fast::hash(self.serialize().as_bytes())
    }
}
