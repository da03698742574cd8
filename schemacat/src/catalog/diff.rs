// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog diff engine
//!
//! Produces the command batch that turns one catalog into another. Children
//! are matched by exact name, so a child renamed only in case is deleted and
//! added again. Executing the batch on `old` and purging leaves it serializing
//! exactly like `new`, as long as `new` does not drop undeclared fields that
//! `old` carries.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::catalog::Catalog;
use super::command::CommandKind;
use super::node::{NodeId, NodeRef};
use super::serialize::{field_literals, reachable, CommandWriter};

/// Result of comparing two catalogs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogDiff {
    /// Command batch that transforms the old catalog into the new one
    pub commands: String,
    /// Nodes added, descendants included
    pub additions: usize,
    /// `delete` commands emitted
    pub deletions: usize,
    /// `set` commands emitted for nodes present in both catalogs
    pub updates: usize,
}

impl CatalogDiff {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

struct DiffState<'r> {
    old_reachable: &'r HashSet<NodeId>,
    new_reachable: &'r HashSet<NodeId>,
    deletions: usize,
    updates: usize,
}

pub fn diff(old: &Catalog, new: &Catalog) -> CatalogDiff {
    let old_reachable = reachable(old);
    let new_reachable = reachable(new);

    let mut writer = CommandWriter::new(&new_reachable);
    let mut state = DiffState {
        old_reachable: &old_reachable,
        new_reachable: &new_reachable,
        deletions: 0,
        updates: 0,
    };
    diff_node(&mut state, &mut writer, &old.root(), &new.root());

    let result = CatalogDiff {
        additions: writer.nodes_written(),
        deletions: state.deletions,
        updates: state.updates,
        commands: writer.finish(),
    };
    log::debug!(
        "Catalog diff: {} addition(s), {} deletion(s), {} update(s)",
        result.additions,
        result.deletions,
        result.updates
    );
    result
}

/// Command batch that transforms `old` into `new`
pub fn diff_commands(old: &Catalog, new: &Catalog) -> String {
    diff(old, new).commands
}

fn diff_node(
    state: &mut DiffState<'_>,
    writer: &mut CommandWriter<'_>,
    old: &NodeRef<'_>,
    new: &NodeRef<'_>,
) {
    let before: HashMap<&str, String> = field_literals(old, state.old_reachable)
        .into_iter()
        .collect();
    for (field, value) in field_literals(new, state.new_reachable) {
        if before.get(field) != Some(&value) {
            writer.line(&format!(
                "{} {} {} {}",
                CommandKind::Set.as_str(),
                old.path(),
                field,
                value
            ));
            state.updates += 1;
        }
    }

    for new_coll in new.collections() {
        let Some(old_coll) = old.collection(new_coll.name()) else {
            continue;
        };

        for old_child in old_coll.iter() {
            let kept = new_coll
                .get(old_child.name())
                .is_some_and(|n| n.name() == old_child.name());
            if !kept {
                writer.line(&format!(
                    "{} {} {} {}",
                    CommandKind::Delete.as_str(),
                    old.path(),
                    old_coll.name(),
                    old_child.name()
                ));
                state.deletions += 1;
            }
        }

        for new_child in new_coll.iter() {
            match old_coll
                .get(new_child.name())
                .filter(|o| o.name() == new_child.name())
            {
                Some(old_child) => diff_node(state, writer, &old_child, &new_child),
                None => writer.subtree(old.path(), new_coll.name(), &new_child),
            }
        }
    }
}
