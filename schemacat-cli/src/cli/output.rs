// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Output formatting for CLI commands

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;
use std::collections::BTreeMap;

use super::commands::OutputFormat;
use schemacat::{Catalog, CatalogDiff, NodeRef};

/// What `apply` reports about a catalog
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub batches: usize,
    pub node_count: usize,
    pub signature: String,
    /// Reachable nodes per kind
    pub kinds: BTreeMap<String, usize>,
    pub deleted_paths: Vec<String>,
    pub purged: bool,
}

impl CatalogSummary {
    pub fn collect(catalog: &Catalog, batches: usize) -> Self {
        let mut kinds = BTreeMap::new();
        let mut stack: Vec<NodeRef<'_>> = catalog.root().children().collect();
        while let Some(node) = stack.pop() {
            *kinds.entry(node.kind().to_string()).or_insert(0) += 1;
            stack.extend(node.children());
        }

        Self {
            batches,
            node_count: catalog.node_count(),
            signature: format!("{:08X}", catalog.signature()),
            kinds,
            deleted_paths: catalog.get_deleted_paths(),
            purged: false,
        }
    }
}

/// Formatter for catalog reports
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn summary(summary: &CatalogSummary, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::summary_table(summary),
            OutputFormat::Json => Self::to_json(summary),
        }
    }

    pub fn diff(diff: &CatalogDiff, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::diff_text(diff),
            OutputFormat::Json => Self::to_json(diff),
        }
    }

    fn summary_table(summary: &CatalogSummary) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "Catalog Summary".bold().green()));
        output.push_str(&format!("Batches applied: {}\n", summary.batches));
        output.push_str(&format!("Live nodes: {}\n", summary.node_count));
        output.push_str(&format!("Signature: {}\n\n", summary.signature.cyan()));

        if summary.kinds.is_empty() {
            output.push_str(&format!("{}\n", "Catalog is empty".yellow()));
        } else {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec![
                Cell::new("Kind").fg(Color::Green),
                Cell::new("Count").fg(Color::Green),
            ]);
            for (kind, count) in &summary.kinds {
                table.add_row(vec![kind.clone(), count.to_string()]);
            }
            output.push_str(&table.to_string());
            output.push('\n');
        }

        if !summary.deleted_paths.is_empty() {
            let heading = if summary.purged {
                "Deleted (purged):"
            } else {
                "Deleted (pending purge):"
            };
            output.push_str(&format!("\n{}\n", heading.bold().yellow()));
            for (i, path) in summary.deleted_paths.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, path.yellow()));
            }
        }

        output
    }

    fn diff_text(diff: &CatalogDiff) -> String {
        if diff.is_empty() {
            return format!("{}\n", "Catalogs are identical".green());
        }

        let mut output = String::new();
        for line in diff.commands.lines() {
            let colored = if line.starts_with("add ") {
                line.green()
            } else if line.starts_with("delete ") {
                line.red()
            } else {
                line.normal()
            };
            output.push_str(&format!("{}\n", colored));
        }
        output.push_str(&format!(
            "\n{} addition(s), {} deletion(s), {} update(s)\n",
            diff.additions, diff.deletions, diff.updates
        ));
        output
    }

    /// Indented node tree, one node per line with its relative index
    pub fn tree(catalog: &Catalog) -> String {
        let mut output = format!("{}\n", "/".bold());
        Self::tree_children(&catalog.root(), 1, &mut output);
        output
    }

    fn tree_children(node: &NodeRef<'_>, depth: usize, output: &mut String) {
        let indent = "  ".repeat(depth);
        for collection in node.collections() {
            if collection.is_empty() {
                continue;
            }
            output.push_str(&format!("{}{}\n", indent, collection.name().cyan()));
            for child in collection.iter() {
                output.push_str(&format!(
                    "{}  [{}] {} {}\n",
                    indent,
                    child.relative_index(),
                    child.name().bold(),
                    format!("({})", child.kind()).dimmed()
                ));
                Self::tree_children(&child, depth + 2, output);
            }
        }
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize report to JSON\"}".to_string()
        })
    }
}
