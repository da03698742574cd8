// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::error::{CatalogError, CatalogResult};

/// Configuration for command interpretation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Log dropped commands at warn level instead of debug
    pub warn_on_ignored_commands: bool,

    /// Reject `set` of fields the node's kind does not declare
    pub strict_fields: bool,

    /// Purge pending deletions at the end of every successful batch
    pub purge_after_execute: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            warn_on_ignored_commands: false,
            strict_fields: false,
            purge_after_execute: false,
        }
    }
}

impl CatalogConfig {
    /// Reject undeclared fields and report every dropped command
    pub fn strict() -> Self {
        Self {
            warn_on_ignored_commands: true,
            strict_fields: true,
            purge_after_execute: false,
        }
    }

    /// Accept anything the command producer sends and reclaim deletions eagerly
    pub fn lenient() -> Self {
        Self {
            warn_on_ignored_commands: false,
            strict_fields: false,
            purge_after_execute: true,
        }
    }

    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
