// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! SchemaCat - An in-memory schema catalog
//!
//! SchemaCat holds the schema of a database cluster as a tree of typed nodes
//! (clusters, databases, tables, columns, procedures, ...). The tree is built
//! and changed by replaying batches of a line-oriented command protocol.
//!
//! # Features
//!
//! - **Command protocol**: `add`, `set` and `delete` commands addressed by path
//! - **Forward references**: fields may name nodes that are added later in the batch
//! - **Change tracking**: per-batch added/updated flags and deferred deletion
//! - **Round trip**: any catalog serializes back to the commands that rebuild it
//! - **Diffing**: compute the command batch that turns one catalog into another
//!
//! # Usage
//!
//! ```ignore
//! use schemacat::Catalog;
//!
//! let mut catalog = Catalog::new();
//! catalog.execute("add / clusters cluster\nadd /clusters#cluster databases database")?;
//!
//! let db = catalog.clusters().get("cluster").unwrap().databases().get("database");
//! assert!(db.is_some());
//! ```

pub mod catalog;
pub mod codec;
pub mod config;
pub mod schema;

pub use catalog::collection::CollectionRef;
pub use catalog::diff::{diff, diff_commands, CatalogDiff};
pub use catalog::error::{CatalogError, CatalogResult};
pub use catalog::field::FieldValue;
pub use catalog::node::{NodeId, NodeRef};
pub use catalog::shared::SharedCatalog;
pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use schema::kinds::{FieldType, NodeKind};
pub use schema::types::{CatalogType, TypedCollection};

/// SchemaCat version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SchemaCat crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
