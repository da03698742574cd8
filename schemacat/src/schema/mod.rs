// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog schema: node kinds and the typed views over them

pub mod kinds;
pub mod types;

pub use kinds::{CollectionDecl, FieldDecl, FieldType, NodeKind};
pub use types::{CatalogType, TypedCollection};
