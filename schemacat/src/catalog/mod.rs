// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog tree, command interpreter and change tracking

#[allow(clippy::module_inception)]
mod catalog;
pub use catalog::Catalog;

pub mod collection;
pub mod command;
pub mod diff;
pub mod error;
pub mod field;
pub mod node;
pub(crate) mod registry;
pub mod serialize;
pub mod shared;
