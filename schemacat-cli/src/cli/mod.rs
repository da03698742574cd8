// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for SchemaCat
//!
//! Provides one-off commands that replay command logs into a catalog and
//! report on it, plus an interactive console (REPL).

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_apply, handle_console, handle_diff, handle_dump, handle_tree, load_config,
};
