// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "schemacat")]
#[command(about = "SchemaCat - In-memory schema catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<log::Level>,

    /// Catalog configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Execute command logs, one batch per file, and print a summary
    Apply {
        /// Command log files, applied in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Purge pending deletions after the last batch
        #[arg(long)]
        purge: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Execute command logs and print the catalog as a command log
    Dump {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Execute command logs and print the node tree
    Tree {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the commands that turn one catalog into another
    Diff {
        /// Command log of the current catalog
        old: PathBuf,

        /// Command log of the target catalog
        new: PathBuf,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Start an interactive console, optionally preloading command logs
    Console { files: Vec<PathBuf> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
