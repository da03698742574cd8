// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! SchemaCat CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // Default to Warn (can still be overridden by RUST_LOG env var)
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Version => {
            println!("{} {}", "SchemaCat".bold().green(), schemacat::VERSION);
            println!("In-memory schema catalog");
            Ok(())
        }

        Commands::Apply {
            files,
            purge,
            format,
        } => cli::handle_apply(&files, config, purge, format),

        Commands::Dump { files } => cli::handle_dump(&files, config),

        Commands::Tree { files } => cli::handle_tree(&files, config),

        Commands::Diff { old, new, format } => cli::handle_diff(&old, &new, config, format),

        Commands::Console { files } => cli::handle_console(&files, config),
    }
}
