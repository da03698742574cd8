// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for SchemaCat

use colored::Colorize;
use rustyline::{error::ReadlineError, CompletionType, Config, EditMode, Editor};
use std::path::{Path, PathBuf};

use super::commands::OutputFormat;
use super::output::{CatalogSummary, ReportFormatter};
use schemacat::{diff, Catalog, CatalogConfig};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Load the catalog configuration, or the defaults when no file is given
pub fn load_config(path: Option<&Path>) -> CliResult<CatalogConfig> {
    match path {
        Some(path) => {
            let config = CatalogConfig::from_json_file(path)?;
            log::debug!("Loaded catalog configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(CatalogConfig::default()),
    }
}

/// Execute each file as one batch, in order
fn apply_files(catalog: &mut Catalog, files: &[PathBuf]) -> CliResult<usize> {
    for file in files {
        let batch = std::fs::read_to_string(file)
            .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
        catalog
            .execute(&batch)
            .map_err(|e| format!("{}: {}", file.display(), e))?;
        log::info!("Applied {}", file.display());
    }
    Ok(files.len())
}

fn load_catalog(files: &[PathBuf], config: CatalogConfig) -> CliResult<Catalog> {
    let mut catalog = Catalog::with_config(config);
    apply_files(&mut catalog, files)?;
    Ok(catalog)
}

/// Handle the apply command
pub fn handle_apply(
    files: &[PathBuf],
    config: CatalogConfig,
    purge: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let mut catalog = Catalog::with_config(config);
    let batches = apply_files(&mut catalog, files)?;

    let mut summary = CatalogSummary::collect(&catalog, batches);
    if purge {
        catalog.purge_deletions()?;
        summary.node_count = catalog.node_count();
        summary.purged = true;
    }

    print!("{}", ReportFormatter::summary(&summary, format));
    Ok(())
}

/// Handle the dump command
pub fn handle_dump(files: &[PathBuf], config: CatalogConfig) -> CliResult<()> {
    let catalog = load_catalog(files, config)?;
    print!("{}", catalog.serialize());
    Ok(())
}

/// Handle the tree command
pub fn handle_tree(files: &[PathBuf], config: CatalogConfig) -> CliResult<()> {
    let catalog = load_catalog(files, config)?;
    print!("{}", ReportFormatter::tree(&catalog));
    Ok(())
}

/// Handle the diff command
pub fn handle_diff(
    old: &Path,
    new: &Path,
    config: CatalogConfig,
    format: OutputFormat,
) -> CliResult<()> {
    let old = load_catalog(&[old.to_path_buf()], config.clone())?;
    let new = load_catalog(&[new.to_path_buf()], config)?;

    let changes = diff(&old, &new);
    print!("{}", ReportFormatter::diff(&changes, format));
    Ok(())
}

/// Handle the console (REPL) command
pub fn handle_console(files: &[PathBuf], config: CatalogConfig) -> CliResult<()> {
    let mut catalog = load_catalog(files, config)?;

    println!("{}", "SchemaCat".bold().green());
    println!("Type 'help' for commands, 'exit' or 'quit' to exit");
    println!("Each line is executed as its own batch\n");
    if !files.is_empty() {
        println!(
            "{}",
            format!("Loaded {} file(s), {} node(s)", files.len(), catalog.node_count()).cyan()
        );
    }

    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();

    let mut rl = Editor::<(), _>::with_config(config)?;

    let history_path = ".schemacat/history.txt";
    if let Some(parent) = Path::new(&history_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let _ = rl.load_history(&history_path);

    loop {
        let line = match rl.readline(&format!("{} ", "catalog>".cyan())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();
        match trimmed {
            "exit" | "quit" => {
                println!("{}", "Goodbye!".green());
                break;
            }
            "help" => {
                print_help();
                continue;
            }
            "tree" => {
                print!("{}", ReportFormatter::tree(&catalog));
                continue;
            }
            "dump" => {
                print!("{}", catalog.serialize());
                continue;
            }
            "purge" => {
                match catalog.purge_deletions() {
                    Ok(()) => println!("{}", format!("{} node(s) live", catalog.node_count()).green()),
                    Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                }
                continue;
            }
            "" => continue,
            _ => {}
        }

        rl.add_history_entry(trimmed)?;

        match catalog.execute(trimmed) {
            Ok(()) => {
                let deleted = catalog.get_deleted_paths();
                if deleted.is_empty() {
                    println!("{}", "OK".green());
                } else {
                    println!("{}", format!("OK, deleted {}", deleted.join(", ")).green());
                }
            }
            Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
        }
    }

    let _ = rl.save_history(&history_path);

    Ok(())
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  add <path> <collection> <name>     Add a child node");
    println!("  set <path|$PREV> <field> <value>   Set a field");
    println!("  delete <path> <collection> <name>  Remove a child node");
    println!();
    println!("{}", "Console:".bold());
    println!("  tree    Show the node tree");
    println!("  dump    Print the catalog as a command log");
    println!("  purge   Destroy deleted nodes");
    println!("  help    Show this help");
    println!("  exit    Leave the console");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("01.txt");
        let second = dir.path().join("02.txt");
        std::fs::write(&first, "add / clusters cluster\n").unwrap();
        std::fs::write(&second, "add /clusters#cluster databases db\n").unwrap();

        let catalog = load_catalog(&[first, second], CatalogConfig::default()).unwrap();
        assert_eq!(catalog.node_count(), 3);
    }

    #[test]
    fn test_apply_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.txt");
        std::fs::write(&bad, "drop / clusters cluster\n").unwrap();

        let err = load_catalog(&[bad], CatalogConfig::default()).unwrap_err();
        assert!(err.to_string().contains("bad.txt"));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_load_config() {
        assert_eq!(load_config(None).unwrap(), CatalogConfig::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"strict_fields": true}"#).unwrap();
        assert!(load_config(Some(path.as_path())).unwrap().strict_fields);
    }
}
