// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Parser for single catalog commands
//!
//! Every line of a batch has exactly four space-separated parts:
//! `<command> <ref> <collectionOrField> <childOrValue>`. The last part runs to
//! the end of the line, so quoted values may contain spaces.

use nom::{
    bytes::complete::take_till1,
    character::complete::char,
    combinator::rest,
    sequence::{terminated, tuple},
    IResult,
};

use super::error::{CatalogError, CatalogResult};

/// Ref shorthand for the most recently resolved node
pub const PREV_REF: &str = "$PREV";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Add,
    Set,
    Delete,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Add => "add",
            CommandKind::Set => "set",
            CommandKind::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandRef<'a> {
    Prev,
    Path(&'a str),
}

/// One parsed catalog command, borrowing from the batch text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    pub kind: CommandKind,
    pub target: CommandRef<'a>,
    /// Collection name for `add`/`delete`, field name for `set`
    pub arg: &'a str,
    /// Child name for `add`/`delete`, literal for `set`
    pub value: &'a str,
}

fn word(input: &str) -> IResult<&str, &str> {
    terminated(take_till1(|c| c == ' '), char(' '))(input)
}

fn command_parts(input: &str) -> IResult<&str, (&str, &str, &str, &str)> {
    tuple((word, word, word, rest))(input)
}

/// Parse one command line
pub fn parse_command(line: &str) -> CatalogResult<Command<'_>> {
    let (_, (command, target, arg, value)) =
        command_parts(line).map_err(|_| CatalogError::MalformedCommand(line.to_string()))?;

    let kind = match command {
        "add" => CommandKind::Add,
        "set" => CommandKind::Set,
        "delete" => CommandKind::Delete,
        _ => return Err(CatalogError::InvalidCommand(line.to_string())),
    };

    let target = if target == PREV_REF {
        CommandRef::Prev
    } else if target.starts_with('/') {
        CommandRef::Path(target)
    } else {
        return Err(CatalogError::MalformedCommand(line.to_string()));
    };

    // An empty literal is reported by the literal parser; an empty child name is never valid
    if value.is_empty() && kind != CommandKind::Set {
        return Err(CatalogError::MalformedCommand(line.to_string()));
    }

    Ok(Command {
        kind,
        target,
        arg,
        value,
    })
}
