// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the catalog engine
//!
//! Only batch-aborting failures are represented here. Commands that target
//! unknown paths or unknown collections are dropped by the interpreter and
//! never surface as errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },

    #[error("Invalid catalog command: {0}")]
    InvalidCommand(String),

    #[error("Malformed catalog command: {0}")]
    MalformedCommand(String),

    #[error("Child already exists: {path}")]
    DuplicateChild { path: String },

    #[error("Unknown field '{field}' on {path}")]
    UnknownField { path: String, field: String },

    #[error("Unresolved references at end of batch: {}", .0.join(", "))]
    UnresolvedReferences(Vec<String>),

    #[error("Pending deletion not found in registry: {0}")]
    PurgeTargetMissing(String),

    #[error("Invalid hex payload: {0}")]
    InvalidHex(String),

    #[error("Failed to execute catalog command at line {line} '{command}': {source}")]
    Batch {
        line: usize,
        command: String,
        source: Box<CatalogError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl CatalogError {
    /// Strip any `Batch` wrapping and return the error that caused it
    pub fn root_cause(&self) -> &CatalogError {
        match self {
            CatalogError::Batch { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Config(err.to_string())
    }
}

impl From<hex::FromHexError> for CatalogError {
    fn from(err: hex::FromHexError) -> Self {
        CatalogError::InvalidHex(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
