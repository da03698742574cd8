//! Test utilities for SchemaCat integration tests
//!
//! `TestFixture` owns a catalog plus a scratch directory for command-log
//! files. Each fixture is independent, so tests may run in parallel.

#![allow(dead_code)]

pub mod test_fixture;
