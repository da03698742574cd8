// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Thread-safe catalog handle
//!
//! Batches and purges take the write lock, so updates are applied one at a
//! time. Readers share the read lock and see a catalog between batches.

use parking_lot::RwLock;
use std::sync::Arc;

use super::catalog::Catalog;
use super::error::CatalogResult;
use crate::config::CatalogConfig;

#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<RwLock<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(catalog)),
        }
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        Self::new(Catalog::with_config(config))
    }

    pub fn execute(&self, batch: &str) -> CatalogResult<()> {
        self.inner.write().execute(batch)
    }

    pub fn purge_deletions(&self) -> CatalogResult<()> {
        self.inner.write().purge_deletions()
    }

    /// Run `f` with shared access to the catalog
    pub fn read<R>(&self, f: impl FnOnce(&Catalog) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn signature(&self) -> u32 {
        self.inner.read().signature()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clones_share_the_catalog() {
        let shared = SharedCatalog::default();
        let other = shared.clone();

        shared.execute("add / clusters cluster").unwrap();
        assert_eq!(other.read(|c| c.node_count()), 2);
        assert_eq!(shared.signature(), other.signature());
    }

    #[test]
    fn test_concurrent_batches() {
        let shared = SharedCatalog::new(Catalog::new());
        shared
            .execute("add / clusters cluster\nadd /clusters#cluster databases db")
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for j in 0..10 {
                        let batch = format!(
                            "add /clusters#cluster/databases#db tables t{}_{}",
                            i, j
                        );
                        shared.execute(&batch).unwrap();
                        shared.read(|c| assert!(c.node_count() >= 3));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let tables = shared.read(|c| {
            c.get("/clusters#cluster/databases#db")
                .and_then(|db| db.collection("tables"))
                .map(|t| t.len())
        });
        assert_eq!(tables, Some(40));
    }
}
