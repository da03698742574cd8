//! Test fixture for SchemaCat integration tests
//!
//! Uses only the public crate API.

use schemacat::{Catalog, CatalogConfig, CatalogError, NodeRef};
use std::path::PathBuf;

pub const CLUSTER: &str = "/clusters#cluster";
pub const DB: &str = "/clusters#cluster/databases#database";

/// The three-level tree most tests start from
pub const BASE_BATCH: &str = "add / clusters cluster\n\
                              add /clusters#cluster databases database\n\
                              add /clusters#cluster/databases#database tables tableA\n";

/// Test fixture with an isolated catalog and scratch directory
pub struct TestFixture {
    catalog: Catalog,
    temp_dir: tempfile::TempDir,
}

impl TestFixture {
    /// Create a fixture with an empty catalog
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            catalog: Catalog::with_config(config),
            temp_dir: tempfile::tempdir()?,
        })
    }

    /// Create a fixture holding cluster, database and `tableA`
    pub fn with_base_tree() -> Result<Self, Box<dyn std::error::Error>> {
        let mut fixture = Self::new()?;
        fixture.execute(BASE_BATCH)?;
        Ok(fixture)
    }

    /// Create a fixture with a small but complete schema: two tables with
    /// columns and an index, a partitioned procedure and a user group
    pub fn with_sample_schema() -> Result<Self, Box<dyn std::error::Error>> {
        let mut fixture = Self::with_base_tree()?;
        fixture.execute(&sample_schema_batch())?;
        Ok(fixture)
    }

    pub fn execute(&mut self, batch: &str) -> Result<(), CatalogError> {
        self.catalog.execute(batch)
    }

    /// Execute and panic with the batch error on failure
    pub fn assert_executes(&mut self, batch: &str) {
        if let Err(e) = self.catalog.execute(batch) {
            panic!("batch failed: {}\n{}", e, batch);
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn node(&self, path: &str) -> Option<NodeRef<'_>> {
        self.catalog.get(path)
    }

    pub fn table_path(name: &str) -> String {
        format!("{}/tables#{}", DB, name)
    }

    /// Write a command log into the scratch directory
    pub fn write_batch_file(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Relative indexes of a collection's members, in iteration order
    pub fn ranks(&self, parent: &str, collection: &str) -> Vec<(String, usize)> {
        self.catalog
            .get(parent)
            .and_then(|n| n.collection(collection))
            .map(|c| {
                c.iter()
                    .map(|n| (n.name().to_string(), n.relative_index()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn sample_schema_batch() -> String {
    let orders = TestFixture::table_path("orders");
    let customers = TestFixture::table_path("customers");
    [
        format!("set {DB} schema \"CREATE TABLE orders (id INTEGER, cid INTEGER);\""),
        format!("add {DB} tables orders"),
        format!("set {orders} isreplicated false"),
        format!("set $PREV partitioncolumn {orders}/columns#id"),
        format!("add {orders} columns id"),
        format!("set {orders}/columns#id index 0"),
        format!("set $PREV nullable false"),
        format!("add {orders} columns cid"),
        format!("set {orders}/columns#cid index 1"),
        format!("add {orders} indexes PK_ORDERS"),
        format!("set {orders}/indexes#PK_ORDERS unique true"),
        format!("add {orders}/indexes#PK_ORDERS columns id"),
        format!("set {orders}/indexes#PK_ORDERS/columns#id column {orders}/columns#id"),
        format!("add {DB} tables customers"),
        format!("set {customers} isreplicated true"),
        format!("add {customers} columns id"),
        format!("add {DB} groups readers"),
        format!("set {DB}/groups#readers sqlread true"),
        format!("add {DB} procedures GetOrders"),
        format!("set {DB}/procedures#GetOrders partitiontable {orders}"),
        format!("set $PREV partitioncolumn {orders}/columns#id"),
        format!("set $PREV singlepartition true"),
        format!("add {DB}/procedures#GetOrders authGroups readers"),
        format!("set {DB}/procedures#GetOrders/authGroups#readers group {DB}/groups#readers"),
    ]
    .join("\n")
}
