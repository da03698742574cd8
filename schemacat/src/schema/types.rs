// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Typed views over catalog nodes
//!
//! Each view wraps a [`NodeRef`] of one kind and exposes its fields and
//! collections under their own names, so engine code can write
//! `table.partition_column()` instead of looking fields up by string.
//! Unset strings read as empty, unset integers as zero and null references as
//! `None`.

use std::marker::PhantomData;

use super::kinds::NodeKind;
use crate::catalog::collection::CollectionRef;
use crate::catalog::node::NodeRef;

/// A typed view of a catalog node
pub trait CatalogType<'a>: Copy + 'a {
    const KIND: NodeKind;

    /// Wrap without checking the kind
    fn wrap(node: NodeRef<'a>) -> Self;

    fn node(&self) -> NodeRef<'a>;

    /// Wrap `node` if it has this view's kind
    fn cast(node: NodeRef<'a>) -> Option<Self> {
        (node.kind() == Self::KIND).then(|| Self::wrap(node))
    }

    fn name(&self) -> &'a str {
        self.node().name()
    }

    fn path(&self) -> &'a str {
        self.node().path()
    }

    fn relative_index(&self) -> usize {
        self.node().relative_index()
    }

    fn was_added(&self) -> bool {
        self.node().was_added()
    }

    fn was_updated(&self) -> bool {
        self.node().was_updated()
    }
}

/// A collection whose members are all viewed as `T`
#[derive(Debug, Clone, Copy)]
pub struct TypedCollection<'a, T> {
    inner: Option<CollectionRef<'a>>,
    _marker: PhantomData<T>,
}

impl<'a, T: CatalogType<'a>> TypedCollection<'a, T> {
    pub(crate) fn new(inner: Option<CollectionRef<'a>>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<T> {
        self.inner
            .as_ref()
            .and_then(|c| c.get(name))
            .and_then(T::cast)
    }

    pub fn get_at_relative_index(&self, index: usize) -> Option<T> {
        self.inner
            .as_ref()
            .and_then(|c| c.get_at_relative_index(index))
            .and_then(T::cast)
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members in uppercase-key order
    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        self.inner
            .into_iter()
            .flat_map(|c| c.iter())
            .filter_map(T::cast)
    }

    pub fn as_collection(&self) -> Option<CollectionRef<'a>> {
        self.inner
    }
}

macro_rules! field_getter {
    ($getter:ident, str, $field:literal) => {
        pub fn $getter(&self) -> &'a str {
            self.0.field_str($field).unwrap_or("")
        }
    };
    ($getter:ident, int, $field:literal) => {
        pub fn $getter(&self) -> i64 {
            self.0.field_int($field).unwrap_or(0)
        }
    };
    ($getter:ident, bool, $field:literal) => {
        pub fn $getter(&self) -> bool {
            self.0.field_bool($field)
        }
    };
    ($getter:ident, payload, $field:literal) => {
        /// Decoded payload bytes, `None` when unset
        pub fn $getter(&self) -> Option<&'a [u8]> {
            self.0.payload($field)
        }
    };
    ($getter:ident, $target:ident, $field:literal) => {
        pub fn $getter(&self) -> Option<$target<'a>> {
            self.0
                .field_ref($field)
                .and_then(<$target<'a> as CatalogType<'a>>::cast)
        }
    };
}

macro_rules! catalog_type {
    (
        $(#[$meta:meta])*
        $name:ident => $kind:ident {
            $(field $getter:ident: $ty:ident = $field:literal;)*
            $(collection $coll_fn:ident: $coll:literal => $child:ident;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name<'a>(NodeRef<'a>);

        impl<'a> CatalogType<'a> for $name<'a> {
            const KIND: NodeKind = NodeKind::$kind;

            fn wrap(node: NodeRef<'a>) -> Self {
                $name(node)
            }

            fn node(&self) -> NodeRef<'a> {
                self.0
            }
        }

        impl<'a> $name<'a> {
            $(field_getter!($getter, $ty, $field);)*

            $(
                pub fn $coll_fn(&self) -> TypedCollection<'a, $child<'a>> {
                    TypedCollection::new(self.0.collection($coll))
                }
            )*
        }
    };
}

catalog_type! {
    /// A cluster of database hosts
    Cluster => Cluster {
        field local_epoch: int = "localepoch";
        field security_enabled: bool = "securityEnabled";
        field admin_port: int = "adminport";
        field admin_startup: bool = "adminstartup";
        field heartbeat_timeout: int = "heartbeatTimeout";
        field dr_producer_enabled: bool = "drProducerEnabled";
        field dr_cluster_id: int = "drClusterId";
        collection databases: "databases" => Database;
    }
}

catalog_type! {
    Database => Database {
        field schema: str = "schema";
        field is_active_active_dred: bool = "isActiveActiveDRed";
        field security_provider: str = "securityprovider";
        collection tables: "tables" => Table;
        collection procedures: "procedures" => Procedure;
        collection users: "users" => User;
        collection groups: "groups" => Group;
        collection connectors: "connectors" => Connector;
        collection snapshot_schedule: "snapshotSchedule" => SnapshotSchedule;
    }
}

catalog_type! {
    Table => Table {
        field is_replicated: bool = "isreplicated";
        field partition_column: Column = "partitioncolumn";
        field estimated_tuple_count: int = "estimatedtuplecount";
        field materializer: Table = "materializer";
        field signature: str = "signature";
        field tuple_limit: int = "tuplelimit";
        field is_dred: bool = "isDRed";
        field table_type: int = "tableType";
        collection columns: "columns" => Column;
        collection indexes: "indexes" => Index;
        collection constraints: "constraints" => Constraint;
        collection views: "views" => MaterializedViewInfo;
    }
}

catalog_type! {
    Column => Column {
        field index: int = "index";
        field column_type: int = "type";
        field size: int = "size";
        field nullable: bool = "nullable";
        field column_name: str = "name";
        field default_value: str = "defaultvalue";
        field default_type: int = "defaulttype";
        field matview: Table = "matview";
        field aggregate_type: int = "aggregatetype";
        field matview_source: Column = "matviewsource";
        field in_bytes: bool = "inbytes";
        collection constraints: "constraints" => ConstraintRef;
    }
}

catalog_type! {
    Index => Index {
        field unique: bool = "unique";
        field assume_unique: bool = "assumeUnique";
        field countable: bool = "countable";
        field index_type: int = "type";
        field expressions_json: str = "expressionsjson";
        field predicate_json: str = "predicatejson";
        collection columns: "columns" => ColumnRef;
    }
}

catalog_type! {
    /// Position of a column within an index, constraint or view
    ColumnRef => ColumnRef {
        field index: int = "index";
        field column: Column = "column";
    }
}

catalog_type! {
    Constraint => Constraint {
        field constraint_type: int = "type";
        field on_commit: str = "oncommit";
        field index: Index = "index";
        field foreign_key_table: Table = "foreignkeytable";
        collection foreign_key_cols: "foreignkeycols" => ColumnRef;
    }
}

catalog_type! {
    ConstraintRef => ConstraintRef {
        field constraint: Constraint = "constraint";
    }
}

catalog_type! {
    MaterializedViewInfo => MaterializedViewInfo {
        field dest: Table = "dest";
        field predicate: str = "predicate";
        field group_by_expressions_json: str = "groupbyExpressionsJson";
        field aggregation_expressions_json: str = "aggregationExpressionsJson";
        collection group_by_cols: "groupbycols" => ColumnRef;
    }
}

catalog_type! {
    /// A stored procedure and its compiled statements
    Procedure => Procedure {
        field class_name: str = "classname";
        field read_only: bool = "readonly";
        field single_partition: bool = "singlepartition";
        field every_site: bool = "everysite";
        field system_proc: bool = "systemproc";
        field default_proc: bool = "defaultproc";
        field has_java: bool = "hasjava";
        field partition_table: Table = "partitiontable";
        field partition_column: Column = "partitioncolumn";
        field partition_parameter: int = "partitionparameter";
        collection statements: "statements" => Statement;
        collection parameters: "parameters" => ProcParameter;
        collection auth_groups: "authGroups" => GroupRef;
    }
}

catalog_type! {
    Statement => Statement {
        field sql_text: str = "sqltext";
        field query_type: int = "querytype";
        field read_only: bool = "readonly";
        field single_partition: bool = "singlepartition";
        field replicated_table_dml: bool = "replicatedtabledml";
        field is_content_deterministic: bool = "iscontentdeterministic";
        field is_order_deterministic: bool = "isorderdeterministic";
        field explain_plan: payload = "explainplan";
        field tables_read: str = "tablesread";
        field tables_updated: str = "tablesupdated";
        field cost: int = "cost";
        field seq_scan_count: int = "seqscancount";
        collection fragments: "fragments" => PlanFragment;
        collection parameters: "parameters" => StmtParameter;
    }
}

catalog_type! {
    PlanFragment => PlanFragment {
        field has_dependencies: bool = "hasdependencies";
        field multi_partition: bool = "multipartition";
        field plan_node_tree: payload = "plannodetree";
        field non_transactional: bool = "nontransactional";
        field plan_hash: str = "planhash";
    }
}

catalog_type! {
    ProcParameter => ProcParameter {
        field param_type: int = "type";
        field is_array: bool = "isarray";
        field index: int = "index";
    }
}

catalog_type! {
    StmtParameter => StmtParameter {
        field param_type: int = "type";
        field is_array: bool = "isarray";
        field index: int = "index";
    }
}

catalog_type! {
    User => User {
        field shadow_password: str = "shadowPassword";
        field sha256_shadow_password: str = "sha256ShadowPassword";
        collection groups: "groups" => GroupRef;
    }
}

catalog_type! {
    Group => Group {
        field admin: bool = "admin";
        field default_proc: bool = "defaultproc";
        field default_proc_read: bool = "defaultprocread";
        field sql: bool = "sql";
        field sql_read: bool = "sqlread";
        field all_proc: bool = "allproc";
    }
}

catalog_type! {
    GroupRef => GroupRef {
        field group: Group = "group";
    }
}

catalog_type! {
    Connector => Connector {
        field loader_class: str = "loaderclass";
        field enabled: bool = "enabled";
        collection table_info: "tableInfo" => ConnectorTableInfo;
    }
}

catalog_type! {
    ConnectorTableInfo => ConnectorTableInfo {
        field table: Table = "table";
        field append_only: bool = "appendOnly";
    }
}

catalog_type! {
    SnapshotSchedule => SnapshotSchedule {
        field enabled: bool = "enabled";
        field frequency_unit: str = "frequencyUnit";
        field frequency_value: int = "frequencyValue";
        field retain: int = "retain";
        field prefix: str = "prefix";
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::codec::hex::hex_encode_str;

    const DB: &str = "/clusters#cluster/databases#database";

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .execute(&format!(
                "add / clusters cluster\n\
                 add /clusters#cluster databases database\n\
                 add {DB} tables orders\n\
                 set {DB}/tables#orders isreplicated false\n\
                 set $PREV partitioncolumn {DB}/tables#orders/columns#ID\n\
                 set $PREV estimatedtuplecount 1000\n\
                 add {DB}/tables#orders columns ID\n\
                 set {DB}/tables#orders/columns#ID index 0\n\
                 add {DB}/tables#orders columns AMOUNT\n\
                 set {DB}/tables#orders/columns#AMOUNT index 1\n\
                 add {DB} tables customers\n\
                 set {DB}/tables#customers isreplicated true\n\
                 add {DB} procedures GetOrder\n\
                 add {DB}/procedures#GetOrder statements sql\n\
                 set {DB}/procedures#GetOrder/statements#sql sqltext \"SELECT * FROM orders;\"\n\
                 set $PREV explainplan \"{}\"",
                hex_encode_str("SCAN orders")
            ))
            .unwrap();
        catalog
    }

    #[test]
    fn test_typed_navigation() {
        let catalog = catalog();
        let db = catalog
            .clusters()
            .get("cluster")
            .and_then(|c| c.databases().get("database"))
            .unwrap();

        let tables = db.tables();
        assert_eq!(tables.len(), 2);
        let names: Vec<&str> = tables.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["customers", "orders"]);

        let orders = tables.get("ORDERS").unwrap();
        assert!(!orders.is_replicated());
        assert_eq!(orders.estimated_tuple_count(), 1000);
        assert_eq!(orders.relative_index(), 2);
        assert_eq!(orders.partition_column().unwrap().name(), "ID");
        assert!(orders.materializer().is_none());
        assert_eq!(orders.signature(), "");

        let amount = orders.columns().get_at_relative_index(1).unwrap();
        assert_eq!(amount.name(), "AMOUNT");
        assert_eq!(amount.index(), 1);

        assert!(tables.get("customers").unwrap().is_replicated());
    }

    #[test]
    fn test_payload_getter() {
        let catalog = catalog();
        let stmt = catalog
            .clusters()
            .get("cluster")
            .and_then(|c| c.databases().get("database"))
            .and_then(|d| d.procedures().get("getorder"))
            .and_then(|p| p.statements().get("sql"))
            .unwrap();

        assert_eq!(stmt.sql_text(), "SELECT * FROM orders;");
        assert_eq!(stmt.explain_plan(), Some(&b"SCAN orders"[..]));
        assert!(stmt.fragments().is_empty());
    }

    #[test]
    fn test_cast_checks_kind() {
        let catalog = catalog();
        let db = catalog.get(DB).unwrap();
        assert!(Database::cast(db).is_some());
        assert!(Table::cast(db).is_none());
        assert!(Catalog::new().clusters().is_empty());
    }
}
