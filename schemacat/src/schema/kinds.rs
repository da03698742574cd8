// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Node kinds and their declared fields and child collections
//!
//! Every catalog node has one `NodeKind`. The kind decides which fields the
//! node is created with and which collection names `add`/`delete` commands
//! may address on it. Collection and field names are matched exactly.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Declared type of a field, used for defaults, nulls and serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Integer,
    Boolean,
    Reference,
    /// Hex-encoded binary payload carried as a quoted string
    Payload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub ty: FieldType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionDecl {
    pub name: &'static str,
    pub kind: NodeKind,
}

use FieldType::{Boolean, Integer, Payload, Reference, String as Text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Catalog,
    Cluster,
    Database,
    Table,
    Column,
    Index,
    ColumnRef,
    Constraint,
    ConstraintRef,
    MaterializedViewInfo,
    Procedure,
    Statement,
    PlanFragment,
    ProcParameter,
    StmtParameter,
    User,
    Group,
    GroupRef,
    Connector,
    ConnectorTableInfo,
    SnapshotSchedule,
}

static KINDS_BY_NAME: Lazy<HashMap<String, NodeKind>> = Lazy::new(|| {
    NodeKind::ALL
        .iter()
        .map(|kind| (kind.type_name().to_uppercase(), *kind))
        .collect()
});

impl NodeKind {
    pub const ALL: [NodeKind; 21] = [
        NodeKind::Catalog,
        NodeKind::Cluster,
        NodeKind::Database,
        NodeKind::Table,
        NodeKind::Column,
        NodeKind::Index,
        NodeKind::ColumnRef,
        NodeKind::Constraint,
        NodeKind::ConstraintRef,
        NodeKind::MaterializedViewInfo,
        NodeKind::Procedure,
        NodeKind::Statement,
        NodeKind::PlanFragment,
        NodeKind::ProcParameter,
        NodeKind::StmtParameter,
        NodeKind::User,
        NodeKind::Group,
        NodeKind::GroupRef,
        NodeKind::Connector,
        NodeKind::ConnectorTableInfo,
        NodeKind::SnapshotSchedule,
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Catalog => "Catalog",
            NodeKind::Cluster => "Cluster",
            NodeKind::Database => "Database",
            NodeKind::Table => "Table",
            NodeKind::Column => "Column",
            NodeKind::Index => "Index",
            NodeKind::ColumnRef => "ColumnRef",
            NodeKind::Constraint => "Constraint",
            NodeKind::ConstraintRef => "ConstraintRef",
            NodeKind::MaterializedViewInfo => "MaterializedViewInfo",
            NodeKind::Procedure => "Procedure",
            NodeKind::Statement => "Statement",
            NodeKind::PlanFragment => "PlanFragment",
            NodeKind::ProcParameter => "ProcParameter",
            NodeKind::StmtParameter => "StmtParameter",
            NodeKind::User => "User",
            NodeKind::Group => "Group",
            NodeKind::GroupRef => "GroupRef",
            NodeKind::Connector => "Connector",
            NodeKind::ConnectorTableInfo => "ConnectorTableInfo",
            NodeKind::SnapshotSchedule => "SnapshotSchedule",
        }
    }

    /// Look a kind up by type name, ignoring case
    pub fn from_name(name: &str) -> Option<NodeKind> {
        KINDS_BY_NAME.get(&name.to_uppercase()).copied()
    }

    pub fn fields(&self) -> &'static [FieldDecl] {
        match self {
            NodeKind::Catalog => &[],
            NodeKind::Cluster => &[
                FieldDecl { name: "localepoch", ty: Integer },
                FieldDecl { name: "securityEnabled", ty: Boolean },
                FieldDecl { name: "adminport", ty: Integer },
                FieldDecl { name: "adminstartup", ty: Boolean },
                FieldDecl { name: "heartbeatTimeout", ty: Integer },
                FieldDecl { name: "drProducerEnabled", ty: Boolean },
                FieldDecl { name: "drClusterId", ty: Integer },
            ],
            NodeKind::Database => &[
                FieldDecl { name: "schema", ty: Text },
                FieldDecl { name: "isActiveActiveDRed", ty: Boolean },
                FieldDecl { name: "securityprovider", ty: Text },
            ],
            NodeKind::Table => &[
                FieldDecl { name: "isreplicated", ty: Boolean },
                FieldDecl { name: "partitioncolumn", ty: Reference },
                FieldDecl { name: "estimatedtuplecount", ty: Integer },
                FieldDecl { name: "materializer", ty: Reference },
                FieldDecl { name: "signature", ty: Text },
                FieldDecl { name: "tuplelimit", ty: Integer },
                FieldDecl { name: "isDRed", ty: Boolean },
                FieldDecl { name: "tableType", ty: Integer },
            ],
            NodeKind::Column => &[
                FieldDecl { name: "index", ty: Integer },
                FieldDecl { name: "type", ty: Integer },
                FieldDecl { name: "size", ty: Integer },
                FieldDecl { name: "nullable", ty: Boolean },
                FieldDecl { name: "name", ty: Text },
                FieldDecl { name: "defaultvalue", ty: Text },
                FieldDecl { name: "defaulttype", ty: Integer },
                FieldDecl { name: "matview", ty: Reference },
                FieldDecl { name: "aggregatetype", ty: Integer },
                FieldDecl { name: "matviewsource", ty: Reference },
                FieldDecl { name: "inbytes", ty: Boolean },
            ],
            NodeKind::Index => &[
                FieldDecl { name: "unique", ty: Boolean },
                FieldDecl { name: "assumeUnique", ty: Boolean },
                FieldDecl { name: "countable", ty: Boolean },
                FieldDecl { name: "type", ty: Integer },
                FieldDecl { name: "expressionsjson", ty: Text },
                FieldDecl { name: "predicatejson", ty: Text },
            ],
            NodeKind::ColumnRef => &[
                FieldDecl { name: "index", ty: Integer },
                FieldDecl { name: "column", ty: Reference },
            ],
            NodeKind::Constraint => &[
                FieldDecl { name: "type", ty: Integer },
                FieldDecl { name: "oncommit", ty: Text },
                FieldDecl { name: "index", ty: Reference },
                FieldDecl { name: "foreignkeytable", ty: Reference },
            ],
            NodeKind::ConstraintRef => &[FieldDecl { name: "constraint", ty: Reference }],
            NodeKind::MaterializedViewInfo => &[
                FieldDecl { name: "dest", ty: Reference },
                FieldDecl { name: "predicate", ty: Text },
                FieldDecl { name: "groupbyExpressionsJson", ty: Text },
                FieldDecl { name: "aggregationExpressionsJson", ty: Text },
            ],
            NodeKind::Procedure => &[
                FieldDecl { name: "classname", ty: Text },
                FieldDecl { name: "readonly", ty: Boolean },
                FieldDecl { name: "singlepartition", ty: Boolean },
                FieldDecl { name: "everysite", ty: Boolean },
                FieldDecl { name: "systemproc", ty: Boolean },
                FieldDecl { name: "defaultproc", ty: Boolean },
                FieldDecl { name: "hasjava", ty: Boolean },
                FieldDecl { name: "partitiontable", ty: Reference },
                FieldDecl { name: "partitioncolumn", ty: Reference },
                FieldDecl { name: "partitionparameter", ty: Integer },
            ],
            NodeKind::Statement => &[
                FieldDecl { name: "sqltext", ty: Text },
                FieldDecl { name: "querytype", ty: Integer },
                FieldDecl { name: "readonly", ty: Boolean },
                FieldDecl { name: "singlepartition", ty: Boolean },
                FieldDecl { name: "replicatedtabledml", ty: Boolean },
                FieldDecl { name: "iscontentdeterministic", ty: Boolean },
                FieldDecl { name: "isorderdeterministic", ty: Boolean },
                FieldDecl { name: "explainplan", ty: Payload },
                FieldDecl { name: "tablesread", ty: Text },
                FieldDecl { name: "tablesupdated", ty: Text },
                FieldDecl { name: "cost", ty: Integer },
                FieldDecl { name: "seqscancount", ty: Integer },
            ],
            NodeKind::PlanFragment => &[
                FieldDecl { name: "hasdependencies", ty: Boolean },
                FieldDecl { name: "multipartition", ty: Boolean },
                FieldDecl { name: "plannodetree", ty: Payload },
                FieldDecl { name: "nontransactional", ty: Boolean },
                FieldDecl { name: "planhash", ty: Text },
            ],
            NodeKind::ProcParameter | NodeKind::StmtParameter => &[
                FieldDecl { name: "type", ty: Integer },
                FieldDecl { name: "isarray", ty: Boolean },
                FieldDecl { name: "index", ty: Integer },
            ],
            NodeKind::User => &[
                FieldDecl { name: "shadowPassword", ty: Text },
                FieldDecl { name: "sha256ShadowPassword", ty: Text },
            ],
            NodeKind::Group => &[
                FieldDecl { name: "admin", ty: Boolean },
                FieldDecl { name: "defaultproc", ty: Boolean },
                FieldDecl { name: "defaultprocread", ty: Boolean },
                FieldDecl { name: "sql", ty: Boolean },
                FieldDecl { name: "sqlread", ty: Boolean },
                FieldDecl { name: "allproc", ty: Boolean },
            ],
            NodeKind::GroupRef => &[FieldDecl { name: "group", ty: Reference }],
            NodeKind::Connector => &[
                FieldDecl { name: "loaderclass", ty: Text },
                FieldDecl { name: "enabled", ty: Boolean },
            ],
            NodeKind::ConnectorTableInfo => &[
                FieldDecl { name: "table", ty: Reference },
                FieldDecl { name: "appendOnly", ty: Boolean },
            ],
            NodeKind::SnapshotSchedule => &[
                FieldDecl { name: "enabled", ty: Boolean },
                FieldDecl { name: "frequencyUnit", ty: Text },
                FieldDecl { name: "frequencyValue", ty: Integer },
                FieldDecl { name: "retain", ty: Integer },
                FieldDecl { name: "prefix", ty: Text },
            ],
        }
    }

    pub fn collections(&self) -> &'static [CollectionDecl] {
        match self {
            NodeKind::Catalog => &[CollectionDecl { name: "clusters", kind: NodeKind::Cluster }],
            NodeKind::Cluster => &[CollectionDecl { name: "databases", kind: NodeKind::Database }],
            NodeKind::Database => &[
                CollectionDecl { name: "tables", kind: NodeKind::Table },
                CollectionDecl { name: "procedures", kind: NodeKind::Procedure },
                CollectionDecl { name: "users", kind: NodeKind::User },
                CollectionDecl { name: "groups", kind: NodeKind::Group },
                CollectionDecl { name: "connectors", kind: NodeKind::Connector },
                CollectionDecl { name: "snapshotSchedule", kind: NodeKind::SnapshotSchedule },
            ],
            NodeKind::Table => &[
                CollectionDecl { name: "columns", kind: NodeKind::Column },
                CollectionDecl { name: "indexes", kind: NodeKind::Index },
                CollectionDecl { name: "constraints", kind: NodeKind::Constraint },
                CollectionDecl { name: "views", kind: NodeKind::MaterializedViewInfo },
            ],
            NodeKind::Column => &[
                CollectionDecl { name: "constraints", kind: NodeKind::ConstraintRef },
            ],
            NodeKind::Index => &[CollectionDecl { name: "columns", kind: NodeKind::ColumnRef }],
            NodeKind::Constraint => &[
                CollectionDecl { name: "foreignkeycols", kind: NodeKind::ColumnRef },
            ],
            NodeKind::MaterializedViewInfo => &[
                CollectionDecl { name: "groupbycols", kind: NodeKind::ColumnRef },
            ],
            NodeKind::Procedure => &[
                CollectionDecl { name: "statements", kind: NodeKind::Statement },
                CollectionDecl { name: "parameters", kind: NodeKind::ProcParameter },
                CollectionDecl { name: "authGroups", kind: NodeKind::GroupRef },
            ],
            NodeKind::Statement => &[
                CollectionDecl { name: "fragments", kind: NodeKind::PlanFragment },
                CollectionDecl { name: "parameters", kind: NodeKind::StmtParameter },
            ],
            NodeKind::User => &[CollectionDecl { name: "groups", kind: NodeKind::GroupRef }],
            NodeKind::Connector => &[
                CollectionDecl { name: "tableInfo", kind: NodeKind::ConnectorTableInfo },
            ],
            NodeKind::ColumnRef
            | NodeKind::ConstraintRef
            | NodeKind::PlanFragment
            | NodeKind::ProcParameter
            | NodeKind::StmtParameter
            | NodeKind::Group
            | NodeKind::GroupRef
            | NodeKind::ConnectorTableInfo
            | NodeKind::SnapshotSchedule => &[],
        }
    }

    pub fn field_decl(&self, name: &str) -> Option<&'static FieldDecl> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.field_decl(name).map(|f| f.ty)
    }

    pub fn collection_decl(&self, name: &str) -> Option<&'static CollectionDecl> {
        self.collections().iter().find(|c| c.name == name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
