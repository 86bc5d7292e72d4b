use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::errors::GraphSchemaError;

/// Name of the relation holding every node regardless of label.
pub const NODES_TABLE: &str = "nodes";
/// Name of the adjacency relation holding every edge regardless of type.
pub const EDGES_TABLE: &str = "edges";

/// Semantic type of a relational column derived from a graph property.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Long,
    Text,
    TextArray,
}

impl ColumnType {
    /// The backend DDL spelling of this type.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INT",
            ColumnType::Long => "BIGINT",
            ColumnType::Text => "TEXT",
            ColumnType::TextArray => "TEXT[]",
        }
    }
}

/// One typed column of a node or edge relation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ctype: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ctype: ColumnType) -> Self {
        ColumnDef {
            name: name.into(),
            ctype,
        }
    }
}

/// The relational schema a graph was converted into.
///
/// Populated once by the schema-conversion pipeline before any translation
/// runs; translations only ever read it, so a shared reference can be handed
/// to concurrent calls without coordination.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GraphSchema {
    /// Columns of the global `nodes` relation.
    node_columns: Vec<ColumnDef>,
    /// Columns of the global `edges` relation.
    edge_columns: Vec<ColumnDef>,
    /// Per-label column lists, keyed by the label text as it appears in
    /// queries (compound labels keep their `", "` joining here).
    label_columns: HashMap<String, Vec<ColumnDef>>,
    /// Per-relationship-type column lists.
    rel_columns: HashMap<String, Vec<ColumnDef>>,
}

impl GraphSchema {
    pub fn build(
        node_columns: Vec<ColumnDef>,
        edge_columns: Vec<ColumnDef>,
        label_columns: HashMap<String, Vec<ColumnDef>>,
        rel_columns: HashMap<String, Vec<ColumnDef>>,
    ) -> Result<Self, GraphSchemaError> {
        if !node_columns.iter().any(|c| c.name == "id") {
            return Err(GraphSchemaError::MissingNodeId {
                table: NODES_TABLE.to_string(),
            });
        }
        for (label, columns) in &label_columns {
            if !columns.iter().any(|c| c.name == "id") {
                return Err(GraphSchemaError::MissingNodeId {
                    table: node_table_name(label),
                });
            }
        }
        for endpoint in ["idl", "idr", "type"] {
            if !edge_columns.iter().any(|c| c.name == endpoint) {
                return Err(GraphSchemaError::MissingEdgeEndpoints);
            }
        }

        Ok(GraphSchema {
            node_columns,
            edge_columns,
            label_columns,
            rel_columns,
        })
    }

    /// Deserialize a schema from the JSON the conversion pipeline emits.
    pub fn from_json(raw: &str) -> Result<Self, GraphSchemaError> {
        let schema: GraphSchema =
            serde_json::from_str(raw).map_err(|e| GraphSchemaError::ConfigParseError {
                error: e.to_string(),
            })?;
        GraphSchema::build(
            schema.node_columns,
            schema.edge_columns,
            schema.label_columns,
            schema.rel_columns,
        )
    }

    /// Ordered typed columns a node with this label is stored with.
    pub fn columns_for_label(&self, label: &str) -> Result<&[ColumnDef], GraphSchemaError> {
        self.label_columns
            .get(label)
            .map(|v| v.as_slice())
            .ok_or_else(|| GraphSchemaError::Node {
                node_label: label.to_string(),
            })
    }

    /// Ordered typed columns an edge of this relationship type is stored with.
    pub fn columns_for_rel_type(&self, rel_type: &str) -> Result<&[ColumnDef], GraphSchemaError> {
        self.rel_columns
            .get(rel_type)
            .map(|v| v.as_slice())
            .ok_or_else(|| GraphSchemaError::Relation {
                rel_label: rel_type.to_string(),
            })
    }

    pub fn node_columns(&self) -> &[ColumnDef] {
        &self.node_columns
    }

    pub fn edge_columns(&self) -> &[ColumnDef] {
        &self.edge_columns
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label_columns.contains_key(label)
    }

    pub fn has_rel_type(&self, rel_type: &str) -> bool {
        self.rel_columns.contains_key(rel_type)
    }
}

/// Relation name for a node label. Compound labels arrive `", "`-joined from
/// the conversion pipeline and map onto a single table name.
pub fn node_table_name(label: &str) -> String {
    label.replace(", ", "_").to_lowercase()
}

/// Relation name for a relationship type: `e$<type>`.
pub fn rel_table_name(rel_type: &str) -> String {
    format!("e${}", rel_type)
}
