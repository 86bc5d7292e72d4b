use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphSchemaError {
    #[error("No node schema found for `{node_label}`")]
    Node { node_label: String },
    #[error("No relationship schema found for `{rel_label}`")]
    Relation { rel_label: String },
    #[error("Node id column is missing from `{table}` (every node relation must carry an `id` column)")]
    MissingNodeId { table: String },
    #[error("Edge endpoint columns are missing (the edge relation must carry `idl`, `idr` and `type` columns)")]
    MissingEdgeEndpoints,
    #[error("Failed to parse schema configuration: {error}")]
    ConfigParseError { error: String },
}
