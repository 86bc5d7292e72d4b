use crate::graph_catalog::GraphSchemaError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SqlGeneratorError {
    #[error("Failed to parse Cypher statement: {0}")]
    Parse(String),
    #[error("MATCH clause contains no node pattern")]
    EmptyMatchClause,
    #[error("RETURN clause is missing (read queries must project at least one expression)")]
    MissingReturnClause,
    #[error("Alias `{0}` is bound to more than one node pattern")]
    DuplicateAlias(String),
    #[error("Unknown variable `{0}` (not bound by any MATCH pattern)")]
    UnknownVariable(String),
    #[error("Column `{0}` not found (check schema configuration)")]
    ColumnNotFound(String),
    #[error("Unknown aggregate function `{0}`")]
    UnknownFunction(String),
    #[error("Unsupported expression in RETURN clause")]
    UnsupportedItemInReturnClause,
    #[error("WITH clause must carry a named node pattern")]
    UnnamedCarriedNode,
    #[error("Unsupported FOREACH body: {0}")]
    UnsupportedForEach(String),
    #[error("Schema error: {0}")]
    Schema(#[from] GraphSchemaError),
}
