pub mod errors;
pub mod graph_schema;

pub use errors::GraphSchemaError;
pub use graph_schema::{ColumnDef, ColumnType, GraphSchema};
