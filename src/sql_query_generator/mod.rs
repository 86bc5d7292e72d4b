use log::debug;

use crate::graph_catalog::GraphSchema;
use crate::open_cypher_parser::parse_query;

pub mod decoded_query;
mod errors;
mod foreach_query;
mod function_registry;
mod to_sql;
mod with_query;

pub use decoded_query::DecodedQuery;
pub use errors::SqlGeneratorError;

/// Translate one Cypher statement into its SQL equivalent.
///
/// The converter is chosen by which clauses the parsed statement carries:
/// FOREACH first, then WITH, then the base MATCH/RETURN translator. The
/// result is one or more `;`-terminated statements; an empty string is the
/// designated marker for an unsupported WITH combination, not a valid
/// zero-row translation.
///
/// Translation is a pure function of the statement text and the (read-only)
/// schema, so concurrent calls need no coordination.
pub fn translate_query(cypher: &str, schema: &GraphSchema) -> Result<String, SqlGeneratorError> {
    let ast = parse_query(cypher).map_err(|e| SqlGeneratorError::Parse(e.to_string()))?;

    let sql = if let Some(for_each) = &ast.for_each_clause {
        debug!("dispatching to the FOREACH converter");
        foreach_query::translate(&ast, for_each, schema)?
    } else if let Some(with) = &ast.with_clause {
        debug!("dispatching to the WITH converter");
        with_query::translate(&ast, with, schema)?
    } else {
        debug!("dispatching to the base clause translator");
        let decoded = to_sql::convert(&ast, schema)?;
        format!("{};", decoded.sql)
    };

    debug!("translated `{}` -> `{}`", cypher, sql);
    Ok(sql)
}

/// Decode a plain MATCH..RETURN statement without rendering the outer
/// dispatch, exposing the intermediate form to callers that need the
/// matched patterns alongside the SQL.
pub fn decode_query(cypher: &str, schema: &GraphSchema) -> Result<DecodedQuery, SqlGeneratorError> {
    let ast = parse_query(cypher).map_err(|e| SqlGeneratorError::Parse(e.to_string()))?;
    to_sql::convert(&ast, schema)
}
