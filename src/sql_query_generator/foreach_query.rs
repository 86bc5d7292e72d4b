use log::debug;

use crate::graph_catalog::graph_schema::{self, EDGES_TABLE, NODES_TABLE};
use crate::graph_catalog::{ColumnType, GraphSchema};
use crate::open_cypher_parser::ast::{
    ConnectedPattern, CypherQueryAst, Direction, Expression, ForEachAction, ForEachClause,
    FunctionCall, NodePattern, ReturnItem,
};

use super::decoded_query::{DecodedQuery, RenderedForEach};
use super::errors::SqlGeneratorError;
use super::to_sql::{self, render_literal_typed};
use super::with_query::with_items_as_return;

/// Translate a statement ending in a FOREACH clause: compile the prefix into
/// its decoded form, attach the FOREACH clause, and emit one SQL action per
/// list element (UPDATE for property sets, INSERT pairs for relationship
/// creation).
pub(crate) fn translate(
    ast: &CypherQueryAst<'_>,
    for_each: &ForEachClause<'_>,
    schema: &GraphSchema,
) -> Result<String, SqlGeneratorError> {
    let prefix = convert_prefix(ast, schema)?;
    let statements = render_actions(ast, for_each, schema)?;
    debug!(
        "FOREACH over `{}` expanded into {} statement(s)",
        for_each.variable,
        statements.len()
    );

    let decoded = prefix.with_for_each(RenderedForEach {
        variable: for_each.variable.to_string(),
        statements,
    });

    Ok(decoded
        .for_each
        .map(|fe| fe.statements.join(" "))
        .unwrap_or_default())
}

/// The prefix (MATCH, or MATCH + WITH with the projection re-read as RETURN)
/// must resolve to a decoded query before any action is emitted.
fn convert_prefix(
    ast: &CypherQueryAst<'_>,
    schema: &GraphSchema,
) -> Result<DecodedQuery, SqlGeneratorError> {
    let projection: Vec<ReturnItem> = if let Some(with) = &ast.with_clause {
        with_items_as_return(with)
    } else if let Some(return_clause) = &ast.return_clause {
        return_clause.return_items.clone()
    } else {
        // No explicit projection before FOREACH; carry the first named node
        // so the prefix still resolves.
        let name = first_named_node(ast).ok_or(SqlGeneratorError::UnnamedCarriedNode)?;
        vec![ReturnItem {
            expression: Expression::Variable(name),
            alias: None,
            original_text: Some(name),
        }]
    };

    to_sql::convert_statement(&ast.match_clause, &projection, false, None, schema, None)
}

fn first_named_node<'a>(ast: &CypherQueryAst<'a>) -> Option<&'a str> {
    use crate::open_cypher_parser::ast::PathPattern;
    match ast.match_clause.path_patterns.first()? {
        PathPattern::Node(node) => node.name,
        PathPattern::ConnectedPattern(connected) => connected.first()?.start_node.name,
    }
}

fn render_actions(
    ast: &CypherQueryAst<'_>,
    for_each: &ForEachClause<'_>,
    schema: &GraphSchema,
) -> Result<Vec<String>, SqlGeneratorError> {
    match &for_each.action {
        ForEachAction::SetProperty { target, value } => {
            render_set_property(ast, for_each, target, value, schema)
        }
        ForEachAction::CreateRelationship(pattern) => {
            render_create_relationship(ast, for_each, pattern, schema)
        }
    }
}

fn node_id_column_type(schema: &GraphSchema) -> ColumnType {
    schema
        .node_columns()
        .iter()
        .find(|c| c.name == "id")
        .map(|c| c.ctype)
        // GraphSchema::build guarantees the id column exists.
        .unwrap_or(ColumnType::Integer)
}

/// `SET <loopvar>.prop = value` — list elements are node ids, so the update
/// hits the global nodes relation.
fn render_set_property(
    ast: &CypherQueryAst<'_>,
    for_each: &ForEachClause<'_>,
    target: &crate::open_cypher_parser::ast::PropertyAccess<'_>,
    value: &Expression<'_>,
    schema: &GraphSchema,
) -> Result<Vec<String>, SqlGeneratorError> {
    if target.base != for_each.variable {
        return Err(SqlGeneratorError::UnsupportedForEach(format!(
            "SET target `{}` is not the loop variable `{}`",
            target.base, for_each.variable
        )));
    }

    let column = schema
        .node_columns()
        .iter()
        .find(|c| c.name == target.key)
        .ok_or_else(|| SqlGeneratorError::ColumnNotFound(target.key.to_string()))?;
    let value_sql = render_literal_typed(value, column.ctype);
    let id_type = node_id_column_type(schema);

    match &for_each.source {
        Expression::List(elements) => Ok(elements
            .iter()
            .map(|element| {
                format!(
                    "UPDATE {} SET {} = {} WHERE id = {};",
                    NODES_TABLE,
                    target.key,
                    value_sql,
                    render_literal_typed(element, id_type)
                )
            })
            .collect()),
        source => {
            let driving = driving_select(ast, source, schema)?;
            Ok(vec![format!(
                "UPDATE {} SET {} = {} WHERE id IN ({});",
                NODES_TABLE, target.key, value_sql, driving
            )])
        }
    }
}

/// `CREATE (<loopvar>)-[:TYPE]->(target)` — every created edge lands in the
/// `edges` adjacency relation and in its `e$<type>` table.
fn render_create_relationship(
    ast: &CypherQueryAst<'_>,
    for_each: &ForEachClause<'_>,
    pattern: &ConnectedPattern<'_>,
    schema: &GraphSchema,
) -> Result<Vec<String>, SqlGeneratorError> {
    let rel_type = pattern.relationship.rel_type.ok_or_else(|| {
        SqlGeneratorError::UnsupportedForEach(
            "relationship creation requires an explicit type".to_string(),
        )
    })?;
    // Missing-schema check before anything is emitted.
    schema.columns_for_rel_type(rel_type)?;

    // idl holds the edge's origin, idr its destination.
    let (origin, dest) = match pattern.relationship.direction {
        Direction::Outgoing | Direction::Either => (&pattern.start_node, &pattern.end_node),
        Direction::Incoming => (&pattern.end_node, &pattern.start_node),
    };

    let loop_is_origin = origin.name == Some(for_each.variable);
    let loop_is_dest = dest.name == Some(for_each.variable);
    if !loop_is_origin && !loop_is_dest {
        return Err(SqlGeneratorError::UnsupportedForEach(format!(
            "loop variable `{}` is not an endpoint of the created relationship",
            for_each.variable
        )));
    }

    let fixed_endpoint = if loop_is_origin { dest } else { origin };
    let fixed_sql = endpoint_id_sql(fixed_endpoint, schema)?;
    let rel_table = graph_schema::rel_table_name(rel_type);
    let id_type = node_id_column_type(schema);

    match &for_each.source {
        Expression::List(elements) => {
            let mut statements = Vec::new();
            for element in elements {
                let element_sql = render_literal_typed(element, id_type);
                let (idl, idr) = if loop_is_origin {
                    (element_sql.as_str(), fixed_sql.as_str())
                } else {
                    (fixed_sql.as_str(), element_sql.as_str())
                };
                statements.push(format!(
                    "INSERT INTO {} (idl, idr, type) VALUES ({}, {}, '{}');",
                    EDGES_TABLE, idl, idr, rel_type
                ));
                statements.push(format!(
                    "INSERT INTO {} (idl, idr, type) VALUES ({}, {}, '{}');",
                    rel_table, idl, idr, rel_type
                ));
            }
            Ok(statements)
        }
        source => {
            let driving = driving_select(ast, source, schema)?;
            let (idl, idr) = if loop_is_origin {
                ("_fe_src._elem".to_string(), fixed_sql)
            } else {
                (fixed_sql, "_fe_src._elem".to_string())
            };
            Ok(vec![
                format!(
                    "INSERT INTO {} (idl, idr, type) SELECT {}, {}, '{}' FROM ({}) AS _fe_src;",
                    EDGES_TABLE, idl, idr, rel_type, driving
                ),
                format!(
                    "INSERT INTO {} (idl, idr, type) SELECT {}, {}, '{}' FROM ({}) AS _fe_src;",
                    rel_table, idl, idr, rel_type, driving
                ),
            ])
        }
    }
}

/// The fixed endpoint of a created relationship must pin down a node id:
/// either an explicit `{id: N}` or a property filter resolved by subquery.
fn endpoint_id_sql(
    node: &NodePattern<'_>,
    schema: &GraphSchema,
) -> Result<String, SqlGeneratorError> {
    let Some(kv) = node.properties.as_ref().and_then(|props| props.first()) else {
        return Err(SqlGeneratorError::UnsupportedForEach(format!(
            "endpoint `{}` must carry an id-valued property filter",
            node.name.unwrap_or("?")
        )));
    };

    let (table, columns) = match node.label {
        Some(label) => (
            graph_schema::node_table_name(label),
            schema.columns_for_label(label)?,
        ),
        None => (NODES_TABLE.to_string(), schema.node_columns()),
    };

    let column = columns
        .iter()
        .find(|c| c.name == kv.key)
        .ok_or_else(|| SqlGeneratorError::ColumnNotFound(kv.key.to_string()))?;
    let value_sql = render_literal_typed(&kv.value, column.ctype);

    if kv.key == "id" {
        Ok(value_sql)
    } else {
        Ok(format!(
            "(SELECT id FROM {} WHERE {} = {})",
            table, kv.key, value_sql
        ))
    }
}

/// SELECT producing the iteration list of a non-literal FOREACH source,
/// one element per row, as the single output column `_elem`.
fn driving_select(
    ast: &CypherQueryAst<'_>,
    source: &Expression<'_>,
    schema: &GraphSchema,
) -> Result<String, SqlGeneratorError> {
    match source {
        Expression::Variable(name) => {
            let with = ast.with_clause.as_ref().ok_or_else(|| {
                SqlGeneratorError::UnknownVariable(name.to_string())
            })?;
            let item = with
                .with_items
                .iter()
                .find(|item| item.alias == Some(*name))
                .ok_or_else(|| SqlGeneratorError::UnknownVariable(name.to_string()))?;

            // collect(expr) iterates the collected rows; anything else
            // iterates the projected value itself.
            let element_expr = match &item.expression {
                Expression::FunctionCallExp(FunctionCall { name, args })
                    if name.eq_ignore_ascii_case("collect") && args.len() == 1 =>
                {
                    args[0].clone()
                }
                other => other.clone(),
            };

            let projection = vec![ReturnItem {
                expression: element_expr,
                alias: Some("_elem"),
                original_text: None,
            }];
            let ir = to_sql::convert_statement(
                &ast.match_clause,
                &projection,
                false,
                None,
                schema,
                None,
            )?;
            Ok(ir.sql)
        }
        Expression::PropertyAccessExp(_) => {
            // An array-valued property unrolls element-per-row via unnest.
            let projection = vec![ReturnItem {
                expression: source.clone(),
                alias: Some("_arr"),
                original_text: None,
            }];
            let ir = to_sql::convert_statement(
                &ast.match_clause,
                &projection,
                false,
                None,
                schema,
                None,
            )?;
            Ok(format!(
                "SELECT unnest(_arr) AS _elem FROM ({}) AS _fe_arr",
                ir.sql
            ))
        }
        other => Err(SqlGeneratorError::UnsupportedForEach(format!(
            "unsupported source list expression: {}",
            other
        ))),
    }
}
