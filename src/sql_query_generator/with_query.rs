use log::{debug, warn};
use uuid::Uuid;

use crate::graph_catalog::GraphSchema;
use crate::open_cypher_parser::ast::{
    CypherQueryAst, Expression, MatchClause, NodePattern, Operator, PathPattern, PropertyAccess,
    ReturnItem, WithClause,
};

use super::errors::SqlGeneratorError;
use super::to_sql::{self, TableOverride};

/// Translate a statement containing a WITH clause. Two shapes are supported:
/// WITH followed by WHERE, and WITH followed by ORDER BY. Both materialize
/// the WITH projection into a temporary relation and run a second SELECT
/// over it. The combination of WHERE and ORDER BY yields the empty string,
/// the designated unsupported marker.
pub(crate) fn translate(
    ast: &CypherQueryAst<'_>,
    with: &WithClause<'_>,
    schema: &GraphSchema,
) -> Result<String, SqlGeneratorError> {
    let has_where = with.where_clause.is_some();
    let has_order_by = ast.order_by_clause.is_some();

    if has_where && has_order_by {
        warn!("WITH combined with both WHERE and ORDER BY is unsupported; returning empty translation");
        return Ok(String::new());
    }

    if has_order_by {
        with_order_by(ast, with, schema)
    } else {
        // The WHERE path also covers a bare WITH projection (no filter on
        // the materialized result).
        with_where(ast, with, schema)
    }
}

/// WITH items re-read as a RETURN projection for the first statement.
pub(crate) fn with_items_as_return<'a>(with: &WithClause<'a>) -> Vec<ReturnItem<'a>> {
    with.with_items
        .iter()
        .map(|item| ReturnItem {
            expression: item.expression.clone(),
            alias: item.alias,
            original_text: None,
        })
        .collect()
}

/// Temporary relation names carry a random suffix so concurrent
/// translations against one backend connection cannot collide.
fn temp_table_name() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("with_{}", &suffix[..12])
}

fn with_where(
    ast: &CypherQueryAst<'_>,
    with: &WithClause<'_>,
    schema: &GraphSchema,
) -> Result<String, SqlGeneratorError> {
    let projection = with_items_as_return(with);
    let ir = to_sql::convert_statement(&ast.match_clause, &projection, false, None, schema, None)?;

    let temp = temp_table_name();
    let temp_columns: Vec<String> = ir.projection.iter().map(|p| p.output_name.clone()).collect();
    debug!("materializing WITH projection into {}", temp);

    let return_clause = ast
        .return_clause
        .as_ref()
        .ok_or(SqlGeneratorError::MissingReturnClause)?;

    let select_items: Result<Vec<String>, SqlGeneratorError> = return_clause
        .return_items
        .iter()
        .map(|item| flatten_return_item(item, &temp_columns))
        .collect();
    let mut select = format!(
        "SELECT {}{} FROM {}",
        if return_clause.distinct { "DISTINCT " } else { "" },
        select_items?.join(", "),
        temp
    );
    if let Some(where_clause) = &with.where_clause {
        let predicate = flatten_expression(&where_clause.conditions, &temp_columns)?;
        select.push_str(&format!(" WHERE {}", predicate));
    }

    Ok(format!(
        "CREATE TEMP TABLE {} AS {}; {};",
        temp, ir.sql, select
    ))
}

fn with_order_by<'a>(
    ast: &CypherQueryAst<'a>,
    with: &WithClause<'a>,
    schema: &GraphSchema,
) -> Result<String, SqlGeneratorError> {
    let projection = with_items_as_return(with);
    let ir = to_sql::convert_statement(&ast.match_clause, &projection, false, None, schema, None)?;

    // The carried alias is the first matched node pattern's name; the second
    // statement re-matches it against the temporary relation.
    let carried = first_node_name(&ast.match_clause).ok_or(SqlGeneratorError::UnnamedCarriedNode)?;

    let temp = temp_table_name();
    let temp_columns: Vec<String> = ir.projection.iter().map(|p| p.output_name.clone()).collect();
    debug!("materializing WITH projection into {} (carried alias `{}`)", temp, carried);

    let return_clause = ast
        .return_clause
        .as_ref()
        .ok_or(SqlGeneratorError::MissingReturnClause)?;

    let synthesized_match = MatchClause {
        path_patterns: vec![PathPattern::Node(NodePattern {
            name: Some(carried),
            label: None,
            properties: None,
        })],
        where_clause: None,
    };
    let table_override = TableOverride {
        alias: carried,
        table: temp.clone(),
        columns: temp_columns.clone(),
    };

    // Names the WITH projection introduced (e.g. aggregate aliases) read as
    // columns of the temporary relation in the second statement.
    let rewritten_items: Vec<ReturnItem<'a>> = return_clause
        .return_items
        .iter()
        .map(|item| rewrite_carried_variable(item, carried, &temp_columns))
        .collect();

    let final_ir = to_sql::convert_statement(
        &synthesized_match,
        &rewritten_items,
        return_clause.distinct,
        ast.order_by_clause.as_ref(),
        schema,
        Some(&table_override),
    )?;

    Ok(format!(
        "CREATE TEMP TABLE {} AS {}; {};",
        temp, ir.sql, final_ir.sql
    ))
}

fn first_node_name<'a>(match_clause: &MatchClause<'a>) -> Option<&'a str> {
    match match_clause.path_patterns.first()? {
        PathPattern::Node(node) => node.name,
        PathPattern::ConnectedPattern(connected) => connected.first()?.start_node.name,
    }
}

fn rewrite_carried_variable<'a>(
    item: &ReturnItem<'a>,
    carried: &'a str,
    temp_columns: &[String],
) -> ReturnItem<'a> {
    match &item.expression {
        Expression::Variable(name)
            if *name != carried && temp_columns.iter().any(|c| c == name) =>
        {
            ReturnItem {
                expression: Expression::PropertyAccessExp(PropertyAccess {
                    base: carried,
                    key: *name,
                }),
                alias: item.alias.or(Some(*name)),
                original_text: None,
            }
        }
        _ => item.clone(),
    }
}

/// Render a final-SELECT item against the flat temporary relation: property
/// accesses collapse to their bare column, carried names must exist.
fn flatten_return_item(
    item: &ReturnItem<'_>,
    temp_columns: &[String],
) -> Result<String, SqlGeneratorError> {
    let sql = flatten_expression(&item.expression, temp_columns)?;
    match item.alias {
        Some(alias) if alias != sql => Ok(format!("{} AS {}", sql, alias)),
        _ => Ok(sql),
    }
}

fn flatten_expression(
    expr: &Expression<'_>,
    temp_columns: &[String],
) -> Result<String, SqlGeneratorError> {
    match expr {
        Expression::Literal(lit) => Ok(to_sql::render_literal(lit)),
        Expression::Variable(name) => {
            if temp_columns.iter().any(|c| c == name) {
                Ok(name.to_string())
            } else {
                Err(SqlGeneratorError::UnknownVariable(name.to_string()))
            }
        }
        Expression::PropertyAccessExp(prop) => {
            if temp_columns.iter().any(|c| c == prop.key) {
                Ok(prop.key.to_string())
            } else {
                Err(SqlGeneratorError::ColumnNotFound(prop.key.to_string()))
            }
        }
        Expression::List(items) => {
            let rendered: Result<Vec<String>, _> = items
                .iter()
                .map(|i| flatten_expression(i, temp_columns))
                .collect();
            Ok(format!("({})", rendered?.join(", ")))
        }
        Expression::OperatorApplicationExp(op) => match op.operator {
            Operator::IsNull | Operator::IsNotNull => {
                let operand = flatten_expression(&op.operands[0], temp_columns)?;
                Ok(format!("{} {}", operand, String::from(op.operator)))
            }
            Operator::Not => {
                let operand = flatten_expression(&op.operands[0], temp_columns)?;
                Ok(format!("NOT ({})", operand))
            }
            _ => {
                let lhs = flatten_expression(&op.operands[0], temp_columns)?;
                let rhs = flatten_expression(&op.operands[1], temp_columns)?;
                Ok(format!("{} {} {}", lhs, String::from(op.operator), rhs))
            }
        },
        // Aggregating again over the materialized projection is not part of
        // the supported WITH shapes.
        Expression::FunctionCallExp(_) => Err(SqlGeneratorError::UnsupportedItemInReturnClause),
    }
}
