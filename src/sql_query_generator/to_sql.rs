use std::collections::{HashMap, HashSet};

use log::warn;

use crate::graph_catalog::graph_schema::{self, EDGES_TABLE, NODES_TABLE};
use crate::graph_catalog::{ColumnType, GraphSchema};
use crate::open_cypher_parser::ast::{
    CypherQueryAst, Direction, Expression, Literal, MatchClause, NodePattern, Operator,
    OrderByClause, PathPattern, PropertyKVPair, ReturnItem, SortOrder,
};

use super::decoded_query::{DecodedQuery, MatchedEdge, MatchedNode, ProjectedColumn};
use super::errors::SqlGeneratorError;
use super::function_registry;

/// Redirects one node alias to an already-materialized relation (used by the
/// WITH converter to point the second statement at its temporary table).
#[derive(Debug, Clone)]
pub(crate) struct TableOverride<'q> {
    pub alias: &'q str,
    pub table: String,
    /// Output columns of the materialized relation, untyped.
    pub columns: Vec<String>,
}

struct NodeEntry<'a> {
    label: Option<&'a str>,
    table: String,
    columns: Vec<(String, Option<ColumnType>)>,
    filters: Vec<&'a PropertyKVPair<'a>>,
}

struct EdgeEntry<'a> {
    alias: String,
    rel_type: Option<&'a str>,
    direction: Direction,
    source_alias: String,
    target_alias: String,
    columns: Vec<(String, Option<ColumnType>)>,
}

/// Everything the renderers need to resolve aliases and column types.
pub(crate) struct ConversionCtx<'a> {
    node_order: Vec<String>,
    nodes: HashMap<String, NodeEntry<'a>>,
    edges: Vec<EdgeEntry<'a>>,
}

impl<'a> ConversionCtx<'a> {
    fn node(&self, alias: &str) -> Option<&NodeEntry<'a>> {
        self.nodes.get(alias)
    }

    fn edge(&self, alias: &str) -> Option<&EdgeEntry<'a>> {
        self.edges.iter().find(|e| e.alias == alias)
    }

    fn is_node_alias(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    fn is_edge_alias(&self, name: &str) -> bool {
        self.edges.iter().any(|e| e.alias == name)
    }

    /// Column type of `alias.key`, if the alias is bound and the column typed.
    fn column_type(&self, alias: &str, key: &str) -> Option<ColumnType> {
        let columns = if let Some(node) = self.node(alias) {
            &node.columns
        } else if let Some(edge) = self.edge(alias) {
            &edge.columns
        } else {
            return None;
        };
        columns.iter().find(|(n, _)| n == key).and_then(|(_, t)| *t)
    }

    /// Render `alias.key` as a qualified column, verifying the column exists.
    fn resolve_property(&self, alias: &str, key: &str) -> Result<String, SqlGeneratorError> {
        let columns = if let Some(node) = self.node(alias) {
            &node.columns
        } else if let Some(edge) = self.edge(alias) {
            &edge.columns
        } else {
            return Err(SqlGeneratorError::UnknownVariable(alias.to_string()));
        };
        if columns.iter().any(|(n, _)| n == key) {
            Ok(format!("{}.{}", alias, key))
        } else {
            Err(SqlGeneratorError::ColumnNotFound(format!(
                "{}.{}",
                alias, key
            )))
        }
    }
}

/// Convert a plain MATCH..WHERE..RETURN..ORDER BY statement into its decoded
/// form, including the rendered SELECT.
pub fn convert(
    ast: &CypherQueryAst<'_>,
    schema: &GraphSchema,
) -> Result<DecodedQuery, SqlGeneratorError> {
    let return_clause = ast
        .return_clause
        .as_ref()
        .ok_or(SqlGeneratorError::MissingReturnClause)?;

    convert_statement(
        &ast.match_clause,
        &return_clause.return_items,
        return_clause.distinct,
        ast.order_by_clause.as_ref(),
        schema,
        None,
    )
}

/// Shared conversion path for the base translator and the higher-level
/// converters (which substitute their own projection or table override).
pub(crate) fn convert_statement(
    match_clause: &MatchClause<'_>,
    projection_items: &[ReturnItem<'_>],
    distinct: bool,
    order_by: Option<&OrderByClause<'_>>,
    schema: &GraphSchema,
    table_override: Option<&TableOverride<'_>>,
) -> Result<DecodedQuery, SqlGeneratorError> {
    let ctx = collect_patterns(match_clause, schema, table_override)?;

    let projection = render_projection(projection_items, &ctx)?;
    if projection.is_empty() {
        return Err(SqlGeneratorError::MissingReturnClause);
    }

    let (from_sql, edge_type_predicates) = render_from_and_joins(&ctx)?;

    let mut conjuncts = render_node_filters(&ctx)?;
    conjuncts.extend(edge_type_predicates);
    if let Some(where_clause) = &match_clause.where_clause {
        conjuncts.push(render_expression(&where_clause.conditions, &ctx)?);
    }
    let predicate = if conjuncts.is_empty() {
        None
    } else {
        Some(conjuncts.join(" AND "))
    };

    let group_by = implied_group_by(&projection);
    let order_by_sql = match order_by {
        Some(clause) => Some(render_order_by(clause, &ctx)?),
        None => None,
    };

    let mut sql = String::from("SELECT ");
    if distinct {
        sql.push_str("DISTINCT ");
    }
    let select_items: Vec<String> = projection.iter().map(select_item).collect();
    sql.push_str(&select_items.join(", "));
    sql.push_str(" FROM ");
    sql.push_str(&from_sql);
    if let Some(pred) = &predicate {
        sql.push_str(" WHERE ");
        sql.push_str(pred);
    }
    if let Some(group) = &group_by {
        sql.push_str(" GROUP BY ");
        sql.push_str(group);
    }
    if let Some(order) = &order_by_sql {
        sql.push_str(" ORDER BY ");
        sql.push_str(order);
    }

    let node_patterns = ctx
        .node_order
        .iter()
        .map(|alias| {
            let entry = &ctx.nodes[alias];
            MatchedNode {
                alias: alias.clone(),
                label: entry.label.map(String::from),
                table: entry.table.clone(),
            }
        })
        .collect();
    let edge_patterns = ctx
        .edges
        .iter()
        .map(|e| MatchedEdge {
            alias: e.alias.clone(),
            rel_type: e.rel_type.map(String::from),
            direction: e.direction,
            source_alias: e.source_alias.clone(),
            target_alias: e.target_alias.clone(),
        })
        .collect();

    Ok(DecodedQuery {
        node_patterns,
        edge_patterns,
        predicate,
        projection,
        order_by: order_by_sql,
        sql,
        for_each: None,
    })
}

fn collect_patterns<'a>(
    match_clause: &'a MatchClause<'a>,
    schema: &GraphSchema,
    table_override: Option<&TableOverride<'_>>,
) -> Result<ConversionCtx<'a>, SqlGeneratorError> {
    let mut ctx = ConversionCtx {
        node_order: Vec::new(),
        nodes: HashMap::new(),
        edges: Vec::new(),
    };
    let mut anon_nodes = 0usize;

    for pattern in &match_clause.path_patterns {
        match pattern {
            PathPattern::Node(node) => {
                register_node(&mut ctx, node, schema, table_override, &mut anon_nodes)?;
            }
            PathPattern::ConnectedPattern(connected) => {
                // Consecutive hops share their middle node; re-registering it
                // would split an anonymous node into two.
                let mut previous_end: Option<(&NodePattern, String)> = None;
                for cp in connected {
                    let source_alias = match &previous_end {
                        Some((node, alias)) if *node == &cp.start_node => alias.clone(),
                        _ => register_node(
                            &mut ctx,
                            &cp.start_node,
                            schema,
                            table_override,
                            &mut anon_nodes,
                        )?,
                    };
                    let target_alias = register_node(
                        &mut ctx,
                        &cp.end_node,
                        schema,
                        table_override,
                        &mut anon_nodes,
                    )?;
                    previous_end = Some((&cp.end_node, target_alias.clone()));

                    let edge_columns = match cp.relationship.rel_type {
                        // A typed edge must have a schema entry; its columns
                        // drive property resolution on the edge alias.
                        Some(rel_type) => schema
                            .columns_for_rel_type(rel_type)?
                            .iter()
                            .map(|c| (c.name.clone(), Some(c.ctype)))
                            .collect(),
                        None => schema
                            .edge_columns()
                            .iter()
                            .map(|c| (c.name.clone(), Some(c.ctype)))
                            .collect(),
                    };

                    let alias = match cp.relationship.name {
                        Some(name) => name.to_string(),
                        None => format!("_r{}", ctx.edges.len()),
                    };
                    ctx.edges.push(EdgeEntry {
                        alias,
                        rel_type: cp.relationship.rel_type,
                        direction: cp.relationship.direction,
                        source_alias,
                        target_alias,
                        columns: edge_columns,
                    });
                }
            }
        }
    }

    if ctx.node_order.is_empty() {
        return Err(SqlGeneratorError::EmptyMatchClause);
    }
    Ok(ctx)
}

fn register_node<'a>(
    ctx: &mut ConversionCtx<'a>,
    node: &'a NodePattern<'a>,
    schema: &GraphSchema,
    table_override: Option<&TableOverride<'_>>,
    anon_nodes: &mut usize,
) -> Result<String, SqlGeneratorError> {
    let alias = match node.name {
        Some(name) => name.to_string(),
        None => {
            let generated = format!("_n{}", *anon_nodes);
            *anon_nodes += 1;
            generated
        }
    };

    if let Some(entry) = ctx.nodes.get_mut(&alias) {
        // Re-occurrence of a declared alias refers to the same node; a
        // conflicting label constraint violates alias uniqueness.
        if let Some(label) = node.label {
            match entry.label {
                Some(existing) if existing != label => {
                    return Err(SqlGeneratorError::DuplicateAlias(alias));
                }
                Some(_) => {}
                None => {
                    entry.label = Some(label);
                    entry.table = graph_schema::node_table_name(label);
                    entry.columns = schema
                        .columns_for_label(label)?
                        .iter()
                        .map(|c| (c.name.clone(), Some(c.ctype)))
                        .collect();
                }
            }
        }
        if let Some(props) = &node.properties {
            for kv in props.iter() {
                if !entry.filters.iter().any(|existing| *existing == kv) {
                    entry.filters.push(kv);
                }
            }
        }
        return Ok(alias);
    }

    let entry = if let Some(over) = table_override.filter(|o| o.alias == alias) {
        NodeEntry {
            label: node.label,
            table: over.table.clone(),
            columns: over.columns.iter().map(|c| (c.clone(), None)).collect(),
            filters: node.properties.iter().flatten().collect(),
        }
    } else if let Some(label) = node.label {
        NodeEntry {
            label: Some(label),
            table: graph_schema::node_table_name(label),
            columns: schema
                .columns_for_label(label)?
                .iter()
                .map(|c| (c.name.clone(), Some(c.ctype)))
                .collect(),
            filters: node.properties.iter().flatten().collect(),
        }
    } else {
        NodeEntry {
            label: None,
            table: NODES_TABLE.to_string(),
            columns: schema
                .node_columns()
                .iter()
                .map(|c| (c.name.clone(), Some(c.ctype)))
                .collect(),
            filters: node.properties.iter().flatten().collect(),
        }
    };

    ctx.node_order.push(alias.clone());
    ctx.nodes.insert(alias.clone(), entry);
    Ok(alias)
}

/// FROM plus one join pair per edge pattern: the `edges` adjacency relation
/// joined on the already-bound endpoint id, then the other endpoint's table.
/// Edge-type constraints come back as separate predicates.
fn render_from_and_joins(
    ctx: &ConversionCtx<'_>,
) -> Result<(String, Vec<String>), SqlGeneratorError> {
    let first_alias = ctx
        .node_order
        .first()
        .ok_or(SqlGeneratorError::EmptyMatchClause)?;
    let first = &ctx.nodes[first_alias];

    let mut sql = format!("{} {}", first.table, first_alias);
    let mut joined: HashSet<&str> = HashSet::new();
    joined.insert(first_alias);

    let mut type_predicates = Vec::new();

    for edge in &ctx.edges {
        // idl holds the edge's origin, idr its destination.
        let (origin, dest) = match edge.direction {
            Direction::Outgoing | Direction::Either => {
                (edge.source_alias.as_str(), edge.target_alias.as_str())
            }
            Direction::Incoming => (edge.target_alias.as_str(), edge.source_alias.as_str()),
        };

        if !joined.contains(origin) && !joined.contains(dest) {
            let entry = &ctx.nodes[origin];
            sql.push_str(&format!(" CROSS JOIN {} {}", entry.table, origin));
            joined.insert(origin);
        }

        let mut on_parts = Vec::new();
        if joined.contains(origin) {
            on_parts.push(format!("{}.idl = {}.id", edge.alias, origin));
        }
        if joined.contains(dest) {
            on_parts.push(format!("{}.idr = {}.id", edge.alias, dest));
        }
        sql.push_str(&format!(
            " JOIN {} {} ON {}",
            EDGES_TABLE,
            edge.alias,
            on_parts.join(" AND ")
        ));

        for (endpoint, id_column) in [(origin, "idl"), (dest, "idr")] {
            if !joined.contains(endpoint) {
                let entry = &ctx.nodes[endpoint];
                sql.push_str(&format!(
                    " JOIN {} {} ON {}.id = {}.{}",
                    entry.table, endpoint, endpoint, edge.alias, id_column
                ));
                joined.insert(endpoint);
            }
        }

        if let Some(rel_type) = edge.rel_type {
            type_predicates.push(format!("{}.type = '{}'", edge.alias, rel_type));
        }
    }

    // Disconnected node patterns participate as a cartesian product.
    for alias in &ctx.node_order {
        if !joined.contains(alias.as_str()) {
            let entry = &ctx.nodes[alias];
            sql.push_str(&format!(" CROSS JOIN {} {}", entry.table, alias));
            joined.insert(alias);
        }
    }

    Ok((sql, type_predicates))
}

/// Property-equality filters from node patterns, e.g. `{node_id: 492}`.
fn render_node_filters(ctx: &ConversionCtx<'_>) -> Result<Vec<String>, SqlGeneratorError> {
    let mut filters = Vec::new();
    for alias in &ctx.node_order {
        let entry = &ctx.nodes[alias];
        for kv in &entry.filters {
            let column = ctx.resolve_property(alias, kv.key)?;
            let value = match ctx.column_type(alias, kv.key) {
                Some(ctype) => render_literal_typed(&kv.value, ctype),
                None => render_expression(&kv.value, ctx)?,
            };
            filters.push(format!("{} = {}", column, value));
        }
    }
    Ok(filters)
}

fn render_projection(
    items: &[ReturnItem<'_>],
    ctx: &ConversionCtx<'_>,
) -> Result<Vec<ProjectedColumn>, SqlGeneratorError> {
    let mut projection = Vec::new();

    for (idx, item) in items.iter().enumerate() {
        match &item.expression {
            Expression::Variable(name) => {
                // A bare alias expands to the full column list of whatever
                // it matched.
                let columns = if let Some(entry) = ctx.node(name) {
                    &entry.columns
                } else if let Some(entry) = ctx.edge(name) {
                    &entry.columns
                } else {
                    return Err(SqlGeneratorError::UnknownVariable(name.to_string()));
                };
                if item.alias.is_some() {
                    return Err(SqlGeneratorError::UnsupportedItemInReturnClause);
                }
                for (column, _) in columns {
                    projection.push(ProjectedColumn {
                        sql: format!("{}.{}", name, column),
                        output_name: column.clone(),
                        aggregate: false,
                    });
                }
            }
            Expression::PropertyAccessExp(prop) => {
                let sql = ctx.resolve_property(prop.base, prop.key)?;
                projection.push(ProjectedColumn {
                    sql,
                    output_name: item.alias.unwrap_or(prop.key).to_string(),
                    aggregate: false,
                });
            }
            Expression::FunctionCallExp(call) => {
                let sql_name = function_registry::aggregate_sql_name(call.name)
                    .ok_or_else(|| SqlGeneratorError::UnknownFunction(call.name.to_string()))?;

                let sql = if sql_name == "count" && is_whole_row_count(call.args.as_slice(), ctx) {
                    "count(*)".to_string()
                } else {
                    let args: Result<Vec<String>, _> = call
                        .args
                        .iter()
                        .map(|arg| render_expression(arg, ctx))
                        .collect();
                    format!("{}({})", sql_name, args?.join(", "))
                };
                projection.push(ProjectedColumn {
                    sql,
                    output_name: item.alias.unwrap_or(sql_name).to_string(),
                    aggregate: true,
                });
            }
            Expression::Literal(_) | Expression::OperatorApplicationExp(_) => {
                let sql = render_expression(&item.expression, ctx)?;
                let output_name = match item.alias {
                    Some(alias) => alias.to_string(),
                    None => format!("column{}", idx + 1),
                };
                projection.push(ProjectedColumn {
                    sql,
                    output_name,
                    aggregate: false,
                });
            }
            Expression::List(_) => {
                return Err(SqlGeneratorError::UnsupportedItemInReturnClause);
            }
        }
    }

    Ok(projection)
}

/// `count(alias)` and `count(*)` both count result rows.
fn is_whole_row_count(args: &[Expression<'_>], ctx: &ConversionCtx<'_>) -> bool {
    match args {
        [Expression::Variable(name)] => {
            *name == "*" || ctx.is_node_alias(name) || ctx.is_edge_alias(name)
        }
        [] => true,
        _ => false,
    }
}

fn select_item(pc: &ProjectedColumn) -> String {
    if pc.sql == pc.output_name || pc.sql.ends_with(&format!(".{}", pc.output_name)) {
        pc.sql.clone()
    } else {
        format!("{} AS {}", pc.sql, pc.output_name)
    }
}

/// A mixed aggregate/plain projection implies grouping by the plain columns.
fn implied_group_by(projection: &[ProjectedColumn]) -> Option<String> {
    let has_aggregate = projection.iter().any(|p| p.aggregate);
    let plain: Vec<&str> = projection
        .iter()
        .filter(|p| !p.aggregate)
        .map(|p| p.sql.as_str())
        .collect();
    if has_aggregate && !plain.is_empty() {
        Some(plain.join(", "))
    } else {
        None
    }
}

fn render_order_by(
    clause: &OrderByClause<'_>,
    ctx: &ConversionCtx<'_>,
) -> Result<String, SqlGeneratorError> {
    let mut items = Vec::new();
    for item in &clause.order_by_items {
        let expr = render_expression(&item.expression, ctx)?;
        let direction = match item.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        items.push(format!("{} {}", expr, direction));
    }
    Ok(items.join(", "))
}

fn operator_precedence(op: Operator) -> u8 {
    match op {
        Operator::Or => 1,
        Operator::And => 2,
        Operator::Not => 3,
        Operator::Equal
        | Operator::NotEqual
        | Operator::LessThan
        | Operator::GreaterThan
        | Operator::LessThanEqual
        | Operator::GreaterThanEqual
        | Operator::In
        | Operator::NotIn
        | Operator::IsNull
        | Operator::IsNotNull => 4,
        Operator::Addition | Operator::Subtraction => 5,
        Operator::Multiplication | Operator::Division | Operator::ModuloDivision => 6,
    }
}

fn is_comparison(op: Operator) -> bool {
    matches!(
        op,
        Operator::Equal
            | Operator::NotEqual
            | Operator::LessThan
            | Operator::GreaterThan
            | Operator::LessThanEqual
            | Operator::GreaterThanEqual
            | Operator::In
            | Operator::NotIn
    )
}

/// Render an expression against the bound aliases.
pub(crate) fn render_expression(
    expr: &Expression<'_>,
    ctx: &ConversionCtx<'_>,
) -> Result<String, SqlGeneratorError> {
    match expr {
        Expression::Literal(lit) => Ok(render_literal(lit)),
        Expression::Variable(name) => {
            // A bare node alias stands for its id in value position; other
            // names pass through as output-column references.
            if ctx.is_node_alias(name) {
                Ok(format!("{}.id", name))
            } else {
                Ok(name.to_string())
            }
        }
        Expression::PropertyAccessExp(prop) => ctx.resolve_property(prop.base, prop.key),
        Expression::FunctionCallExp(call) => {
            let sql_name = function_registry::aggregate_sql_name(call.name)
                .ok_or_else(|| SqlGeneratorError::UnknownFunction(call.name.to_string()))?;
            if sql_name == "count" && is_whole_row_count(call.args.as_slice(), ctx) {
                return Ok("count(*)".to_string());
            }
            let args: Result<Vec<String>, _> = call
                .args
                .iter()
                .map(|arg| render_expression(arg, ctx))
                .collect();
            Ok(format!("{}({})", sql_name, args?.join(", ")))
        }
        Expression::List(items) => {
            let rendered: Result<Vec<String>, _> =
                items.iter().map(|i| render_expression(i, ctx)).collect();
            Ok(format!("({})", rendered?.join(", ")))
        }
        Expression::OperatorApplicationExp(op) => render_operator_application(op, ctx),
    }
}

fn render_operator_application(
    op: &crate::open_cypher_parser::ast::OperatorApplication<'_>,
    ctx: &ConversionCtx<'_>,
) -> Result<String, SqlGeneratorError> {
    match op.operator {
        Operator::IsNull | Operator::IsNotNull => {
            let operand = render_operand(&op.operands[0], op.operator, ctx)?;
            Ok(format!("{} {}", operand, String::from(op.operator)))
        }
        Operator::Not => {
            let operand = render_expression(&op.operands[0], ctx)?;
            Ok(format!("NOT ({})", operand))
        }
        _ => {
            let lhs = &op.operands[0];
            let rhs = &op.operands[1];

            // Literals compared against a typed column render by that
            // column's semantic type.
            if is_comparison(op.operator) {
                if let Some(rendered) = render_typed_comparison(lhs, rhs, op.operator, ctx)? {
                    return Ok(rendered);
                }
            }

            let lhs_sql = render_operand(lhs, op.operator, ctx)?;
            let rhs_sql = render_operand(rhs, op.operator, ctx)?;
            Ok(format!(
                "{} {} {}",
                lhs_sql,
                String::from(op.operator),
                rhs_sql
            ))
        }
    }
}

fn render_operand(
    operand: &Expression<'_>,
    parent: Operator,
    ctx: &ConversionCtx<'_>,
) -> Result<String, SqlGeneratorError> {
    let sql = render_expression(operand, ctx)?;
    if let Expression::OperatorApplicationExp(inner) = operand {
        if operator_precedence(inner.operator) < operator_precedence(parent) {
            return Ok(format!("({})", sql));
        }
    }
    Ok(sql)
}

/// `alias.property <op> literal` with the literal coerced to the column's
/// semantic type; `None` when neither side is such a pair.
fn render_typed_comparison(
    lhs: &Expression<'_>,
    rhs: &Expression<'_>,
    operator: Operator,
    ctx: &ConversionCtx<'_>,
) -> Result<Option<String>, SqlGeneratorError> {
    let (prop, value, reversed) = match (lhs, rhs) {
        (Expression::PropertyAccessExp(p), Expression::Literal(_) | Expression::List(_)) => {
            (p, rhs, false)
        }
        (Expression::Literal(_) | Expression::List(_), Expression::PropertyAccessExp(p)) => {
            (p, lhs, true)
        }
        _ => return Ok(None),
    };

    let Some(ctype) = ctx.column_type(prop.base, prop.key) else {
        return Ok(None);
    };
    let column = ctx.resolve_property(prop.base, prop.key)?;

    let value_sql = match (operator, value) {
        // IN / NOT IN take a parenthesized element list, each element
        // coerced to the column type.
        (Operator::In | Operator::NotIn, Expression::List(items)) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| render_literal_typed(item, ctype))
                .collect();
            format!("({})", rendered.join(", "))
        }
        (_, value) => render_literal_typed(value, ctype),
    };

    let op_sql = String::from(operator);
    if reversed {
        Ok(Some(format!("{} {} {}", value_sql, op_sql, column)))
    } else {
        Ok(Some(format!("{} {} {}", column, op_sql, value_sql)))
    }
}

pub(crate) fn render_literal(lit: &Literal<'_>) -> String {
    match lit {
        Literal::Integer(i) => i.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::Boolean(b) => b.to_string(),
        Literal::String(s) => quote_text(s),
        Literal::Null => "NULL".to_string(),
    }
}

fn quote_text(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Render a literal for a column of the given semantic type. A value that
/// cannot be coerced renders as SQL NULL rather than failing the whole
/// translation.
pub(crate) fn render_literal_typed(value: &Expression<'_>, ctype: ColumnType) -> String {
    let rendered = match (value, ctype) {
        (Expression::Literal(Literal::Null), _) => Some("NULL".to_string()),
        (Expression::Literal(Literal::Integer(i)), ColumnType::Integer | ColumnType::Long) => {
            Some(i.to_string())
        }
        (Expression::Literal(Literal::Float(f)), ColumnType::Integer | ColumnType::Long)
            if f.fract() == 0.0 =>
        {
            Some((*f as i64).to_string())
        }
        (Expression::Literal(Literal::String(s)), ColumnType::Integer | ColumnType::Long) => {
            s.trim().parse::<i64>().ok().map(|i| i.to_string())
        }
        (Expression::Literal(Literal::String(s)), ColumnType::Text) => {
            // Double quotes inside list-ish text become single quotes, the
            // same conversion the loader applies on insert.
            Some(quote_text(&s.replace('"', "'")))
        }
        (Expression::Literal(Literal::Integer(i)), ColumnType::Text) => {
            Some(format!("'{}'", i))
        }
        (Expression::Literal(Literal::Float(f)), ColumnType::Text) => Some(format!("'{}'", f)),
        (Expression::Literal(Literal::Boolean(b)), ColumnType::Text) => Some(format!("'{}'", b)),
        (Expression::List(items), ColumnType::TextArray) => {
            let elements: Option<Vec<String>> = items
                .iter()
                .map(|item| match item {
                    Expression::Literal(Literal::String(s)) => {
                        Some(quote_text(&s.replace('"', "'")))
                    }
                    Expression::Literal(Literal::Integer(i)) => Some(format!("'{}'", i)),
                    Expression::Literal(Literal::Float(f)) => Some(format!("'{}'", f)),
                    _ => None,
                })
                .collect();
            elements.map(|els| format!("ARRAY[{}]", els.join(", ")))
        }
        _ => None,
    };

    match rendered {
        Some(sql) => sql,
        None => {
            warn!(
                "literal {:?} cannot be coerced to column type {:?}; rendering NULL",
                value, ctype
            );
            "NULL".to_string()
        }
    }
}
