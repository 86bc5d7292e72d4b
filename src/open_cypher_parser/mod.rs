use ast::{
    CypherQueryAst, ForEachClause, MatchClause, OrderByClause, ReturnClause, WithClause,
};
use common::ws;
use errors::CypherParsingError;
use nom::bytes::complete::tag;
use nom::character::complete::multispace0;
use nom::combinator::opt;
use nom::{IResult, Parser};

pub mod ast;
mod common;
pub(crate) mod errors;
mod expression;
mod foreach_clause;
mod match_clause;
mod order_by_clause;
mod path_pattern;
mod return_clause;
mod where_clause;
mod with_clause;

pub use errors::CypherParsingError as ParsingError;

/// Parse a single statement with an optional trailing semicolon.
pub fn parse_statement(
    input: &'_ str,
) -> IResult<&'_ str, CypherQueryAst<'_>, CypherParsingError<'_>> {
    let (input, _) = multispace0.parse(input)?;

    let (input, match_clause): (&str, MatchClause) =
        match_clause::parse_match_clause.parse(input)?;

    let (input, with_clause): (&str, Option<WithClause>) =
        opt(with_clause::parse_with_clause).parse(input)?;

    let (input, for_each_clause): (&str, Option<ForEachClause>) =
        opt(foreach_clause::parse_for_each_clause).parse(input)?;

    let (input, return_clause): (&str, Option<ReturnClause>) =
        opt(return_clause::parse_return_clause).parse(input)?;

    let (input, order_by_clause): (&str, Option<OrderByClause>) =
        opt(order_by_clause::parse_order_by_clause).parse(input)?;

    let (input, _) = opt(ws(tag(";"))).parse(input)?;

    Ok((
        input,
        CypherQueryAst {
            match_clause,
            with_clause,
            for_each_clause,
            return_clause,
            order_by_clause,
        },
    ))
}

/// Parse a complete query, rejecting trailing unparsed input.
pub fn parse_query(input: &'_ str) -> Result<CypherQueryAst<'_>, CypherParsingError<'_>> {
    match parse_statement(input) {
        Ok((remainder, query_ast)) => {
            let trimmed = remainder.trim();
            if !trimmed.is_empty() {
                return Err(CypherParsingError {
                    errors: vec![
                        (remainder, "Unexpected tokens after query"),
                        (trimmed, "Unparsed input"),
                    ],
                });
            }
            Ok(query_ast)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e),
        Err(nom::Err::Incomplete(_)) => Err(CypherParsingError {
            errors: vec![("", "Incomplete input")],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_cypher_parser::ast::{
        Direction, Expression, ForEachAction, Literal, PathPattern, PropertyAccess, SortOrder,
    };

    #[test]
    fn test_parse_plain_match_return() {
        let query = "MATCH (n) WHERE n.node_id = 492 RETURN n.sys_time;";
        let ast = parse_query(query).expect("Query parsing failed");

        assert_eq!(ast.match_clause.path_patterns.len(), 1);
        assert!(ast.match_clause.where_clause.is_some());
        assert!(ast.with_clause.is_none());
        assert!(ast.for_each_clause.is_none());
        assert!(ast.order_by_clause.is_none());

        let return_clause = ast.return_clause.expect("Expected RETURN clause");
        assert_eq!(return_clause.return_items.len(), 1);
        assert_eq!(
            return_clause.return_items[0].expression,
            Expression::PropertyAccessExp(PropertyAccess {
                base: "n",
                key: "sys_time",
            })
        );
    }

    #[test]
    fn test_parse_with_aggregation_query() {
        let query = "MATCH (a:Global)-[m]->(b:Local) WITH a, COUNT(m) AS cnt \
                     WHERE cnt >= 2 RETURN a.node_id, cnt;";
        let ast = parse_query(query).expect("Query parsing failed");

        match &ast.match_clause.path_patterns[0] {
            PathPattern::ConnectedPattern(connected) => {
                assert_eq!(connected.len(), 1);
                assert_eq!(connected[0].relationship.direction, Direction::Outgoing);
            }
            other => panic!("Expected ConnectedPattern, got {:?}", other),
        }

        let with_clause = ast.with_clause.expect("Expected WITH clause");
        assert_eq!(with_clause.with_items.len(), 2);
        assert!(with_clause.where_clause.is_some(), "WHERE belongs to WITH");
        assert!(ast.match_clause.where_clause.is_none());

        let return_clause = ast.return_clause.expect("Expected RETURN clause");
        assert_eq!(return_clause.return_items.len(), 2);
    }

    #[test]
    fn test_parse_with_order_by_query() {
        let query = "MATCH (a:Global)-->(b) WITH a RETURN a.node_id ORDER BY a.node_id DESC;";
        let ast = parse_query(query).expect("Query parsing failed");

        assert!(ast.with_clause.is_some());
        assert!(ast.with_clause.as_ref().unwrap().where_clause.is_none());
        let order_by = ast.order_by_clause.expect("Expected ORDER BY clause");
        assert_eq!(order_by.order_by_items.len(), 1);
        assert_eq!(order_by.order_by_items[0].order, SortOrder::Desc);
    }

    #[test]
    fn test_parse_foreach_query() {
        let query = "MATCH (a:Person) WITH collect(a.node_id) AS ids \
                     FOREACH (x IN ids | SET x.visited = 'true');";
        let ast = parse_query(query).expect("Query parsing failed");

        let fe = ast.for_each_clause.expect("Expected FOREACH clause");
        assert_eq!(fe.variable, "x");
        assert_eq!(fe.source, Expression::Variable("ids"));
        assert!(matches!(fe.action, ForEachAction::SetProperty { .. }));
        assert!(ast.return_clause.is_none());
    }

    #[test]
    fn test_parse_foreach_literal_list() {
        let query = "MATCH (a) FOREACH (x IN [1, 2, 3] | SET x.flag = 1)";
        let ast = parse_query(query).expect("Query parsing failed");

        let fe = ast.for_each_clause.expect("Expected FOREACH clause");
        assert_eq!(
            fe.source,
            Expression::List(vec![
                Expression::Literal(Literal::Integer(1)),
                Expression::Literal(Literal::Integer(2)),
                Expression::Literal(Literal::Integer(3)),
            ])
        );
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        let query = "MATCH (n) RETURN n.x ; garbage";
        assert!(parse_query(query).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_match() {
        assert!(parse_query("RETURN 1").is_err());
    }

    #[test]
    fn test_parse_case_insensitive_keywords() {
        let query = "match (n) where n.node_id = 1 return n.sys_time order by n.sys_time desc";
        let ast = parse_query(query).expect("Query parsing failed");
        assert!(ast.match_clause.where_clause.is_some());
        assert!(ast.return_clause.is_some());
        assert!(ast.order_by_clause.is_some());
    }
}
