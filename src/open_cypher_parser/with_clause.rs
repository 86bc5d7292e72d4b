use nom::{
    bytes::complete::tag_no_case,
    character::complete::{char, multispace0},
    combinator::{cut, opt},
    error::context,
    multi::separated_list1,
    sequence::{delimited, preceded},
    IResult, Parser,
};

use super::{
    ast::{WithClause, WithItem},
    common::ws,
    errors::CypherParsingError,
    expression::{parse_expression, parse_identifier},
    where_clause::parse_where_clause,
};

fn parse_with_item(input: &'_ str) -> IResult<&'_ str, WithItem<'_>> {
    let (input, expression) = parse_expression.parse(input)?;
    let (input, alias) = opt(preceded(ws(tag_no_case("AS")), ws(parse_identifier))).parse(input)?;

    Ok((input, WithItem { expression, alias }))
}

pub fn parse_with_clause(
    input: &'_ str,
) -> IResult<&'_ str, WithClause<'_>, CypherParsingError<'_>> {
    let (input, _) = ws(tag_no_case("WITH")).parse(input)?;

    let (input, with_items) = context(
        "Error in with clause",
        separated_list1(
            delimited(multispace0, char(','), multispace0),
            cut(with_item_parser),
        ),
    )
    .parse(input)?;

    // WHERE directly after the WITH items filters the intermediate result.
    let (input, where_clause) = opt(parse_where_clause).parse(input)?;

    Ok((
        input,
        WithClause {
            with_items,
            where_clause,
        },
    ))
}

fn with_item_parser(input: &str) -> IResult<&str, WithItem<'_>, CypherParsingError<'_>> {
    parse_with_item(input).map_err(|e| match e {
        nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
        nom::Err::Error(err) => nom::Err::Failure(CypherParsingError::from(err)),
        nom::Err::Failure(err) => nom::Err::Failure(CypherParsingError::from(err)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_cypher_parser::ast::{Expression, FunctionCall};
    use nom::Err;

    #[test]
    fn test_parse_with_clause_aggregate_item() {
        let input = "WITH a, COUNT(m) AS cnt";
        let (remaining, with_clause) = parse_with_clause(input).unwrap();
        assert_eq!(remaining, "");
        assert_eq!(with_clause.with_items.len(), 2);
        assert_eq!(
            with_clause.with_items[0],
            WithItem {
                expression: Expression::Variable("a"),
                alias: None,
            }
        );
        assert_eq!(
            with_clause.with_items[1],
            WithItem {
                expression: Expression::FunctionCallExp(FunctionCall {
                    name: "COUNT",
                    args: vec![Expression::Variable("m")],
                }),
                alias: Some("cnt"),
            }
        );
        assert!(with_clause.where_clause.is_none());
    }

    #[test]
    fn test_parse_with_clause_trailing_where() {
        let input = "WITH a, COUNT(m) AS cnt WHERE cnt >= 2";
        let (remaining, with_clause) = parse_with_clause(input).unwrap();
        assert_eq!(remaining, "");
        assert!(with_clause.where_clause.is_some());
    }

    #[test]
    fn test_parse_with_clause_stops_before_return() {
        let input = "WITH a RETURN a.node_id";
        let (remaining, with_clause) = parse_with_clause(input).unwrap();
        assert_eq!(with_clause.with_items.len(), 1);
        assert!(remaining.trim_start().to_uppercase().starts_with("RETURN"));
    }

    #[test]
    fn test_parse_with_clause_missing_keyword() {
        let input = "MATCH (a)";
        match parse_with_clause(input) {
            Err(Err::Error(_)) | Err(Err::Failure(_)) => {}
            Ok((remaining, clause)) => panic!(
                "Expected failure due to missing WITH keyword, got remaining: {:?}, clause: {:?}",
                remaining, clause
            ),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
