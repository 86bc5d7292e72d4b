use nom::{
    branch::alt, bytes::complete::tag_no_case, character::complete::char, combinator::cut,
    error::context, IResult, Parser,
};

use super::{
    ast::{ForEachAction, ForEachClause, PathPattern, PropertyAccess},
    common::{self, ws},
    errors::CypherParsingError,
    expression::{parse_expression, parse_identifier},
    path_pattern,
};

/// Parse a FOREACH clause:
/// `FOREACH (x IN [1, 2, 3] | SET x.visited = 'true')`
/// `FOREACH (x IN ids | CREATE (x)-[:FRIEND]->(b {id: 3}))`
pub fn parse_for_each_clause(
    input: &'_ str,
) -> IResult<&'_ str, ForEachClause<'_>, CypherParsingError<'_>> {
    let (input, _) = ws(tag_no_case("FOREACH")).parse(input)?;

    let parsed = context("Error in foreach clause", cut(for_each_body_parser)).parse(input)?;
    Ok(parsed)
}

fn for_each_body_parser(
    input: &str,
) -> IResult<&str, ForEachClause<'_>, CypherParsingError<'_>> {
    parse_for_each_body(input).map_err(|e| match e {
        nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
        nom::Err::Error(err) => nom::Err::Failure(CypherParsingError::from(err)),
        nom::Err::Failure(err) => nom::Err::Failure(CypherParsingError::from(err)),
    })
}

fn parse_for_each_body(input: &'_ str) -> IResult<&'_ str, ForEachClause<'_>> {
    let (input, _) = ws(char('(')).parse(input)?;
    let (input, variable) = ws(parse_identifier).parse(input)?;
    let (input, _) = ws(tag_no_case("IN")).parse(input)?;
    let (input, source) = parse_expression.parse(input)?;
    let (input, _) = ws(char('|')).parse(input)?;
    let (input, action) = parse_for_each_action.parse(input)?;
    let (input, _) = ws(char(')')).parse(input)?;

    Ok((
        input,
        ForEachClause {
            variable,
            source,
            action,
        },
    ))
}

fn parse_for_each_action(input: &'_ str) -> IResult<&'_ str, ForEachAction<'_>> {
    alt((parse_set_action, parse_create_action)).parse(input)
}

// SET x.visited = 'true'
fn parse_set_action(input: &'_ str) -> IResult<&'_ str, ForEachAction<'_>> {
    let (input, _) = ws(tag_no_case("SET")).parse(input)?;
    let (input, base) = ws(common::parse_alphanumeric_with_underscore).parse(input)?;
    let (input, _) = char('.')(input)?;
    let (input, key) = common::parse_alphanumeric_with_underscore(input)?;
    let (input, _) = ws(char('=')).parse(input)?;
    let (input, value) = parse_expression.parse(input)?;

    Ok((
        input,
        ForEachAction::SetProperty {
            target: PropertyAccess { base, key },
            value,
        },
    ))
}

// CREATE (x)-[:FRIEND]->(b {node_id: 3})
fn parse_create_action(input: &'_ str) -> IResult<&'_ str, ForEachAction<'_>> {
    let (input, _) = ws(tag_no_case("CREATE")).parse(input)?;
    let (input, pattern) = path_pattern::parse_path_pattern.parse(input)?;

    match pattern {
        PathPattern::ConnectedPattern(mut connected) if connected.len() == 1 => {
            // Single-hop relationship creation only.
            let cp = connected.remove(0);
            Ok((input, ForEachAction::CreateRelationship(cp)))
        }
        _ => Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Satisfy,
        ))),
    }
}
