use nom::error::{Error, ErrorKind};
use nom::{
    branch::alt,
    character::complete::{char, multispace0, space0},
    combinator::{map, opt},
    multi::separated_list0,
    sequence::{delimited, preceded, separated_pair},
    IResult, Parser,
};

use super::ast::{
    ConnectedPattern, Direction, NodePattern, PathPattern, PropertyKVPair, RelationshipPattern,
};
use super::common::{self, ws};
use super::expression;

/// Maximum number of consecutive relationships in a single path pattern.
/// Protects against adversarial inputs like `(a)-->(b)-->(c)...` repeated
/// thousands of times; real queries rarely exceed 10 hops.
const MAX_RELATIONSHIP_CHAIN_DEPTH: usize = 50;

/// Main entry point for parsing path patterns.
pub fn parse_path_pattern(input: &'_ str) -> IResult<&'_ str, PathPattern<'_>> {
    let (input, start_node) = parse_node_pattern.parse(input)?;

    let mut connected: Vec<ConnectedPattern> = Vec::new();
    let mut prev_node = start_node.clone();
    let mut remaining = input;

    loop {
        if connected.len() >= MAX_RELATIONSHIP_CHAIN_DEPTH {
            return Err(nom::Err::Failure(Error::new(remaining, ErrorKind::TooLarge)));
        }

        match parse_relationship_pattern(remaining) {
            Ok((rest, relationship)) => {
                let (rest, end_node) = parse_node_pattern.parse(rest)?;
                connected.push(ConnectedPattern {
                    start_node: prev_node,
                    relationship,
                    end_node: end_node.clone(),
                });
                prev_node = end_node;
                remaining = rest;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    if connected.is_empty() {
        Ok((remaining, PathPattern::Node(start_node)))
    } else {
        Ok((remaining, PathPattern::ConnectedPattern(connected)))
    }
}

/// Parse a node pattern: `(a:Label {key: value})`, `(a)`, `(:Label)`, `()`.
pub fn parse_node_pattern(input: &'_ str) -> IResult<&'_ str, NodePattern<'_>> {
    let (input, _) = ws(char('(')).parse(input)?;
    let (input, name) = opt(ws(common::parse_alphanumeric_with_underscore)).parse(input)?;
    let (input, label) = opt(preceded(
        ws(char(':')),
        ws(common::parse_alphanumeric_with_underscore),
    ))
    .parse(input)?;
    let (input, properties) = opt(parse_properties).parse(input)?;
    let (input, _) = ws(char(')')).parse(input)?;

    Ok((
        input,
        NodePattern {
            name,
            label,
            properties,
        },
    ))
}

// {node_id: 492, name: 'Oliver Stone'}
pub fn parse_properties(input: &'_ str) -> IResult<&'_ str, Vec<PropertyKVPair<'_>>> {
    delimited(
        delimited(space0, char('{'), space0),
        separated_list0(
            delimited(space0, char(','), space0),
            map(
                separated_pair(
                    delimited(space0, common::parse_alphanumeric_with_underscore, space0),
                    delimited(space0, char(':'), space0),
                    expression::parse_expression,
                ),
                |(key, value)| PropertyKVPair { key, value },
            ),
        ),
        delimited(space0, char('}'), space0),
    )
    .parse(input)
}

/// Parse a relationship pattern between two node patterns.
///
/// Bracketed forms: `-[r:TYPE]->`, `<-[r:TYPE]-`, `-[r]-`.
/// Empty forms: `-->`, `<--`, `--`.
pub fn parse_relationship_pattern(
    input: &'_ str,
) -> IResult<&'_ str, RelationshipPattern<'_>> {
    alt((
        parse_incoming_bracket,
        parse_outgoing_or_either_bracket,
        parse_incoming_empty,
        parse_outgoing_empty,
        parse_either_empty,
    ))
    .parse(input)
}

// name and type inside brackets: `r:TYPE`, `r`, `:TYPE`, or nothing
fn parse_relationship_internals(
    input: &'_ str,
) -> IResult<&'_ str, (Option<&'_ str>, Option<&'_ str>)> {
    let (input, name) = opt(ws(common::parse_alphanumeric_with_underscore)).parse(input)?;
    let (input, rel_type) = opt(preceded(
        ws(char(':')),
        ws(common::parse_alphanumeric_with_underscore),
    ))
    .parse(input)?;
    Ok((input, (name, rel_type)))
}

// <-[r:TYPE]-
fn parse_incoming_bracket(input: &'_ str) -> IResult<&'_ str, RelationshipPattern<'_>> {
    let (input, _) = (
        multispace0,
        char('<'),
        multispace0,
        char('-'),
        multispace0,
        char('['),
    )
        .parse(input)?;
    let (input, (name, rel_type)) = parse_relationship_internals(input)?;
    let (input, _) = (char(']'), multispace0, char('-')).parse(input)?;

    Ok((
        input,
        RelationshipPattern {
            name,
            direction: Direction::Incoming,
            rel_type,
        },
    ))
}

// -[r:TYPE]-> or -[r:TYPE]-
fn parse_outgoing_or_either_bracket(
    input: &'_ str,
) -> IResult<&'_ str, RelationshipPattern<'_>> {
    let (input, _) = (multispace0, char('-'), multispace0, char('[')).parse(input)?;
    let (input, (name, rel_type)) = parse_relationship_internals(input)?;
    let (input, _) = (char(']'), multispace0, char('-')).parse(input)?;
    let (input, arrow) = opt(char('>')).parse(input)?;

    let direction = if arrow.is_some() {
        Direction::Outgoing
    } else {
        Direction::Either
    };

    Ok((
        input,
        RelationshipPattern {
            name,
            direction,
            rel_type,
        },
    ))
}

// <--
fn parse_incoming_empty(input: &'_ str) -> IResult<&'_ str, RelationshipPattern<'_>> {
    let (input, _) = (
        multispace0,
        char('<'),
        multispace0,
        char('-'),
        multispace0,
        char('-'),
    )
        .parse(input)?;
    Ok((
        input,
        RelationshipPattern {
            name: None,
            direction: Direction::Incoming,
            rel_type: None,
        },
    ))
}

// -->
fn parse_outgoing_empty(input: &'_ str) -> IResult<&'_ str, RelationshipPattern<'_>> {
    let (input, _) = (
        multispace0,
        char('-'),
        multispace0,
        char('-'),
        multispace0,
        char('>'),
    )
        .parse(input)?;
    Ok((
        input,
        RelationshipPattern {
            name: None,
            direction: Direction::Outgoing,
            rel_type: None,
        },
    ))
}

// --
fn parse_either_empty(input: &'_ str) -> IResult<&'_ str, RelationshipPattern<'_>> {
    let (input, _) = (multispace0, char('-'), multispace0, char('-')).parse(input)?;
    Ok((
        input,
        RelationshipPattern {
            name: None,
            direction: Direction::Either,
            rel_type: None,
        },
    ))
}
