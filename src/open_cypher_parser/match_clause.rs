use nom::character::complete::char;
use nom::combinator::{cut, opt};
use nom::error::context;
use nom::{
    bytes::complete::tag_no_case, character::complete::multispace0, multi::separated_list1,
    sequence::delimited, IResult, Parser,
};

use super::ast::{MatchClause, PathPattern};
use super::errors::CypherParsingError;
use super::where_clause::parse_where_clause;
use super::path_pattern;

pub fn parse_match_clause(
    input: &'_ str,
) -> IResult<&'_ str, MatchClause<'_>, CypherParsingError<'_>> {
    let (input, _) = tag_no_case("MATCH").parse(input)?;
    let (input, _) = multispace0(input)?;

    let (input, path_patterns) = context(
        "Error in match clause",
        separated_list1(
            delimited(multispace0, char(','), multispace0),
            cut(path_parser),
        ),
    )
    .parse(input)?;

    // WHERE belongs to the MATCH clause it follows.
    let (input, where_clause) = opt(parse_where_clause).parse(input)?;

    Ok((
        input,
        MatchClause {
            path_patterns,
            where_clause,
        },
    ))
}

fn path_parser(input: &str) -> IResult<&str, PathPattern<'_>, CypherParsingError<'_>> {
    path_pattern::parse_path_pattern(input).map_err(|e| match e {
        nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
        nom::Err::Error(err) => nom::Err::Failure(CypherParsingError::from(err)),
        nom::Err::Failure(err) => nom::Err::Failure(CypherParsingError::from(err)),
    })
}
