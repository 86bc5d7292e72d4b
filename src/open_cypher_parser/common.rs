use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alphanumeric1, char, digit1, multispace0},
    combinator::{opt, recognize},
    error::ParseError,
    multi::many0,
    sequence::{delimited, pair},
    IResult, Parser,
};

pub fn ws<'a, O, E: ParseError<&'a str>, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
{
    delimited(multispace0, inner, multispace0)
}

// one or more alphanumerics followed by zero or more occurrences of an
// underscore and more alphanumerics, e.g. "node", "sys_time", "foo_bar_2".
pub fn parse_alphanumeric_with_underscore(input: &str) -> IResult<&str, &str> {
    recognize(pair(alphanumeric1, many0(pair(tag("_"), alphanumeric1)))).parse(input)
}

/// Parse a numeric literal (integer or float).
/// Matches: 123, -123, 3.14, -3.14, .5, -.5
pub fn parse_numeric_literal(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(char('-')),
        alt((
            // Float with integer part: 123.456 (must have digits after dot)
            recognize((digit1, char('.'), digit1)),
            // Float without integer part: .456
            recognize(pair(char('.'), digit1)),
            // Integer: 123
            digit1,
        )),
    ))
    .parse(input)
}

/// Parse a single-quoted string, returning the inner content without quotes.
pub fn parse_single_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), take_until("'"), char('\'')).parse(input)
}

/// Parse a double-quoted string, returning the inner content without quotes.
pub fn parse_double_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_until("\""), char('"')).parse(input)
}
