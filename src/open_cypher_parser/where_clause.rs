use nom::{bytes::complete::tag_no_case, combinator::cut, error::context, IResult, Parser};

use super::{
    ast::WhereClause, common::ws, errors::CypherParsingError, expression::parse_expression,
};

pub fn parse_where_clause(
    input: &'_ str,
) -> IResult<&'_ str, WhereClause<'_>, CypherParsingError<'_>> {
    let (input, _) = ws(tag_no_case("WHERE")).parse(input)?;

    let (input, expression) = context("Error in where clause", cut(parse_expression))
        .parse(input)
        .map_err(|e| match e {
            nom::Err::Incomplete(needed) => nom::Err::Incomplete(needed),
            nom::Err::Error(err) => nom::Err::Failure(CypherParsingError::from(err)),
            nom::Err::Failure(err) => nom::Err::Failure(CypherParsingError::from(err)),
        })?;

    Ok((
        input,
        WhereClause {
            conditions: expression,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_cypher_parser::ast::{Expression, Literal, Operator, OperatorApplication, PropertyAccess};
    use nom::Err;

    #[test]
    fn test_parse_where_clause_valid() {
        let input = "WHERE n.node_id = 492";
        let (remaining, where_clause) = parse_where_clause(input).unwrap();
        assert_eq!(remaining, "");
        let expected = WhereClause {
            conditions: Expression::OperatorApplicationExp(OperatorApplication {
                operator: Operator::Equal,
                operands: vec![
                    Expression::PropertyAccessExp(PropertyAccess {
                        base: "n",
                        key: "node_id",
                    }),
                    Expression::Literal(Literal::Integer(492)),
                ],
            }),
        };
        assert_eq!(where_clause, expected);
    }

    #[test]
    fn test_parse_where_clause_missing_expression() {
        let input = "WHERE";
        match parse_where_clause(input) {
            Err(Err::Failure(_)) | Err(Err::Error(_)) => {}
            Ok((remaining, clause)) => panic!(
                "Expected failure for missing expression, got remaining: {:?}, clause: {:?}",
                remaining, clause
            ),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
