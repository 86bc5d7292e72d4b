use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub struct CypherQueryAst<'a> {
    pub match_clause: MatchClause<'a>,
    pub with_clause: Option<WithClause<'a>>,
    pub for_each_clause: Option<ForEachClause<'a>>,
    pub return_clause: Option<ReturnClause<'a>>,
    pub order_by_clause: Option<OrderByClause<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MatchClause<'a> {
    pub path_patterns: Vec<PathPattern<'a>>,
    pub where_clause: Option<WhereClause<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct WhereClause<'a> {
    pub conditions: Expression<'a>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ReturnClause<'a> {
    pub distinct: bool,
    pub return_items: Vec<ReturnItem<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ReturnItem<'a> {
    pub expression: Expression<'a>,
    pub alias: Option<&'a str>,
    /// Original text of the expression, used as the output column name when
    /// no explicit AS alias is provided.
    pub original_text: Option<&'a str>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct WithClause<'a> {
    pub with_items: Vec<WithItem<'a>>,
    /// WHERE directly after the WITH items filters the intermediate result.
    pub where_clause: Option<WhereClause<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct WithItem<'a> {
    pub expression: Expression<'a>,
    pub alias: Option<&'a str>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct OrderByClause<'a> {
    pub order_by_items: Vec<OrderByItem<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct OrderByItem<'a> {
    pub expression: Expression<'a>,
    pub order: SortOrder,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for String {
    fn from(value: SortOrder) -> String {
        match value {
            SortOrder::Asc => "ASC".to_string(),
            SortOrder::Desc => "DESC".to_string(),
        }
    }
}

/// FOREACH clause: applies one body action to every element of a list.
///
/// Example: `FOREACH (x IN [1, 2, 3] | SET x.visited = 'true')`
#[derive(Debug, PartialEq, Clone)]
pub struct ForEachClause<'a> {
    /// The loop variable bound to each list element.
    pub variable: &'a str,
    /// The list being iterated: a literal list, a property access, or a
    /// variable carried over from the preceding WITH projection.
    pub source: Expression<'a>,
    pub action: ForEachAction<'a>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ForEachAction<'a> {
    /// `SET <loopvar>.property = value`
    SetProperty {
        target: PropertyAccess<'a>,
        value: Expression<'a>,
    },
    /// `CREATE (<loopvar>)-[:TYPE]->(target)`
    CreateRelationship(ConnectedPattern<'a>),
}

#[derive(Debug, PartialEq, Clone)]
pub enum PathPattern<'a> {
    /// Standalone node `(a)`.
    Node(NodePattern<'a>),
    /// Nodes joined by relationships `(a)-[:REL]->(b)`.
    ConnectedPattern(Vec<ConnectedPattern<'a>>),
}

#[derive(Debug, PartialEq, Clone)]
pub struct NodePattern<'a> {
    pub name: Option<&'a str>,
    pub label: Option<&'a str>,
    pub properties: Option<Vec<PropertyKVPair<'a>>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PropertyKVPair<'a> {
    pub key: &'a str,
    pub value: Expression<'a>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ConnectedPattern<'a> {
    pub start_node: NodePattern<'a>,
    pub relationship: RelationshipPattern<'a>,
    pub end_node: NodePattern<'a>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RelationshipPattern<'a> {
    pub name: Option<&'a str>,
    pub direction: Direction,
    pub rel_type: Option<&'a str>,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Direction {
    Incoming, // `<-`
    Outgoing, // `->`
    Either,   // `-`
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal<'a> {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(&'a str),
    Null,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    Addition,         // +
    Subtraction,      // -
    Multiplication,   // *
    Division,         // /
    ModuloDivision,   // %
    Equal,            // =
    NotEqual,         // <>
    LessThan,         // <
    GreaterThan,      // >
    LessThanEqual,    // <=
    GreaterThanEqual, // >=
    And,
    Or,
    In,
    NotIn,
    // unary
    Not,
    // postfix
    IsNull,
    IsNotNull,
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        match value {
            Operator::Addition => "+".to_string(),
            Operator::Subtraction => "-".to_string(),
            Operator::Multiplication => "*".to_string(),
            Operator::Division => "/".to_string(),
            Operator::ModuloDivision => "%".to_string(),
            Operator::Equal => "=".to_string(),
            Operator::NotEqual => "<>".to_string(),
            Operator::LessThan => "<".to_string(),
            Operator::GreaterThan => ">".to_string(),
            Operator::LessThanEqual => "<=".to_string(),
            Operator::GreaterThanEqual => ">=".to_string(),
            Operator::And => "AND".to_string(),
            Operator::Or => "OR".to_string(),
            Operator::In => "IN".to_string(),
            Operator::NotIn => "NOT IN".to_string(),
            Operator::Not => "NOT".to_string(),
            Operator::IsNull => "IS NULL".to_string(),
            Operator::IsNotNull => "IS NOT NULL".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct OperatorApplication<'a> {
    pub operator: Operator,
    pub operands: Vec<Expression<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PropertyAccess<'a> {
    pub base: &'a str,
    pub key: &'a str,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionCall<'a> {
    pub name: &'a str,
    pub args: Vec<Expression<'a>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression<'a> {
    /// A literal, such as a number, string, boolean, or null.
    Literal(Literal<'a>),

    /// A variable, e.g. `n` or `cnt`.
    Variable(&'a str),

    /// A list literal: a vector of expressions.
    List(Vec<Expression<'a>>),

    /// A function call, e.g. `count(m)` or `collect(a.node_id)`.
    FunctionCallExp(FunctionCall<'a>),

    /// Static property access, e.g. `a.node_id`.
    PropertyAccessExp(PropertyAccess<'a>),

    /// An operator application, e.g. `1 + 2` or `cnt >= 2`.
    OperatorApplicationExp(OperatorApplication<'a>),
}

impl fmt::Display for Expression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
