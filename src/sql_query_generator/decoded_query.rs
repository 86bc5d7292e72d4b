use crate::open_cypher_parser::ast::Direction;

/// One node pattern after schema resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedNode {
    pub alias: String,
    pub label: Option<String>,
    pub table: String,
}

/// One edge pattern after schema resolution, keyed by the aliases of the
/// node patterns it connects.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedEdge {
    pub alias: String,
    pub rel_type: Option<String>,
    pub direction: Direction,
    pub source_alias: String,
    pub target_alias: String,
}

/// One output column of the rendered SELECT, in projection order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedColumn {
    pub sql: String,
    pub output_name: String,
    pub aggregate: bool,
}

/// FOREACH actions rendered against the query the clause was attached to.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedForEach {
    pub variable: String,
    pub statements: Vec<String>,
}

/// The decoded form of one base statement: matched patterns, predicate,
/// projection, ordering, and the rendered SQL equivalent.
///
/// Built once by the base translator and immutable afterwards; attaching a
/// FOREACH clause constructs a new value via [`DecodedQuery::with_for_each`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedQuery {
    pub node_patterns: Vec<MatchedNode>,
    pub edge_patterns: Vec<MatchedEdge>,
    pub predicate: Option<String>,
    pub projection: Vec<ProjectedColumn>,
    pub order_by: Option<String>,
    /// The rendered SELECT, without a trailing semicolon.
    pub sql: String,
    pub for_each: Option<RenderedForEach>,
}

impl DecodedQuery {
    /// Attach a FOREACH clause, consuming this query and returning a new one.
    pub fn with_for_each(self, for_each: RenderedForEach) -> Self {
        DecodedQuery {
            for_each: Some(for_each),
            ..self
        }
    }
}
