//! Serialized-value round trips: a literal rendered for a column's semantic
//! type must parse back to the original value under the backend's native
//! parsing rules.

use relagraph::graph_catalog::ColumnType;
use relagraph::translate_query;

use super::common::provenance_schema;

/// Pull the rendered right-hand side of the generated predicate.
fn rendered_value(query: &str) -> String {
    let schema = provenance_schema();
    let sql = translate_query(query, &schema).expect("translation failed");
    let (_, tail) = sql.split_once(" = ").expect("predicate missing");
    tail.trim_end_matches(';').to_string()
}

#[test]
fn integer_value_round_trips() {
    let rendered = rendered_value("MATCH (n) WHERE n.node_id = 42 RETURN n.sys_time;");
    assert_eq!(rendered.parse::<i32>().unwrap(), 42);
}

#[test]
fn long_value_round_trips() {
    let rendered =
        rendered_value("MATCH (n) WHERE n.mono_time = 1112012297 RETURN n.sys_time;");
    assert_eq!(rendered.parse::<i64>().unwrap(), 1_112_012_297);
}

#[test]
fn text_value_round_trips() {
    let rendered = rendered_value("MATCH (n) WHERE n.sys_time = 'abc' RETURN n.node_id;");
    // Backend text literals are single-quoted with doubled inner quotes.
    assert_eq!(rendered, "'abc'");
    let unquoted = rendered.trim_matches('\'').replace("''", "'");
    assert_eq!(unquoted, "abc");
}

#[test]
fn text_array_value_round_trips() {
    let rendered =
        rendered_value("MATCH (n) WHERE n.member_ids = ['a', 'b'] RETURN n.node_id;");
    assert_eq!(rendered, "ARRAY['a', 'b']");

    // Native array parsing: strip the constructor, split elements, unquote.
    let inner = rendered
        .strip_prefix("ARRAY[")
        .and_then(|s| s.strip_suffix(']'))
        .expect("not an array literal");
    let elements: Vec<String> = inner
        .split(", ")
        .map(|e| e.trim_matches('\'').replace("''", "'"))
        .collect();
    assert_eq!(elements, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn ddl_spellings_match_loader_conventions() {
    assert_eq!(ColumnType::Integer.sql_type(), "INT");
    assert_eq!(ColumnType::Long.sql_type(), "BIGINT");
    assert_eq!(ColumnType::Text.sql_type(), "TEXT");
    assert_eq!(ColumnType::TextArray.sql_type(), "TEXT[]");
}
