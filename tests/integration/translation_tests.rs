use relagraph::sql_query_generator::{decode_query, SqlGeneratorError};
use relagraph::translate_query;

use super::common::provenance_schema;

#[test]
fn simple_lookup_translates_to_single_select() {
    let schema = provenance_schema();
    let sql = translate_query("MATCH (n) WHERE n.node_id = 492 RETURN n.sys_time;", &schema)
        .expect("translation failed");
    assert_eq!(sql, "SELECT n.sys_time FROM nodes n WHERE n.node_id = 492;");
}

#[test]
fn label_and_relationship_produce_schema_aware_join() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a:Global)-[m:INF]->(b:Local) RETURN a.node_id, b.node_id;",
        &schema,
    )
    .expect("translation failed");
    assert_eq!(
        sql,
        "SELECT a.node_id, b.node_id FROM global a \
         JOIN edges m ON m.idl = a.id \
         JOIN local b ON b.id = m.idr \
         WHERE m.type = 'INF';"
    );
}

#[test]
fn unlabelled_pattern_reads_the_global_node_store() {
    let schema = provenance_schema();
    let decoded = decode_query("MATCH (n) RETURN n.node_id;", &schema).unwrap();
    assert_eq!(decoded.node_patterns[0].table, "nodes");

    let sql = translate_query("MATCH (n) RETURN n.node_id;", &schema).unwrap();
    assert_eq!(sql, "SELECT n.node_id FROM nodes n;");
}

#[test]
fn labelled_count_reads_the_label_table() {
    let schema = provenance_schema();
    let sql = translate_query("MATCH (m:Meta) RETURN count(m);", &schema).unwrap();
    assert_eq!(sql, "SELECT count(*) AS count FROM meta m;");
}

#[test]
fn count_over_labelled_traversal() {
    let schema = provenance_schema();
    let sql = translate_query("MATCH (a:Global)-->(b:Local) RETURN count(b);", &schema)
        .expect("translation failed");
    assert_eq!(
        sql,
        "SELECT count(*) AS count FROM global a \
         JOIN edges _r0 ON _r0.idl = a.id \
         JOIN local b ON b.id = _r0.idr;"
    );
}

#[test]
fn with_where_produces_temp_table_then_filtered_select() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a:Global)-[m]->(b:Local) WITH a, COUNT(m) AS cnt \
         WHERE cnt >= 2 RETURN a.node_id, cnt;",
        &schema,
    )
    .expect("translation failed");

    assert!(sql.starts_with("CREATE TEMP TABLE with_"), "sql: {}", sql);
    let statements: Vec<&str> = sql.split("; ").collect();
    assert_eq!(statements.len(), 2, "expected DDL + SELECT, got: {}", sql);
    assert!(statements[1].starts_with("SELECT node_id, cnt FROM with_"));
    assert!(statements[1].ends_with("WHERE cnt >= 2;"));
}

#[test]
fn with_where_temp_projection_covers_final_references() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a:Global)-[m]->(b:Local) WITH a, COUNT(m) AS cnt \
         WHERE cnt >= 2 RETURN a.node_id, cnt;",
        &schema,
    )
    .unwrap();

    let ddl = sql.split("; ").next().unwrap();
    let final_select = sql.split("; ").nth(1).unwrap();
    for referenced in ["node_id", "cnt"] {
        assert!(
            final_select.contains(referenced),
            "final SELECT does not reference {}: {}",
            referenced,
            final_select
        );
        assert!(
            ddl.contains(referenced),
            "temp projection lacks {} referenced by the final SELECT: {}",
            referenced,
            ddl
        );
    }
}

#[test]
fn with_order_by_reuses_carried_alias() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a:Global)-->(b) WITH a RETURN a.node_id ORDER BY a.node_id DESC;",
        &schema,
    )
    .expect("translation failed");

    let statements: Vec<&str> = sql.split("; ").collect();
    assert_eq!(statements.len(), 2);
    // The second statement matches the same alias the first statement bound.
    assert!(
        statements[1].contains("FROM with_") && statements[1].contains(" a "),
        "second statement must re-alias the temp relation as `a`: {}",
        statements[1]
    );
    assert!(statements[1].ends_with("ORDER BY a.node_id DESC;"));
}

#[test]
fn with_where_and_order_by_returns_unsupported_marker() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a:Global)-[m]->(b:Local) WITH a, COUNT(m) AS cnt \
         WHERE cnt >= 2 RETURN a.node_id, cnt ORDER BY cnt DESC;",
        &schema,
    )
    .expect("translation failed");
    assert_eq!(sql, "", "combined WHERE + ORDER BY must yield the empty marker");
}

#[test]
fn translation_is_deterministic_for_base_statements() {
    let schema = provenance_schema();
    let queries = [
        "MATCH (n) WHERE n.node_id = 492 RETURN n.sys_time;",
        "MATCH (a:Global)-[m:INF]->(b:Local) RETURN a.node_id ORDER BY a.node_id DESC;",
        "MATCH (a {node_id: 236})-->(b) RETURN b;",
        "MATCH (a:Meta) RETURN count(a);",
    ];
    for query in queries {
        let first = translate_query(query, &schema).unwrap();
        let second = translate_query(query, &schema).unwrap();
        assert_eq!(first, second, "query not deterministic: {}", query);
    }
}

#[test]
fn missing_label_surfaces_schema_error() {
    let schema = provenance_schema();
    let err = translate_query("MATCH (a:Unknown) RETURN a.node_id;", &schema).unwrap_err();
    assert!(matches!(err, SqlGeneratorError::Schema(_)), "err: {err:?}");
}

#[test]
fn missing_relationship_type_surfaces_schema_error() {
    let schema = provenance_schema();
    let err =
        translate_query("MATCH (a)-[r:UNKNOWN]->(b) RETURN a.node_id;", &schema).unwrap_err();
    assert!(matches!(err, SqlGeneratorError::Schema(_)), "err: {err:?}");
}

#[test]
fn unparseable_statement_is_an_error_not_sql() {
    let schema = provenance_schema();
    assert!(translate_query("MATCH nothing to see", &schema).is_err());
    assert!(translate_query("", &schema).is_err());
}

#[test]
fn coercion_miss_renders_null_instead_of_failing() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (n) WHERE n.mono_time = 'not-a-number' RETURN n.sys_time;",
        &schema,
    )
    .expect("translation must survive a coercion miss");
    assert!(sql.contains("n.mono_time = NULL"), "sql: {}", sql);
}

#[test]
fn decoded_query_captures_patterns_predicate_and_order() {
    let schema = provenance_schema();
    let decoded = decode_query(
        "MATCH (a:Global)-[m:INF]->(b:Local) WHERE a.node_id > 5 \
         RETURN a.node_id ORDER BY a.node_id DESC;",
        &schema,
    )
    .unwrap();

    assert_eq!(decoded.node_patterns.len(), 2);
    assert_eq!(decoded.node_patterns[0].alias, "a");
    assert_eq!(decoded.node_patterns[0].label.as_deref(), Some("Global"));
    assert_eq!(decoded.edge_patterns.len(), 1);
    assert_eq!(decoded.edge_patterns[0].source_alias, "a");
    assert_eq!(decoded.edge_patterns[0].target_alias, "b");
    assert!(decoded.predicate.as_deref().unwrap().contains("a.node_id > 5"));
    assert_eq!(decoded.order_by.as_deref(), Some("a.node_id DESC"));
    assert_eq!(decoded.projection.len(), 1);
    assert!(decoded.sql.starts_with("SELECT "));
}
