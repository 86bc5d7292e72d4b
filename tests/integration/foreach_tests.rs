use relagraph::sql_query_generator::SqlGeneratorError;
use relagraph::translate_query;

use super::common::provenance_schema;

#[test]
fn literal_list_emits_one_action_per_element() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a) FOREACH (x IN [1, 2, 3, 4] | SET x.visited = 'true')",
        &schema,
    )
    .expect("translation failed");

    let updates = sql.matches("UPDATE nodes SET visited = 'true'").count();
    assert_eq!(updates, 4, "expected one UPDATE per list element: {}", sql);
    assert!(sql.contains("WHERE id = 1;"));
    assert!(sql.contains("WHERE id = 4;"));
}

#[test]
fn relationship_creation_inserts_into_edges_and_type_table() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a) FOREACH (x IN [5, 6] | CREATE (x)-[:FRIEND]->(b {id: 9}))",
        &schema,
    )
    .expect("translation failed");

    assert_eq!(sql.matches("INSERT INTO edges").count(), 2);
    assert_eq!(sql.matches("INSERT INTO e$FRIEND").count(), 2);
    assert!(sql.contains("VALUES (5, 9, 'FRIEND');"));
    assert!(sql.contains("VALUES (6, 9, 'FRIEND');"));
}

#[test]
fn incoming_direction_swaps_endpoint_columns() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a) FOREACH (x IN [5] | CREATE (x)<-[:FRIEND]-(b {id: 9}))",
        &schema,
    )
    .expect("translation failed");
    assert!(sql.contains("VALUES (9, 5, 'FRIEND');"), "sql: {}", sql);
}

#[test]
fn collected_projection_source_drives_set_based_update() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a:Global) WITH collect(a.node_id) AS ids \
         FOREACH (x IN ids | SET x.visited = 'true')",
        &schema,
    )
    .expect("translation failed");

    assert!(
        sql.starts_with("UPDATE nodes SET visited = 'true' WHERE id IN (SELECT"),
        "sql: {}",
        sql
    );
    assert!(sql.contains("FROM global a"), "sql: {}", sql);
}

#[test]
fn with_prefix_is_rewritten_to_projection_not_materialized() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a:Global) WITH collect(a.node_id) AS ids \
         FOREACH (x IN ids | SET x.visited = 'true')",
        &schema,
    )
    .unwrap();
    // FOREACH takes priority over the WITH converter: no temp relation.
    assert!(!sql.contains("CREATE TEMP TABLE"), "sql: {}", sql);
}

#[test]
fn failed_prefix_propagates_instead_of_partial_output() {
    let schema = provenance_schema();
    let err = translate_query(
        "MATCH (a:Unknown) FOREACH (x IN [1] | SET x.visited = 'true')",
        &schema,
    )
    .unwrap_err();
    assert!(matches!(err, SqlGeneratorError::Schema(_)), "err: {err:?}");
}

#[test]
fn every_emitted_statement_is_semicolon_terminated() {
    let schema = provenance_schema();
    let sql = translate_query(
        "MATCH (a) FOREACH (x IN [1, 2] | CREATE (x)-[:FRIEND]->(b {id: 3}))",
        &schema,
    )
    .unwrap();
    for statement in sql.split_inclusive("; ") {
        let trimmed = statement.trim_end();
        assert!(
            trimmed.ends_with(';'),
            "statement missing terminator: {:?}",
            trimmed
        );
    }
}
