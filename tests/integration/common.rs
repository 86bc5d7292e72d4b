use std::collections::HashMap;

use relagraph::graph_catalog::{ColumnDef, ColumnType, GraphSchema};

/// Schema shaped like the provenance graph the system was originally run
/// against: Global/Local/Process/Meta labels over a nodes/edges store.
pub fn provenance_schema() -> GraphSchema {
    let _ = env_logger::builder().is_test(true).try_init();

    let node_columns = vec![
        ColumnDef::new("id", ColumnType::Integer),
        ColumnDef::new("node_id", ColumnType::Integer),
        ColumnDef::new("label", ColumnType::Text),
        ColumnDef::new("sys_time", ColumnType::Text),
        ColumnDef::new("mono_time", ColumnType::Long),
        ColumnDef::new("visited", ColumnType::Text),
        ColumnDef::new("member_ids", ColumnType::TextArray),
    ];
    let edge_columns = vec![
        ColumnDef::new("idl", ColumnType::Integer),
        ColumnDef::new("idr", ColumnType::Integer),
        ColumnDef::new("type", ColumnType::Text),
        ColumnDef::new("state", ColumnType::Text),
    ];

    let mut label_columns = HashMap::new();
    for label in ["Global", "Local", "Process", "Meta"] {
        label_columns.insert(
            label.to_string(),
            vec![
                ColumnDef::new("id", ColumnType::Integer),
                ColumnDef::new("node_id", ColumnType::Integer),
                ColumnDef::new("sys_time", ColumnType::Text),
            ],
        );
    }
    label_columns.insert(
        "Global, Local".to_string(),
        vec![
            ColumnDef::new("id", ColumnType::Integer),
            ColumnDef::new("node_id", ColumnType::Integer),
        ],
    );

    let mut rel_columns = HashMap::new();
    for rel in ["INF", "FRIEND"] {
        rel_columns.insert(
            rel.to_string(),
            vec![
                ColumnDef::new("idl", ColumnType::Integer),
                ColumnDef::new("idr", ColumnType::Integer),
                ColumnDef::new("type", ColumnType::Text),
                ColumnDef::new("state", ColumnType::Text),
            ],
        );
    }

    GraphSchema::build(node_columns, edge_columns, label_columns, rel_columns)
        .expect("test schema must build")
}
