use rusqlite::Connection;

use hetgraph::schema::{NODE_ID_UNIQUE_INDEX, NODE_KIND_INDEX, ensure_schema, reset_schema};

fn node_indexes(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master \
             WHERE type='index' AND tbl_name='graph_nodes' AND sql IS NOT NULL ORDER BY name",
        )
        .expect("prepare");
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .expect("query");
    rows.map(|name| name.expect("row")).collect()
}

#[test]
fn test_reset_creates_constraint_set_on_empty_schema() {
    let conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn).expect("ensure");
    reset_schema(&conn).expect("reset");

    let indexes = node_indexes(&conn);
    assert!(indexes.contains(&NODE_ID_UNIQUE_INDEX.to_string()));
    assert!(indexes.contains(&NODE_KIND_INDEX.to_string()));
    assert_eq!(indexes.len(), 2);
}

#[test]
fn test_reset_is_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn).expect("ensure");
    reset_schema(&conn).expect("first reset");
    reset_schema(&conn).expect("second reset");
    assert_eq!(node_indexes(&conn).len(), 2);
}

#[test]
fn test_reset_drops_stale_indexes() {
    let conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn).expect("ensure");
    conn.execute("CREATE INDEX stale_name_index ON graph_nodes(name)", [])
        .expect("stale index");

    reset_schema(&conn).expect("reset");
    let indexes = node_indexes(&conn);
    assert!(!indexes.contains(&"stale_name_index".to_string()));
    assert_eq!(indexes.len(), 2);
}

#[test]
fn test_uniqueness_index_rejects_duplicate_node_id() {
    let conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn).expect("ensure");
    reset_schema(&conn).expect("reset");

    let insert = "INSERT INTO graph_nodes(node_id, name, kind) VALUES(?1, ?2, ?3)";
    conn.execute(insert, rusqlite::params!["Gene::G1", "g1", "Gene"])
        .expect("first insert");
    let duplicate = conn.execute(insert, rusqlite::params!["Gene::G1", "other", "Gene"]);
    assert!(duplicate.is_err());
}

#[test]
fn test_edge_table_survives_reset() {
    let conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn).expect("ensure");
    conn.execute(
        "INSERT INTO graph_edges(source, target, metaedge) VALUES('a', 'b', 'CtD')",
        [],
    )
    .expect("edge insert");

    reset_schema(&conn).expect("reset");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM graph_edges", [], |row| row.get(0))
        .expect("count");
    assert_eq!(count, 1);
}
