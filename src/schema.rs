//! Schema management for the graph-native store.
//!
//! The base schema (tables plus edge adjacency indexes) is ensured at open.
//! The node-side constraint set (the uniqueness index on node id and the
//! kind lookup index) is owned by [`reset_schema`], which drops and
//! recreates it together with the data on every rebuild so a stale index can
//! never outlive the rows it described.

use rusqlite::Connection;

use crate::errors::HetGraphError;

/// Uniqueness index on `graph_nodes.node_id`.
pub const NODE_ID_UNIQUE_INDEX: &str = "node_id_unique";
/// Lookup index on `graph_nodes.kind`.
pub const NODE_KIND_INDEX: &str = "node_kind_index";

pub fn ensure_schema(conn: &Connection) -> Result<(), HetGraphError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS graph_nodes (
            node_id TEXT NOT NULL,
            name    TEXT NOT NULL,
            kind    TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS graph_edges (
            source   TEXT NOT NULL,
            target   TEXT NOT NULL,
            metaedge TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_edges_source ON graph_edges(source);
        CREATE INDEX IF NOT EXISTS idx_edges_target ON graph_edges(target);
        CREATE INDEX IF NOT EXISTS idx_edges_type ON graph_edges(metaedge);
        "#,
    )
    .map_err(|e| HetGraphError::schema_reset(e.to_string()))
}

/// Drop every named index on `graph_nodes`, then recreate the uniqueness
/// index on node id and the kind lookup index.
///
/// Idempotent: against an empty catalog only the create step runs. Any drop
/// or create failure aborts the reset; no partial constraint set is left
/// behind silently.
pub fn reset_schema(conn: &Connection) -> Result<(), HetGraphError> {
    for name in node_index_names(conn)? {
        conn.execute(&format!("DROP INDEX IF EXISTS \"{name}\""), [])
            .map_err(|e| HetGraphError::schema_reset(format!("drop index {name}: {e}")))?;
    }
    for sql in [
        "CREATE UNIQUE INDEX node_id_unique ON graph_nodes(node_id)",
        "CREATE INDEX node_kind_index ON graph_nodes(kind)",
    ] {
        conn.execute(sql, [])
            .map_err(|e| HetGraphError::schema_reset(e.to_string()))?;
    }
    Ok(())
}

/// Named (user-created) indexes on the node table. Auto-indexes carry no SQL
/// and are excluded.
fn node_index_names(conn: &Connection) -> Result<Vec<String>, HetGraphError> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master \
             WHERE type='index' AND tbl_name='graph_nodes' AND sql IS NOT NULL \
             ORDER BY name",
        )
        .map_err(|e| HetGraphError::schema_reset(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get(0))
        .map_err(|e| HetGraphError::schema_reset(e.to_string()))?;
    let mut names = Vec::new();
    for name in rows {
        names.push(name.map_err(|e| HetGraphError::schema_reset(e.to_string()))?);
    }
    Ok(names)
}
