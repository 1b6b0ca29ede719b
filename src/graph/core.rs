//! Core HetGraph struct and construction functionality.

use std::path::Path;

use rusqlite::Connection;

use crate::{errors::HetGraphError, schema::ensure_schema};

/// Embedded SQLite-backed knowledge graph store.
///
/// Holds the connection for the lifetime of the handle; every operation
/// takes the handle explicitly, there is no ambient session state.
pub struct HetGraph {
    pub(crate) conn: Connection,
}

impl HetGraph {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HetGraphError> {
        let conn =
            Connection::open(path).map_err(|e| HetGraphError::connection(e.to_string()))?;
        Self::from_connection(conn, false)
    }

    pub fn open_in_memory() -> Result<Self, HetGraphError> {
        let conn =
            Connection::open_in_memory().map_err(|e| HetGraphError::connection(e.to_string()))?;
        Self::from_connection(conn, true)
    }

    fn from_connection(conn: Connection, in_memory: bool) -> Result<Self, HetGraphError> {
        conn.set_prepared_statement_cache_capacity(128);

        // WAL and pragma tuning only make sense for file-backed databases.
        if !in_memory {
            if conn.pragma_update(None, "journal_mode", "WAL").is_err() {
                // Some filesystems reject WAL; DELETE mode still works.
                let _ = conn.pragma_update(None, "journal_mode", "DELETE");
            }
            let _ = conn.pragma_update(None, "synchronous", "NORMAL");
            let _ = conn.pragma_update(None, "temp_store", "MEMORY");
        }

        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn node_count(&self) -> Result<usize, HetGraphError> {
        self.count("SELECT COUNT(*) FROM graph_nodes")
    }

    pub fn edge_count(&self) -> Result<usize, HetGraphError> {
        self.count("SELECT COUNT(*) FROM graph_edges")
    }

    fn count(&self, sql: &str) -> Result<usize, HetGraphError> {
        let count: i64 = self
            .conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(|e| HetGraphError::query(e.to_string()))?;
        Ok(count as usize)
    }
}
