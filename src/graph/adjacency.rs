//! Adjacency primitives for the graph-native store.
//!
//! These are the traversal operations the native query engine consumes:
//! node lookup by id and metaedge-filtered neighbor queries in either
//! direction. Result ordering is deterministic (ORDER BY node id).

use ahash::AHashSet;
use rusqlite::{OptionalExtension, params};

use crate::{errors::HetGraphError, source::NodeRow};

use super::HetGraph;

/// Direction of a typed edge relative to the anchor node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

const OUTGOING_SQL: &str = "SELECT n.node_id, n.name, n.kind \
     FROM graph_edges e JOIN graph_nodes n ON n.node_id = e.target \
     WHERE e.source = ?1 AND e.metaedge = ?2 ORDER BY n.node_id";
const INCOMING_SQL: &str = "SELECT n.node_id, n.name, n.kind \
     FROM graph_edges e JOIN graph_nodes n ON n.node_id = e.source \
     WHERE e.target = ?1 AND e.metaedge = ?2 ORDER BY n.node_id";
const OUTGOING_IDS_SQL: &str =
    "SELECT target FROM graph_edges WHERE source = ?1 AND metaedge = ?2 ORDER BY target";
const INCOMING_IDS_SQL: &str =
    "SELECT source FROM graph_edges WHERE target = ?1 AND metaedge = ?2 ORDER BY source";

impl HetGraph {
    pub fn node_by_id(&self, id: &str) -> Result<Option<NodeRow>, HetGraphError> {
        self.connection()
            .query_row(
                "SELECT node_id, name, kind FROM graph_nodes WHERE node_id = ?1 LIMIT 1",
                params![id],
                |row| {
                    Ok(NodeRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        kind: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| HetGraphError::query(e.to_string()))
    }

    /// Far endpoints of edges with the given metaedge, resolved to full rows.
    pub fn neighbors(
        &self,
        id: &str,
        direction: Direction,
        metaedge: &str,
    ) -> Result<Vec<NodeRow>, HetGraphError> {
        let sql = match direction {
            Direction::Outgoing => OUTGOING_SQL,
            Direction::Incoming => INCOMING_SQL,
        };
        let conn = self.connection();
        let mut stmt = conn
            .prepare_cached(sql)
            .map_err(|e| HetGraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map(params![id, metaedge], |row| {
                Ok(NodeRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    kind: row.get(2)?,
                })
            })
            .map_err(|e| HetGraphError::query(e.to_string()))?;
        let mut nodes = Vec::new();
        for node in rows {
            nodes.push(node.map_err(|e| HetGraphError::query(e.to_string()))?);
        }
        Ok(nodes)
    }

    /// Far endpoint ids only, without resolving the node rows.
    pub fn neighbor_ids(
        &self,
        id: &str,
        direction: Direction,
        metaedge: &str,
    ) -> Result<Vec<String>, HetGraphError> {
        let sql = match direction {
            Direction::Outgoing => OUTGOING_IDS_SQL,
            Direction::Incoming => INCOMING_IDS_SQL,
        };
        let conn = self.connection();
        let mut stmt = conn
            .prepare_cached(sql)
            .map_err(|e| HetGraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map(params![id, metaedge], |row| row.get(0))
            .map_err(|e| HetGraphError::query(e.to_string()))?;
        let mut ids = Vec::new();
        for entry in rows {
            ids.push(entry.map_err(|e| HetGraphError::query(e.to_string()))?);
        }
        Ok(ids)
    }

    /// Set of every loaded node id, for endpoint membership checks.
    pub(crate) fn node_id_set(&self) -> Result<AHashSet<String>, HetGraphError> {
        let conn = self.connection();
        let mut stmt = conn
            .prepare_cached("SELECT node_id FROM graph_nodes")
            .map_err(|e| HetGraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| HetGraphError::query(e.to_string()))?;
        let mut ids = AHashSet::new();
        for entry in rows {
            ids.insert(entry.map_err(|e| HetGraphError::query(e.to_string()))?);
        }
        Ok(ids)
    }
}
