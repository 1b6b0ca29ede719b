//! Bulk loader: wholesale rebuild of the graph-native store.
//!
//! `rebuild` replaces the entire snapshot: wipe (edges before nodes), schema
//! reset, then batched inserts, all nodes before any edge, so endpoint
//! lookups always resolve against fully loaded nodes. Every batch is its own
//! transaction bounded by `LoadConfig::batch_size`; a failed batch rolls
//! back alone and surfaces [`HetGraphError::PartialLoadFailure`] while the
//! batches committed before it remain. Batch indexes run sequentially across
//! the node and edge phases, so batches `0..batch_index` are exactly the
//! committed ones.

use ahash::AHashMap;
use rusqlite::{Connection, params};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    errors::HetGraphError,
    graph::HetGraph,
    schema,
    source::{EdgeRow, NodeRow},
};

/// Edge batch partitioning strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgePartition {
    /// One batch stream per relation type, keeping writes local to a type.
    ByRelationType,
    /// Fixed-size chunks over the input order.
    FixedChunk,
}

/// Batching configuration for [`rebuild`].
#[derive(Clone, Debug)]
pub struct LoadConfig {
    /// Upper bound on rows per transaction.
    pub batch_size: usize,
    pub partition: EdgePartition,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            partition: EdgePartition::ByRelationType,
        }
    }
}

/// Counts reported by a completed rebuild.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub nodes_loaded: usize,
    pub edges_loaded: usize,
    /// Node rows skipped for empty required fields.
    pub malformed_nodes: usize,
    /// Edge rows skipped for empty fields or unresolvable endpoints.
    pub malformed_edges: usize,
    pub node_batches: usize,
    pub edge_batches: usize,
}

/// Transaction wrapper with automatic rollback on drop.
struct TransactionGuard<'a> {
    conn: &'a Connection,
    committed: bool,
}

impl<'a> TransactionGuard<'a> {
    fn new(conn: &'a Connection) -> rusqlite::Result<Self> {
        conn.execute("BEGIN IMMEDIATE", [])?;
        Ok(Self {
            conn,
            committed: false,
        })
    }

    fn commit(mut self) -> rusqlite::Result<()> {
        self.conn.execute("COMMIT", [])?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if !self.committed {
            let _ = self.conn.execute("ROLLBACK", []);
        }
    }
}

/// Rebuild the graph snapshot from the two row sets.
///
/// The previous snapshot is destroyed first; rebuild is last-writer-wins and
/// must not run concurrently with another rebuild. On
/// `PartialLoadFailure` the store holds a partial snapshot and the caller
/// re-runs `rebuild` from scratch to reach a consistent state.
pub fn rebuild(
    graph: &HetGraph,
    nodes: &[NodeRow],
    edges: &[EdgeRow],
    config: &LoadConfig,
) -> Result<LoadReport, HetGraphError> {
    if config.batch_size == 0 {
        return Err(HetGraphError::invalid_input("batch_size must be positive"));
    }
    let conn = graph.connection();
    wipe(conn)?;
    schema::reset_schema(conn)?;
    info!(nodes = nodes.len(), edges = edges.len(), "rebuild started");

    let mut report = LoadReport::default();
    let mut batch_index = 0usize;

    for chunk in nodes.chunks(config.batch_size) {
        let (loaded, malformed) = insert_node_batch(conn, chunk, batch_index)?;
        report.nodes_loaded += loaded;
        report.malformed_nodes += malformed;
        report.node_batches += 1;
        info!(
            batch = batch_index,
            rows = loaded,
            skipped = malformed,
            "node batch committed"
        );
        batch_index += 1;
    }

    // Endpoint membership is checked against the ids that actually loaded,
    // not the input rows: a malformed node row must not anchor edges.
    let known_ids = graph.node_id_set()?;

    for batch in edge_batches(edges, config) {
        let (loaded, malformed) = insert_edge_batch(conn, &batch, &known_ids, batch_index)?;
        report.edges_loaded += loaded;
        report.malformed_edges += malformed;
        report.edge_batches += 1;
        info!(
            batch = batch_index,
            rows = loaded,
            skipped = malformed,
            "edge batch committed"
        );
        batch_index += 1;
    }

    info!(
        nodes = report.nodes_loaded,
        edges = report.edges_loaded,
        "rebuild finished"
    );
    Ok(report)
}

/// Delete the whole snapshot, edges first: the node delete must never see
/// attached edges.
fn wipe(conn: &Connection) -> Result<(), HetGraphError> {
    conn.execute("DELETE FROM graph_edges", [])
        .map_err(|e| HetGraphError::query(e.to_string()))?;
    conn.execute("DELETE FROM graph_nodes", [])
        .map_err(|e| HetGraphError::query(e.to_string()))?;
    Ok(())
}

fn insert_node_batch(
    conn: &Connection,
    rows: &[NodeRow],
    batch_index: usize,
) -> Result<(usize, usize), HetGraphError> {
    let tx = TransactionGuard::new(conn)
        .map_err(|e| HetGraphError::partial_load(batch_index, e.to_string()))?;
    let mut loaded = 0usize;
    let mut malformed = 0usize;
    {
        let mut stmt = conn
            .prepare_cached("INSERT INTO graph_nodes(node_id, name, kind) VALUES(?1, ?2, ?3)")
            .map_err(|e| HetGraphError::partial_load(batch_index, e.to_string()))?;
        for row in rows {
            if row.id.is_empty() || row.name.is_empty() || row.kind.is_empty() {
                debug!(id = %row.id, "skipping node row with empty field");
                malformed += 1;
                continue;
            }
            stmt.execute(params![row.id, row.name, row.kind])
                .map_err(|e| HetGraphError::partial_load(batch_index, e.to_string()))?;
            loaded += 1;
        }
    }
    tx.commit()
        .map_err(|e| HetGraphError::partial_load(batch_index, e.to_string()))?;
    Ok((loaded, malformed))
}

fn insert_edge_batch(
    conn: &Connection,
    rows: &[&EdgeRow],
    known_ids: &ahash::AHashSet<String>,
    batch_index: usize,
) -> Result<(usize, usize), HetGraphError> {
    let tx = TransactionGuard::new(conn)
        .map_err(|e| HetGraphError::partial_load(batch_index, e.to_string()))?;
    let mut loaded = 0usize;
    let mut malformed = 0usize;
    {
        let mut stmt = conn
            .prepare_cached("INSERT INTO graph_edges(source, target, metaedge) VALUES(?1, ?2, ?3)")
            .map_err(|e| HetGraphError::partial_load(batch_index, e.to_string()))?;
        for row in rows {
            if row.metaedge.is_empty()
                || !known_ids.contains(&row.source)
                || !known_ids.contains(&row.target)
            {
                debug!(
                    source = %row.source,
                    target = %row.target,
                    "skipping edge row with unresolvable endpoint"
                );
                malformed += 1;
                continue;
            }
            stmt.execute(params![row.source, row.target, row.metaedge])
                .map_err(|e| HetGraphError::partial_load(batch_index, e.to_string()))?;
            loaded += 1;
        }
    }
    tx.commit()
        .map_err(|e| HetGraphError::partial_load(batch_index, e.to_string()))?;
    Ok((loaded, malformed))
}

/// Split the edge rows into batches per the configured strategy. Either way
/// no batch exceeds `batch_size` rows.
fn edge_batches<'a>(edges: &'a [EdgeRow], config: &LoadConfig) -> Vec<Vec<&'a EdgeRow>> {
    match config.partition {
        EdgePartition::FixedChunk => edges
            .chunks(config.batch_size)
            .map(|chunk| chunk.iter().collect())
            .collect(),
        EdgePartition::ByRelationType => {
            let mut by_type: AHashMap<&str, Vec<&EdgeRow>> = AHashMap::new();
            for edge in edges {
                by_type.entry(edge.metaedge.as_str()).or_default().push(edge);
            }
            let mut codes: Vec<&str> = by_type.keys().copied().collect();
            codes.sort_unstable();
            let mut batches = Vec::new();
            for code in codes {
                for chunk in by_type[code].chunks(config.batch_size) {
                    batches.push(chunk.to_vec());
                }
            }
            batches
        }
    }
}
