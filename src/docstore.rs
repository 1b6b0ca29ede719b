//! In-memory document store and mirror loader.
//!
//! The document store holds the two source row sets verbatim as schemaless
//! JSON documents in named collections. It deliberately has no indexes and
//! no graph primitives; the emulated query engine reconstructs adjacency by
//! scanning and joining these flat collections.

use ahash::AHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::info;

use crate::{
    errors::HetGraphError,
    source::{EdgeRow, NodeRow},
};

pub const NODES_COLLECTION: &str = "nodes";
pub const EDGES_COLLECTION: &str = "edges";

/// Named collections of JSON documents. Reads take a shared lock, so
/// concurrent queries need no coordination.
#[derive(Default)]
pub struct DocumentStore {
    collections: RwLock<AHashMap<String, Vec<Value>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drop_collection(&self, name: &str) {
        self.collections.write().remove(name);
    }

    pub fn insert_many(&self, name: &str, docs: Vec<Value>) {
        self.collections
            .write()
            .entry(name.to_string())
            .or_default()
            .extend(docs);
    }

    pub fn count(&self, name: &str) -> usize {
        self.collections
            .read()
            .get(name)
            .map_or(0, |docs| docs.len())
    }

    /// Run `f` over the collection's documents under a shared lock. A
    /// missing collection scans as empty.
    pub fn with_collection<R>(&self, name: &str, f: impl FnOnce(&[Value]) -> R) -> R {
        let guard = self.collections.read();
        let docs = guard.get(name).map(|docs| docs.as_slice()).unwrap_or(&[]);
        f(docs)
    }
}

/// Replicate the two row sets into the document store: drop both target
/// collections, then insert every row verbatim. No batching: the store
/// accepts large unordered inserts.
pub fn mirror(
    store: &DocumentStore,
    nodes: &[NodeRow],
    edges: &[EdgeRow],
) -> Result<(), HetGraphError> {
    store.drop_collection(NODES_COLLECTION);
    store.drop_collection(EDGES_COLLECTION);

    let node_docs = to_documents(nodes)?;
    let edge_docs = to_documents(edges)?;
    store.insert_many(NODES_COLLECTION, node_docs);
    store.insert_many(EDGES_COLLECTION, edge_docs);
    info!(nodes = nodes.len(), edges = edges.len(), "document store mirrored");
    Ok(())
}

fn to_documents<T: serde::Serialize>(rows: &[T]) -> Result<Vec<Value>, HetGraphError> {
    rows.iter()
        .map(|row| serde_json::to_value(row).map_err(|e| HetGraphError::invalid_input(e.to_string())))
        .collect()
}
