//! Embedded biomedical knowledge graph with dual query backends.
//!
//! hetgraph maintains a queryable graph of diseases, compounds, genes, and
//! anatomical sites with typed relations between them, rebuilt wholesale
//! from a flat node/edge source and queryable through two interchangeable
//! backends.
//!
//! # Features
//!
//! - **Bulk rebuild**: idempotent, batched load of the node/edge row sets
//!   into the SQLite-backed graph store with partial-commit recovery
//! - **Schema management**: the node uniqueness and kind indexes are dropped
//!   and recreated with the data on every rebuild, never left stale
//! - **Dual backends**: a graph-native store with adjacency traversal and an
//!   in-memory document store queried through explicit join stages; both
//!   expose the same [`QueryBackend`] surface and return equivalent results
//! - **Two analytical queries**: the profile of a disease and the untried
//!   compounds that plausibly counteract it via opposite gene regulation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hetgraph::{
//!     HetGraph, LoadConfig, NativeQueryEngine, QueryBackend, read_edges_tsv, read_nodes_tsv,
//!     rebuild,
//! };
//!
//! # fn main() -> Result<(), hetgraph::HetGraphError> {
//! let graph = HetGraph::open("hetionet.db")?;
//! let (nodes, _) = read_nodes_tsv("nodes.tsv")?;
//! let (edges, _) = read_edges_tsv("edges.tsv")?;
//! rebuild(&graph, &nodes, &edges, &LoadConfig::default())?;
//!
//! let engine = NativeQueryEngine::new(&graph);
//! let profile = engine.disease_profile("Disease::DOID:0050156")?;
//! let candidates = engine.treatment_candidates("Disease::DOID:0050156")?;
//! # Ok(())
//! # }
//! ```

pub mod docstore;
pub mod errors;
pub mod graph;
pub mod loader;
pub mod query;
pub mod schema;
pub mod source;

pub use docstore::{DocumentStore, mirror};
pub use errors::HetGraphError;
pub use graph::{Direction, HetGraph};
pub use loader::{EdgePartition, LoadConfig, LoadReport, rebuild};
pub use query::{
    DiseaseProfile, DocumentQueryEngine, NativeQueryEngine, QueryBackend, TreatmentCandidate,
};
pub use source::{EdgeRow, NodeRow, read_edges_tsv, read_nodes_tsv};
