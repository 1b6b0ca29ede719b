//! Tabular source rows and TSV ingestion.
//!
//! The ingestion input is two row sets: nodes (`id`, `name`, `kind`) and
//! edges (`source`, `target`, `metaedge`). Columns are resolved through the
//! header line, so column order is free and extra columns are ignored. Rows
//! missing a required column are counted and skipped, never fatal.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::HetGraphError;

/// Node kinds the analytical queries anchor on or traverse to.
pub mod kind {
    pub const DISEASE: &str = "Disease";
    pub const COMPOUND: &str = "Compound";
    pub const GENE: &str = "Gene";
    pub const ANATOMY: &str = "Anatomy";
}

/// Typed relation codes traversed by the query engines.
///
/// The vocabulary is closed at query-definition time; the loader itself
/// accepts any code.
pub mod metaedge {
    /// Compound treats disease.
    pub const CTD: &str = "CtD";
    /// Compound palliates disease.
    pub const CPD: &str = "CpD";
    /// Disease associates gene.
    pub const DAG: &str = "DaG";
    /// Disease localizes anatomy.
    pub const DLA: &str = "DlA";
    /// Compound up-regulates gene.
    pub const CUG: &str = "CuG";
    /// Compound down-regulates gene.
    pub const CDG: &str = "CdG";
    /// Anatomy up-regulates gene.
    pub const AUG: &str = "AuG";
    /// Anatomy down-regulates gene.
    pub const ADG: &str = "AdG";
}

/// One node row of the tabular source. `id` is globally unique and embeds
/// the kind (`"Disease::DOID:0050156"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRow {
    pub id: String,
    pub name: String,
    pub kind: String,
}

/// One directed edge row of the tabular source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub source: String,
    pub target: String,
    pub metaedge: String,
}

/// Read the node row set from a TSV file. Returns the rows plus the count of
/// rows skipped for missing columns.
pub fn read_nodes_tsv<P: AsRef<Path>>(path: P) -> Result<(Vec<NodeRow>, usize), HetGraphError> {
    read_rows(path.as_ref(), &["id", "name", "kind"], |fields| NodeRow {
        id: fields[0].to_string(),
        name: fields[1].to_string(),
        kind: fields[2].to_string(),
    })
}

/// Read the edge row set from a TSV file. Returns the rows plus the count of
/// rows skipped for missing columns.
pub fn read_edges_tsv<P: AsRef<Path>>(path: P) -> Result<(Vec<EdgeRow>, usize), HetGraphError> {
    read_rows(path.as_ref(), &["source", "target", "metaedge"], |fields| {
        EdgeRow {
            source: fields[0].to_string(),
            target: fields[1].to_string(),
            metaedge: fields[2].to_string(),
        }
    })
}

fn read_rows<T>(
    path: &Path,
    columns: &[&str],
    build: impl Fn(&[&str]) -> T,
) -> Result<(Vec<T>, usize), HetGraphError> {
    let file = File::open(path)
        .map_err(|e| HetGraphError::invalid_input(format!("{}: {e}", path.display())))?;
    let mut lines = BufReader::new(file).lines();
    let header = match lines.next() {
        Some(line) => line.map_err(|e| HetGraphError::invalid_input(e.to_string()))?,
        None => {
            return Err(HetGraphError::malformed_row(format!(
                "{}: empty file, header expected",
                path.display()
            )));
        }
    };
    let indexes = resolve_columns(&header, columns)
        .map_err(|missing| HetGraphError::malformed_row(format!("{}: {missing}", path.display())))?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (line_no, line) in lines.enumerate() {
        let line = line.map_err(|e| HetGraphError::invalid_input(e.to_string()))?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        match pick_fields(&fields, &indexes) {
            Some(picked) => rows.push(build(&picked)),
            None => {
                debug!(line = line_no + 2, "skipping row with missing column");
                skipped += 1;
            }
        }
    }
    Ok((rows, skipped))
}

fn resolve_columns(header: &str, columns: &[&str]) -> Result<Vec<usize>, String> {
    let names: Vec<&str> = header
        .trim_end_matches(['\r', '\n'])
        .split('\t')
        .collect();
    columns
        .iter()
        .map(|wanted| {
            names
                .iter()
                .position(|name| name == wanted)
                .ok_or_else(|| format!("missing required column `{wanted}`"))
        })
        .collect()
}

fn pick_fields<'a>(fields: &[&'a str], indexes: &[usize]) -> Option<Vec<&'a str>> {
    let mut picked = Vec::with_capacity(indexes.len());
    for &index in indexes {
        let value = *fields.get(index)?;
        if value.is_empty() {
            return None;
        }
        picked.push(value);
    }
    Some(picked)
}
