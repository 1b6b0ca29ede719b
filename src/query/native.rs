//! Native query engine: motifs evaluated directly over graph adjacency.

use ahash::{AHashMap, AHashSet};
use tracing::debug;

use crate::{
    errors::HetGraphError,
    graph::{Direction, HetGraph},
    source::{kind, metaedge},
};

use super::{DiseaseProfile, QueryBackend, TreatmentCandidate, sorted_candidates, sorted_names};

/// Borrowed view over the graph store evaluating the two analytical motifs
/// as pattern traversals.
pub struct NativeQueryEngine<'a> {
    graph: &'a HetGraph,
}

impl<'a> NativeQueryEngine<'a> {
    pub fn new(graph: &'a HetGraph) -> Self {
        Self { graph }
    }

    fn collect_names(
        &self,
        anchor: &str,
        direction: Direction,
        code: &str,
        far_kind: &str,
        into: &mut AHashSet<String>,
    ) -> Result<(), HetGraphError> {
        for node in self.graph.neighbors(anchor, direction, code)? {
            if node.kind == far_kind {
                into.insert(node.name);
            }
        }
        Ok(())
    }
}

impl QueryBackend for NativeQueryEngine<'_> {
    fn disease_profile(&self, disease_id: &str) -> Result<DiseaseProfile, HetGraphError> {
        let disease = self
            .graph
            .node_by_id(disease_id)?
            .filter(|node| node.kind == kind::DISEASE)
            .ok_or_else(|| HetGraphError::not_found(format!("disease {disease_id}")))?;

        // Three optional branches joined only through the anchor; an absent
        // relation leaves its set empty.
        let mut compounds = AHashSet::new();
        for code in [metaedge::CTD, metaedge::CPD] {
            self.collect_names(
                disease_id,
                Direction::Incoming,
                code,
                kind::COMPOUND,
                &mut compounds,
            )?;
        }
        let mut genes = AHashSet::new();
        self.collect_names(
            disease_id,
            Direction::Outgoing,
            metaedge::DAG,
            kind::GENE,
            &mut genes,
        )?;
        let mut anatomy = AHashSet::new();
        self.collect_names(
            disease_id,
            Direction::Outgoing,
            metaedge::DLA,
            kind::ANATOMY,
            &mut anatomy,
        )?;

        Ok(DiseaseProfile {
            disease_name: disease.name,
            compound_names: sorted_names(compounds),
            gene_names: sorted_names(genes),
            anatomy_names: sorted_names(anatomy),
        })
    }

    fn treatment_candidates(
        &self,
        disease_id: &str,
    ) -> Result<Vec<TreatmentCandidate>, HetGraphError> {
        // Existence-driven: an absent disease localizes nowhere and matches
        // nothing.
        let anatomy_ids = self
            .graph
            .neighbor_ids(disease_id, Direction::Outgoing, metaedge::DLA)?;
        if anatomy_ids.is_empty() {
            return Ok(Vec::new());
        }

        // Genes regulated by any anatomy the disease localizes to, split by
        // regulation direction.
        let mut genes_up = AHashSet::new();
        let mut genes_down = AHashSet::new();
        for anatomy in &anatomy_ids {
            genes_up.extend(self.graph.neighbor_ids(anatomy, Direction::Outgoing, metaedge::AUG)?);
            genes_down.extend(self.graph.neighbor_ids(
                anatomy,
                Direction::Outgoing,
                metaedge::ADG,
            )?);
        }

        // A candidate acts on the gene in the opposite direction of the
        // anatomy: up against down, down against up.
        let mut candidates: AHashMap<String, String> = AHashMap::new();
        for (genes, code) in [(&genes_down, metaedge::CUG), (&genes_up, metaedge::CDG)] {
            for gene in genes.iter() {
                for node in self.graph.neighbors(gene, Direction::Incoming, code)? {
                    if node.kind == kind::COMPOUND {
                        candidates.insert(node.id, node.name);
                    }
                }
            }
        }
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // Only genuinely new compounds: anything already treating the
        // disease is excluded.
        let treated: AHashSet<String> = self
            .graph
            .neighbor_ids(disease_id, Direction::Incoming, metaedge::CTD)?
            .into_iter()
            .collect();
        candidates.retain(|id, _| !treated.contains(id));

        debug!(
            disease = disease_id,
            candidates = candidates.len(),
            "treatment motif matched"
        );
        Ok(sorted_candidates(candidates))
    }
}
