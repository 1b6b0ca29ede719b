//! Emulated query engine: graph motifs reconstructed over flat collections.
//!
//! The document store has no traversal primitives, so every motif is an
//! explicit join pipeline. Each stage is a named function (resolve incident
//! relations, join far endpoints, bucket by relation, group regulation edges
//! by gene, pair opposite directions, anti-join treated compounds) so the
//! pipeline can be exercised stage by stage.

use ahash::{AHashMap, AHashSet};
use serde_json::Value;
use tracing::debug;

use crate::{
    docstore::{DocumentStore, EDGES_COLLECTION, NODES_COLLECTION},
    errors::HetGraphError,
    source::{kind, metaedge},
};

use super::{DiseaseProfile, QueryBackend, TreatmentCandidate, sorted_candidates, sorted_names};

/// Borrowed view over the document store evaluating the two analytical
/// motifs as staged joins.
pub struct DocumentQueryEngine<'a> {
    store: &'a DocumentStore,
}

impl<'a> DocumentQueryEngine<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ResolvedNode {
    id: String,
    name: String,
    kind: String,
}

/// An edge incident to the anchor, reduced to its relation code and the far
/// endpoint id.
#[derive(Clone, Debug, PartialEq, Eq)]
struct IncidentRelation {
    metaedge: String,
    other_id: String,
}

fn doc_str<'v>(doc: &'v Value, field: &str) -> Option<&'v str> {
    doc.get(field).and_then(Value::as_str)
}

fn find_node(store: &DocumentStore, id: &str, node_kind: &str) -> Option<ResolvedNode> {
    store.with_collection(NODES_COLLECTION, |docs| {
        docs.iter().find_map(|doc| {
            if doc_str(doc, "id") == Some(id) && doc_str(doc, "kind") == Some(node_kind) {
                Some(ResolvedNode {
                    id: id.to_string(),
                    name: doc_str(doc, "name")?.to_string(),
                    kind: node_kind.to_string(),
                })
            } else {
                None
            }
        })
    })
}

/// Stage 1: every edge touching the anchor, whichever side it is on.
fn incident_relations(store: &DocumentStore, node_id: &str) -> Vec<IncidentRelation> {
    store.with_collection(EDGES_COLLECTION, |docs| {
        docs.iter()
            .filter_map(|doc| {
                let source = doc_str(doc, "source")?;
                let target = doc_str(doc, "target")?;
                let code = doc_str(doc, "metaedge")?;
                let other_id = if source == node_id {
                    target
                } else if target == node_id {
                    source
                } else {
                    return None;
                };
                Some(IncidentRelation {
                    metaedge: code.to_string(),
                    other_id: other_id.to_string(),
                })
            })
            .collect()
    })
}

/// Stage 2: join relations against the nodes collection to resolve the far
/// endpoints. Relations whose endpoint is missing drop out.
fn resolve_endpoints(
    store: &DocumentStore,
    relations: Vec<IncidentRelation>,
) -> Vec<(String, ResolvedNode)> {
    let by_id: AHashMap<String, ResolvedNode> = store.with_collection(NODES_COLLECTION, |docs| {
        docs.iter()
            .filter_map(|doc| {
                let node = ResolvedNode {
                    id: doc_str(doc, "id")?.to_string(),
                    name: doc_str(doc, "name")?.to_string(),
                    kind: doc_str(doc, "kind")?.to_string(),
                };
                Some((node.id.clone(), node))
            })
            .collect()
    });
    relations
        .into_iter()
        .filter_map(|relation| {
            let node = by_id.get(&relation.other_id)?.clone();
            Some((relation.metaedge, node))
        })
        .collect()
}

/// Stage 3: bucket resolved endpoints by (relation code, far kind) into the
/// three profile categories, dropping the relation envelope.
fn bucket_profile(
    resolved: Vec<(String, ResolvedNode)>,
) -> (AHashSet<String>, AHashSet<String>, AHashSet<String>) {
    let mut compounds = AHashSet::new();
    let mut genes = AHashSet::new();
    let mut anatomy = AHashSet::new();
    for (code, node) in resolved {
        if (code == metaedge::CTD || code == metaedge::CPD) && node.kind == kind::COMPOUND {
            compounds.insert(node.name);
        } else if code == metaedge::DAG && node.kind == kind::GENE {
            genes.insert(node.name);
        } else if code == metaedge::DLA && node.kind == kind::ANATOMY {
            anatomy.insert(node.name);
        }
    }
    (compounds, genes, anatomy)
}

/// Group the regulation edges of one code by their gene target.
fn regulation_by_gene(store: &DocumentStore, code: &str) -> AHashMap<String, Vec<String>> {
    store.with_collection(EDGES_COLLECTION, |docs| {
        let mut by_gene: AHashMap<String, Vec<String>> = AHashMap::new();
        for doc in docs {
            if doc_str(doc, "metaedge") != Some(code) {
                continue;
            }
            if let (Some(source), Some(target)) = (doc_str(doc, "source"), doc_str(doc, "target")) {
                by_gene
                    .entry(target.to_string())
                    .or_default()
                    .push(source.to_string());
            }
        }
        by_gene
    })
}

/// Far endpoint ids of the anchor's outgoing (or incoming) edges of one code.
fn edge_endpoints(
    store: &DocumentStore,
    anchor: &str,
    code: &str,
    anchor_is_source: bool,
) -> AHashSet<String> {
    let (anchor_field, other_field) = if anchor_is_source {
        ("source", "target")
    } else {
        ("target", "source")
    };
    store.with_collection(EDGES_COLLECTION, |docs| {
        docs.iter()
            .filter_map(|doc| {
                if doc_str(doc, "metaedge") == Some(code)
                    && doc_str(doc, anchor_field) == Some(anchor)
                {
                    Some(doc_str(doc, other_field)?.to_string())
                } else {
                    None
                }
            })
            .collect()
    })
}

/// Pair compound regulators against anatomy regulators acting on the same
/// gene in the opposite direction, keeping only anatomies in the localized
/// set. Returns the matched compound ids.
fn opposite_regulators(
    by_compound: &AHashMap<String, Vec<String>>,
    by_anatomy: &AHashMap<String, Vec<String>>,
    localized: &AHashSet<String>,
) -> AHashSet<String> {
    let mut matched = AHashSet::new();
    for (gene, compounds) in by_compound {
        let Some(anatomies) = by_anatomy.get(gene) else {
            continue;
        };
        if anatomies.iter().any(|anatomy| localized.contains(anatomy)) {
            matched.extend(compounds.iter().cloned());
        }
    }
    matched
}

impl QueryBackend for DocumentQueryEngine<'_> {
    fn disease_profile(&self, disease_id: &str) -> Result<DiseaseProfile, HetGraphError> {
        let disease = find_node(self.store, disease_id, kind::DISEASE)
            .ok_or_else(|| HetGraphError::not_found(format!("disease {disease_id}")))?;
        let relations = incident_relations(self.store, disease_id);
        let resolved = resolve_endpoints(self.store, relations);
        let (compounds, genes, anatomy) = bucket_profile(resolved);
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
        let localized = edge_endpoints(self.store, disease_id, metaedge::DLA, true);
        if localized.is_empty() {
            return Ok(Vec::new());
        }

        let compound_up = regulation_by_gene(self.store, metaedge::CUG);
        let compound_down = regulation_by_gene(self.store, metaedge::CDG);
        let anatomy_up = regulation_by_gene(self.store, metaedge::AUG);
        let anatomy_down = regulation_by_gene(self.store, metaedge::ADG);

        let mut matched = opposite_regulators(&compound_up, &anatomy_down, &localized);
        matched.extend(opposite_regulators(&compound_down, &anatomy_up, &localized));

        // Anti-join: compounds already treating the disease are out.
        let treated = edge_endpoints(self.store, disease_id, metaedge::CTD, false);
        matched.retain(|compound| !treated.contains(compound));
        debug!(
            disease = disease_id,
            candidates = matched.len(),
            "treatment motif matched"
        );

        // Final join resolves names; only Compound documents survive.
        let candidates: AHashMap<String, String> =
            self.store.with_collection(NODES_COLLECTION, |docs| {
                docs.iter()
                    .filter_map(|doc| {
                        let id = doc_str(doc, "id")?;
                        if matched.contains(id) && doc_str(doc, "kind") == Some(kind::COMPOUND) {
                            Some((id.to_string(), doc_str(doc, "name")?.to_string()))
                        } else {
                            None
                        }
                    })
                    .collect()
            });
        Ok(sorted_candidates(candidates))
    }
}
