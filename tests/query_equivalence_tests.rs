use hetgraph::{
    DocumentQueryEngine, DocumentStore, EdgeRow, HetGraph, HetGraphError, LoadConfig,
    NativeQueryEngine, NodeRow, QueryBackend, mirror, rebuild,
};

fn node(id: &str, name: &str, kind: &str) -> NodeRow {
    NodeRow {
        id: id.into(),
        name: name.into(),
        kind: kind.into(),
    }
}

fn edge(source: &str, target: &str, metaedge: &str) -> EdgeRow {
    EdgeRow {
        source: source.into(),
        target: target.into(),
        metaedge: metaedge.into(),
    }
}

fn graph_backend(nodes: &[NodeRow], edges: &[EdgeRow]) -> HetGraph {
    let graph = HetGraph::open_in_memory().expect("open");
    rebuild(&graph, nodes, edges, &LoadConfig::default()).expect("rebuild");
    graph
}

fn document_backend(nodes: &[NodeRow], edges: &[EdgeRow]) -> DocumentStore {
    let store = DocumentStore::new();
    mirror(&store, nodes, edges).expect("mirror");
    store
}

/// Run the same assertion against both engines.
fn on_both_backends(
    nodes: &[NodeRow],
    edges: &[EdgeRow],
    check: impl Fn(&dyn QueryBackend, &str),
) {
    let graph = graph_backend(nodes, edges);
    check(&NativeQueryEngine::new(&graph), "native");
    let store = document_backend(nodes, edges);
    check(&DocumentQueryEngine::new(&store), "emulated");
}

fn candidate_ids(engine: &dyn QueryBackend, disease_id: &str) -> Vec<String> {
    engine
        .treatment_candidates(disease_id)
        .expect("candidates")
        .into_iter()
        .map(|candidate| candidate.drug_id)
        .collect()
}

/// The minimal opposite-regulation motif: C1 up-regulates G1, brain
/// down-regulates G1, and D1 is localized in the brain.
fn minimal_motif() -> (Vec<NodeRow>, Vec<EdgeRow>) {
    let nodes = vec![
        node("Disease::D1", "epilepsy", "Disease"),
        node("Compound::C1", "valproate", "Compound"),
        node("Gene::G1", "GRIN2A", "Gene"),
        node("Anatomy::A1", "brain", "Anatomy"),
    ];
    let edges = vec![
        edge("Compound::C1", "Gene::G1", "CuG"),
        edge("Anatomy::A1", "Gene::G1", "AdG"),
        edge("Disease::D1", "Anatomy::A1", "DlA"),
    ];
    (nodes, edges)
}

#[test]
fn test_minimal_motif_yields_single_candidate() {
    let (nodes, edges) = minimal_motif();
    on_both_backends(&nodes, &edges, |engine, backend| {
        assert_eq!(
            candidate_ids(engine, "Disease::D1"),
            vec!["Compound::C1".to_string()],
            "{backend}"
        );
    });
}

#[test]
fn test_existing_treatment_is_excluded() {
    let (nodes, mut edges) = minimal_motif();
    edges.push(edge("Compound::C1", "Disease::D1", "CtD"));
    on_both_backends(&nodes, &edges, |engine, backend| {
        assert!(candidate_ids(engine, "Disease::D1").is_empty(), "{backend}");
    });
}

#[test]
fn test_palliating_compound_is_still_a_candidate() {
    // Only a CtD edge excludes; palliation is not treatment.
    let (nodes, mut edges) = minimal_motif();
    edges.push(edge("Compound::C1", "Disease::D1", "CpD"));
    on_both_backends(&nodes, &edges, |engine, backend| {
        assert_eq!(
            candidate_ids(engine, "Disease::D1"),
            vec!["Compound::C1".to_string()],
            "{backend}"
        );
    });
}

#[test]
fn test_opposite_regulation_symmetry() {
    // The mirrored branch: C down-regulates, anatomy up-regulates.
    let (nodes, _) = minimal_motif();
    let edges = vec![
        edge("Compound::C1", "Gene::G1", "CdG"),
        edge("Anatomy::A1", "Gene::G1", "AuG"),
        edge("Disease::D1", "Anatomy::A1", "DlA"),
    ];
    on_both_backends(&nodes, &edges, |engine, backend| {
        assert_eq!(
            candidate_ids(engine, "Disease::D1"),
            vec!["Compound::C1".to_string()],
            "{backend}"
        );
    });
}

#[test]
fn test_same_direction_regulation_does_not_match() {
    let (nodes, _) = minimal_motif();
    let edges = vec![
        edge("Compound::C1", "Gene::G1", "CuG"),
        edge("Anatomy::A1", "Gene::G1", "AuG"),
        edge("Disease::D1", "Anatomy::A1", "DlA"),
    ];
    on_both_backends(&nodes, &edges, |engine, backend| {
        assert!(candidate_ids(engine, "Disease::D1").is_empty(), "{backend}");
    });
}

#[test]
fn test_unlocalized_anatomy_does_not_match() {
    let (nodes, _) = minimal_motif();
    // Opposite regulation exists but the disease localizes nowhere.
    let edges = vec![
        edge("Compound::C1", "Gene::G1", "CuG"),
        edge("Anatomy::A1", "Gene::G1", "AdG"),
    ];
    on_both_backends(&nodes, &edges, |engine, backend| {
        assert!(candidate_ids(engine, "Disease::D1").is_empty(), "{backend}");
    });
}

#[test]
fn test_multiple_witnesses_report_compound_once() {
    let (mut nodes, mut edges) = minimal_motif();
    nodes.push(node("Gene::G2", "SCN1A", "Gene"));
    nodes.push(node("Anatomy::A2", "cortex", "Anatomy"));
    edges.push(edge("Compound::C1", "Gene::G2", "CdG"));
    edges.push(edge("Anatomy::A2", "Gene::G2", "AuG"));
    edges.push(edge("Disease::D1", "Anatomy::A2", "DlA"));
    on_both_backends(&nodes, &edges, |engine, backend| {
        assert_eq!(
            candidate_ids(engine, "Disease::D1"),
            vec!["Compound::C1".to_string()],
            "{backend}"
        );
    });
}

#[test]
fn test_candidates_for_absent_disease_are_empty() {
    let (nodes, edges) = minimal_motif();
    on_both_backends(&nodes, &edges, |engine, backend| {
        assert!(
            candidate_ids(engine, "Disease::UNKNOWN").is_empty(),
            "{backend}"
        );
    });
}

#[test]
fn test_profile_collects_all_three_relation_sets() {
    let nodes = vec![
        node("Disease::D1", "epilepsy", "Disease"),
        node("Compound::C1", "valproate", "Compound"),
        node("Compound::C2", "diazepam", "Compound"),
        node("Gene::G1", "GRIN2A", "Gene"),
        node("Anatomy::A1", "brain", "Anatomy"),
    ];
    let edges = vec![
        edge("Compound::C1", "Disease::D1", "CtD"),
        edge("Compound::C2", "Disease::D1", "CpD"),
        edge("Disease::D1", "Gene::G1", "DaG"),
        edge("Disease::D1", "Anatomy::A1", "DlA"),
        // Duplicate edge: set semantics on read.
        edge("Disease::D1", "Gene::G1", "DaG"),
    ];
    on_both_backends(&nodes, &edges, |engine, backend| {
        let profile = engine.disease_profile("Disease::D1").expect("profile");
        assert_eq!(profile.disease_name, "epilepsy", "{backend}");
        assert_eq!(
            profile.compound_names,
            vec!["diazepam".to_string(), "valproate".to_string()],
            "{backend}"
        );
        assert_eq!(profile.gene_names, vec!["GRIN2A".to_string()], "{backend}");
        assert_eq!(profile.anatomy_names, vec!["brain".to_string()], "{backend}");
    });
}

#[test]
fn test_profile_of_isolated_disease_is_empty_but_found() {
    let nodes = vec![node("Disease::D1", "epilepsy", "Disease")];
    on_both_backends(&nodes, &[], |engine, backend| {
        let profile = engine.disease_profile("Disease::D1").expect("profile");
        assert_eq!(profile.disease_name, "epilepsy", "{backend}");
        assert!(profile.compound_names.is_empty(), "{backend}");
        assert!(profile.gene_names.is_empty(), "{backend}");
        assert!(profile.anatomy_names.is_empty(), "{backend}");
    });
}

#[test]
fn test_profile_of_absent_disease_is_not_found() {
    let (nodes, edges) = minimal_motif();
    on_both_backends(&nodes, &edges, |engine, backend| {
        let err = engine.disease_profile("Disease::UNKNOWN").expect_err("absent");
        assert!(matches!(err, HetGraphError::NotFound(_)), "{backend}");
    });
}

#[test]
fn test_profile_anchor_must_be_a_disease() {
    let (nodes, edges) = minimal_motif();
    on_both_backends(&nodes, &edges, |engine, backend| {
        let err = engine.disease_profile("Gene::G1").expect_err("wrong kind");
        assert!(matches!(err, HetGraphError::NotFound(_)), "{backend}");
    });
}

#[test]
fn test_backends_agree_on_a_larger_snapshot() {
    let nodes = vec![
        node("Disease::D1", "epilepsy", "Disease"),
        node("Disease::D2", "migraine", "Disease"),
        node("Compound::C1", "valproate", "Compound"),
        node("Compound::C2", "diazepam", "Compound"),
        node("Compound::C3", "topiramate", "Compound"),
        node("Gene::G1", "GRIN2A", "Gene"),
        node("Gene::G2", "SCN1A", "Gene"),
        node("Anatomy::A1", "brain", "Anatomy"),
        node("Anatomy::A2", "cortex", "Anatomy"),
    ];
    let edges = vec![
        edge("Compound::C1", "Disease::D1", "CtD"),
        edge("Compound::C2", "Disease::D1", "CpD"),
        edge("Disease::D1", "Gene::G1", "DaG"),
        edge("Disease::D1", "Anatomy::A1", "DlA"),
        edge("Disease::D1", "Anatomy::A2", "DlA"),
        edge("Disease::D2", "Anatomy::A2", "DlA"),
        edge("Compound::C1", "Gene::G1", "CuG"),
        edge("Compound::C3", "Gene::G1", "CuG"),
        edge("Compound::C3", "Gene::G2", "CdG"),
        edge("Anatomy::A1", "Gene::G1", "AdG"),
        edge("Anatomy::A2", "Gene::G2", "AuG"),
    ];

    let graph = graph_backend(&nodes, &edges);
    let native = NativeQueryEngine::new(&graph);
    let store = document_backend(&nodes, &edges);
    let emulated = DocumentQueryEngine::new(&store);

    for disease in ["Disease::D1", "Disease::D2"] {
        assert_eq!(
            native.disease_profile(disease).unwrap(),
            emulated.disease_profile(disease).unwrap(),
        );
        assert_eq!(
            native.treatment_candidates(disease).unwrap(),
            emulated.treatment_candidates(disease).unwrap(),
        );
    }
}
