use std::{env, process};

use serde_json::json;

use hetgraph::{
    DocumentQueryEngine, DocumentStore, EdgePartition, HetGraph, HetGraphError, LoadConfig,
    NativeQueryEngine, QueryBackend, mirror, read_edges_tsv, read_nodes_tsv, rebuild,
};

const HELP: &str = "\
hetgraph - embedded biomedical knowledge graph

USAGE:
    hetgraph <command> [options]

COMMANDS:
    rebuild                  rebuild the graph store from --nodes/--edges
    profile <disease-id>     what is known about a disease
    candidates <disease-id>  untried compounds plausibly treating a disease
    status                   node and edge counts of the graph store

OPTIONS:
    --db <path|memory>          graph database location (default: hetgraph.db)
    --nodes <path>              nodes TSV (id, name, kind)
    --edges <path>              edges TSV (source, target, metaedge)
    --backend <graph|document>  query backend (default: graph); the document
                                backend mirrors --nodes/--edges in memory
    --batch-size <n>            rows per load transaction (default: 1000)
    --chunked                   partition edge batches by fixed chunks
                                instead of by relation type
";

struct CliConfig {
    command: String,
    disease_id: Option<String>,
    db: String,
    nodes: Option<String>,
    edges: Option<String>,
    backend: String,
    batch_size: usize,
    chunked: bool,
}

impl CliConfig {
    fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut command = None;
        let mut disease_id = None;
        let mut db = "hetgraph.db".to_string();
        let mut nodes = None;
        let mut edges = None;
        let mut backend = "graph".to_string();
        let mut batch_size = 1000usize;
        let mut chunked = false;

        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match *arg {
                "--db" => db = take_value(&mut iter, "--db")?,
                "--nodes" => nodes = Some(take_value(&mut iter, "--nodes")?),
                "--edges" => edges = Some(take_value(&mut iter, "--edges")?),
                "--backend" => backend = take_value(&mut iter, "--backend")?,
                "--batch-size" => {
                    batch_size = take_value(&mut iter, "--batch-size")?
                        .parse()
                        .map_err(|_| "--batch-size expects a positive integer".to_string())?;
                }
                "--chunked" => chunked = true,
                other if other.starts_with("--") => {
                    return Err(format!("unknown option {other}"));
                }
                positional => {
                    if command.is_none() {
                        command = Some(positional.to_string());
                    } else if disease_id.is_none() {
                        disease_id = Some(positional.to_string());
                    } else {
                        return Err(format!("unexpected argument {positional}"));
                    }
                }
            }
        }

        let command = command.ok_or("missing command, try --help")?;
        if backend != "graph" && backend != "document" {
            return Err(format!("unsupported backend {backend}"));
        }
        Ok(Self {
            command,
            disease_id,
            db,
            nodes,
            edges,
            backend,
            batch_size,
            chunked,
        })
    }
}

fn take_value(iter: &mut dyn Iterator<Item = &&str>, option: &str) -> Result<String, String> {
    iter.next()
        .map(|value| value.to_string())
        .ok_or_else(|| format!("{option} expects a value"))
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{HELP}");
        return;
    }
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match CliConfig::from_args(&arg_refs) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    if let Err(err) = run_command(&config) {
        eprintln!("command failed: {err}");
        process::exit(1);
    }
}

fn run_command(config: &CliConfig) -> Result<(), HetGraphError> {
    match config.command.as_str() {
        "rebuild" => run_rebuild(config),
        "profile" | "candidates" => run_query(config),
        "status" => {
            let graph = open_graph(config)?;
            let status = json!({
                "nodes": graph.node_count()?,
                "edges": graph.edge_count()?,
            });
            println!("{status}");
            Ok(())
        }
        other => Err(HetGraphError::invalid_input(format!(
            "unknown command {other}, try --help"
        ))),
    }
}

fn run_rebuild(config: &CliConfig) -> Result<(), HetGraphError> {
    let (nodes, edges) = read_row_sets(config)?;
    let graph = open_graph(config)?;
    let load_config = LoadConfig {
        batch_size: config.batch_size,
        partition: if config.chunked {
            EdgePartition::FixedChunk
        } else {
            EdgePartition::ByRelationType
        },
    };
    let report = rebuild(&graph, &nodes, &edges, &load_config)?;
    let report =
        serde_json::to_string(&report).map_err(|e| HetGraphError::query(e.to_string()))?;
    println!("{report}");
    Ok(())
}

fn run_query(config: &CliConfig) -> Result<(), HetGraphError> {
    let disease_id = config
        .disease_id
        .as_deref()
        .ok_or_else(|| HetGraphError::invalid_input("expected a disease id argument"))?;

    match config.backend.as_str() {
        "graph" => {
            let graph = open_graph(config)?;
            let engine = NativeQueryEngine::new(&graph);
            print_result(&engine, &config.command, disease_id)
        }
        _ => {
            let (nodes, edges) = read_row_sets(config)?;
            let store = DocumentStore::new();
            mirror(&store, &nodes, &edges)?;
            let engine = DocumentQueryEngine::new(&store);
            print_result(&engine, &config.command, disease_id)
        }
    }
}

fn print_result(
    engine: &dyn QueryBackend,
    command: &str,
    disease_id: &str,
) -> Result<(), HetGraphError> {
    let result = if command == "profile" {
        match engine.disease_profile(disease_id) {
            Ok(profile) => serde_json::to_value(profile),
            Err(HetGraphError::NotFound(what)) => {
                println!("{}", json!({ "not_found": what }));
                return Ok(());
            }
            Err(err) => return Err(err),
        }
    } else {
        engine.treatment_candidates(disease_id).map(serde_json::to_value)?
    };
    let result = result.map_err(|e| HetGraphError::query(e.to_string()))?;
    println!("{result}");
    Ok(())
}

fn read_row_sets(
    config: &CliConfig,
) -> Result<(Vec<hetgraph::NodeRow>, Vec<hetgraph::EdgeRow>), HetGraphError> {
    let nodes_path = config
        .nodes
        .as_deref()
        .ok_or_else(|| HetGraphError::invalid_input("--nodes <path> is required"))?;
    let edges_path = config
        .edges
        .as_deref()
        .ok_or_else(|| HetGraphError::invalid_input("--edges <path> is required"))?;
    let (nodes, skipped_nodes) = read_nodes_tsv(nodes_path)?;
    let (edges, skipped_edges) = read_edges_tsv(edges_path)?;
    if skipped_nodes > 0 || skipped_edges > 0 {
        eprintln!("skipped {skipped_nodes} node rows and {skipped_edges} edge rows");
    }
    Ok((nodes, edges))
}

fn open_graph(config: &CliConfig) -> Result<HetGraph, HetGraphError> {
    if config.db == "memory" {
        HetGraph::open_in_memory()
    } else {
        HetGraph::open(&config.db)
    }
}
