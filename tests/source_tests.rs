use std::fs;

use hetgraph::{read_edges_tsv, read_nodes_tsv};
use tempfile::tempdir;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write tsv");
    path
}

#[test]
fn test_reads_nodes_in_header_order() {
    let dir = tempdir().unwrap();
    let path = write_file(
        &dir,
        "nodes.tsv",
        "id\tname\tkind\nDisease::D1\tepilepsy\tDisease\nGene::G1\tGRIN2A\tGene\n",
    );
    let (rows, skipped) = read_nodes_tsv(&path).expect("read");
    assert_eq!(rows.len(), 2);
    assert_eq!(skipped, 0);
    assert_eq!(rows[0].id, "Disease::D1");
    assert_eq!(rows[1].name, "GRIN2A");
}

#[test]
fn test_header_order_is_free() {
    let dir = tempdir().unwrap();
    let path = write_file(
        &dir,
        "nodes.tsv",
        "kind\tid\tname\nDisease\tDisease::D1\tepilepsy\n",
    );
    let (rows, _) = read_nodes_tsv(&path).expect("read");
    assert_eq!(rows[0].id, "Disease::D1");
    assert_eq!(rows[0].name, "epilepsy");
    assert_eq!(rows[0].kind, "Disease");
}

#[test]
fn test_extra_columns_are_ignored() {
    let dir = tempdir().unwrap();
    let path = write_file(
        &dir,
        "edges.tsv",
        "source\tlicense\ttarget\tmetaedge\nCompound::C1\tCC0\tDisease::D1\tCtD\n",
    );
    let (rows, skipped) = read_edges_tsv(&path).expect("read");
    assert_eq!(skipped, 0);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source, "Compound::C1");
    assert_eq!(rows[0].metaedge, "CtD");
}

#[test]
fn test_missing_header_column_is_fatal() {
    let dir = tempdir().unwrap();
    let path = write_file(&dir, "nodes.tsv", "id\tname\nDisease::D1\tepilepsy\n");
    assert!(read_nodes_tsv(&path).is_err());
}

#[test]
fn test_incomplete_rows_are_counted_and_skipped() {
    let dir = tempdir().unwrap();
    let path = write_file(
        &dir,
        "nodes.tsv",
        "id\tname\tkind\nDisease::D1\tepilepsy\tDisease\nGene::G1\tGRIN2A\n\nGene::G2\t\tGene\n",
    );
    let (rows, skipped) = read_nodes_tsv(&path).expect("read");
    assert_eq!(rows.len(), 1);
    assert_eq!(skipped, 2);
}

#[test]
fn test_crlf_line_endings() {
    let dir = tempdir().unwrap();
    let path = write_file(
        &dir,
        "nodes.tsv",
        "id\tname\tkind\r\nDisease::D1\tepilepsy\tDisease\r\n",
    );
    let (rows, skipped) = read_nodes_tsv(&path).expect("read");
    assert_eq!(rows.len(), 1);
    assert_eq!(skipped, 0);
    assert_eq!(rows[0].kind, "Disease");
}
