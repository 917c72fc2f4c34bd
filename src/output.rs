//! Result files for the visualization front end
//!
//! `nodes.json` and `edges.json` are written as 2-space pretty JSON arrays.

use crate::graph::{EdgeRecord, NodeRecord};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const NODES_FILE: &str = "nodes.json";
pub const EDGES_FILE: &str = "edges.json";

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON: {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {:?}", path))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON: {:?}", path))
}

/// Write nodes and edges into `output_dir`, creating it if needed
pub fn save_results(nodes: &[NodeRecord], edges: &[EdgeRecord], output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    write_json(&output_dir.join(NODES_FILE), nodes)?;
    write_json(&output_dir.join(EDGES_FILE), edges)?;

    tracing::info!(
        nodes = nodes.len(),
        edges = edges.len(),
        "Data saved to {:?}",
        output_dir
    );
    Ok(())
}

/// Read back the files written by `save_results`
pub fn load_results(output_dir: &Path) -> Result<(Vec<NodeRecord>, Vec<EdgeRecord>)> {
    let nodes = read_json(&output_dir.join(NODES_FILE))?;
    let edges = read_json(&output_dir.join(EDGES_FILE))?;
    Ok((nodes, edges))
}
