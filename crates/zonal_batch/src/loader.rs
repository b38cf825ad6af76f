//! Road network input from CSV.
//!
//! Two comma-separated files with headers:
//!
//! - nodes: `node_id,x,y`
//! - links: `link_id,from_node,to_node`
//!
//! Links are added in file order, which fixes the order of resolution and of the
//! exported mapping.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;
use zonal_core::RoadNetwork;

use crate::error::BatchError;

#[derive(Debug, Clone, Deserialize)]
pub struct NodeRecord {
    pub node_id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkRecord {
    pub link_id: String,
    pub from_node: String,
    pub to_node: String,
}

pub fn read_nodes<R: Read>(reader: R) -> Result<Vec<NodeRecord>, BatchError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut nodes = Vec::new();
    for record in reader.deserialize() {
        nodes.push(record?);
    }
    Ok(nodes)
}

pub fn read_links<R: Read>(reader: R) -> Result<Vec<LinkRecord>, BatchError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut links = Vec::new();
    for record in reader.deserialize() {
        links.push(record?);
    }
    Ok(links)
}

/// Build a network from parsed records. Fails on duplicate ids or links that
/// reference an unknown node.
pub fn build_network(nodes: Vec<NodeRecord>, links: Vec<LinkRecord>) -> Result<RoadNetwork, BatchError> {
    let mut network = RoadNetwork::new();
    for node in nodes {
        network.add_node(node.node_id, node.x, node.y)?;
    }
    for link in links {
        network.add_link(link.link_id, link.from_node, link.to_node)?;
    }
    Ok(network)
}

/// Load a network from a nodes file and a links file.
pub fn load_network(
    nodes_path: impl AsRef<Path>,
    links_path: impl AsRef<Path>,
) -> Result<RoadNetwork, BatchError> {
    let nodes_path = nodes_path.as_ref();
    let links_path = links_path.as_ref();
    let nodes = read_nodes(File::open(nodes_path)?).map_err(|err| with_path(err, nodes_path))?;
    let links = read_links(File::open(links_path)?).map_err(|err| with_path(err, links_path))?;

    let network = build_network(nodes, links)?;
    info!(
        nodes = network.node_count(),
        links = network.link_count(),
        "loaded road network"
    );
    Ok(network)
}

fn with_path(err: BatchError, path: &Path) -> BatchError {
    match err {
        BatchError::Csv(source) => BatchError::Input {
            path: path.display().to_string(),
            source,
        },
        other => other,
    }
}
