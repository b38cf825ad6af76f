//! Road network collaborator: node coordinates and per-link representative points.
//!
//! The zonal system only reads the network. [`Network`] is the seam the host
//! simulation implements; [`RoadNetwork`] is an in-memory implementation used by
//! the batch tooling and tests.

use std::fmt;

use geo::{Coord, Rect};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ZonalError;

/// Identifier of a directed network link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl LinkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LinkId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LinkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a network node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Read-only view of the road network supplied by the host simulation.
///
/// Implementations must be `Send + Sync` so a network can be shared by the
/// link resolver across worker threads.
pub trait Network: Send + Sync {
    /// Coordinates of every node, used to derive the addressable region.
    fn node_coords(&self) -> Box<dyn Iterator<Item = Coord<f64>> + '_>;

    /// Identifiers of every link, in the network's own order.
    fn link_ids(&self) -> Box<dyn Iterator<Item = &LinkId> + '_>;

    /// Representative coordinate of a link. `None` if the link is unknown.
    fn link_coord(&self, link_id: &LinkId) -> Option<Coord<f64>>;

    /// Bounding box of all node coordinates. `None` for a network without nodes.
    fn bounding_box(&self) -> Option<Rect<f64>> {
        bounding_box_of(self.node_coords())
    }
}

/// Smallest axis-aligned rectangle covering every coordinate.
pub fn bounding_box_of(coords: impl IntoIterator<Item = Coord<f64>>) -> Option<Rect<f64>> {
    let mut coords = coords.into_iter();
    let first = coords.next()?;
    let (mut min, mut max) = (first, first);
    for coord in coords {
        min.x = min.x.min(coord.x);
        min.y = min.y.min(coord.y);
        max.x = max.x.max(coord.x);
        max.y = max.y.max(coord.y);
    }
    Some(Rect::new(min, max))
}

/// A directed link between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub from: NodeId,
    pub to: NodeId,
    /// Representative point; the midpoint of the end nodes unless set explicitly.
    pub coord: Coord<f64>,
}

/// In-memory road network with insertion-ordered nodes and links.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    nodes: IndexMap<NodeId, Coord<f64>>,
    links: IndexMap<LinkId, Link>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: impl Into<NodeId>, x: f64, y: f64) -> Result<(), ZonalError> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(ZonalError::DuplicateNode(id));
        }
        self.nodes.insert(id, Coord { x, y });
        Ok(())
    }

    /// Add a link whose representative coordinate is the midpoint of its end nodes.
    pub fn add_link(
        &mut self,
        id: impl Into<LinkId>,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
    ) -> Result<(), ZonalError> {
        let from = from.into();
        let to = to.into();
        let start = self.require_node(&from)?;
        let end = self.require_node(&to)?;
        let coord = Coord {
            x: (start.x + end.x) * 0.5,
            y: (start.y + end.y) * 0.5,
        };
        self.insert_link(id.into(), from, to, coord)
    }

    /// Add a link with an explicit representative coordinate.
    pub fn add_link_with_coord(
        &mut self,
        id: impl Into<LinkId>,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        coord: Coord<f64>,
    ) -> Result<(), ZonalError> {
        let from = from.into();
        let to = to.into();
        self.require_node(&from)?;
        self.require_node(&to)?;
        self.insert_link(id.into(), from, to, coord)
    }

    pub fn node(&self, id: &NodeId) -> Option<Coord<f64>> {
        self.nodes.get(id).copied()
    }

    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    fn require_node(&self, id: &NodeId) -> Result<Coord<f64>, ZonalError> {
        self.node(id)
            .ok_or_else(|| ZonalError::UnknownNode(id.clone()))
    }

    fn insert_link(
        &mut self,
        id: LinkId,
        from: NodeId,
        to: NodeId,
        coord: Coord<f64>,
    ) -> Result<(), ZonalError> {
        if self.links.contains_key(&id) {
            return Err(ZonalError::DuplicateLink(id));
        }
        self.links.insert(
            id.clone(),
            Link {
                id,
                from,
                to,
                coord,
            },
        );
        Ok(())
    }
}

impl Network for RoadNetwork {
    fn node_coords(&self) -> Box<dyn Iterator<Item = Coord<f64>> + '_> {
        Box::new(self.nodes.values().copied())
    }

    fn link_ids(&self) -> Box<dyn Iterator<Item = &LinkId> + '_> {
        Box::new(self.links.keys())
    }

    fn link_coord(&self, link_id: &LinkId) -> Option<Coord<f64>> {
        self.links.get(link_id).map(|link| link.coord)
    }
}
