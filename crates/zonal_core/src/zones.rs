//! Zone geometry store: zone polygons keyed by zone id.
//!
//! Zones come either from a regular square grid laid over the network
//! ([`ZoneStore::grid_from_network`]) or from caller-supplied polygons
//! ([`ZoneStore::from_polygons`]). The set is fixed once built.

use std::fmt;
use std::sync::Arc;

use geo::{BoundingRect, Centroid, Coord, Intersects, Polygon, Rect};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ZonalError;
use crate::network::Network;

mod grid;

pub use grid::MAX_GRID_CELLS;

/// Identifier of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ZoneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A zone polygon with its centroid and bounding box computed up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    id: ZoneId,
    polygon: Polygon<f64>,
    centroid: Option<Coord<f64>>,
    bbox: Option<Rect<f64>>,
}

impl Zone {
    pub fn new(id: impl Into<ZoneId>, polygon: Polygon<f64>) -> Self {
        let centroid = polygon.centroid().map(|point| point.0);
        let bbox = polygon.bounding_rect();
        Self {
            id: id.into(),
            polygon,
            centroid,
            bbox,
        }
    }

    pub fn id(&self) -> &ZoneId {
        &self.id
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// `None` for an empty polygon.
    pub fn centroid(&self) -> Option<Coord<f64>> {
        self.centroid
    }

    /// Whether the point lies inside the zone or on its boundary.
    pub fn covers(&self, coord: Coord<f64>) -> bool {
        let Some(bbox) = self.bbox else {
            return false;
        };
        let (min, max) = (bbox.min(), bbox.max());
        if coord.x < min.x || coord.x > max.x || coord.y < min.y || coord.y > max.y {
            return false;
        }
        self.polygon.intersects(&coord)
    }
}

/// Where the zone set comes from.
#[derive(Debug, Clone)]
pub enum ZoneSource {
    /// Square cells of the given edge length laid over the network.
    Grid { cell_size: f64 },
    /// Caller-supplied polygons, kept in the given order.
    Polygons(Vec<(ZoneId, Polygon<f64>)>),
}

/// Immutable, insertion-ordered set of zones.
#[derive(Debug, Clone, Default)]
pub struct ZoneStore {
    zones: IndexMap<ZoneId, Arc<Zone>>,
}

impl ZoneStore {
    pub fn from_source(network: &dyn Network, source: ZoneSource) -> Result<Self, ZonalError> {
        match source {
            ZoneSource::Grid { cell_size } => Self::grid_from_network(network, cell_size),
            ZoneSource::Polygons(polygons) => Self::from_polygons(polygons),
        }
    }

    /// Build a store from `(id, polygon)` pairs. Duplicate ids are rejected.
    pub fn from_polygons<I, Z>(zones: I) -> Result<Self, ZonalError>
    where
        I: IntoIterator<Item = (Z, Polygon<f64>)>,
        Z: Into<ZoneId>,
    {
        let mut store = IndexMap::new();
        for (id, polygon) in zones {
            let zone = Zone::new(id, polygon);
            if store.contains_key(zone.id()) {
                return Err(ZonalError::DuplicateZone(zone.id));
            }
            store.insert(zone.id.clone(), Arc::new(zone));
        }
        Ok(Self { zones: store })
    }

    /// Cover the network's node bounding box with square cells of `cell_size`.
    ///
    /// The box is snapped outward to multiples of `cell_size`; cells are numbered
    /// from `"1"` walking x-columns first, then y within each column.
    pub fn grid_from_network(network: &dyn Network, cell_size: f64) -> Result<Self, ZonalError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ZonalError::InvalidCellSize(cell_size));
        }
        let Some(bounds) = network.bounding_box() else {
            warn!("network has no nodes, zone grid is empty");
            return Ok(Self::default());
        };
        Self::from_polygons(grid::square_cells(bounds, cell_size)?)
    }

    pub fn get(&self, id: &ZoneId) -> Option<&Arc<Zone>> {
        self.zones.get(id)
    }

    /// Geometry of a zone, `None` if the id is unknown.
    pub fn zone(&self, id: &ZoneId) -> Option<&Polygon<f64>> {
        self.zones.get(id).map(|zone| zone.polygon())
    }

    pub fn contains(&self, id: &ZoneId) -> bool {
        self.zones.contains_key(id)
    }

    /// First zone (in store order) whose polygon covers the point.
    pub fn zone_containing(&self, coord: Coord<f64>) -> Option<&Arc<Zone>> {
        self.zones.values().find(|zone| zone.covers(coord))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Zone>> {
        self.zones.values()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
