//! Nearest-zone lookup over zone centroids.
//!
//! The addressable region is the bounding box of the network's nodes, not of the
//! zones. A zone whose centroid falls strictly outside that box is left out of
//! the index and can never be returned by [`CentroidIndex::nearest`], even when
//! it is the closest zone to the query point. Grid zones along the network's
//! edge are the usual victims, since the grid is snapped outward.

use std::sync::Arc;

use geo::{Coord, Rect};
use tracing::debug;

use crate::network::Network;
use crate::zones::{Zone, ZoneId, ZoneStore};

mod quadtree;

use quadtree::QuadTree;

/// Answers "which zone is closest to this point".
///
/// The link resolver depends on this seam rather than on [`CentroidIndex`]
/// directly. Implementations must be `Send + Sync` so one locator can serve
/// concurrent resolvers.
pub trait ZoneLocator: Send + Sync {
    fn locate(&self, coord: Coord<f64>) -> Option<ZoneId>;
}

/// Read-only spatial index of zone centroids.
#[derive(Debug, Clone)]
pub struct CentroidIndex {
    tree: Option<QuadTree<Arc<Zone>>>,
    excluded: usize,
}

impl CentroidIndex {
    /// Index `zones` over the network's node bounding box.
    pub fn build(network: &dyn Network, zones: &ZoneStore) -> Self {
        Self::with_bounds(network.bounding_box(), zones)
    }

    /// Index `zones` over an explicit region. `None` gives an empty index.
    ///
    /// Zones are inserted in store order, which is also the tie-break order of
    /// [`CentroidIndex::nearest`].
    pub fn with_bounds(bounds: Option<Rect<f64>>, zones: &ZoneStore) -> Self {
        let Some(bounds) = bounds else {
            debug!(zones = zones.len(), "no addressable region, centroid index is empty");
            return Self {
                tree: None,
                excluded: zones.len(),
            };
        };

        let mut tree = QuadTree::new(bounds);
        let mut excluded = 0;
        for zone in zones.iter() {
            let inserted = match zone.centroid() {
                Some(centroid) => tree.insert(centroid, Arc::clone(zone)),
                None => false,
            };
            if !inserted {
                excluded += 1;
            }
        }
        debug!(
            indexed = tree.len(),
            excluded,
            "built centroid index"
        );
        Self {
            tree: Some(tree),
            excluded,
        }
    }

    /// Zone whose centroid is closest to `(x, y)`.
    ///
    /// Among equidistant centroids the zone inserted first wins. Returns `None`
    /// when no zone made it into the index or when `x` or `y` is NaN or infinite.
    pub fn nearest(&self, x: f64, y: f64) -> Option<&Arc<Zone>> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        self.tree.as_ref()?.nearest(Coord { x, y })
    }

    /// Number of indexed zones.
    pub fn len(&self) -> usize {
        self.tree.as_ref().map_or(0, QuadTree::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zones left out because their centroid was outside the region or missing.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.tree.as_ref().map(QuadTree::bounds)
    }
}

impl ZoneLocator for CentroidIndex {
    fn locate(&self, coord: Coord<f64>) -> Option<ZoneId> {
        self.nearest(coord.x, coord.y).map(|zone| zone.id().clone())
    }
}

impl<L: ZoneLocator + ?Sized> ZoneLocator for Arc<L> {
    fn locate(&self, coord: Coord<f64>) -> Option<ZoneId> {
        (**self).locate(coord)
    }
}
