//! Test helpers for common test setup and utilities.
//!
//! Shared by unit tests, integration tests and benches.

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::{Coord, LineString, Polygon};

use crate::centroid_index::ZoneLocator;
use crate::network::RoadNetwork;
use crate::zones::ZoneId;

/// Axis-aligned square centred on `(cx, cy)` extending `half` in each direction.
pub fn square_around(cx: f64, cy: f64, half: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (cx - half, cy - half),
            (cx + half, cy - half),
            (cx + half, cy + half),
            (cx - half, cy + half),
            (cx - half, cy - half),
        ]),
        Vec::new(),
    )
}

/// Lattice network of `columns` x `rows` nodes spaced `spacing` apart, with a
/// link in each direction between horizontal and vertical neighbours.
///
/// Nodes are named `n{column}_{row}`, links `{from}-{to}`.
///
/// # Panics
///
/// Never for the ids generated here; duplicates are impossible.
pub fn lattice_network(columns: usize, rows: usize, spacing: f64) -> RoadNetwork {
    let mut network = RoadNetwork::new();
    let name = |c: usize, r: usize| format!("n{c}_{r}");
    for c in 0..columns {
        for r in 0..rows {
            network
                .add_node(name(c, r), c as f64 * spacing, r as f64 * spacing)
                .expect("lattice node ids are unique");
        }
    }
    for c in 0..columns {
        for r in 0..rows {
            let mut neighbours = Vec::new();
            if c + 1 < columns {
                neighbours.push(name(c + 1, r));
            }
            if r + 1 < rows {
                neighbours.push(name(c, r + 1));
            }
            for other in neighbours {
                let here = name(c, r);
                network
                    .add_link(format!("{here}-{other}"), here.as_str(), other.as_str())
                    .expect("lattice link ids are unique");
                network
                    .add_link(format!("{other}-{here}"), other.as_str(), here.as_str())
                    .expect("lattice link ids are unique");
            }
        }
    }
    network
}

/// Wraps a locator and counts how many spatial queries reach it.
#[derive(Debug)]
pub struct CountingLocator<L> {
    inner: L,
    queries: AtomicUsize,
}

impl<L> CountingLocator<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: ZoneLocator> ZoneLocator for CountingLocator<L> {
    fn locate(&self, coord: Coord<f64>) -> Option<ZoneId> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.locate(coord)
    }
}
