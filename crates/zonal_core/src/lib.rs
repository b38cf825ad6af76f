//! Zonal system for DRT wait-time analysis: splits a road network into zones
//! and assigns every network link to the zone whose centroid is nearest.
//!
//! - [`zones`]: zone polygons, from a square grid or supplied by the caller
//! - [`centroid_index`]: nearest-centroid lookup bounded by the network's extent
//! - [`link_resolver`]: memoized link → zone resolution
//! - [`mapping_export`]: `link_id;zone` text and Parquet export of the cache
//! - [`zonal_system`]: wires the pieces together for one run

pub mod centroid_index;
pub mod error;
pub mod link_resolver;
pub mod mapping_export;
pub mod network;
pub mod params;
pub mod zonal_system;
pub mod zones;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use centroid_index::{CentroidIndex, ZoneLocator};
pub use error::ZonalError;
pub use link_resolver::{LinkZoneCache, LinkZoneResolver};
pub use mapping_export::{
    export_link_zone_mapping, export_link_zone_parquet, write_link_zone_mapping, ExportSummary,
};
pub use network::{LinkId, Network, NodeId, RoadNetwork};
pub use params::ZonalSystemParams;
pub use zonal_system::ZonalSystem;
pub use zones::{Zone, ZoneId, ZoneSource, ZoneStore};
