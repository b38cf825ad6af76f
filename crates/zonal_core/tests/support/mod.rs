#![allow(dead_code)]

use std::sync::Arc;

use zonal_core::test_helpers::lattice_network;
use zonal_core::{Network, RoadNetwork};

/// 5 x 4 lattice with 100 m spacing: nodes span x 0..400, y 0..300.
pub fn city_network() -> Arc<RoadNetwork> {
    Arc::new(lattice_network(5, 4, 100.0))
}

pub fn as_dyn(network: &Arc<RoadNetwork>) -> Arc<dyn Network> {
    Arc::clone(network) as Arc<dyn Network>
}
