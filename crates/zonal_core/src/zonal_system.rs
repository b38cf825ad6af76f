//! Composition root: zone store, centroid index and link resolver wired together.

use std::path::Path;
use std::sync::Arc;

use geo::Polygon;
use tracing::info;

use crate::centroid_index::CentroidIndex;
use crate::error::ZonalError;
use crate::link_resolver::{LinkZoneCache, LinkZoneResolver};
use crate::mapping_export::{export_link_zone_mapping, export_link_zone_parquet, ExportSummary};
use crate::network::{LinkId, Network};
use crate::params::ZonalSystemParams;
use crate::zones::{ZoneId, ZoneSource, ZoneStore};

/// Zonal system for one simulation run.
///
/// Built once from the network and a zone source; afterwards only the link
/// cache changes.
pub struct ZonalSystem {
    zones: ZoneStore,
    resolver: LinkZoneResolver<CentroidIndex>,
}

impl ZonalSystem {
    /// Grid zones with the cell size from `params`.
    ///
    /// # Errors
    ///
    /// [`ZonalError::MissingCellSize`] or [`ZonalError::InvalidCellSize`] when
    /// the cell size is absent or unusable.
    pub fn build(network: Arc<dyn Network>, params: &ZonalSystemParams) -> Result<Self, ZonalError> {
        let cell_size = params.require_cell_size()?;
        Self::from_source(network, ZoneSource::Grid { cell_size })
    }

    pub fn from_source(network: Arc<dyn Network>, source: ZoneSource) -> Result<Self, ZonalError> {
        let zones = ZoneStore::from_source(network.as_ref(), source)?;
        Ok(Self::with_zones(network, zones))
    }

    pub fn with_zones(network: Arc<dyn Network>, zones: ZoneStore) -> Self {
        let index = CentroidIndex::build(network.as_ref(), &zones);
        info!(
            zones = zones.len(),
            indexed = index.len(),
            excluded = index.excluded(),
            "built zonal system"
        );
        let resolver = LinkZoneResolver::new(network, index);
        Self { zones, resolver }
    }

    /// Geometry of a zone, `None` if the id is unknown.
    pub fn zone(&self, id: &ZoneId) -> Option<&Polygon<f64>> {
        self.zones.zone(id)
    }

    /// Memoized zone of a link. See [`LinkZoneResolver::resolve_zone`].
    pub fn zone_for_link(&self, link_id: &LinkId) -> Result<Option<ZoneId>, ZonalError> {
        self.resolver.resolve_zone(link_id)
    }

    pub fn zones(&self) -> &ZoneStore {
        &self.zones
    }

    pub fn index(&self) -> &CentroidIndex {
        self.resolver.locator()
    }

    pub fn resolver(&self) -> &LinkZoneResolver<CentroidIndex> {
        &self.resolver
    }

    pub fn network(&self) -> &Arc<dyn Network> {
        self.resolver.network()
    }

    /// Write the link cache as `;`-delimited text.
    pub fn write_link_to_zone(&self, path: impl AsRef<Path>) -> Result<ExportSummary, ZonalError> {
        export_link_zone_mapping(&self.resolver.cache(), path)
    }

    /// Write the link cache as Parquet.
    pub fn write_link_to_zone_parquet(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<ExportSummary, ZonalError> {
        export_link_zone_parquet(&self.resolver.cache(), path)
    }

    pub fn into_cache(self) -> LinkZoneCache {
        self.resolver.into_cache()
    }
}
