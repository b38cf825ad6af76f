//! Memoized link → zone resolution.
//!
//! Each link is resolved by spatial query at most once per resolver, even when
//! several threads ask for the same uncached link at the same time. Results,
//! including "no zone", are kept for the resolver's lifetime; nothing is evicted
//! and cached zones are never re-validated.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use indexmap::IndexMap;
use tracing::debug;

use crate::centroid_index::{CentroidIndex, ZoneLocator};
use crate::error::ZonalError;
use crate::network::{LinkId, Network};
use crate::zones::ZoneId;

type Slot = Arc<OnceLock<Option<ZoneId>>>;

/// Link → zone assignments in first-request order.
///
/// A slot is created when a link is first requested and filled once its
/// spatial query finishes. Until then the link counts towards [`len`] but is
/// skipped by [`iter`].
///
/// [`len`]: LinkZoneCache::len
/// [`iter`]: LinkZoneCache::iter
#[derive(Debug, Default)]
pub struct LinkZoneCache {
    entries: IndexMap<LinkId, Slot>,
}

impl LinkZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if the link has no settled entry; `Some(None)` if it resolved to no zone.
    pub fn get(&self, link_id: &LinkId) -> Option<Option<&ZoneId>> {
        self.entries
            .get(link_id)
            .and_then(|slot| slot.get())
            .map(Option::as_ref)
    }

    pub fn contains(&self, link_id: &LinkId) -> bool {
        self.entries.contains_key(link_id)
    }

    /// Settled entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&LinkId, Option<&ZoneId>)> {
        self.entries
            .iter()
            .filter_map(|(link_id, slot)| slot.get().map(|zone| (link_id, zone.as_ref())))
    }

    /// Every cached link, including ones whose query is still running.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of links cached as having no zone.
    pub fn unresolved_count(&self) -> usize {
        self.iter().filter(|(_, zone)| zone.is_none()).count()
    }

    fn slot(&self, link_id: &LinkId) -> Option<&Slot> {
        self.entries.get(link_id)
    }

    fn insert_pending(&mut self, link_id: LinkId) -> Slot {
        Arc::clone(self.entries.entry(link_id).or_default())
    }
}

#[cfg(test)]
impl FromIterator<(LinkId, Option<ZoneId>)> for LinkZoneCache {
    fn from_iter<I: IntoIterator<Item = (LinkId, Option<ZoneId>)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(link_id, zone)| (link_id, Arc::new(OnceLock::from(zone))))
            .collect();
        Self { entries }
    }
}

/// Resolves network links to zones through a [`ZoneLocator`], caching every answer.
pub struct LinkZoneResolver<L = CentroidIndex> {
    network: Arc<dyn Network>,
    locator: L,
    cache: Mutex<LinkZoneCache>,
}

impl<L: ZoneLocator> LinkZoneResolver<L> {
    /// Start with an empty cache. Every cached zone id comes from `locator`.
    pub fn new(network: Arc<dyn Network>, locator: L) -> Self {
        Self {
            network,
            locator,
            cache: Mutex::new(LinkZoneCache::new()),
        }
    }

    /// Zone of `link_id`, or `None` when no zone could be found.
    ///
    /// The first call for a link queries the locator with the link's
    /// representative coordinate; every later call answers from the cache.
    /// Concurrent first calls for the same link share one query.
    ///
    /// # Errors
    ///
    /// [`ZonalError::UnknownLink`] if the network does not contain the link.
    /// Nothing is cached in that case.
    pub fn resolve_zone(&self, link_id: &LinkId) -> Result<Option<ZoneId>, ZonalError> {
        let slot = self.slot_for(link_id)?;
        let zone = slot.get_or_init(|| self.locate_link(link_id));
        Ok(zone.clone())
    }

    /// Reserve cache positions for `link_ids` in the given order without
    /// querying them, so that concurrent resolution still exports in a
    /// deterministic order.
    ///
    /// # Errors
    ///
    /// [`ZonalError::UnknownLink`] for the first link the network does not
    /// contain; no slot is reserved in that case.
    pub fn reserve<'a, I>(&self, link_ids: I) -> Result<(), ZonalError>
    where
        I: IntoIterator<Item = &'a LinkId>,
    {
        let link_ids: Vec<&LinkId> = link_ids.into_iter().collect();
        if let Some(unknown) = link_ids
            .iter()
            .find(|link_id| self.network.link_coord(link_id).is_none())
        {
            return Err(ZonalError::UnknownLink((*unknown).clone()));
        }
        let mut cache = self.lock_cache();
        for link_id in link_ids {
            if !cache.contains(link_id) {
                cache.insert_pending(link_id.clone());
            }
        }
        Ok(())
    }

    /// Lock the cache, e.g. to export it. Resolution of new links waits while
    /// the guard is held.
    pub fn cache(&self) -> MutexGuard<'_, LinkZoneCache> {
        self.lock_cache()
    }

    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn network(&self) -> &Arc<dyn Network> {
        &self.network
    }

    pub fn into_cache(self) -> LinkZoneCache {
        self.cache
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn slot_for(&self, link_id: &LinkId) -> Result<Slot, ZonalError> {
        let mut cache = self.lock_cache();
        if let Some(slot) = cache.slot(link_id) {
            return Ok(Arc::clone(slot));
        }
        if self.network.link_coord(link_id).is_none() {
            return Err(ZonalError::UnknownLink(link_id.clone()));
        }
        Ok(cache.insert_pending(link_id.clone()))
    }

    fn locate_link(&self, link_id: &LinkId) -> Option<ZoneId> {
        // Known to exist: slots are only created for links the network has.
        let coord = self.network.link_coord(link_id)?;
        let zone = self.locator.locate(coord);
        if zone.is_none() {
            debug!(link = %link_id, x = coord.x, y = coord.y, "no zone found for link");
        }
        zone
    }

    // Entries are only ever added whole, so a poisoned map is still consistent.
    fn lock_cache(&self) -> MutexGuard<'_, LinkZoneCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
