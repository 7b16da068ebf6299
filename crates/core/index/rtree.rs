//! R*-tree backed provider index.
//!
//! Providers are stored as degenerate point envelopes (`[lon, lat]`) in a
//! bulk-loaded R*-tree, with the full records in a hash map keyed by id. Both
//! live in one immutable [`Snapshot`]; `build` assembles a new snapshot off to
//! the side and swaps the `Arc` in, so a query sees either the old dataset or
//! the new one, never a mix.
//!
//! A query runs in two stages:
//!
//! 1. **Coarse**: the [`Prefilter`] envelopes select candidates from the tree.
//! 2. **Fine**: each candidate goes through the [`CandidateFilter`]
//!    (by default: geodesic distance within radius and open at the instant).
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveTime;
//! use servezone::{Provider, ProviderIndex, RTreeIndex};
//!
//! let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
//! let index = RTreeIndex::new();
//! index.build(vec![Provider::new(1, 51.1942536, 6.455508, 5.0, t(14), t(23))])?;
//!
//! assert_eq!(index.query(51.2, 6.45, Some(t(15)))?, vec![1]);
//! assert!(index.query(51.2, 6.45, Some(t(12)))?.is_empty());
//! # Ok::<(), servezone::ServeZoneError>(())
//! ```

use super::ProviderIndex;
use super::prefilter::Prefilter;
use crate::clock::{Clock, SystemClock};
use crate::compute::filter::{CandidateFilter, DistanceAndHours};
use crate::compute::validation::{validate_coordinate, validate_providers};
use crate::config::PrefilterConfig;
use crate::error::Result;
use chrono::NaiveTime;
use parking_lot::RwLock;
use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use servezone_types::provider::Provider;
use servezone_types::stats::IndexStats;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Provider position in the R*-tree.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedProvider {
    id: u64,
    position: [f64; 2],
}

impl IndexedProvider {
    fn new(provider: &Provider) -> Self {
        Self {
            id: provider.id,
            position: [provider.longitude, provider.latitude],
        }
    }
}

impl RTreeObject for IndexedProvider {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// One immutable generation of index content.
struct Snapshot {
    tree: RTree<IndexedProvider>,
    providers: FxHashMap<u64, Provider>,
    prefilter: Prefilter,
    max_radius_km: f64,
}

impl Snapshot {
    fn empty(config: &PrefilterConfig) -> Self {
        Self {
            tree: RTree::new(),
            providers: FxHashMap::default(),
            prefilter: Prefilter::new(config.max_radius_km, config.km_per_degree),
            max_radius_km: 0.0,
        }
    }

    /// Assumes `providers` passed validation (unique ids in particular).
    fn from_providers(providers: Vec<Provider>, config: &PrefilterConfig) -> Self {
        let max_radius_km = providers
            .iter()
            .map(|p| p.radius_km)
            .fold(0.0_f64, f64::max);

        let search_radius_km = if max_radius_km > config.max_radius_km {
            log::warn!(
                "Largest delivery radius ({} km) exceeds the configured prefilter bound ({} km); \
                widening the prefilter to match",
                max_radius_km,
                config.max_radius_km
            );
            max_radius_km
        } else {
            config.max_radius_km
        };

        let entries: Vec<IndexedProvider> = providers.iter().map(IndexedProvider::new).collect();

        let mut by_id = FxHashMap::default();
        by_id.reserve(providers.len());
        for provider in providers {
            by_id.insert(provider.id, provider);
        }

        Self {
            tree: RTree::bulk_load(entries),
            providers: by_id,
            prefilter: Prefilter::new(search_radius_km, config.km_per_degree),
            max_radius_km,
        }
    }
}

/// Spatial index over providers using an R*-tree prefilter.
pub struct RTreeIndex {
    snapshot: RwLock<Arc<Snapshot>>,
    config: PrefilterConfig,
    filter: Arc<dyn CandidateFilter>,
    clock: Arc<dyn Clock>,
    queries: AtomicU64,
    candidates_examined: AtomicU64,
}

impl RTreeIndex {
    /// Empty index with the default 100 km prefilter bound.
    pub fn new() -> Self {
        Self::with_config(PrefilterConfig::default())
    }

    pub fn with_config(config: PrefilterConfig) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::empty(&config))),
            config,
            filter: Arc::new(DistanceAndHours::new()),
            clock: Arc::new(SystemClock),
            queries: AtomicU64::new(0),
            candidates_examined: AtomicU64::new(0),
        }
    }

    /// Replace the fine filter.
    pub fn with_filter(mut self, filter: Arc<dyn CandidateFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the clock consulted for queries without an instant.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Provider record by id.
    pub fn provider(&self, id: u64) -> Option<Provider> {
        self.current().providers.get(&id).cloned()
    }

    /// Radius the coarse prefilter currently searches, in kilometres.
    pub fn prefilter_radius_km(&self) -> f64 {
        self.current().prefilter.radius_km()
    }

    pub fn stats(&self) -> IndexStats {
        let snapshot = self.current();
        IndexStats {
            providers: snapshot.providers.len(),
            queries: self.queries.load(Ordering::Relaxed),
            candidates_examined: self.candidates_examined.load(Ordering::Relaxed),
            max_radius_km: snapshot.max_radius_km,
        }
    }

    #[inline]
    fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read())
    }
}

impl Default for RTreeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderIndex for RTreeIndex {
    fn build(&self, providers: Vec<Provider>) -> Result<()> {
        validate_providers(&providers)?;

        let count = providers.len();
        let snapshot = Arc::new(Snapshot::from_providers(providers, &self.config));
        let radius = snapshot.prefilter.radius_km();

        *self.snapshot.write() = snapshot;
        self.queries.store(0, Ordering::Relaxed);
        self.candidates_examined.store(0, Ordering::Relaxed);

        log::debug!(
            "Built R*-tree index with {} providers (prefilter radius {} km)",
            count,
            radius
        );
        Ok(())
    }

    fn query(&self, latitude: f64, longitude: f64, at: Option<NaiveTime>) -> Result<Vec<u64>> {
        validate_coordinate(latitude, longitude)?;

        let snapshot = self.current();
        self.queries.fetch_add(1, Ordering::Relaxed);
        if snapshot.providers.is_empty() {
            return Ok(Vec::new());
        }

        let at = at.unwrap_or_else(|| self.clock.time_of_day());
        let mut examined = 0u64;
        let mut available = Vec::new();

        for envelope in snapshot.prefilter.envelopes(latitude, longitude) {
            for entry in snapshot.tree.locate_in_envelope_intersecting(&envelope) {
                examined += 1;
                let Some(provider) = snapshot.providers.get(&entry.id) else {
                    continue;
                };
                if self.filter.accepts(provider, latitude, longitude, at) {
                    available.push(entry.id);
                }
            }
        }

        self.candidates_examined
            .fetch_add(examined, Ordering::Relaxed);

        available.sort_unstable();
        available.dedup();
        Ok(available)
    }

    fn len(&self) -> usize {
        self.current().providers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::compute::filter::MinRating;
    use crate::error::ServeZoneError;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn noon_index() -> RTreeIndex {
        RTreeIndex::new().with_clock(Arc::new(FixedClock(t(12, 0, 0))))
    }

    fn provider(id: u64, latitude: f64, longitude: f64, radius_km: f64) -> Provider {
        Provider::new(id, latitude, longitude, radius_km, t(0, 0, 0), t(23, 59, 59))
    }

    #[test]
    fn test_query_before_build_is_empty() {
        let index = noon_index();
        assert!(index.is_empty());
        assert!(index.query(51.2, 6.45, Some(t(15, 0, 0))).unwrap().is_empty());
    }

    #[test]
    fn test_build_with_no_providers() {
        let index = noon_index();
        index.build(Vec::new()).unwrap();
        assert!(index.query(0.0, 0.0, None).unwrap().is_empty());
    }

    #[test]
    fn test_every_provider_retrievable_by_id() {
        let index = noon_index();
        let providers: Vec<_> = (0..50)
            .map(|i| provider(i, 40.0 + i as f64 * 0.01, -74.0, 1.0))
            .collect();
        index.build(providers.clone()).unwrap();

        assert_eq!(index.len(), 50);
        for p in &providers {
            assert_eq!(index.provider(p.id).as_ref(), Some(p));
        }
        assert!(index.provider(999).is_none());
    }

    #[test]
    fn test_results_sorted_by_id() {
        let index = noon_index();
        index
            .build(vec![
                provider(30, 40.0, -74.0, 5.0),
                provider(10, 40.001, -74.0, 5.0),
                provider(20, 40.0, -74.001, 5.0),
            ])
            .unwrap();

        assert_eq!(index.query(40.0, -74.0, None).unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn test_rebuild_replaces_content() {
        let index = noon_index();
        index.build(vec![provider(1, 40.0, -74.0, 5.0)]).unwrap();
        index.build(vec![provider(2, 40.0, -74.0, 5.0)]).unwrap();

        assert_eq!(index.query(40.0, -74.0, None).unwrap(), vec![2]);
        assert!(index.provider(1).is_none());
    }

    #[test]
    fn test_failed_build_keeps_previous_snapshot() {
        let index = noon_index();
        index.build(vec![provider(1, 40.0, -74.0, 5.0)]).unwrap();

        let err = index
            .build(vec![provider(2, 40.0, -74.0, 5.0), provider(2, 41.0, -74.0, 5.0)])
            .unwrap_err();
        assert!(matches!(err, ServeZoneError::DuplicateProvider(2)));
        assert_eq!(index.query(40.0, -74.0, None).unwrap(), vec![1]);
    }

    #[test]
    fn test_invalid_query_coordinates() {
        let index = noon_index();
        assert!(index.query(f64::NAN, 0.0, None).is_err());
        assert!(index.query(0.0, 181.0, None).is_err());
    }

    #[test]
    fn test_large_radius_widens_prefilter() {
        // 200 km away with a 250 km radius: a fixed 100 km box would drop it.
        let index = noon_index();
        index.build(vec![provider(1, 41.8, -74.0, 250.0)]).unwrap();

        assert_eq!(index.prefilter_radius_km(), 250.0);
        assert_eq!(index.query(40.0, -74.0, None).unwrap(), vec![1]);
    }

    #[test]
    fn test_high_latitude_longitude_spread() {
        // ~90 km due east at 70°N is ~2.4° of longitude.
        let index = noon_index();
        index.build(vec![provider(1, 70.0, 22.37, 95.0)]).unwrap();
        assert_eq!(index.query(70.0, 20.0, None).unwrap(), vec![1]);
    }

    #[test]
    fn test_across_antimeridian() {
        let index = noon_index();
        index.build(vec![provider(1, -16.0, 179.99, 5.0)]).unwrap();
        assert_eq!(index.query(-16.0, -179.99, None).unwrap(), vec![1]);
    }

    #[test]
    fn test_missing_instant_uses_clock() {
        let open = Provider::new(1, 40.0, -74.0, 5.0, t(14, 0, 0), t(23, 0, 0));

        let afternoon = RTreeIndex::new().with_clock(Arc::new(FixedClock(t(15, 0, 0))));
        afternoon.build(vec![open.clone()]).unwrap();
        assert_eq!(afternoon.query(40.0, -74.0, None).unwrap(), vec![1]);

        let morning = RTreeIndex::new().with_clock(Arc::new(FixedClock(t(9, 0, 0))));
        morning.build(vec![open]).unwrap();
        assert!(morning.query(40.0, -74.0, None).unwrap().is_empty());
        // An explicit instant wins over the clock
        assert_eq!(morning.query(40.0, -74.0, Some(t(15, 0, 0))).unwrap(), vec![1]);
    }

    #[test]
    fn test_custom_filter() {
        let filter = MinRating::new(DistanceAndHours::new(), 4.5);
        let index = noon_index().with_filter(Arc::new(filter));
        index
            .build(vec![
                provider(1, 40.0, -74.0, 5.0).with_rating(4.7),
                provider(2, 40.0, -74.0, 5.0).with_rating(4.0),
            ])
            .unwrap();
        assert_eq!(index.query(40.0, -74.0, None).unwrap(), vec![1]);
    }

    #[test]
    fn test_stats_track_prefilter_work() {
        let index = noon_index();
        index
            .build(vec![
                provider(1, 40.0, -74.0, 1.0),
                provider(2, 40.5, -74.0, 1.0),
                provider(3, 10.0, 10.0, 1.0),
            ])
            .unwrap();

        index.query(40.0, -74.0, None).unwrap();
        let stats = index.stats();
        assert_eq!(stats.providers, 3);
        assert_eq!(stats.queries, 1);
        // The far provider never reaches the fine filter
        assert_eq!(stats.candidates_examined, 2);
        assert_eq!(stats.max_radius_km, 1.0);

        index.build(Vec::new()).unwrap();
        assert_eq!(index.stats().queries, 0);
    }
}
