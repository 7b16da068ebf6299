//! Exhaustive scan index.
//!
//! Checks every provider on every query. Slower than [`RTreeIndex`] past a
//! few hundred providers but has no prefilter to get wrong, which makes it
//! the reference the tree is tested against.
//!
//! [`RTreeIndex`]: super::RTreeIndex

use super::ProviderIndex;
use crate::clock::{Clock, SystemClock};
use crate::compute::filter::{CandidateFilter, DistanceAndHours};
use crate::compute::validation::{validate_coordinate, validate_providers};
use crate::error::Result;
use chrono::NaiveTime;
use parking_lot::RwLock;
use servezone_types::provider::Provider;
use servezone_types::stats::IndexStats;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct LinearIndex {
    /// Sorted by id so matches come out in ascending order.
    providers: RwLock<Arc<Vec<Provider>>>,
    filter: Arc<dyn CandidateFilter>,
    clock: Arc<dyn Clock>,
    queries: AtomicU64,
    candidates_examined: AtomicU64,
}

impl LinearIndex {
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(Arc::new(Vec::new())),
            filter: Arc::new(DistanceAndHours::new()),
            clock: Arc::new(SystemClock),
            queries: AtomicU64::new(0),
            candidates_examined: AtomicU64::new(0),
        }
    }

    pub fn with_filter(mut self, filter: Arc<dyn CandidateFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn stats(&self) -> IndexStats {
        let providers = self.current();
        IndexStats {
            providers: providers.len(),
            queries: self.queries.load(Ordering::Relaxed),
            candidates_examined: self.candidates_examined.load(Ordering::Relaxed),
            max_radius_km: providers.iter().map(|p| p.radius_km).fold(0.0, f64::max),
        }
    }

    #[inline]
    fn current(&self) -> Arc<Vec<Provider>> {
        Arc::clone(&self.providers.read())
    }
}

impl Default for LinearIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderIndex for LinearIndex {
    fn build(&self, mut providers: Vec<Provider>) -> Result<()> {
        validate_providers(&providers)?;
        providers.sort_unstable_by_key(|p| p.id);

        let count = providers.len();
        *self.providers.write() = Arc::new(providers);
        self.queries.store(0, Ordering::Relaxed);
        self.candidates_examined.store(0, Ordering::Relaxed);

        log::debug!("Built linear index with {} providers", count);
        Ok(())
    }

    fn query(&self, latitude: f64, longitude: f64, at: Option<NaiveTime>) -> Result<Vec<u64>> {
        validate_coordinate(latitude, longitude)?;

        let providers = self.current();
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.candidates_examined
            .fetch_add(providers.len() as u64, Ordering::Relaxed);

        let at = at.unwrap_or_else(|| self.clock.time_of_day());
        Ok(providers
            .iter()
            .filter(|p| self.filter.accepts(p, latitude, longitude, at))
            .map(|p| p.id)
            .collect())
    }

    fn len(&self) -> usize {
        self.providers.read().len()
    }
}
