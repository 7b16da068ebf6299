//! Result cache layered over any [`ProviderIndex`].
//!
//! Results are memoized under a quantized key: coordinates rounded to four
//! decimal places (about 11 m) and the instant truncated to whole minutes.
//! Queries without an instant share one key per location, so their results
//! reflect whatever time the wrapped index evaluated on the first miss.
//!
//! Entries are evicted least recently used first. `build` always empties the
//! cache and resets its counters.

use super::ProviderIndex;
use crate::compute::hours::minute_of_day;
use crate::compute::validation::validate_coordinate;
use crate::error::{Result, ServeZoneError};
use chrono::NaiveTime;
use lru::LruCache;
use parking_lot::Mutex;
use servezone_types::provider::Provider;
use servezone_types::stats::CacheStats;
use std::num::NonZeroUsize;

/// Default number of cached query results.
pub const DEFAULT_CAPACITY: usize = 1000;

const COORDINATE_SCALE: f64 = 10_000.0;

/// Quantized query signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_e4: i64,
    lon_e4: i64,
    /// `None` when the query carried no instant
    minute: Option<u16>,
}

impl CacheKey {
    /// Round coordinates to four decimals and drop the seconds of `at`.
    ///
    /// ```
    /// use chrono::NaiveTime;
    /// use servezone::CacheKey;
    ///
    /// let a = CacheKey::quantize(51.20004, 6.45, NaiveTime::from_hms_opt(15, 0, 10));
    /// let b = CacheKey::quantize(51.19996, 6.45, NaiveTime::from_hms_opt(15, 0, 59));
    /// assert_eq!(a, b);
    /// ```
    pub fn quantize(latitude: f64, longitude: f64, at: Option<NaiveTime>) -> Self {
        Self {
            lat_e4: (latitude * COORDINATE_SCALE).round() as i64,
            lon_e4: (longitude * COORDINATE_SCALE).round() as i64,
            minute: at.map(minute_of_day),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.lat_e4 as f64 / COORDINATE_SCALE
    }

    pub fn longitude(&self) -> f64 {
        self.lon_e4 as f64 / COORDINATE_SCALE
    }

    /// Minutes since midnight, if the query carried an instant.
    pub fn minute(&self) -> Option<u16> {
        self.minute
    }
}

struct CacheState {
    entries: LruCache<CacheKey, Vec<u64>>,
    hits: u64,
    misses: u64,
    /// Bumped on every build; a miss computed under an older generation is
    /// not stored.
    generation: u64,
}

/// Memoizing wrapper around another index.
pub struct CachingIndex<I> {
    inner: I,
    state: Mutex<CacheState>,
}

impl<I: ProviderIndex> CachingIndex<I> {
    /// Wrap `inner` with a cache of [`DEFAULT_CAPACITY`] entries.
    pub fn new(inner: I) -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self::with_nonzero_capacity(inner, capacity)
    }

    /// Wrap `inner` with a cache of `capacity` entries. Zero is rejected.
    pub fn with_capacity(inner: I, capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            ServeZoneError::InvalidConfig("Cache capacity must be greater than zero".to_string())
        })?;
        Ok(Self::with_nonzero_capacity(inner, capacity))
    }

    fn with_nonzero_capacity(inner: I, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
                generation: 0,
            }),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            size: state.entries.len(),
            capacity: state.entries.cap().get(),
        }
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.hits = 0;
        state.misses = 0;
        state.generation += 1;
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: ProviderIndex> ProviderIndex for CachingIndex<I> {
    fn build(&self, providers: Vec<Provider>) -> Result<()> {
        let result = self.inner.build(providers);
        // Cleared even when the inner build fails; a later query refills it.
        self.clear();
        result
    }

    fn query(&self, latitude: f64, longitude: f64, at: Option<NaiveTime>) -> Result<Vec<u64>> {
        // Before quantizing: NaN would round onto a valid key.
        validate_coordinate(latitude, longitude)?;
        let key = CacheKey::quantize(latitude, longitude, at);

        let generation = {
            let mut state = self.state.lock();
            if let Some(ids) = state.entries.get(&key).cloned() {
                state.hits += 1;
                return Ok(ids);
            }
            state.misses += 1;
            state.generation
        };

        // The wrapped query runs unlocked; concurrent misses on one key may
        // both compute it, and the later insert wins.
        let ids = self.inner.query(latitude, longitude, at)?;

        let mut state = self.state.lock();
        if state.generation == generation {
            state.entries.put(key, ids.clone());
        }
        Ok(ids)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.stats())
    }
}
