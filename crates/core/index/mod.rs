//! Provider indexes and the layers that decorate them.
//!
//! Every variant implements [`ProviderIndex`], so callers hold one handle
//! (usually a `Box<dyn ProviderIndex>`) without knowing what backs it:
//!
//! - [`RTreeIndex`]: R*-tree prefilter, then exact distance/hours checks
//! - [`LinearIndex`]: full scan, the baseline the R*-tree must agree with
//! - [`CachingIndex`]: memoizes results of any wrapped index
//! - [`LoggingIndex`]: logs builds and queries of any wrapped index
//!
//! Layers nest freely: a cache over a cache, logging over a cache, and so on.

use crate::clock::Clock;
use crate::compute::filter::CandidateFilter;
use crate::config::PrefilterConfig;
use crate::error::Result;
use chrono::NaiveTime;
use servezone_types::config::IndexKind;
use servezone_types::provider::Provider;
use servezone_types::stats::CacheStats;
use std::sync::Arc;

pub mod cache;
pub mod linear;
pub mod logging;
pub mod prefilter;
pub mod rtree;

pub use cache::{CacheKey, CachingIndex};
pub use linear::LinearIndex;
pub use logging::LoggingIndex;
pub use prefilter::Prefilter;
pub use rtree::RTreeIndex;

/// Build-once, query-many provider lookup.
///
/// Both methods take `&self`: implementations swap in rebuilt data
/// atomically, so a shared handle can be rebuilt while other threads query.
pub trait ProviderIndex: Send + Sync {
    /// Replace all content with `providers`.
    fn build(&self, providers: Vec<Provider>) -> Result<()>;

    /// Ids, ascending, of providers that serve `(latitude, longitude)` at
    /// `at`. `None` evaluates at the index clock's current time.
    fn query(&self, latitude: f64, longitude: f64, at: Option<NaiveTime>) -> Result<Vec<u64>>;

    /// Number of providers currently loaded.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Statistics of the outermost cache layer, if any.
    fn cache_stats(&self) -> Option<CacheStats> {
        None
    }
}

impl<T: ProviderIndex + ?Sized> ProviderIndex for Box<T> {
    fn build(&self, providers: Vec<Provider>) -> Result<()> {
        (**self).build(providers)
    }

    fn query(&self, latitude: f64, longitude: f64, at: Option<NaiveTime>) -> Result<Vec<u64>> {
        (**self).query(latitude, longitude, at)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        (**self).cache_stats()
    }
}

impl<T: ProviderIndex + ?Sized> ProviderIndex for Arc<T> {
    fn build(&self, providers: Vec<Provider>) -> Result<()> {
        (**self).build(providers)
    }

    fn query(&self, latitude: f64, longitude: f64, at: Option<NaiveTime>) -> Result<Vec<u64>> {
        (**self).query(latitude, longitude, at)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        (**self).cache_stats()
    }
}

/// Create an empty index of the given kind.
pub fn create_index(
    kind: IndexKind,
    prefilter: PrefilterConfig,
    filter: Arc<dyn CandidateFilter>,
    clock: Arc<dyn Clock>,
) -> Box<dyn ProviderIndex> {
    match kind {
        IndexKind::RTree => Box::new(
            RTreeIndex::with_config(prefilter)
                .with_filter(filter)
                .with_clock(clock),
        ),
        IndexKind::Linear => Box::new(LinearIndex::new().with_filter(filter).with_clock(clock)),
    }
}

/// Create an empty index by name (`"rtree"`, `"linear"`), with default settings.
///
/// Unknown names fail with [`ServeZoneError::UnsupportedIndex`](crate::ServeZoneError::UnsupportedIndex).
pub fn create_index_by_name(name: &str) -> Result<Box<dyn ProviderIndex>> {
    let kind: IndexKind = name.parse()?;
    Ok(create_index(
        kind,
        PrefilterConfig::default(),
        Arc::new(crate::compute::filter::DistanceAndHours::new()),
        Arc::new(crate::clock::SystemClock),
    ))
}
