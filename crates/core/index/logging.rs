//! Logging layer over any [`ProviderIndex`].

use super::ProviderIndex;
use crate::error::Result;
use chrono::NaiveTime;
use servezone_types::provider::Provider;
use servezone_types::stats::CacheStats;
use std::sync::atomic::{AtomicU64, Ordering};

/// Logs every build and query of the wrapped index through the `log` facade.
pub struct LoggingIndex<I> {
    inner: I,
    queries: AtomicU64,
}

impl<I: ProviderIndex> LoggingIndex<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            queries: AtomicU64::new(0),
        }
    }

    /// Queries seen since the last build.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: ProviderIndex> ProviderIndex for LoggingIndex<I> {
    fn build(&self, providers: Vec<Provider>) -> Result<()> {
        let count = providers.len();
        match self.inner.build(providers) {
            Ok(()) => {
                self.queries.store(0, Ordering::Relaxed);
                log::info!("Index built with {} providers", count);
                Ok(())
            }
            Err(e) => {
                log::warn!("Index build with {} providers failed: {}", count, e);
                Err(e)
            }
        }
    }

    fn query(&self, latitude: f64, longitude: f64, at: Option<NaiveTime>) -> Result<Vec<u64>> {
        let n = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        let result = self.inner.query(latitude, longitude, at);

        match &result {
            Ok(ids) => log::info!(
                "Query #{} at ({}, {}) {}: {} providers",
                n,
                latitude,
                longitude,
                at.map_or_else(|| "now".to_string(), |t| t.to_string()),
                ids.len()
            ),
            Err(e) => log::warn!("Query #{} at ({}, {}) failed: {}", n, latitude, longitude, e),
        }

        result
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        self.inner.cache_stats()
    }
}
