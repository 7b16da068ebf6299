//! Builder for assembling a lookup engine from configuration.
//!
//! The engine is the chosen base index, optionally wrapped in a result cache
//! and then a logging layer, handed back as one `Box<dyn ProviderIndex>`.

use crate::clock::{Clock, SystemClock};
use crate::compute::filter::{CandidateFilter, DistanceAndHours};
use crate::config::{Config, IndexKind};
use crate::error::{Result, ServeZoneError};
use crate::index::{CachingIndex, LoggingIndex, ProviderIndex, create_index};
use std::fmt;
use std::sync::Arc;

/// Builder for a configured provider lookup engine.
///
/// ```rust
/// use servezone::{LookupBuilder, FixedClock, Provider};
///
/// let engine = LookupBuilder::new()
///     .index_type("linear")?
///     .cache_capacity(256)
///     .clock(FixedClock::at(15, 0, 0).unwrap())
///     .build()?;
///
/// let t = |h| chrono::NaiveTime::from_hms_opt(h, 0, 0).unwrap();
/// engine.build(vec![Provider::new(1, 51.1942536, 6.455508, 5.0, t(14), t(23))])?;
/// assert_eq!(engine.query(51.2, 6.45, None)?, vec![1]);
/// assert_eq!(engine.cache_stats().unwrap().capacity, 256);
/// # Ok::<(), servezone::ServeZoneError>(())
/// ```
pub struct LookupBuilder {
    config: Config,
    filter: Option<Arc<dyn CandidateFilter>>,
    clock: Option<Arc<dyn Clock>>,
}

impl LookupBuilder {
    /// Defaults: R*-tree, 1000-entry cache, no query logging, system clock.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            filter: None,
            clock: None,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn index_kind(mut self, kind: IndexKind) -> Self {
        self.config.index = kind;
        self
    }

    /// Select the base index by name. Unknown names are an error.
    pub fn index_type(self, name: &str) -> Result<Self> {
        let kind: IndexKind = name.parse()?;
        Ok(self.index_kind(kind))
    }

    /// Enable the result cache with `capacity` entries. Zero is reported by
    /// [`build`](Self::build).
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache.enabled = true;
        self.config.cache.capacity = capacity;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.config = self.config.without_cache();
        self
    }

    pub fn log_queries(mut self, enabled: bool) -> Self {
        self.config = self.config.with_query_logging(enabled);
        self
    }

    /// Clock consulted by queries that carry no instant.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Replace the default distance-and-hours fine filter.
    pub fn filter(mut self, filter: impl CandidateFilter + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Build an empty engine; load it with [`ProviderIndex::build`].
    pub fn build(self) -> Result<Box<dyn ProviderIndex>> {
        self.config
            .validate()
            .map_err(ServeZoneError::InvalidConfig)?;

        let filter = self
            .filter
            .unwrap_or_else(|| Arc::new(DistanceAndHours::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let mut engine = create_index(self.config.index, self.config.prefilter, filter, clock);

        if self.config.cache.enabled {
            engine = Box::new(CachingIndex::with_capacity(
                engine,
                self.config.cache.capacity,
            )?);
        }

        if self.config.log_queries {
            engine = Box::new(LoggingIndex::new(engine));
        }

        log::debug!(
            "Created {} lookup engine (cache: {}, query logging: {})",
            self.config.index,
            if self.config.cache.enabled {
                self.config.cache.capacity.to_string()
            } else {
                "off".to_string()
            },
            self.config.log_queries
        );

        Ok(engine)
    }
}

impl Default for LookupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LookupBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupBuilder")
            .field("config", &self.config)
            .field("custom_filter", &self.filter.is_some())
            .field("custom_clock", &self.clock.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::compute::filter::MinRating;
    use chrono::NaiveTime;
    use servezone_types::provider::Provider;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_builder_default_has_cache() {
        let engine = LookupBuilder::new().build().unwrap();
        let stats = engine.cache_stats().unwrap();
        assert_eq!(stats.capacity, 1000);
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn test_builder_without_cache() {
        let engine = LookupBuilder::new().without_cache().build().unwrap();
        assert!(engine.cache_stats().is_none());
    }

    #[test]
    fn test_builder_unknown_index() {
        let err = LookupBuilder::new().index_type("geohash").unwrap_err();
        assert!(matches!(err, ServeZoneError::UnsupportedIndex(_)));
    }

    #[test]
    fn test_builder_invalid_config() {
        let mut config = Config::default();
        config.prefilter.km_per_degree = 500.0;
        let err = LookupBuilder::new().config(config).build().err().unwrap();
        assert!(matches!(err, ServeZoneError::InvalidConfig(_)));
    }

    #[test]
    fn test_builder_zero_cache_capacity_is_an_error() {
        let err = LookupBuilder::new().cache_capacity(0).build().err().unwrap();
        assert!(matches!(err, ServeZoneError::InvalidConfig(msg) if msg.contains("capacity")));

        // Irrelevant once the cache is switched off
        assert!(
            LookupBuilder::new()
                .cache_capacity(0)
                .without_cache()
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_builder_logging_keeps_cache_visible() {
        let engine = LookupBuilder::new()
            .log_queries(true)
            .clock(FixedClock(t(12)))
            .build()
            .unwrap();
        engine
            .build(vec![Provider::new(1, 40.0, -74.0, 5.0, t(8), t(20))])
            .unwrap();

        assert_eq!(engine.query(40.0, -74.0, None).unwrap(), vec![1]);
        assert_eq!(engine.query(40.0, -74.0, None).unwrap(), vec![1]);
        assert_eq!(engine.cache_stats().unwrap().hits, 1);
    }

    #[test]
    fn test_builder_custom_filter() {
        let engine = LookupBuilder::new()
            .filter(MinRating::<DistanceAndHours>::default())
            .build()
            .unwrap();
        engine
            .build(vec![
                Provider::new(1, 40.0, -74.0, 5.0, t(8), t(20)).with_rating(4.5),
                Provider::new(2, 40.0, -74.0, 5.0, t(8), t(20)).with_rating(3.0),
            ])
            .unwrap();

        assert_eq!(engine.query(40.0, -74.0, Some(t(12))).unwrap(), vec![1]);
    }
}
