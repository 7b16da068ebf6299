//! Engine configuration.
//!
//! `Config` is serializable so deployments can keep it next to their other
//! settings; every field has a default, so `{}` is a valid configuration.
//!
//! ```rust
//! use servezone::Config;
//!
//! let config = Config::from_json(r#"{
//!     "index": "r_tree",
//!     "prefilter": { "max_radius_km": 50.0 },
//!     "cache": { "capacity": 4096 }
//! }"#).unwrap();
//! assert_eq!(config.cache.capacity, 4096);
//! ```
use crate::index::prefilter::{DEFAULT_MAX_RADIUS_KM, KM_PER_DEGREE};
use serde::de::Error;

pub use servezone_types::config::IndexKind;
pub use servezone_types::provider::Provider;
pub use servezone_types::stats::{CacheStats, IndexStats};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub index: IndexKind,

    #[serde(default)]
    pub prefilter: PrefilterConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    /// Wrap the engine in a query-logging layer
    #[serde(default)]
    pub log_queries: bool,
}

/// Coarse prefilter sizing.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrefilterConfig {
    /// Lower bound on the search radius. The index widens it to the largest
    /// delivery radius in the loaded dataset when that is bigger.
    #[serde(default = "PrefilterConfig::default_max_radius_km")]
    pub max_radius_km: f64,

    /// Kilometres per degree of latitude used to turn the radius into degrees.
    #[serde(default = "PrefilterConfig::default_km_per_degree")]
    pub km_per_degree: f64,
}

impl PrefilterConfig {
    const fn default_max_radius_km() -> f64 {
        DEFAULT_MAX_RADIUS_KM
    }

    const fn default_km_per_degree() -> f64 {
        KM_PER_DEGREE
    }
}

impl Default for PrefilterConfig {
    fn default() -> Self {
        Self {
            max_radius_km: Self::default_max_radius_km(),
            km_per_degree: Self::default_km_per_degree(),
        }
    }
}

/// Result cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default = "CacheConfig::default_enabled")]
    pub enabled: bool,

    /// Entries kept before the least recently used one is evicted
    #[serde(default = "CacheConfig::default_capacity")]
    pub capacity: usize,
}

impl CacheConfig {
    const fn default_enabled() -> bool {
        true
    }

    const fn default_capacity() -> usize {
        1000
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            capacity: Self::default_capacity(),
        }
    }
}

impl Config {
    pub fn with_index(mut self, index: IndexKind) -> Self {
        self.index = index;
        self
    }

    pub fn with_max_radius_km(mut self, radius_km: f64) -> Self {
        assert!(
            radius_km.is_finite() && radius_km > 0.0,
            "Prefilter radius must be positive and finite"
        );
        self.prefilter.max_radius_km = radius_km;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Cache capacity must be greater than zero");

        if capacity > 1_000_000 {
            log::warn!(
                "Cache capacity of {} is very large and may consume significant memory. \
                Each entry stores the full provider id list for one location.",
                capacity
            );
        }

        self.cache.enabled = true;
        self.cache.capacity = capacity;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache.enabled = false;
        self
    }

    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let prefilter = &self.prefilter;
        if !prefilter.max_radius_km.is_finite() || prefilter.max_radius_km <= 0.0 {
            return Err("Prefilter radius must be positive and finite".to_string());
        }

        // Larger values would make the box narrower than a real degree.
        if !prefilter.km_per_degree.is_finite()
            || prefilter.km_per_degree <= 0.0
            || prefilter.km_per_degree > KM_PER_DEGREE
        {
            return Err(format!(
                "Kilometres per degree must be in (0, {}]",
                KM_PER_DEGREE
            ));
        }

        if self.cache.enabled && self.cache.capacity == 0 {
            return Err("Cache capacity must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index: IndexKind::default(),
            prefilter: PrefilterConfig::default(),
            cache: CacheConfig::default(),
            log_queries: false,
        }
    }
}
