use serde::{Deserialize, Serialize};

/// Counters reported by a result cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries currently stored
    pub size: usize,
    /// Maximum number of entries before eviction
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Index statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Providers in the current snapshot
    pub providers: usize,
    /// Queries answered since the last build
    pub queries: u64,
    /// Candidates handed to the fine filter since the last build
    pub candidates_examined: u64,
    /// Largest delivery radius in the current snapshot (km)
    pub max_radius_km: f64,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Average number of fine-filter candidates per query.
    pub fn candidates_per_query(&self) -> f64 {
        if self.queries == 0 {
            0.0
        } else {
            self.candidates_examined as f64 / self.queries as f64
        }
    }
}
