//! Geospatial provider availability lookup.
//!
//! Given a dataset of service providers, each with a location, a delivery
//! radius and daily opening hours, answer "which providers can serve this
//! point at this time of day?".
//!
//! ## Features
//! - **Two-stage queries**: an R*-tree bounding-box prefilter, then exact
//!   WGS84 geodesic distance and opening-hours checks on the candidates
//! - **Overnight hours**: windows like `22:00-06:00` wrap past midnight
//! - **Result caching**: LRU cache keyed by rounded location and minute
//! - **Atomic rebuilds**: queries see the old dataset or the new one, never a mix
//! - **Composable layers**: caching and logging wrap any index
//!
//! ```rust
//! use servezone::prelude::*;
//! use chrono::NaiveTime;
//!
//! let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
//!
//! let engine = LookupBuilder::new().build()?;
//! engine.build(vec![
//!     Provider::new(1, 51.1942536, 6.455508, 5.0, t(14), t(23)),
//!     Provider::new(2, 52.5018668, 13.3254556, 3.0, t(9), t(20)),
//! ])?;
//!
//! assert_eq!(engine.query(51.2, 6.45, Some(t(15)))?, vec![1]);
//! assert!(engine.query(51.2, 6.45, Some(t(12)))?.is_empty());
//! # Ok::<(), servezone::ServeZoneError>(())
//! ```

pub mod builder;
pub mod clock;
pub mod compute;
pub mod config;
pub mod error;
pub mod index;

pub use builder::LookupBuilder;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, ServeZoneError};

pub use config::{CacheConfig, CacheStats, Config, IndexKind, IndexStats, PrefilterConfig, Provider};

pub use compute::{
    CandidateFilter, DistanceAndHours, DistanceCalculator, GeodesicDistance, MinRating,
    distance_km, is_open,
};
pub use index::{
    CacheKey, CachingIndex, LinearIndex, LoggingIndex, ProviderIndex, RTreeIndex, create_index,
    create_index_by_name,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{LookupBuilder, Result, ServeZoneError};

    pub use crate::{Config, IndexKind, Provider};

    pub use crate::{CachingIndex, LinearIndex, LoggingIndex, ProviderIndex, RTreeIndex};

    pub use crate::{Clock, FixedClock, SystemClock};

    pub use crate::{CandidateFilter, DistanceAndHours, MinRating};
}
