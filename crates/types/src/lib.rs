//! # servezone-types
//!
//! Plain data types shared by the servezone lookup engine:
//!
//! - **Providers**: [`provider::Provider`], a located service entity with a
//!   delivery radius and daily opening hours
//! - **Index selection**: [`config::IndexKind`]
//! - **Statistics**: [`stats::CacheStats`], [`stats::IndexStats`]
//!
//! All types are serializable with Serde. Times of day use
//! [`chrono::NaiveTime`] and serialize as `"HH:MM:SS"` strings.
//!
//! ## Examples
//!
//! ```rust
//! use chrono::NaiveTime;
//! use servezone_types::provider::Provider;
//!
//! let provider = Provider::new(
//!     7,
//!     52.5200,
//!     13.4050,
//!     3.5,
//!     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
//!     NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
//! );
//! assert_eq!(provider.point().x(), 13.4050);
//! ```

pub mod config;
pub mod provider;
pub mod stats;
