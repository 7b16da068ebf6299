//! Distance, opening-hours and fine-filter computations.

pub mod filter;
pub mod geodesic;
pub mod hours;
pub mod validation;

pub use filter::{CandidateFilter, DEFAULT_MIN_RATING, DistanceAndHours, MinRating};
pub use geodesic::{DistanceCalculator, Ellipsoid, GeodesicDistance, distance_km};
pub use hours::{is_open, minute_of_day, parse_time_of_day};
