//! Fine-filter strategies applied to coarse prefilter candidates.
//!
//! [`DistanceAndHours`] is the availability rule: a provider serves a location
//! when the location lies within its delivery radius *and* it is open at the
//! evaluation instant. Extra criteria wrap a base filter, e.g. [`MinRating`].

use super::geodesic::{DistanceCalculator, GeodesicDistance};
use super::hours::is_open;
use chrono::NaiveTime;
use servezone_types::provider::Provider;

/// Decides whether a coarse candidate is included in a query result.
pub trait CandidateFilter: Send + Sync {
    fn accepts(&self, provider: &Provider, latitude: f64, longitude: f64, at: NaiveTime) -> bool;
}

/// Minimum rating used by [`MinRating`] when none is given.
pub const DEFAULT_MIN_RATING: f64 = 4.0;

/// Within delivery radius and open at the evaluation instant.
#[derive(Debug, Clone)]
pub struct DistanceAndHours<D = GeodesicDistance> {
    calculator: D,
}

impl DistanceAndHours<GeodesicDistance> {
    pub fn new() -> Self {
        Self {
            calculator: GeodesicDistance::new(),
        }
    }
}

impl Default for DistanceAndHours<GeodesicDistance> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DistanceCalculator> DistanceAndHours<D> {
    pub fn with_calculator(calculator: D) -> Self {
        Self { calculator }
    }
}

impl<D: DistanceCalculator> CandidateFilter for DistanceAndHours<D> {
    #[inline]
    fn accepts(&self, provider: &Provider, latitude: f64, longitude: f64, at: NaiveTime) -> bool {
        if !is_open(provider.open_time, provider.close_time, at) {
            return false;
        }
        let distance =
            self.calculator
                .distance_km(latitude, longitude, provider.latitude, provider.longitude);
        distance <= provider.radius_km
    }
}

/// Base filter plus a minimum rating.
#[derive(Debug, Clone)]
pub struct MinRating<F> {
    base: F,
    min_rating: f64,
}

impl<F: CandidateFilter> MinRating<F> {
    pub fn new(base: F, min_rating: f64) -> Self {
        Self { base, min_rating }
    }

    pub fn min_rating(&self) -> f64 {
        self.min_rating
    }
}

impl Default for MinRating<DistanceAndHours> {
    fn default() -> Self {
        Self::new(DistanceAndHours::new(), DEFAULT_MIN_RATING)
    }
}

impl<F: CandidateFilter> CandidateFilter for MinRating<F> {
    fn accepts(&self, provider: &Provider, latitude: f64, longitude: f64, at: NaiveTime) -> bool {
        provider.rating >= self.min_rating && self.base.accepts(provider, latitude, longitude, at)
    }
}
