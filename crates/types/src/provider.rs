use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A service provider: a location, a delivery radius and daily opening hours.
///
/// Coordinates are WGS84 decimal degrees. `open_time` may be later than
/// `close_time`, in which case the window crosses midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    /// Maximum serviceable distance in kilometres.
    pub radius_km: f64,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    /// Only consulted by rating filters, never by the plain availability check.
    #[serde(default)]
    pub rating: f64,
}

impl Provider {
    /// Create a provider with a zero rating.
    pub fn new(
        id: u64,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        open_time: NaiveTime,
        close_time: NaiveTime,
    ) -> Self {
        Self {
            id,
            latitude,
            longitude,
            radius_km,
            open_time,
            close_time,
            rating: 0.0,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Position as a `geo::Point` (x = longitude, y = latitude).
    #[inline]
    pub fn point(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }

    /// Whether the opening window wraps past midnight.
    #[inline]
    pub fn is_overnight(&self) -> bool {
        self.open_time > self.close_time
    }
}
