//! Coarse bounding-box prefilter.
//!
//! Turns a query point into one or two `[lon, lat]` envelopes that contain
//! every position within the search radius. Envelopes only shrink the
//! candidate set; availability is always decided by the exact fine filter, so
//! false positives are fine and false negatives are not.
//!
//! # Envelope sizing
//!
//! - Latitude: `radius / km_per_degree` degrees (1° ≈ 111 km), padded by a
//!   small slack factor since a meridian degree is as short as ~110.57 km at
//!   the equator.
//! - Longitude: cosine-corrected at the most poleward latitude the box
//!   reaches. Past ±89.9°, or once the half-width reaches 180°, the full
//!   longitude range is searched.
//! - Boxes crossing the antimeridian are split into two envelopes.

use rstar::AABB;
use smallvec::{SmallVec, smallvec};

/// Conservative upper bound on delivery radius when the dataset is smaller.
pub const DEFAULT_MAX_RADIUS_KM: f64 = 100.0;

/// Kilometres per degree of latitude used to size envelopes.
pub const KM_PER_DEGREE: f64 = 111.0;

const SLACK: f64 = 1.01;
const POLAR_LIMIT_DEG: f64 = 89.9;

pub type Envelope = AABB<[f64; 2]>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prefilter {
    radius_km: f64,
    km_per_degree: f64,
}

impl Prefilter {
    pub fn new(radius_km: f64, km_per_degree: f64) -> Self {
        Self {
            radius_km,
            km_per_degree,
        }
    }

    /// Search radius in kilometres.
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Half-height and half-width of the search box, in degrees, at `latitude`.
    pub fn half_extent_degrees(&self, latitude: f64) -> (f64, f64) {
        let lat_degrees = self.radius_km * SLACK / self.km_per_degree;

        let reach = latitude.abs() + lat_degrees;
        if reach >= POLAR_LIMIT_DEG {
            return (lat_degrees, 180.0);
        }

        let lon_degrees = lat_degrees / reach.to_radians().cos();
        (lat_degrees, lon_degrees.min(180.0))
    }

    /// Envelopes covering every point within the search radius of the query.
    pub fn envelopes(&self, latitude: f64, longitude: f64) -> SmallVec<[Envelope; 2]> {
        let (lat_degrees, lon_degrees) = self.half_extent_degrees(latitude);

        let min_y = (latitude - lat_degrees).max(-90.0);
        let max_y = (latitude + lat_degrees).min(90.0);

        if lon_degrees >= 180.0 {
            return smallvec![AABB::from_corners([-180.0, min_y], [180.0, max_y])];
        }

        let min_x = longitude - lon_degrees;
        let max_x = longitude + lon_degrees;

        if min_x < -180.0 {
            smallvec![
                AABB::from_corners([min_x + 360.0, min_y], [180.0, max_y]),
                AABB::from_corners([-180.0, min_y], [max_x, max_y]),
            ]
        } else if max_x > 180.0 {
            smallvec![
                AABB::from_corners([min_x, min_y], [180.0, max_y]),
                AABB::from_corners([-180.0, min_y], [max_x - 360.0, max_y]),
            ]
        } else {
            smallvec![AABB::from_corners([min_x, min_y], [max_x, max_y])]
        }
    }
}

impl Default for Prefilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RADIUS_KM, KM_PER_DEGREE)
    }
}
