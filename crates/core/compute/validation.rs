//! Validation for coordinates and provider records.
//!
//! The index and cache assume well-formed input; these checks run at their
//! public entry points so malformed values are rejected before they reach the
//! R*-tree.

use crate::error::{Result, ServeZoneError};
use rustc_hash::FxHashSet;
use servezone_types::provider::Provider;

/// Half the equatorial circumference; no delivery radius can usefully exceed it.
const MAX_RADIUS_KM: f64 = 20_037.5;

/// Validates latitude and longitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use servezone::compute::validation::validate_coordinate;
///
/// assert!(validate_coordinate(52.52, 13.405).is_ok());
/// assert!(validate_coordinate(95.0, 13.405).is_err());
/// assert!(validate_coordinate(52.52, f64::NAN).is_err());
/// ```
pub fn validate_coordinate(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() {
        return Err(ServeZoneError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            latitude
        )));
    }

    if !longitude.is_finite() {
        return Err(ServeZoneError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            longitude
        )));
    }

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ServeZoneError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ServeZoneError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            longitude
        )));
    }

    Ok(())
}

/// Validates a delivery radius in kilometres.
///
/// ```
/// use servezone::compute::validation::validate_radius_km;
///
/// assert!(validate_radius_km(2.5).is_ok());
/// assert!(validate_radius_km(0.0).is_err());
/// assert!(validate_radius_km(f64::NAN).is_err());
/// ```
pub fn validate_radius_km(radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() {
        return Err(ServeZoneError::InvalidInput(format!(
            "Radius must be finite, got: {}",
            radius_km
        )));
    }
    if radius_km <= 0.0 {
        return Err(ServeZoneError::InvalidInput(format!(
            "Radius must be positive, got: {}",
            radius_km
        )));
    }
    if radius_km > MAX_RADIUS_KM {
        return Err(ServeZoneError::InvalidInput(format!(
            "Radius {} km exceeds half the Earth's circumference ({} km)",
            radius_km, MAX_RADIUS_KM
        )));
    }
    Ok(())
}

/// Validates a single provider record.
pub fn validate_provider(provider: &Provider) -> Result<()> {
    validate_coordinate(provider.latitude, provider.longitude)?;
    validate_radius_km(provider.radius_km)?;

    if !provider.rating.is_finite() {
        return Err(ServeZoneError::InvalidInput(format!(
            "Rating must be finite, got: {}",
            provider.rating
        )));
    }

    Ok(())
}

/// Validates a dataset: every record individually, and ids pairwise unique.
pub fn validate_providers(providers: &[Provider]) -> Result<()> {
    let mut seen = FxHashSet::default();
    seen.reserve(providers.len());

    for (idx, provider) in providers.iter().enumerate() {
        validate_provider(provider).map_err(|e| {
            ServeZoneError::InvalidInput(format!(
                "Provider {} at index {}: {}",
                provider.id, idx, e
            ))
        })?;

        if !seen.insert(provider.id) {
            return Err(ServeZoneError::DuplicateProvider(provider.id));
        }
    }

    Ok(())
}
