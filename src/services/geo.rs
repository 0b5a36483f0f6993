//! Geospatial math for the nearby-mosque search and the qibla tool.

use crate::{Error, Result};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate kilometres per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Radius used when the caller gives none.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Maximum number of nearby results.
pub const NEARBY_LIMIT: u32 = 20;

/// Latitude of the Kaaba.
pub const KAABA_LAT: f64 = 21.4225;

/// Longitude of the Kaaba.
pub const KAABA_LNG: f64 = 39.8262;

/// Below this `cos(lat)` the longitude span covers the whole globe.
const MIN_COS_LAT: f64 = 1e-9;

/// Rectangular pre-filter around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl BoundingBox {
    /// Builds the box of `radius_km` around a point.
    ///
    /// Δlat = r / 111 and Δlng = r / (111 · cos lat). Near the poles, or when
    /// the box would cross the antimeridian, the longitude span is widened to
    /// the full `[-180, 180]` so no candidate is dropped.
    #[must_use]
    pub fn around(lat: f64, lng: f64, radius_km: f64) -> Self {
        let d_lat = radius_km / KM_PER_DEGREE;
        let cos_lat = lat.to_radians().cos();

        let (min_lng, max_lng) = if cos_lat.abs() < MIN_COS_LAT {
            (-180.0, 180.0)
        } else {
            let d_lng = radius_km / (KM_PER_DEGREE * cos_lat.abs());
            let (lo, hi) = (lng - d_lng, lng + d_lng);
            if lo < -180.0 || hi > 180.0 {
                (-180.0, 180.0)
            } else {
                (lo, hi)
            }
        };

        Self {
            min_lat: lat - d_lat,
            max_lat: lat + d_lat,
            min_lng,
            max_lng,
        }
    }

    /// Returns true when the point lies inside the box.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }
}

/// Great-circle distance between two points in kilometres.
///
/// Uses the spherical law of cosines with the `acos` argument clamped to
/// `[-1, 1]`; identical points return exactly `0`.
#[must_use]
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    if lat1.to_bits() == lat2.to_bits() && lng1.to_bits() == lng2.to_bits() {
        return 0.0;
    }
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_lambda = (lng2 - lng1).to_radians();
    let cos_angle = phi1
        .cos()
        .mul_add(phi2.cos() * d_lambda.cos(), phi1.sin() * phi2.sin())
        .clamp(-1.0, 1.0);
    EARTH_RADIUS_KM * cos_angle.acos()
}

/// Initial bearing from a point to the Kaaba, clockwise from north, in `[0, 360)`.
#[must_use]
pub fn qibla_bearing(lat: f64, lng: f64) -> f64 {
    let phi1 = lat.to_radians();
    let phi2 = KAABA_LAT.to_radians();
    let d_lambda = (KAABA_LNG - lng).to_radians();

    let y = d_lambda.sin();
    let x = phi1.cos().mul_add(phi2.tan(), -(phi1.sin() * d_lambda.cos()));
    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if bearing >= 360.0 { 0.0 } else { bearing }
}

/// Validates a radius: finite and non-negative, defaulting to 5 km.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a negative or non-finite radius.
pub fn validate_radius(radius_km: Option<f64>) -> Result<f64> {
    match radius_km {
        None => Ok(DEFAULT_RADIUS_KM),
        Some(r) if r.is_finite() && r >= 0.0 => Ok(r),
        Some(_) => Err(Error::InvalidInput(
            "radius must be a non-negative number of kilometres".to_string(),
        )),
    }
}
