//! Great-circle initial bearing between two geographic points
//!
//! Uses the spherical forward-azimuth formula:
//!
//! ```text
//! y = sin(Δλ) · cos(φ2)
//! x = cos(φ1) · sin(φ2) − sin(φ1) · cos(φ2) · cos(Δλ)
//! θ = atan2(y, x)
//! ```
//!
//! Polar origins need no special case: with cos(φ1) = 0 the formula still
//! yields a finite angle.

use crate::core::{Bearing, GeoPoint};

/// Initial bearing from `origin` towards `target`, clockwise from true north.
///
/// Identical points have no defined direction and return north (0°).
pub fn initial_bearing(origin: GeoPoint, target: GeoPoint) -> Bearing {
    if origin == target {
        return Bearing::NORTH;
    }

    let lat1 = origin.latitude_rad();
    let lat2 = target.latitude_rad();
    let delta_lon = target.longitude_rad() - origin.longitude_rad();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    let theta = y.atan2(x).to_degrees();
    if !theta.is_finite() {
        return Bearing::NORTH;
    }

    Bearing::new(theta + 360.0)
}

/// Bearing from `origin` to the Kaaba
pub fn qibla_bearing(origin: GeoPoint) -> Bearing {
    initial_bearing(origin, GeoPoint::kaaba())
}
