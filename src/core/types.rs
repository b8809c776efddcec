//! Core data types for the orientation engine

use crate::core::constants::{KAABA_LATITUDE, KAABA_LONGITUDE};
use crate::validation::error::{EngineError, EngineResult};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize an angle in degrees into `[0, 360)`.
///
/// `rem_euclid` can round tiny negative inputs up to exactly 360.0, which is
/// folded back to 0.0 so the half-open range always holds.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Map an angle in degrees into the symmetric range `(-180, 180]`
pub fn wrap_signed_degrees(degrees: f64) -> f64 {
    let normalized = normalize_degrees(degrees);
    if normalized > 180.0 {
        normalized - 360.0
    } else {
        normalized
    }
}

/// Geographic position in decimal degrees.
///
/// Fields are private so an out-of-range point can never be constructed;
/// deserialization goes through the same validation as [`GeoPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint", into = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = EngineError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl From<GeoPoint> for RawGeoPoint {
    fn from(point: GeoPoint) -> Self {
        RawGeoPoint {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

impl GeoPoint {
    /// Create a point, rejecting coordinates outside the valid ranges.
    ///
    /// Out-of-range input is an upstream bug, so it is reported rather than
    /// clamped.
    pub fn new(latitude: f64, longitude: f64) -> EngineResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            tracing::error!(latitude, longitude, "rejected out-of-range coordinates");
            return Err(EngineError::OutOfRangeInput { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    /// Location of the Kaaba
    pub fn kaaba() -> Self {
        Self {
            latitude: KAABA_LATITUDE,
            longitude: KAABA_LONGITUDE,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude.to_radians()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

/// Clockwise angle from north in degrees, always within `[0, 360)`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Bearing(f64);

impl Bearing {
    pub const NORTH: Bearing = Bearing(0.0);

    /// Build a bearing from any finite angle; non-finite input maps to north
    pub fn new(degrees: f64) -> Self {
        if degrees.is_finite() {
            Bearing(normalize_degrees(degrees))
        } else {
            Bearing::NORTH
        }
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    pub fn radians(&self) -> f64 {
        self.0.to_radians()
    }

    /// Rotate clockwise by `delta` degrees (negative rotates counter-clockwise)
    pub fn rotated(&self, delta: f64) -> Self {
        Bearing::new(self.0 + delta)
    }
}

impl From<f64> for Bearing {
    fn from(degrees: f64) -> Self {
        Bearing::new(degrees)
    }
}

impl From<Bearing> for f64 {
    fn from(bearing: Bearing) -> Self {
        bearing.0
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// Which platform sensor produced a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    /// Magnetic-field sensor (magnetometer)
    Magnetic,
    /// Tilt source (gyroscope or accelerometer)
    Tilt,
}

/// One three-axis reading from a platform sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSensorSample {
    pub kind: SensorKind,
    pub axes: Vector3<f64>,
    /// Monotonic timestamp in milliseconds
    pub timestamp_ms: u64,
}

impl RawSensorSample {
    pub fn new(kind: SensorKind, x: f64, y: f64, z: f64, timestamp_ms: u64) -> Self {
        Self {
            kind,
            axes: Vector3::new(x, y, z),
            timestamp_ms,
        }
    }

    pub fn magnetic(x: f64, y: f64, z: f64, timestamp_ms: u64) -> Self {
        Self::new(SensorKind::Magnetic, x, y, z, timestamp_ms)
    }

    pub fn tilt(x: f64, y: f64, z: f64, timestamp_ms: u64) -> Self {
        Self::new(SensorKind::Tilt, x, y, z, timestamp_ms)
    }

    pub fn is_finite(&self) -> bool {
        self.axes.iter().all(|v| v.is_finite())
    }
}
