//! Common API types and data structures

use crate::algorithms::alignment::AlignmentResult;
use crate::core::{Bearing, GeoPoint};
use crate::hardware::SensorError;
use crate::utils::config::ConfigError;
use serde::Serialize;
use thiserror::Error;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The user refused location access; no bearing can be computed
    #[error("Permission to access location was denied")]
    LocationPermissionDenied,

    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown callback handle {0}")]
    UnknownCallback(u32),
}

/// Why no target bearing can be reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The location service has not produced a fix yet
    NoFix,
    /// The location service failed
    LocationUnavailable { detail: String },
    /// Location access was refused
    PermissionDenied,
}

impl UnavailableReason {
    pub fn message(&self) -> String {
        match self {
            UnavailableReason::NoFix => "Waiting for location fix".to_string(),
            UnavailableReason::LocationUnavailable { detail } => {
                format!("Location unavailable: {}", detail)
            }
            UnavailableReason::PermissionDenied => {
                "Permission to access location was denied".to_string()
            }
        }
    }
}

/// Target bearing, or the reason there is none
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BearingStatus {
    Available {
        origin: GeoPoint,
        bearing: Bearing,
        /// Declination applied to magnetic headings at `origin`
        declination_deg: f64,
    },
    Unavailable(UnavailableReason),
}

impl BearingStatus {
    pub fn bearing(&self) -> Option<Bearing> {
        match self {
            BearingStatus::Available { bearing, .. } => Some(*bearing),
            BearingStatus::Unavailable(_) => None,
        }
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        match self {
            BearingStatus::Available { origin, .. } => Some(*origin),
            BearingStatus::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, BearingStatus::Available { .. })
    }
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    /// Smoothed magnetic heading, `None` before the first magnetometer sample
    pub heading: Option<Bearing>,
    pub bearing: BearingStatus,
    /// Latest classification, `None` without a heading or a target bearing
    pub alignment: Option<AlignmentResult>,
    pub is_flat: bool,
    pub last_sample_ms: Option<u64>,
}

/// Emitted when the device becomes aligned and the cooldown allows a cue
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeedbackEvent {
    pub timestamp_ms: u64,
    pub alignment: AlignmentResult,
}

/// Counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub samples_ingested: u64,
    pub samples_rejected: u64,
    pub feedback_fired: u32,
    pub fix_updates: u32,
}
