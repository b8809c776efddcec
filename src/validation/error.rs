//! Error classification for the orientation engine

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Conditions the engine can report.
///
/// None of them is fatal: the worst outcome is "no usable bearing yet", which
/// clears as soon as valid input resumes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Coordinates outside latitude [-90, 90] or longitude [-180, 180]
    #[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
    OutOfRangeInput { latitude: f64, longitude: f64 },

    /// Sensor reading containing NaN or infinite components
    #[error("invalid {kind} sample at {timestamp_ms} ms")]
    InvalidSample { kind: &'static str, timestamp_ms: u64 },

    /// No geographic position is available yet
    #[error("no position fix available")]
    MissingFix,
}

/// How the engine reacts to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// Report to the caller as "bearing unavailable" and retry on the next fix
    Unavailable,
    /// Drop the input and keep the previous state, never surfaced
    Discard,
    /// Contract violation upstream, reported loudly
    Reject,
}

impl EngineError {
    pub fn disposition(&self) -> ErrorDisposition {
        match self {
            EngineError::MissingFix => ErrorDisposition::Unavailable,
            EngineError::InvalidSample { .. } => ErrorDisposition::Discard,
            EngineError::OutOfRangeInput { .. } => ErrorDisposition::Reject,
        }
    }

    /// Whether the caller should surface this error to the user
    pub fn is_user_visible(&self) -> bool {
        !matches!(self.disposition(), ErrorDisposition::Discard)
    }
}
