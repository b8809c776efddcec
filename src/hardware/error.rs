//! Platform sensor and location error types

use crate::core::SensorKind;
use crate::hardware::SubscriptionId;
use thiserror::Error;

/// Result type for sensor stream operations
pub type SensorResult<T> = Result<T, SensorError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    /// The platform has no sensor of this kind
    #[error("{0:?} sensor is not available on this device")]
    Unavailable(SensorKind),

    /// The platform refused the subscription
    #[error("subscription to {kind:?} sensor rejected: {reason}")]
    SubscriptionRejected { kind: SensorKind, reason: String },

    /// Unsubscribe for a handle that is not active
    #[error("unknown sensor subscription {0:?}")]
    UnknownSubscription(SubscriptionId),

    /// The stream stopped delivering samples
    #[error("sensor stream closed")]
    StreamClosed,
}

/// Failure reported by the platform location service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Permission to access location was denied")]
    PermissionDenied,

    #[error("location unavailable: {reason}")]
    Unavailable { reason: String },
}

impl LocationError {
    pub fn unavailable(reason: &str) -> Self {
        LocationError::Unavailable {
            reason: reason.to_string(),
        }
    }
}
