//! Sensor stream trait

use crate::core::{RawSensorSample, SensorKind};
use crate::hardware::SensorResult;

/// Handle returned by a successful subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u32);

/// Platform source of magnetometer and tilt samples
pub trait SensorStream {
    /// Start delivering samples of `kind` at roughly `interval_ms`.
    /// The cadence is a request; the engine does not rely on it.
    fn subscribe(&mut self, kind: SensorKind, interval_ms: u32) -> SensorResult<SubscriptionId>;

    /// Stop a subscription. Must be called exactly once per successful
    /// `subscribe`.
    fn unsubscribe(&mut self, id: SubscriptionId) -> SensorResult<()>;

    /// Next pending sample, if any (non-blocking)
    fn poll_sample(&mut self) -> SensorResult<Option<RawSensorSample>>;

    /// Whether the device has a sensor of this kind
    fn is_available(&self, kind: SensorKind) -> bool;
}
