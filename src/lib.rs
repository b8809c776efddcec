//! Qibla Compass Orientation Engine
//!
//! Computes the great-circle bearing from the device's position to the
//! Kaaba, corrects magnetometer headings by a regional declination estimate,
//! classifies how well the device is aligned and rate-limits the "aligned"
//! cue. Sensor and location acquisition stay behind the traits in
//! [`hardware`].

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod hardware;
pub mod api;

// Re-export commonly used types
pub use core::{Bearing, GeoPoint, RawSensorSample, SensorKind, KAABA_LATITUDE, KAABA_LONGITUDE};
pub use algorithms::alignment::{classify, AccuracyTier, AlignmentClassifier, AlignmentResult, IndicatorColor, TierThresholds};
pub use algorithms::bearing::{initial_bearing, qibla_bearing};
pub use algorithms::declination::{declination, DeclinationTable};
pub use processing::debounce::{CooldownBoundary, FeedbackConfig, FeedbackDebouncer};
pub use processing::heading::{HeadingTracker, SmoothingMode, TrackerConfig};
pub use validation::{EngineError, EngineResult};
pub use utils::{ConfigError, EngineConfig};
pub use hardware::{LocationError, LocationProvider, SensorError, SensorStream};
pub use api::{
    BearingStatus, CompassSession, EngineSnapshot, FeedbackEvent, SessionError, SessionResult,
    StatusFormatter, StatusReport,
};
