//! Reference coordinates and engine defaults

/// Latitude of the Kaaba in decimal degrees
pub const KAABA_LATITUDE: f64 = 21.422487;

/// Longitude of the Kaaba in decimal degrees
pub const KAABA_LONGITUDE: f64 = 39.826206;

/// Requested sensor cadence (10 Hz)
pub const DEFAULT_SAMPLING_INTERVAL_MS: u32 = 100;

/// Largest absolute tilt reading on x and y still treated as "flat"
pub const DEFAULT_FLATNESS_THRESHOLD: f64 = 0.1;

/// Offsets at or below this magnitude are `Accurate` (degrees)
pub const DEFAULT_ACCURATE_THRESHOLD_DEG: f64 = 5.0;

/// Offsets at or below this magnitude are `Close` (degrees)
pub const DEFAULT_CLOSE_THRESHOLD_DEG: f64 = 15.0;

/// Minimum time between two alignment feedback cues
pub const DEFAULT_FEEDBACK_COOLDOWN_MS: u64 = 4000;

/// Upper bound on the circular-mean smoothing window
pub const MAX_SMOOTHING_WINDOW_MS: u64 = 500;

/// Reference year of the regional declination coefficients
pub const DECLINATION_EPOCH_YEAR: i32 = 2020;
