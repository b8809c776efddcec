use crate::core::{Bearing, RawSensorSample, SensorKind};
use crate::core::{DEFAULT_FLATNESS_THRESHOLD, MAX_SMOOTHING_WINDOW_MS};
use crate::validation::data::SampleValidator;
use crate::validation::error::EngineError;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Hard cap on samples held by the circular-mean window, whatever the cadence
const MAX_WINDOW_SAMPLES: usize = 64;

/// Below this resultant length the averaged direction is meaningless
const MIN_RESULTANT_NORM: f64 = 1e-9;

/// How successive magnetic headings are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Each valid sample becomes the heading as-is
    DirectReplacement,
    /// Mean of the unit vectors of samples within the last `window_ms`
    CircularMean { window_ms: u64 },
}

impl Default for SmoothingMode {
    fn default() -> Self {
        SmoothingMode::DirectReplacement
    }
}

impl SmoothingMode {
    pub fn is_bounded(&self) -> bool {
        match self {
            SmoothingMode::DirectReplacement => true,
            SmoothingMode::CircularMean { window_ms } => {
                *window_ms > 0 && *window_ms <= MAX_SMOOTHING_WINDOW_MS
            }
        }
    }
}

/// Tracker tuning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub smoothing: SmoothingMode,
    /// Largest |x| and |y| tilt reading still considered level
    pub flatness_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingMode::default(),
            flatness_threshold: DEFAULT_FLATNESS_THRESHOLD,
        }
    }
}

/// Mutable state of one tracking session
#[derive(Debug, Clone)]
pub struct TrackerState {
    /// Latest smoothed heading, `None` until the first valid magnetic sample
    pub heading: Option<Bearing>,
    pub raw_heading: Option<Bearing>,
    pub is_flat: bool,
    pub last_magnetic_ms: Option<u64>,
    pub last_tilt_ms: Option<u64>,
    window: VecDeque<(u64, Vector2<f64>)>,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            heading: None,
            raw_heading: None,
            // Assume level until the tilt sensor says otherwise
            is_flat: true,
            last_magnetic_ms: None,
            last_tilt_ms: None,
            window: VecDeque::with_capacity(MAX_WINDOW_SAMPLES),
        }
    }
}

/// Turns raw magnetometer and tilt samples into a usable heading and a
/// "hold the device flat" flag.
///
/// Tilt never corrects the heading; it only drives the flatness flag.
/// Invalid samples leave the state untouched.
pub struct HeadingTracker {
    config: TrackerConfig,
    state: TrackerState,
    validator: SampleValidator,
}

impl HeadingTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            state: TrackerState::default(),
            validator: SampleValidator::new(),
        }
    }

    /// Raw compass heading of a magnetometer reading: atan2(y, x) in degrees
    pub fn raw_heading(sample: &RawSensorSample) -> Bearing {
        Bearing::new(sample.axes.y.atan2(sample.axes.x).to_degrees())
    }

    /// Ingest a magnetic-field sample and return the current heading.
    ///
    /// A rejected sample returns the previous heading (north if there is none).
    pub fn ingest_magnetic(&mut self, sample: &RawSensorSample) -> Bearing {
        if let Err(err) = self.validator.validate(sample, SensorKind::Magnetic) {
            self.log_rejection(&err);
            return self.heading_or_north();
        }

        let raw = Self::raw_heading(sample);
        let smoothed = match self.config.smoothing {
            SmoothingMode::DirectReplacement => raw,
            SmoothingMode::CircularMean { window_ms } => {
                self.push_window(sample.timestamp_ms, raw, window_ms)
            }
        };

        self.state.raw_heading = Some(raw);
        self.state.heading = Some(smoothed);
        self.state.last_magnetic_ms = Some(sample.timestamp_ms);
        smoothed
    }

    /// Ingest a tilt sample and return the updated flatness flag
    pub fn ingest_tilt(&mut self, sample: &RawSensorSample) -> bool {
        if let Err(err) = self.validator.validate(sample, SensorKind::Tilt) {
            self.log_rejection(&err);
            return self.state.is_flat;
        }

        let threshold = self.config.flatness_threshold;
        self.state.is_flat = sample.axes.x.abs() < threshold && sample.axes.y.abs() < threshold;
        self.state.last_tilt_ms = Some(sample.timestamp_ms);
        self.state.is_flat
    }

    /// Dispatch a sample by its sensor kind
    pub fn ingest(&mut self, sample: &RawSensorSample) {
        match sample.kind {
            SensorKind::Magnetic => {
                self.ingest_magnetic(sample);
            }
            SensorKind::Tilt => {
                self.ingest_tilt(sample);
            }
        }
    }

    pub fn heading(&self) -> Option<Bearing> {
        self.state.heading
    }

    pub fn is_flat(&self) -> bool {
        self.state.is_flat
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn rejected_samples(&self) -> u64 {
        self.validator.stats().rejected()
    }

    /// Drop all accumulated state, as when tracking restarts
    pub fn reset(&mut self) {
        self.state = TrackerState::default();
        self.validator.clear_stats();
    }

    fn heading_or_north(&self) -> Bearing {
        self.state.heading.unwrap_or(Bearing::NORTH)
    }

    fn push_window(&mut self, timestamp_ms: u64, raw: Bearing, window_ms: u64) -> Bearing {
        let radians = raw.radians();
        let window = &mut self.state.window;
        window.push_back((timestamp_ms, Vector2::new(radians.cos(), radians.sin())));

        // Age out relative to the newest timestamp seen, so out-of-order
        // samples cannot stretch the window.
        let newest = window.iter().map(|(t, _)| *t).max().unwrap_or(timestamp_ms);
        window.retain(|(t, _)| newest.saturating_sub(*t) <= window_ms);
        while window.len() > MAX_WINDOW_SAMPLES {
            window.pop_front();
        }

        let resultant: Vector2<f64> = window.iter().map(|(_, v)| *v).sum();
        if resultant.norm() < MIN_RESULTANT_NORM {
            return raw;
        }
        Bearing::new(resultant.y.atan2(resultant.x).to_degrees())
    }

    fn log_rejection(&self, err: &EngineError) {
        tracing::trace!(error = %err, "discarding sensor sample");
    }
}

impl Default for HeadingTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
