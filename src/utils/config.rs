use crate::algorithms::alignment::TierThresholds;
use crate::algorithms::declination::DeclinationTable;
use crate::core::{GeoPoint, DEFAULT_SAMPLING_INTERVAL_MS, DEFAULT_FLATNESS_THRESHOLD};
use crate::processing::debounce::FeedbackConfig;
use crate::processing::heading::{SmoothingMode, TrackerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Longest sensor interval that still gives a usable compass
const MAX_SAMPLING_INTERVAL_MS: u32 = 1000;

/// Engine-wide configuration.
///
/// Owned by whoever creates a session and passed in explicitly; there is no
/// process-wide configuration state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Point the compass leads to
    pub target: GeoPoint,
    /// Requested sensor cadence (milliseconds)
    pub sampling_interval_ms: u32,
    /// Largest |x| / |y| tilt reading treated as level
    pub flatness_threshold: f64,
    pub tiers: TierThresholds,
    pub feedback: FeedbackConfig,
    pub smoothing: SmoothingMode,
    pub declination: DeclinationTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target: GeoPoint::kaaba(),
            sampling_interval_ms: DEFAULT_SAMPLING_INTERVAL_MS,
            flatness_threshold: DEFAULT_FLATNESS_THRESHOLD,
            tiers: TierThresholds::default(),
            feedback: FeedbackConfig::default(),
            smoothing: SmoothingMode::default(),
            declination: DeclinationTable::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("failed to access config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn invalid(parameter: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl EngineConfig {
    /// Load and validate a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })
    }

    /// Reject values that would break an engine invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling_interval_ms == 0 || self.sampling_interval_ms > MAX_SAMPLING_INTERVAL_MS {
            return Err(invalid(
                "sampling_interval_ms",
                self.sampling_interval_ms,
                "must be between 1 and 1000 ms",
            ));
        }

        if !(self.flatness_threshold.is_finite() && self.flatness_threshold > 0.0) {
            return Err(invalid(
                "flatness_threshold",
                self.flatness_threshold,
                "must be a positive number",
            ));
        }

        let tiers = &self.tiers;
        if !(tiers.accurate_deg > 0.0 && tiers.accurate_deg <= 180.0) {
            return Err(invalid("tiers.accurate_deg", tiers.accurate_deg, "must be within (0, 180]"));
        }
        if !(tiers.close_deg >= tiers.accurate_deg && tiers.close_deg <= 180.0) {
            return Err(invalid(
                "tiers.close_deg",
                tiers.close_deg,
                "must be at least tiers.accurate_deg and at most 180",
            ));
        }

        if self.feedback.cooldown_ms == 0 {
            return Err(invalid("feedback.cooldown_ms", 0, "must be positive"));
        }

        if !self.smoothing.is_bounded() {
            return Err(invalid(
                "smoothing",
                format!("{:?}", self.smoothing),
                "circular mean window must be between 1 and 500 ms",
            ));
        }

        for region in &self.declination.regions {
            if !region.bounds.is_well_formed() {
                return Err(invalid(
                    "declination.regions",
                    &region.name,
                    "bounding box must be ordered and within coordinate ranges",
                ));
            }
            if !(region.base_offset_deg.is_finite() && region.drift_deg_per_year.is_finite()) {
                return Err(invalid(
                    "declination.regions",
                    &region.name,
                    "coefficients must be finite",
                ));
            }
        }

        Ok(())
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            smoothing: self.smoothing,
            flatness_threshold: self.flatness_threshold,
        }
    }

    pub fn with_target(mut self, target: GeoPoint) -> Self {
        self.target = target;
        self
    }

    pub fn with_smoothing(mut self, smoothing: SmoothingMode) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_feedback(mut self, feedback: FeedbackConfig) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_declination(mut self, table: DeclinationTable) -> Self {
        self.declination = table;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::declination::{BoundingBox, DeclinationRegion};
    use crate::processing::debounce::CooldownBoundary;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target, GeoPoint::kaaba());
        assert_eq!(config.sampling_interval_ms, 100);
        assert_eq!(config.feedback.cooldown_ms, 4000);
        assert_eq!(config.declination.regions.len(), 2);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = EngineConfig::from_json(
            r#"{
                "feedback": { "cooldown_ms": 2500, "boundary": "inclusive" },
                "smoothing": { "mode": "circular_mean", "window_ms": 300 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.feedback.cooldown_ms, 2500);
        assert_eq!(config.feedback.boundary, CooldownBoundary::Inclusive);
        assert_eq!(config.smoothing, SmoothingMode::CircularMean { window_ms: 300 });
        assert_eq!(config.tiers, TierThresholds::default());
    }

    #[test]
    fn test_rejects_unbounded_smoothing_window() {
        let result = EngineConfig::from_json(r#"{ "smoothing": { "mode": "circular_mean", "window_ms": 2000 } }"#);
        assert!(matches!(result, Err(ConfigError::InvalidParameter { ref parameter, .. }) if parameter == "smoothing"));
    }

    #[test]
    fn test_rejects_out_of_range_target() {
        let result = EngineConfig::from_json(r#"{ "target": { "latitude": 91.0, "longitude": 0.0 } }"#);
        assert!(matches!(result, Err(ConfigError::Serialization(_))));
    }

    #[test]
    fn test_rejects_inverted_tiers() {
        let config = EngineConfig {
            tiers: TierThresholds { accurate_deg: 20.0, close_deg: 10.0 },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tiers.close_deg"));
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let mut config = EngineConfig::default();
        config.sampling_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.flatness_threshold = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.feedback.cooldown_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_declination_region() {
        let table = DeclinationTable {
            epoch_year: 2020,
            regions: vec![DeclinationRegion::new("upside down", BoundingBox::new(30.0, 15.0, 30.0, 50.0), 1.0, 0.1)],
        };
        let config = EngineConfig::default().with_declination(table);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");

        let config = EngineConfig::default()
            .with_target(GeoPoint::new(31.7767, 35.2345).unwrap())
            .with_smoothing(SmoothingMode::CircularMean { window_ms: 250 });
        config.save_to_file(&path).unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = EngineConfig::from_file("/nonexistent/engine.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/engine.json"));
    }
}
