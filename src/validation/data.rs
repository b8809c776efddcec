use crate::core::{RawSensorSample, SensorKind};
use crate::validation::error::{EngineError, EngineResult};

/// Running counts kept by the validator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub accepted: u64,
    pub rejected_non_finite: u64,
    pub rejected_wrong_kind: u64,
}

impl ValidationStats {
    pub fn rejected(&self) -> u64 {
        self.rejected_non_finite + self.rejected_wrong_kind
    }
}

/// Gatekeeper for raw sensor samples before they touch tracker state
#[derive(Debug, Clone, Default)]
pub struct SampleValidator {
    stats: ValidationStats,
}

impl SampleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `sample` came from the `expected` sensor and holds only
    /// finite readings
    pub fn validate(&mut self, sample: &RawSensorSample, expected: SensorKind) -> EngineResult<()> {
        if sample.kind != expected {
            self.stats.rejected_wrong_kind += 1;
            return Err(EngineError::InvalidSample {
                kind: kind_name(sample.kind),
                timestamp_ms: sample.timestamp_ms,
            });
        }

        if !sample.is_finite() {
            self.stats.rejected_non_finite += 1;
            return Err(EngineError::InvalidSample {
                kind: kind_name(sample.kind),
                timestamp_ms: sample.timestamp_ms,
            });
        }

        self.stats.accepted += 1;
        Ok(())
    }

    pub fn stats(&self) -> ValidationStats {
        self.stats
    }

    pub fn clear_stats(&mut self) {
        self.stats = ValidationStats::default();
    }
}

pub(crate) fn kind_name(kind: SensorKind) -> &'static str {
    match kind {
        SensorKind::Magnetic => "magnetic",
        SensorKind::Tilt => "tilt",
    }
}
