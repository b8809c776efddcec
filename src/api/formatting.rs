//! Status formatting for the presentation layer
//!
//! Turns an [`EngineSnapshot`] into the strings a compass screen shows:
//! the headline with the remaining turn and accuracy label, the indicator
//! color, the formatted location and any warning or error line.

use crate::api::types::{BearingStatus, EngineSnapshot};
use serde::Serialize;

/// Shown while the tilt sensor reports the device is not level
pub const FLATNESS_WARNING: &str = "Please hold device flat";

/// Color used when there is nothing to classify
const NEUTRAL_COLOR: &str = "#9E9E9E";

/// Display-ready view of one engine snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub headline: String,
    pub accuracy_label: Option<String>,
    pub color_hex: String,
    /// Signed turn towards the target (degrees, clockwise positive)
    pub offset_deg: Option<f64>,
    pub target_bearing_deg: Option<f64>,
    pub heading_deg: Option<f64>,
    pub location: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusFormatter {
    /// Decimal places for angles
    pub precision: usize,
    pub pretty_json: bool,
}

impl Default for StatusFormatter {
    fn default() -> Self {
        Self {
            precision: 1,
            pretty_json: false,
        }
    }
}

impl StatusFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    pub fn report(&self, snapshot: &EngineSnapshot) -> StatusReport {
        let warning = (!snapshot.is_flat).then(|| FLATNESS_WARNING.to_string());
        let heading_deg = snapshot.heading.map(|h| h.degrees());

        let (location, target_bearing_deg, error) = match &snapshot.bearing {
            BearingStatus::Available { origin, bearing, .. } => {
                (Some(origin.to_string()), Some(bearing.degrees()), None)
            }
            BearingStatus::Unavailable(reason) => (None, None, Some(reason.message())),
        };

        match snapshot.alignment {
            Some(alignment) => StatusReport {
                headline: format!(
                    "Qibla: {:.*}° ({})",
                    self.precision,
                    alignment.magnitude(),
                    alignment.label()
                ),
                accuracy_label: Some(alignment.label().to_string()),
                color_hex: alignment.color.hex().to_string(),
                offset_deg: Some(alignment.offset_deg),
                target_bearing_deg,
                heading_deg,
                location,
                warning,
                error,
            },
            None => StatusReport {
                headline: match &error {
                    Some(message) => message.clone(),
                    None => "Waiting for compass".to_string(),
                },
                accuracy_label: None,
                color_hex: NEUTRAL_COLOR.to_string(),
                offset_deg: None,
                target_bearing_deg,
                heading_deg,
                location,
                warning,
                error,
            },
        }
    }

    /// Human-readable lines, one per populated field
    pub fn format_text(&self, report: &StatusReport) -> String {
        let mut lines = vec![report.headline.clone()];
        if let Some(bearing) = report.target_bearing_deg {
            lines.push(format!("Target bearing: {:.*}°", self.precision, bearing));
        }
        if let Some(heading) = report.heading_deg {
            lines.push(format!("Heading: {:.*}°", self.precision, heading));
        }
        if let Some(location) = &report.location {
            lines.push(location.clone());
        }
        if let Some(warning) = &report.warning {
            lines.push(warning.clone());
        }
        lines.join("\n")
    }

    pub fn format_json(&self, report: &StatusReport) -> Result<String, serde_json::Error> {
        if self.pretty_json {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
    }
}
