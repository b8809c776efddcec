//! Classification of how well the device points at the target
//!
//! The offset is measured from the device's true heading to the target
//! bearing: a positive offset means the device must turn clockwise.

use crate::core::{normalize_degrees, wrap_signed_degrees, Bearing};
use crate::core::{DEFAULT_ACCURATE_THRESHOLD_DEG, DEFAULT_CLOSE_THRESHOLD_DEG};
use serde::{Deserialize, Serialize};

/// Discrete alignment quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccuracyTier {
    Accurate,
    Close,
    Far,
}

impl AccuracyTier {
    pub fn color(&self) -> IndicatorColor {
        match self {
            AccuracyTier::Accurate => IndicatorColor::Green,
            AccuracyTier::Close => IndicatorColor::Amber,
            AccuracyTier::Far => IndicatorColor::Red,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccuracyTier::Accurate => "Very accurate",
            AccuracyTier::Close => "Fairly accurate",
            AccuracyTier::Far => "Less accurate",
        }
    }
}

/// Display color attached to each tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorColor {
    Green,
    Amber,
    Red,
}

impl IndicatorColor {
    pub fn hex(&self) -> &'static str {
        match self {
            IndicatorColor::Green => "#4CAF50",
            IndicatorColor::Amber => "#FFC107",
            IndicatorColor::Red => "#F44336",
        }
    }
}

/// Per-tick alignment outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentResult {
    /// Signed turn towards the target in degrees, within (-180, 180]
    pub offset_deg: f64,
    pub true_heading: Bearing,
    pub tier: AccuracyTier,
    pub color: IndicatorColor,
}

impl AlignmentResult {
    pub fn magnitude(&self) -> f64 {
        self.offset_deg.abs()
    }

    pub fn is_aligned(&self) -> bool {
        self.tier == AccuracyTier::Accurate
    }

    pub fn label(&self) -> &'static str {
        self.tier.label()
    }
}

/// Tier boundaries in degrees; both are inclusive upper limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub accurate_deg: f64,
    pub close_deg: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            accurate_deg: DEFAULT_ACCURATE_THRESHOLD_DEG,
            close_deg: DEFAULT_CLOSE_THRESHOLD_DEG,
        }
    }
}

impl TierThresholds {
    pub fn tier_for(&self, magnitude: f64) -> AccuracyTier {
        if magnitude <= self.accurate_deg {
            AccuracyTier::Accurate
        } else if magnitude <= self.close_deg {
            AccuracyTier::Close
        } else {
            AccuracyTier::Far
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlignmentClassifier {
    thresholds: TierThresholds,
}

impl AlignmentClassifier {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> TierThresholds {
        self.thresholds
    }

    pub fn classify(&self, target: Bearing, device_heading: Bearing, declination_deg: f64) -> AlignmentResult {
        let true_heading = Bearing::new(device_heading.degrees() + declination_deg);
        let offset_deg = wrap_signed_degrees(normalize_degrees(target.degrees() - true_heading.degrees()));
        let tier = self.thresholds.tier_for(offset_deg.abs());

        AlignmentResult {
            offset_deg,
            true_heading,
            tier,
            color: tier.color(),
        }
    }
}

/// Classify with the default 5° / 15° thresholds
pub fn classify(target: Bearing, device_heading: Bearing, declination_deg: f64) -> AlignmentResult {
    AlignmentClassifier::default().classify(target, device_heading, declination_deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_are_closed() {
        let north = Bearing::NORTH;
        assert_eq!(classify(Bearing::new(5.0), north, 0.0).tier, AccuracyTier::Accurate);
        assert_eq!(classify(Bearing::new(5.0001), north, 0.0).tier, AccuracyTier::Close);
        assert_eq!(classify(Bearing::new(15.0), north, 0.0).tier, AccuracyTier::Close);
        assert_eq!(classify(Bearing::new(15.0001), north, 0.0).tier, AccuracyTier::Far);
    }

    #[test]
    fn test_negative_offsets_use_magnitude() {
        let result = classify(Bearing::NORTH, Bearing::new(5.0), 0.0);
        assert_eq!(result.offset_deg, -5.0);
        assert_eq!(result.tier, AccuracyTier::Accurate);

        let result = classify(Bearing::new(350.0), Bearing::new(10.0), 0.0);
        assert!((result.offset_deg + 20.0).abs() < 1e-9);
        assert_eq!(result.tier, AccuracyTier::Far);
    }

    #[test]
    fn test_opposite_direction_is_plus_180() {
        let result = classify(Bearing::new(180.0), Bearing::NORTH, 0.0);
        assert_eq!(result.offset_deg, 180.0);
        assert_eq!(result.tier, AccuracyTier::Far);
        assert_eq!(result.color, IndicatorColor::Red);
    }

    #[test]
    fn test_declination_shifts_true_heading() {
        // Magnetic heading 290 plus 3 degrees east declination reads as 293 true
        let result = classify(Bearing::new(295.0), Bearing::new(290.0), 3.0);
        assert!((result.true_heading.degrees() - 293.0).abs() < 1e-9);
        assert!((result.offset_deg - 2.0).abs() < 1e-9);
        assert!(result.is_aligned());

        let wrapped = classify(Bearing::new(2.0), Bearing::new(359.0), 2.5);
        assert!((wrapped.true_heading.degrees() - 1.5).abs() < 1e-9);
        assert!((wrapped.offset_deg - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_colors_and_labels() {
        assert_eq!(AccuracyTier::Accurate.color().hex(), "#4CAF50");
        assert_eq!(AccuracyTier::Close.color().hex(), "#FFC107");
        assert_eq!(AccuracyTier::Far.color().hex(), "#F44336");
        assert_eq!(classify(Bearing::new(10.0), Bearing::NORTH, 0.0).label(), "Fairly accurate");
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = AlignmentClassifier::new(TierThresholds { accurate_deg: 2.0, close_deg: 30.0 });
        assert_eq!(classifier.classify(Bearing::new(3.0), Bearing::NORTH, 0.0).tier, AccuracyTier::Close);
        assert_eq!(classifier.classify(Bearing::new(25.0), Bearing::NORTH, 0.0).tier, AccuracyTier::Close);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_offset_magnitude_bounded(
                target in 0.0..360.0_f64,
                heading in 0.0..360.0_f64,
                declination in -30.0..30.0_f64,
            ) {
                let result = classify(Bearing::new(target), Bearing::new(heading), declination);
                prop_assert!(result.magnitude() <= 180.0);
                prop_assert!(result.offset_deg > -180.0);
            }
        }
    }
}
