//! Pure orientation algorithms

pub mod alignment;
pub mod bearing;
pub mod declination;

pub use alignment::{classify, AccuracyTier, AlignmentClassifier, AlignmentResult, IndicatorColor, TierThresholds};
pub use bearing::{initial_bearing, qibla_bearing};
pub use declination::{declination, BoundingBox, DeclinationRegion, DeclinationTable};
