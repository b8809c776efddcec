//! Stateful sensor processing

pub mod debounce;
pub mod heading;

pub use debounce::{CooldownBoundary, DebounceState, FeedbackConfig, FeedbackDebouncer};
pub use heading::{HeadingTracker, SmoothingMode, TrackerConfig, TrackerState};
