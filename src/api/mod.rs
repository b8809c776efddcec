//! Session and presentation API
//!
//! [`CompassSession`] ties the sensor stream, location provider and engine
//! components together; [`StatusFormatter`] turns its snapshots into
//! display strings.

pub mod formatting;
pub mod session;
pub mod types;

pub use formatting::{StatusFormatter, StatusReport, FLATNESS_WARNING};
pub use session::{CallbackHandle, CompassSession, FeedbackCallback};
pub use types::{
    BearingStatus, EngineSnapshot, FeedbackEvent, SessionError, SessionResult, SessionStats,
    UnavailableReason,
};
