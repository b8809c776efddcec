//! Input validation and error classification

pub mod data;
pub mod error;

pub use data::{SampleValidator, ValidationStats};
pub use error::{EngineError, EngineResult, ErrorDisposition};
