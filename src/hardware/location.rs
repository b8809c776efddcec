//! Location provider trait

use crate::core::GeoPoint;
use crate::hardware::LocationError;

/// Platform source of a best-effort position fix
pub trait LocationProvider {
    /// Current fix. `Ok(None)` means the service works but has no fix yet.
    fn current_fix(&mut self) -> Result<Option<GeoPoint>, LocationError>;
}

/// Provider that always reports the same point, for callers that already
/// know where they are
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub GeoPoint);

impl LocationProvider for FixedLocation {
    fn current_fix(&mut self) -> Result<Option<GeoPoint>, LocationError> {
        Ok(Some(self.0))
    }
}
