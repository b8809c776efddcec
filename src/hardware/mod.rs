//! Platform boundary: sensor streams and location providers
//!
//! The engine never acquires sensor data or position fixes itself. The
//! platform layer implements these traits; [`mock`] provides scripted
//! implementations for tests and demos.

pub mod error;
pub mod location;
pub mod mock;
pub mod sensor;

pub use error::{LocationError, SensorError, SensorResult};
pub use location::{FixedLocation, LocationProvider};
pub use mock::{MockLocationProvider, MockSensorProbe, MockSensorStream};
pub use sensor::{SensorStream, SubscriptionId};
