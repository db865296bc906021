// Data storage models
pub mod blood_pressure;

pub use blood_pressure::{Arm, NewReading, RawReading};
