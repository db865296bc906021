// Domain entities and value objects
pub mod blood_pressure;
pub mod conversions;
pub mod period;

// Re-export common types for easier imports
pub use blood_pressure::{
    Arm, ArmAverages, AverageStats, AveragesResult, BloodPressureCategory, CanonicalReading, CreateReadingRequest,
    Summary,
};
pub use period::{PeriodInfo, Timeframe};
