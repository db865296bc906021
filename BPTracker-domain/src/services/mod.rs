pub mod aggregator;
pub mod blood_pressure;
pub mod insights;
pub mod range;
pub mod timeframe;

// Domain services
// Extraction lives in entities::conversions; everything here builds on it.

pub use blood_pressure::{BloodPressureService, BloodPressureServiceError, BloodPressureServiceTrait};
pub use range::Granularity;
pub use timeframe::{calculate_date_range, DateRange, TimeframeError};
