pub mod health;
pub mod blood_pressure;

// Re-export handlers for easier imports
pub use blood_pressure::{create_reading, get_averages, get_averages_range, get_summary};
pub use health::health_check;
