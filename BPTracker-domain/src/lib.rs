// BPTracker Domain
// This crate contains the averaging and date-windowing logic for BPTracker

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the data layer pieces callers need to build a service
pub use bp_tracker_data::database;
pub use bp_tracker_data::repository::{BloodPressureRepository, ReadingRepositoryTrait};
