// Public entities for the BPTracker API
// This module contains the request and response shapes of the HTTP surface

pub mod blood_pressure;

// Common entities for error handling
pub mod common;
