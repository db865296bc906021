// BPTracker-api lib.rs
//
// This is the main library file for the BPTracker API.
// It exposes the router, its handlers and the application configuration.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
