// BPTracker Data
// This crate handles data access for blood pressure readings

// Database configuration, connection and migrations
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
