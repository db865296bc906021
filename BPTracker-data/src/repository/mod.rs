// Repository module structure
pub mod errors;
mod blood_pressure;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use blood_pressure::{BloodPressureRepository, ReadingRepositoryTrait, StorageBackend};
pub use in_memory::InMemoryStorage;

// Mock repository for tests and for downstream crates with the `mock` feature
#[cfg(any(test, feature = "mock"))]
pub use blood_pressure::MockReadingRepositoryTrait;
