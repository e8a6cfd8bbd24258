pub mod registry;
pub mod storage;

// Re-export commonly used types
pub use registry::{SavedJobs, SAVED_JOBS_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
