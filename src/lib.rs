// TaskEasy - priority to-do list with single-slot JSON persistence

pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use filter::TaskFilter;
pub use models::{Priority, Stats, Status, Task, TaskDraft, TaskPatch, now_ms};
pub use storage::{FileBackend, MemoryBackend, StorageBackend, StorageError};
pub use store::{TaskStore, sorted_by_priority};
