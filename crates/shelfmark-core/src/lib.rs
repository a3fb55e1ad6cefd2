pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod storage;

pub use config::{AppConfig, CatalogConfig, LibraryConfig, MergePolicy};
pub use error::{Result, ShelfError};
pub use library::{Library, is_saved};
pub use models::*;

pub use storage::{JsonFileStore, LibraryStore, MemoryStore};
