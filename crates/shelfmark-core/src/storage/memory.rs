use std::sync::Mutex;

use crate::error::{Result, ShelfError};
use crate::models::SavedBook;
use crate::storage::LibraryStore;

/// In-process store, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    books: Mutex<Vec<SavedBook>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LibraryStore for MemoryStore {
    fn get_all(&self) -> Result<Vec<SavedBook>> {
        self.books
            .lock()
            .map(|books| books.clone())
            .map_err(|_| ShelfError::Storage("memory store poisoned".to_string()))
    }

    fn set_all(&self, books: &[SavedBook]) -> Result<()> {
        let mut guard = self
            .books
            .lock()
            .map_err(|_| ShelfError::Storage("memory store poisoned".to_string()))?;
        *guard = books.to_vec();
        Ok(())
    }
}
