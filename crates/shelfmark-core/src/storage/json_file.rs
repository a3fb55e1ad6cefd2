use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, ShelfError};
use crate::models::SavedBook;
use crate::storage::LibraryStore;

/// Stores the whole library as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "books.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn storage_err(path: &Path, action: &str, e: impl std::fmt::Display) -> ShelfError {
    ShelfError::Storage(format!("{action} {}: {e}", path.display()))
}

impl LibraryStore for JsonFileStore {
    fn get_all(&self) -> Result<Vec<SavedBook>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| storage_err(&self.path, "read", e))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let books: Vec<SavedBook> =
            serde_json::from_str(&contents).map_err(|e| storage_err(&self.path, "parse", e))?;
        debug!(count = books.len(), path = %self.path.display(), "loaded library");
        Ok(books)
    }

    fn set_all(&self, books: &[SavedBook]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| storage_err(parent, "create", e))?;
        }

        let json =
            serde_json::to_string_pretty(books).map_err(|e| storage_err(&self.path, "encode", e))?;

        // Write-then-rename: readers never observe a partial file.
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| storage_err(&tmp, "write", e))?;
        fs::rename(&tmp, &self.path).map_err(|e| storage_err(&self.path, "replace", e))?;
        debug!(count = books.len(), path = %self.path.display(), "saved library");
        Ok(())
    }
}
