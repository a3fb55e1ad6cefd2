//! Local Library Store: whole-collection persistence of saved books.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::models::SavedBook;

/// Persistence capability injected into [`crate::Library`].
///
/// Callers read the full collection, compute the new one and write it back.
/// Implementations are not expected to guard against concurrent writers.
pub trait LibraryStore {
    fn get_all(&self) -> Result<Vec<SavedBook>>;

    fn set_all(&self, books: &[SavedBook]) -> Result<()>;
}

impl<S: LibraryStore + ?Sized> LibraryStore for &S {
    fn get_all(&self) -> Result<Vec<SavedBook>> {
        (**self).get_all()
    }

    fn set_all(&self, books: &[SavedBook]) -> Result<()> {
        (**self).set_all(books)
    }
}

impl<S: LibraryStore + ?Sized> LibraryStore for Box<S> {
    fn get_all(&self) -> Result<Vec<SavedBook>> {
        (**self).get_all()
    }

    fn set_all(&self, books: &[SavedBook]) -> Result<()> {
        (**self).set_all(books)
    }
}
