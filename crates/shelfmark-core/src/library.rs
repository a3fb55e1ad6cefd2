//! Library operations over an injected [`LibraryStore`].
//!
//! Every mutation loads the whole collection, computes the new one and writes
//! it back. Ids are compared exactly; fuzzy identity lives in the catalog
//! crate's deduplicator and is never consulted here.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::{Result, ShelfError};
use crate::models::{BookRecord, SavedBook};
use crate::storage::LibraryStore;

/// Exact-id membership test against a saved collection.
pub fn is_saved(id: &str, saved: &[SavedBook]) -> bool {
    saved.iter().any(|book| book.id() == id)
}

pub struct Library<S: LibraryStore> {
    store: S,
}

impl<S: LibraryStore> Library<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load_books(&self) -> Result<Vec<SavedBook>> {
        self.store.get_all()
    }

    pub fn get_book(&self, id: &str) -> Result<SavedBook> {
        self.load_books()?
            .into_iter()
            .find(|book| book.id() == id)
            .ok_or_else(|| ShelfError::BookNotFound(id.to_string()))
    }

    /// Append a book, refusing ids that are already present.
    pub fn add_book(&self, book: SavedBook) -> Result<Vec<SavedBook>> {
        let mut books = self.load_books()?;
        if is_saved(book.id(), &books) {
            return Err(ShelfError::BookAlreadyExists(book.id().to_string()));
        }
        info!(id = book.id(), title = %book.book.title, "adding book");
        books.push(book);
        self.store.set_all(&books)?;
        Ok(books)
    }

    /// Save a catalog search result, stamped with the current time.
    pub fn add_search_result(&self, record: BookRecord) -> Result<Vec<SavedBook>> {
        self.add_book(SavedBook::from_record(record.sanitize()))
    }

    /// Save a book typed in by the user. Title and author are required.
    pub fn add_manual(&self, title: &str, author: &str, comments: &str) -> Result<SavedBook> {
        let title = title.trim();
        let author = author.trim();
        if title.is_empty() || author.is_empty() {
            return Err(ShelfError::ValidationError(
                "Title and author are required".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let mut saved = SavedBook::from_record(BookRecord::new(id, title, author));
        let comments = comments.trim();
        if !comments.is_empty() {
            saved.comments = Some(comments.to_string());
        }

        self.add_book(saved.clone())?;
        Ok(saved)
    }

    /// Replace the entry with the same id. Unknown ids leave the library unchanged.
    pub fn update_book(&self, updated: SavedBook) -> Result<Vec<SavedBook>> {
        let books: Vec<SavedBook> = self
            .load_books()?
            .into_iter()
            .map(|book| {
                if book.id() == updated.id() {
                    updated.clone()
                } else {
                    book
                }
            })
            .collect();
        self.store.set_all(&books)?;
        Ok(books)
    }

    pub fn update_comments(&self, id: &str, comments: &str) -> Result<Vec<SavedBook>> {
        let mut books = self.load_books()?;
        for book in books.iter_mut().filter(|b| b.id() == id) {
            book.set_comments(comments);
        }
        debug!(id, "updated comments");
        self.store.set_all(&books)?;
        Ok(books)
    }

    /// Remove a book. Unknown ids are a no-op.
    pub fn delete_book(&self, id: &str) -> Result<Vec<SavedBook>> {
        let mut books = self.load_books()?;
        books.retain(|book| book.id() != id);
        info!(id, "deleted book");
        self.store.set_all(&books)?;
        Ok(books)
    }

    pub fn is_book_saved(&self, id: &str) -> Result<bool> {
        Ok(is_saved(id, &self.load_books()?))
    }

    pub fn saved_ids(&self) -> Result<HashSet<String>> {
        Ok(self
            .load_books()?
            .into_iter()
            .map(|book| book.book.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_AUTHOR;
    use crate::storage::MemoryStore;

    struct FailingStore;

    impl LibraryStore for FailingStore {
        fn get_all(&self) -> Result<Vec<SavedBook>> {
            Err(ShelfError::Storage("disk unavailable".to_string()))
        }

        fn set_all(&self, _books: &[SavedBook]) -> Result<()> {
            Err(ShelfError::Storage("disk unavailable".to_string()))
        }
    }

    fn record(id: &str, title: &str) -> BookRecord {
        BookRecord::new(id, title, "Some Author")
    }

    #[test]
    fn test_add_and_load() {
        let library = Library::new(MemoryStore::new());
        library.add_search_result(record("a", "Alpha")).unwrap();
        library.add_search_result(record("b", "Beta")).unwrap();

        let books = library.load_books().unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id(), "a");
        assert_eq!(books[1].id(), "b");
    }

    #[test]
    fn test_add_duplicate_id_is_named_error() {
        let library = Library::new(MemoryStore::new());
        library.add_search_result(record("a", "Alpha")).unwrap();

        let err = library.add_search_result(record("a", "Alpha again")).unwrap_err();
        assert!(matches!(err, ShelfError::BookAlreadyExists(id) if id == "a"));
        assert_eq!(library.load_books().unwrap().len(), 1);
    }

    #[test]
    fn test_add_search_result_sanitizes() {
        let library = Library::new(MemoryStore::new());
        library
            .add_search_result(BookRecord::new("a", "Alpha", ""))
            .unwrap();
        assert_eq!(library.get_book("a").unwrap().book.author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_add_manual_requires_title_and_author() {
        let library = Library::new(MemoryStore::new());
        let err = library.add_manual("  ", "Someone", "").unwrap_err();
        assert!(matches!(err, ShelfError::ValidationError(_)));
        let err = library.add_manual("A Title", "", "").unwrap_err();
        assert!(matches!(err, ShelfError::ValidationError(_)));
        assert!(library.load_books().unwrap().is_empty());
    }

    #[test]
    fn test_add_manual_generates_id_and_trims() {
        let library = Library::new(MemoryStore::new());
        let saved = library
            .add_manual(" Walden ", " Henry David Thoreau ", "  borrowed copy ")
            .unwrap();

        assert!(!saved.id().is_empty());
        assert_eq!(saved.book.title, "Walden");
        assert_eq!(saved.book.author, "Henry David Thoreau");
        assert_eq!(saved.comments.as_deref(), Some("borrowed copy"));
        assert!(library.is_book_saved(saved.id()).unwrap());

        let other = library.add_manual("Walden", "Henry David Thoreau", "").unwrap();
        assert_ne!(other.id(), saved.id());
        assert_eq!(other.comments, None);
    }

    #[test]
    fn test_update_comments_sets_last_edited() {
        let library = Library::new(MemoryStore::new());
        library.add_search_result(record("a", "Alpha")).unwrap();
        library.add_search_result(record("b", "Beta")).unwrap();

        let books = library.update_comments("a", "Loved it").unwrap();
        let a = books.iter().find(|b| b.id() == "a").unwrap();
        let b = books.iter().find(|b| b.id() == "b").unwrap();
        assert_eq!(a.comments.as_deref(), Some("Loved it"));
        assert!(a.last_edited.is_some());
        assert!(b.last_edited.is_none());
    }

    #[test]
    fn test_update_book_replaces_by_id() {
        let library = Library::new(MemoryStore::new());
        library.add_search_result(record("a", "Alpha")).unwrap();

        let mut changed = library.get_book("a").unwrap();
        changed.book.title = "Alpha (revised)".to_string();
        library.update_book(changed).unwrap();
        assert_eq!(library.get_book("a").unwrap().book.title, "Alpha (revised)");

        let stranger = SavedBook::from_record(record("zzz", "Nobody"));
        let books = library.update_book(stranger).unwrap();
        assert_eq!(books.len(), 1);
    }

    #[test]
    fn test_delete_book() {
        let library = Library::new(MemoryStore::new());
        library.add_search_result(record("a", "Alpha")).unwrap();
        library.add_search_result(record("b", "Beta")).unwrap();

        let books = library.delete_book("a").unwrap();
        assert_eq!(books.len(), 1);
        assert!(!library.is_book_saved("a").unwrap());

        let books = library.delete_book("missing").unwrap();
        assert_eq!(books.len(), 1);
    }

    #[test]
    fn test_get_missing_book() {
        let library = Library::new(MemoryStore::new());
        assert!(matches!(
            library.get_book("nope"),
            Err(ShelfError::BookNotFound(_))
        ));
    }

    #[test]
    fn test_is_saved_uses_exact_ids() {
        let saved = vec![SavedBook::from_record(BookRecord::new(
            "manual-1",
            "Animal Farm",
            "George Orwell",
        ))];
        assert!(is_saved("manual-1", &saved));
        // Same book under a different provider id is not recognized.
        assert!(!is_saved("kXq3AAAAYAAJ", &saved));
    }

    #[test]
    fn test_saved_ids() {
        let library = Library::new(MemoryStore::new());
        library.add_search_result(record("a", "Alpha")).unwrap();
        library.add_search_result(record("b", "Beta")).unwrap();

        let ids = library.saved_ids().unwrap();
        assert!(ids.contains("a") && ids.contains("b"));
    }

    #[test]
    fn test_storage_failures_propagate() {
        let library = Library::new(FailingStore);
        assert!(library.load_books().unwrap_err().is_storage());
        assert!(library.add_search_result(record("a", "Alpha")).unwrap_err().is_storage());
        assert!(library.delete_book("a").unwrap_err().is_storage());
    }
}
