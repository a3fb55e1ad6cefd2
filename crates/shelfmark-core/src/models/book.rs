use serde::{Deserialize, Serialize};

/// Placeholder author used when the catalog reports none.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Placeholder title used when a record is saved without one.
pub const UNTITLED: &str = "Untitled";

/// A normalized catalog result, ready for deduplication and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

impl BookRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            thumbnail: None,
            description: None,
            isbn: None,
        }
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn has_isbn(&self) -> bool {
        is_present(&self.isbn)
    }

    pub fn has_thumbnail(&self) -> bool {
        is_present(&self.thumbnail)
    }

    pub fn has_description(&self) -> bool {
        is_present(&self.description)
    }

    pub fn has_known_author(&self) -> bool {
        self.author != UNKNOWN_AUTHOR
    }

    /// Fill display defaults before a record is persisted.
    pub fn sanitize(mut self) -> Self {
        if self.title.trim().is_empty() {
            self.title = UNTITLED.to_string();
        }
        if self.author.trim().is_empty() {
            self.author = UNKNOWN_AUTHOR.to_string();
        }
        self.thumbnail = non_blank(self.thumbnail);
        self.description = non_blank(self.description);
        self.isbn = non_blank(self.isbn);
        self
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

/// Collapse blank strings to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_flags() {
        let book = BookRecord::new("v1", "Dune", "Frank Herbert")
            .with_isbn("9780441013593")
            .with_thumbnail("https://books.example/dune.jpg");
        assert!(book.has_isbn());
        assert!(book.has_thumbnail());
        assert!(!book.has_description());
        assert!(book.has_known_author());
    }

    #[test]
    fn test_empty_isbn_is_absent() {
        let book = BookRecord::new("v1", "Dune", UNKNOWN_AUTHOR).with_isbn("");
        assert!(!book.has_isbn());
        assert!(!book.has_known_author());
    }

    #[test]
    fn test_sanitize_fills_defaults() {
        let mut book = BookRecord::new("v1", "  ", "").with_description("   ");
        book.isbn = Some(String::new());
        let clean = book.sanitize();
        assert_eq!(clean.title, UNTITLED);
        assert_eq!(clean.author, UNKNOWN_AUTHOR);
        assert_eq!(clean.description, None);
        assert_eq!(clean.isbn, None);
    }

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let json = serde_json::to_value(BookRecord::new("v1", "Dune", "Frank Herbert")).unwrap();
        assert!(json.get("thumbnail").is_none());
        assert_eq!(json["author"], "Frank Herbert");
    }
}
