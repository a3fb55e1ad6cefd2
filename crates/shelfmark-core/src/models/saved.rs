use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BookRecord;

/// A book the user keeps in their local library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBook {
    #[serde(flatten)]
    pub book: BookRecord,

    pub date_added: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<DateTime<Utc>>,
}

impl SavedBook {
    /// Wrap a record, stamping it as added now.
    pub fn from_record(book: BookRecord) -> Self {
        Self::added_at(book, Utc::now())
    }

    pub fn added_at(book: BookRecord, date_added: DateTime<Utc>) -> Self {
        Self {
            book,
            date_added,
            comments: None,
            last_edited: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.book.id
    }

    /// Replace the user's notes and record the edit time.
    pub fn set_comments(&mut self, comments: impl Into<String>) {
        self.comments = Some(comments.into());
        self.last_edited = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_flat_camel_case() {
        let mut saved = SavedBook::from_record(BookRecord::new("abc", "Emma", "Jane Austen"));
        saved.set_comments("Re-read in spring");

        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["title"], "Emma");
        assert!(json.get("dateAdded").is_some());
        assert!(json.get("lastEdited").is_some());
        assert_eq!(json["comments"], "Re-read in spring");
    }

    #[test]
    fn test_reads_javascript_timestamps() {
        let raw = r#"{
            "id": "zyTCAlFPjgYC",
            "title": "The Google Story",
            "author": "David A. Vise",
            "thumbnail": null,
            "dateAdded": "2024-03-01T10:15:30.123Z"
        }"#;
        let saved: SavedBook = serde_json::from_str(raw).unwrap();
        assert_eq!(saved.id(), "zyTCAlFPjgYC");
        assert_eq!(saved.book.thumbnail, None);
        assert_eq!(saved.comments, None);
        assert_eq!(saved.last_edited, None);
    }
}
