//! Provider-shaped volume records, as returned by the Google Books API.
//!
//! These only live between the HTTP response and the deduplicator's
//! normalize step.

use serde::{Deserialize, Serialize};

pub const ISBN_13: &str = "ISBN_13";
pub const ISBN_10: &str = "ISBN_10";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items: Option<Vec<RawItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

impl IndustryIdentifier {
    pub fn is_isbn(&self) -> bool {
        self.kind == ISBN_13 || self.kind == ISBN_10
    }
}

impl RawItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            volume_info: VolumeInfo {
                title: Some(title.into()),
                ..Default::default()
            },
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.volume_info
            .authors
            .get_or_insert_with(Vec::new)
            .push(author.into());
        self
    }

    pub fn with_identifier(mut self, kind: &str, identifier: impl Into<String>) -> Self {
        self.volume_info
            .industry_identifiers
            .get_or_insert_with(Vec::new)
            .push(IndustryIdentifier {
                kind: kind.to_string(),
                identifier: identifier.into(),
            });
        self
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.volume_info.image_links = Some(ImageLinks {
            thumbnail: Some(url.into()),
        });
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.volume_info.description = Some(text.into());
        self
    }

    /// First identifier typed as ISBN-13 or ISBN-10, in provider order.
    pub fn first_isbn(&self) -> Option<&str> {
        self.volume_info
            .industry_identifiers
            .as_deref()?
            .iter()
            .find(|id| id.is_isbn())
            .map(|id| id.identifier.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_volume_envelope() {
        let raw = r#"{
            "kind": "books#volumes",
            "totalItems": 1,
            "items": [{
                "id": "kXq3AAAAYAAJ",
                "volumeInfo": {
                    "title": "Animal Farm",
                    "authors": ["George Orwell"],
                    "imageLinks": { "smallThumbnail": "http://x/s", "thumbnail": "http://x/t" },
                    "industryIdentifiers": [
                        { "type": "OTHER", "identifier": "UOM:39015" },
                        { "type": "ISBN_10", "identifier": "0451526341" },
                        { "type": "ISBN_13", "identifier": "9780451526342" }
                    ]
                }
            }]
        }"#;
        let resp: VolumesResponse = serde_json::from_str(raw).unwrap();
        let items = resp.items.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].volume_info.title.as_deref(), Some("Animal Farm"));
        assert_eq!(items[0].first_isbn(), Some("0451526341"));
    }

    #[test]
    fn missing_items_is_none() {
        let resp: VolumesResponse =
            serde_json::from_str(r#"{"kind":"books#volumes","totalItems":0}"#).unwrap();
        assert!(resp.items.is_none());
    }

    #[test]
    fn volume_without_info_still_parses() {
        let item: RawItem = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(item.volume_info.title, None);
        assert_eq!(item.first_isbn(), None);
    }
}
