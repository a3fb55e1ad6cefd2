//! Search-result deduplication and ranking.
//!
//! Raw catalog items go through four stages: normalize into [`BookRecord`]s,
//! fold equivalent records together in input order, then a stable sort that
//! puts the most complete records first. Nothing here performs I/O or fails;
//! incomplete items are either dropped (no title) or filled with defaults.

use std::cmp::Reverse;

use shelfmark_core::{BookRecord, MergePolicy, UNKNOWN_AUTHOR, non_blank};
use tracing::debug;

use crate::types::RawItem;

#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    policy: MergePolicy,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Turn one page of raw results into a duplicate-free, ranked list.
    pub fn process(&self, items: Vec<RawItem>) -> Vec<BookRecord> {
        let raw_count = items.len();
        let records = items.into_iter().filter_map(to_record);
        let mut unique = self.merge(records);
        rank(&mut unique);
        debug!(raw = raw_count, kept = unique.len(), policy = ?self.policy, "deduplicated results");
        unique
    }

    /// Fold each record into the first equivalent one already kept, in order.
    pub fn merge(&self, records: impl IntoIterator<Item = BookRecord>) -> Vec<BookRecord> {
        let mut unique: Vec<BookRecord> = Vec::new();
        for candidate in records {
            let Some(existing) = unique.iter_mut().find(|kept| are_duplicates(kept, &candidate))
            else {
                unique.push(candidate);
                continue;
            };

            match self.policy {
                MergePolicy::Replace => {
                    if should_replace(existing, &candidate) {
                        *existing = candidate;
                    }
                }
                MergePolicy::FieldWise => fill_missing(existing, candidate),
            }
        }
        unique
    }
}

/// Run the pipeline with the default wholesale-replace policy.
pub fn process(items: Vec<RawItem>) -> Vec<BookRecord> {
    Deduplicator::new().process(items)
}

/// Normalize a provider item. Items without a usable title yield `None`.
pub fn to_record(item: RawItem) -> Option<BookRecord> {
    let isbn = item.first_isbn().map(|s| s.trim().to_string());
    let info = item.volume_info;

    let title = info.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return None;
    }

    let author = info
        .authors
        .as_deref()
        .and_then(|authors| authors.first())
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string();

    let thumbnail = info
        .image_links
        .and_then(|links| links.thumbnail)
        .map(|url| secure_url(&url));

    Some(BookRecord {
        id: item.id,
        title: title.to_string(),
        author,
        thumbnail: non_blank(thumbnail),
        description: non_blank(info.description.map(|d| d.trim().to_string())),
        isbn: non_blank(isbn),
    })
}

fn secure_url(url: &str) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => url.to_string(),
    }
}

/// Comparison key: lowercase ASCII letters and digits only.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .trim()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Fuzzy identity between two catalog records.
///
/// When both sides carry an ISBN, it alone decides. Otherwise titles must be
/// equal or one must contain the other, and authors must match exactly, all
/// after [`normalize`].
pub fn are_duplicates(a: &BookRecord, b: &BookRecord) -> bool {
    if let (Some(isbn_a), Some(isbn_b)) = (present(&a.isbn), present(&b.isbn)) {
        return normalize(isbn_a) == normalize(isbn_b);
    }

    let title_a = normalize(&a.title);
    let title_b = normalize(&b.title);
    let titles_match = title_a.contains(&title_b) || title_b.contains(&title_a);

    titles_match && normalize(&a.author) == normalize(&b.author)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Whether `candidate` should take the place of `existing` wholesale.
///
/// Any single field the candidate has and the existing record lacks is
/// enough, so a replacement can lose fields only the existing record had.
pub fn should_replace(existing: &BookRecord, candidate: &BookRecord) -> bool {
    (candidate.has_isbn() && !existing.has_isbn())
        || (candidate.has_thumbnail() && !existing.has_thumbnail())
        || (candidate.has_description() && !existing.has_description())
        || (candidate.has_known_author() && !existing.has_known_author())
}

fn fill_missing(existing: &mut BookRecord, candidate: BookRecord) {
    let BookRecord {
        isbn,
        thumbnail,
        description,
        author,
        ..
    } = candidate;

    if !existing.has_isbn() {
        existing.isbn = non_blank(isbn);
    }
    if !existing.has_thumbnail() {
        existing.thumbnail = non_blank(thumbnail);
    }
    if !existing.has_description() {
        existing.description = non_blank(description);
    }
    if !existing.has_known_author() && author != UNKNOWN_AUTHOR {
        existing.author = author;
    }
}

/// Stable sort: ISBN, then thumbnail, then description, then known author.
pub fn rank(records: &mut [BookRecord]) {
    records.sort_by_key(|b| {
        Reverse((
            b.has_isbn(),
            b.has_thumbnail(),
            b.has_description(),
            b.has_known_author(),
        ))
    });
}
