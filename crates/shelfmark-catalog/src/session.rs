//! Debounced search front-end used by interactive shells.
//!
//! Queries submitted within the quiet period collapse into the last one.
//! Once a request is in flight it is not cancelled, and its response is
//! returned even if a newer query has since been submitted; callers that
//! render results should expect a late response to overwrite a fresher one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use shelfmark_core::BookRecord;
use tokio::time::sleep;
use tracing::debug;

use crate::dedup::Deduplicator;
use crate::error::Result;
use crate::sources::CatalogSource;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was blank; nothing was fetched.
    Empty,
    /// A newer query arrived during the quiet period.
    Superseded,
    /// The catalog answered but nothing survived filtering.
    NoResults(String),
    Results(Vec<BookRecord>),
}

impl SearchOutcome {
    pub fn books(&self) -> &[BookRecord] {
        match self {
            Self::Results(books) => books,
            _ => &[],
        }
    }
}

pub struct SearchSession<S: CatalogSource> {
    source: Arc<S>,
    dedup: Deduplicator,
    debounce: Duration,
    latest: AtomicU64,
}

impl<S: CatalogSource> SearchSession<S> {
    pub fn new(source: Arc<S>, dedup: Deduplicator, debounce: Duration) -> Self {
        Self {
            source,
            dedup,
            debounce,
            latest: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Wait out the debounce window, then search unless a newer query arrived.
    pub async fn submit(&self, query: &str) -> Result<SearchOutcome> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        sleep(self.debounce).await;
        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!(query, "query superseded during debounce");
            return Ok(SearchOutcome::Superseded);
        }
        self.search_now(query).await
    }

    /// Search immediately, bypassing the debounce window.
    pub async fn search_now(&self, query: &str) -> Result<SearchOutcome> {
        if query.trim().is_empty() {
            return Ok(SearchOutcome::Empty);
        }

        let raw = self.source.fetch_catalog(query).await?;
        let books = self.dedup.process(raw);
        if books.is_empty() {
            return Ok(SearchOutcome::NoResults(query.to_string()));
        }
        Ok(SearchOutcome::Results(books))
    }
}
