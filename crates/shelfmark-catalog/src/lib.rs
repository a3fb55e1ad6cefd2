//! Shelfmark Catalog — book catalog client, result deduplication and ranking.

pub mod dedup;
pub mod error;
pub mod http;
pub mod session;
pub mod sources;
pub mod types;

pub use dedup::{Deduplicator, are_duplicates, normalize, process};
pub use error::{CatalogError, Result};
pub use session::{SearchOutcome, SearchSession};
pub use sources::{CatalogSource, GoogleBooksSource};
pub use types::RawItem;
