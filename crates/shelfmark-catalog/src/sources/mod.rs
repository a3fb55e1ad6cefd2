use async_trait::async_trait;

use crate::error::Result;
use crate::types::RawItem;

/// An external book catalog that can be queried by free text or volume id.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Raw results for a query. Blank queries return an empty list without I/O.
    async fn fetch_catalog(&self, query: &str) -> Result<Vec<RawItem>>;

    async fn fetch_volume(&self, id: &str) -> Result<RawItem>;
}

pub mod google_books;

pub use google_books::GoogleBooksSource;
