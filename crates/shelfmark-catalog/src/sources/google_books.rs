use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use shelfmark_core::{BookRecord, CatalogConfig};
use tracing::debug;

use crate::dedup::to_record;
use crate::error::{CatalogError, Result};
use crate::http::RateLimitedClient;
use crate::sources::CatalogSource;
use crate::types::{RawItem, VolumesResponse};

const USER_AGENT: &str = concat!("shelfmark/", env!("CARGO_PKG_VERSION"));

pub struct GoogleBooksSource {
    client: RateLimitedClient,
    base_url: String,
    api_key: Option<String>,
    max_results: u32,
}

impl GoogleBooksSource {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        Ok(Self {
            client: RateLimitedClient::new(
                Duration::from_millis(config.min_interval_ms),
                config.max_retries,
                USER_AGENT,
            )?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            max_results: config.max_results,
        })
    }

    fn volumes_url(&self, volume_id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        {
            let mut segs = url
                .path_segments_mut()
                .map_err(|_| CatalogError::InvalidUrl(self.base_url.clone()))?;
            segs.pop_if_empty().push("volumes");
            if let Some(id) = volume_id {
                segs.push(id);
            }
        }
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    /// Look up a single volume and normalize it.
    pub async fn fetch_by_id(&self, id: &str) -> Result<BookRecord> {
        let item = self.fetch_volume(id).await?;
        to_record(item).ok_or_else(|| CatalogError::Parse(format!("volume {id} has no title")))
    }
}

#[async_trait]
impl CatalogSource for GoogleBooksSource {
    async fn fetch_catalog(&self, query: &str) -> Result<Vec<RawItem>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.volumes_url(None)?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("maxResults", &self.max_results.to_string());

        let resp: VolumesResponse = self.client.get_json(url.as_str()).await?;
        let items = resp.items.unwrap_or_default();
        debug!(query, total = resp.total_items, returned = items.len(), "catalog search");
        Ok(items)
    }

    async fn fetch_volume(&self, id: &str) -> Result<RawItem> {
        let url = self.volumes_url(Some(id))?;
        self.client.get_json(url.as_str()).await
    }
}
