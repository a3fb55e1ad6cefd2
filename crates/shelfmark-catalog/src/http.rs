use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

const DEFAULT_RETRY_AFTER_SECS: u64 = 5;
const MAX_WAIT_SECS: u64 = 60;

// ─── RateLimitedClient ────────────────────────────────────────────────────────

/// GET-only HTTP client with request spacing and bounded retries.
///
/// Connect failures back off exponentially; 429 responses honor `Retry-After`.
/// Once retries are exhausted the last failure is returned as-is.
pub struct RateLimitedClient {
    client: reqwest::Client,
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
    max_retries: u32,
}

impl RateLimitedClient {
    pub fn new(min_interval: Duration, max_retries: u32, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
            max_retries,
        })
    }

    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(t) = *last {
            let elapsed = t.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            self.wait_for_rate_limit().await;
            debug!(url, attempt, "GET");
            let resp = self.client.get(url).send().await;
            match resp {
                Ok(r) if r.status() == 429 && attempt < self.max_retries => {
                    let wait = retry_after_secs(r.headers());
                    warn!(url, wait, "rate limited, retrying");
                    sleep(Duration::from_secs(wait)).await;
                    attempt += 1;
                }
                Ok(r) if !r.status().is_success() => {
                    let status = r.status().as_u16();
                    let body = r.text().await.unwrap_or_default();
                    return Err(CatalogError::Provider {
                        url: url.to_string(),
                        status,
                        body,
                    });
                }
                Ok(r) => return r.text().await.map_err(CatalogError::Network),
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(CatalogError::Network(e));
                    }
                    let backoff = backoff_secs(attempt);
                    warn!(url, error = %e, backoff, "request failed, retrying");
                    sleep(Duration::from_secs(backoff)).await;
                    attempt += 1;
                }
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let text = self.get(url).await?;
        serde_json::from_str(&text).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

/// Seconds to wait after a 429, from `Retry-After` when it is a plain number.
fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map_or(DEFAULT_RETRY_AFTER_SECS, |secs| secs.min(MAX_WAIT_SECS))
}

/// Exponential backoff for connect failures, capped at one minute.
fn backoff_secs(attempt: u32) -> u64 {
    2u64.saturating_pow(attempt).min(MAX_WAIT_SECS)
}
