use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{BiopsError, Result};

/// Records per page, fixed by the remote API contract.
pub const PAGE_SIZE: u64 = 250;

/// Default pause between page requests. The pacing is a rate-limit
/// courtesy toward the remote API, not a performance knob.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 1000;

/// Seam between the adapters and the wire. Production uses [`HttpTransport`];
/// tests inject a recording fake.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Value>;
    async fn post(&self, url: &str, body: &Value) -> Result<Value>;
}

/// reqwest-backed transport carrying the provider's auth header and a JSON
/// content type on every request.
pub struct HttpTransport {
    client: reqwest::Client,
    headers: HeaderMap,
}

impl HttpTransport {
    pub fn new(auth_header: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(auth_header).map_err(|_| {
                BiopsError::Configuration("credential contains invalid header characters".into())
            })?,
        );
        Ok(Self {
            client: reqwest::Client::new(),
            headers,
        })
    }

    /// Redash authenticates with `Authorization: Key <api key>`.
    pub fn redash(credential: &str) -> Result<Self> {
        Self::new(&format!("Key {}", credential))
    }

    async fn into_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BiopsError::Remote {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Value> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        debug!(url, "POST");
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?;
        Self::into_json(response).await
    }
}

/// Fetches page 1 of `base_url`, and when `all` is set every remaining page
/// sequentially, pausing `delay` between requests. Returns the flattened
/// record list. Fail-fast: an error on any page aborts the whole listing
/// rather than returning a partial set.
pub async fn fetch_pages(
    transport: &dyn Transport,
    base_url: &str,
    all: bool,
    delay: Duration,
) -> Result<Vec<Value>> {
    let first = transport.get(base_url).await?;
    let mut records = page_results(&first);

    if !all {
        return Ok(records);
    }

    let count = first.get("count").and_then(Value::as_u64).unwrap_or(0);
    let page_size = first
        .get("page_size")
        .and_then(Value::as_u64)
        .unwrap_or(PAGE_SIZE)
        .max(1);
    let total_pages = count.div_ceil(page_size);
    debug!(count, page_size, total_pages, "paging through listing");

    for page in 2..=total_pages {
        tokio::time::sleep(delay).await;
        let body = transport.get(&format!("{}&page={}", base_url, page)).await?;
        records.extend(page_results(&body));
    }

    Ok(records)
}

fn page_results(body: &Value) -> Vec<Value> {
    body.get("results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
