use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::api::http::{fetch_pages, HttpTransport, Transport, DEFAULT_PAGE_DELAY_MS, PAGE_SIZE};
use crate::api::ProviderApi;
use crate::error::{BiopsError, Result};
use crate::mutate::apply_edits;
use crate::provider::Provider;
use crate::query::{Datasource, ListFilter, Query, UpdateRequest};

pub struct RedashApi {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl RedashApi {
    pub fn new(provider: &Provider) -> Result<Self> {
        Ok(Self {
            base_url: provider.url.clone(),
            transport: Box::new(HttpTransport::redash(&provider.credential)?),
        })
    }

    /// Test seam: same adapter over an injected transport.
    pub fn with_transport(base_url: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    fn list_url(&self) -> String {
        format!(
            "https://{}/api/queries?page_size={}",
            self.base_url, PAGE_SIZE
        )
    }

    fn query_url(&self, id: &str) -> String {
        format!("https://{}/api/queries/{}", self.base_url, id)
    }

    fn datasources_url(&self) -> String {
        format!("https://{}/api/data_sources", self.base_url)
    }
}

#[async_trait]
impl ProviderApi for RedashApi {
    async fn list_queries(&self, filter: &ListFilter) -> Result<Vec<Query>> {
        let delay = Duration::from_millis(filter.delay_ms.unwrap_or(DEFAULT_PAGE_DELAY_MS));
        let records = fetch_pages(&*self.transport, &self.list_url(), filter.all, delay).await?;

        // Regexes compile up front so a bad pattern fails before any
        // filtering, not on the first matching record.
        let name_re = filter
            .name_regexp
            .as_deref()
            .map(Regex::new)
            .transpose()?;
        let query_re = filter
            .query_regexp
            .as_deref()
            .map(Regex::new)
            .transpose()?;

        // Filters run on canonical fields, after mapping, so they behave
        // the same for every provider kind.
        let queries: Vec<Query> = records
            .iter()
            .map(map_query)
            .filter(|q| {
                filter
                    .data_source
                    .as_deref()
                    .map_or(true, |ds| q.data_source == ds)
                    && filter.name.as_deref().map_or(true, |n| q.name == n)
                    && name_re.as_ref().map_or(true, |re| re.is_match(&q.name))
                    && query_re.as_ref().map_or(true, |re| re.is_match(&q.sql))
            })
            .collect();

        debug!(total = records.len(), matched = queries.len(), "listed queries");
        Ok(queries)
    }

    async fn get_query(&self, id: &str) -> Result<Query> {
        match self.transport.get(&self.query_url(id)).await {
            Ok(body) => Ok(map_query(&body)),
            Err(BiopsError::Remote { status: 404, .. }) => {
                Err(BiopsError::NotFound(id.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn update_query(&self, id: &str, request: &UpdateRequest) -> Result<(Query, Query)> {
        let original = self.get_query(id).await?;
        let modified = apply_edits(&original, request)?;

        // Only remote-representable fields go into the write body, and only
        // when they actually changed.
        let mut body = serde_json::Map::new();
        if modified.sql != original.sql {
            body.insert("query".to_string(), json!(modified.sql));
        }
        if modified.description != original.description {
            body.insert("description".to_string(), json!(modified.description));
        }
        if modified.data_source != original.data_source {
            body.insert("data_source_id".to_string(), json!(modified.data_source));
        }

        if body.is_empty() {
            debug!(id, "no field changed, nothing to write");
            return Ok((original, modified));
        }
        if !request.apply {
            debug!(id, "dry-run, skipping write");
            return Ok((original, modified));
        }

        info!(id, fields = body.len(), "applying update");
        self.transport
            .post(&self.query_url(id), &Value::Object(body))
            .await?;
        Ok((original, modified))
    }

    async fn list_datasources(&self) -> Result<Vec<Datasource>> {
        let body = self.transport.get(&self.datasources_url()).await?;
        let datasources = body
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|d| Datasource {
                        id: value_as_string(&d["id"]),
                        name: string_field(d, "name"),
                        kind: string_field(d, "type"),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(datasources)
    }
}

/// Maps one Redash query record onto the canonical shape. Missing fields
/// become empty strings, and numeric ids are normalized to strings.
fn map_query(v: &Value) -> Query {
    Query {
        id: value_as_string(&v["id"]),
        name: string_field(v, "name"),
        sql: string_field(v, "query"),
        description: string_field(v, "description"),
        data_source: value_as_string(&v["data_source_id"]),
        created_by: created_by(v),
        created_at: timestamp_field(v, "created_at"),
        updated_at: timestamp_field(v, "updated_at"),
    }
}

fn string_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn value_as_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

// Redash sends `user` either as an object or (in older payloads) a bare
// string.
fn created_by(v: &Value) -> String {
    v["user"]["name"]
        .as_str()
        .or_else(|| v["user"].as_str())
        .unwrap_or_default()
        .to_string()
}

fn timestamp_field(v: &Value, key: &str) -> Option<DateTime<Utc>> {
    v.get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}
