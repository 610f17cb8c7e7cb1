use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical shape of one remote saved query, independent of provider kind.
/// Missing remote fields map to empty strings so filters and diffs never
/// have to deal with nulls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: String,
    pub name: String,
    pub sql: String,
    #[serde(default)]
    pub description: String,
    pub data_source: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One listing request. When `all` is false only the first page is fetched,
/// regardless of how many queries the remote reports.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub all: bool,
    pub data_source: Option<String>,
    pub name: Option<String>,
    pub name_regexp: Option<String>,
    pub query_regexp: Option<String>,
    /// Pause between page requests, in milliseconds. Defaults to 1000.
    pub delay_ms: Option<u64>,
}

/// One requested update. `query` (a literal SQL replacement) and
/// `query_replace` (a flat, ordered find/replace list) are mutually
/// exclusive; the replace list must hold an even count of non-empty strings.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub apply: bool,
    pub data_source: Option<String>,
    pub query: Option<String>,
    pub query_replace: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}
