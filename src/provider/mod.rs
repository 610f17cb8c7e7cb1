mod store;

use serde::{Deserialize, Serialize};

pub use store::ProviderStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Redash,
    Metabase,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Redash => "redash",
            ProviderKind::Metabase => "metabase",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = crate::BiopsError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "redash" => Ok(ProviderKind::Redash),
            "metabase" => Ok(ProviderKind::Metabase),
            other => Err(crate::BiopsError::Configuration(format!(
                "unknown provider type: {} (expected redash or metabase)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured BI backend account. `url` is the host part only
/// (e.g. `redash.example.com`); adapters prepend the scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    pub url: String,
    pub credential: String,
    #[serde(default)]
    pub current: bool,
}
