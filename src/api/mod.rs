pub mod http;
mod metabase;
mod redash;

use async_trait::async_trait;

pub use metabase::MetabaseApi;
pub use redash::RedashApi;

use crate::error::Result;
use crate::provider::{Provider, ProviderKind};
use crate::query::{Datasource, ListFilter, Query, UpdateRequest};

/// The two-operation contract every provider kind implements (plus the
/// single-fetch and datasource helpers built on the same plumbing). The
/// orchestration layer only ever holds this trait, never a kind-specific
/// branch.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    async fn list_queries(&self, filter: &ListFilter) -> Result<Vec<Query>>;

    async fn get_query(&self, id: &str) -> Result<Query>;

    /// Fetches the query, applies the requested edits, and returns the
    /// (original, modified) pair. Writes only when `request.apply` is set
    /// and at least one remote field actually changed.
    async fn update_query(&self, id: &str, request: &UpdateRequest) -> Result<(Query, Query)>;

    async fn list_datasources(&self) -> Result<Vec<Datasource>>;
}

pub fn client_for(provider: &Provider) -> Result<Box<dyn ProviderApi>> {
    match provider.kind {
        ProviderKind::Redash => Ok(Box::new(RedashApi::new(provider)?)),
        ProviderKind::Metabase => Ok(Box::new(MetabaseApi::new(provider))),
    }
}
