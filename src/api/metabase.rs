use async_trait::async_trait;

use crate::api::ProviderApi;
use crate::error::Result;
use crate::provider::Provider;
use crate::query::{Datasource, ListFilter, Query, UpdateRequest};

/// Registered but not yet implemented: every operation is an empty or no-op
/// result. Kept as the extension seam for a real Metabase adapter.
pub struct MetabaseApi;

impl MetabaseApi {
    pub fn new(_provider: &Provider) -> Self {
        Self
    }
}

#[async_trait]
impl ProviderApi for MetabaseApi {
    async fn list_queries(&self, _filter: &ListFilter) -> Result<Vec<Query>> {
        Ok(Vec::new())
    }

    async fn get_query(&self, _id: &str) -> Result<Query> {
        Ok(Query::default())
    }

    async fn update_query(&self, _id: &str, _request: &UpdateRequest) -> Result<(Query, Query)> {
        Ok((Query::default(), Query::default()))
    }

    async fn list_datasources(&self) -> Result<Vec<Datasource>> {
        Ok(Vec::new())
    }
}
