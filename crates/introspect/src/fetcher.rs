//! Sources a [`SchemaStore`](crate::SchemaStore) can fetch from.

use crate::{schema_from_file, IntrospectionClient, Result, SchemaRef};
use gql_typegen_config::{EndpointConfig, PluginConfig, SchemaOptions};
use std::future::Future;
use std::path::PathBuf;

/// Produces a fresh schema on every call.
pub trait FetchSchema: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<SchemaRef>> + Send;
}

/// Fetches by introspecting a remote endpoint.
///
/// The endpoint url and headers are resolved against the environment on
/// every fetch, so a changed variable takes effect on the next poll.
#[derive(Debug, Clone)]
pub struct IntrospectionFetcher {
    endpoint: EndpointConfig,
    options: SchemaOptions,
}

impl IntrospectionFetcher {
    #[must_use]
    pub fn new(endpoint: EndpointConfig, options: SchemaOptions) -> Self {
        Self { endpoint, options }
    }

    #[must_use]
    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(config.schema_endpoint(), config.schema_options.clone())
    }
}

impl FetchSchema for IntrospectionFetcher {
    async fn fetch(&self) -> Result<SchemaRef> {
        let endpoint = self.endpoint.resolve()?;
        tracing::debug!(url = %endpoint.url, "Fetching schema");
        IntrospectionClient::from_options(&self.options)
            .with_headers(endpoint.headers)
            .fetch_schema(&endpoint.url)
            .await
    }
}

/// Reads the schema from an SDL file on disk.
#[derive(Debug, Clone)]
pub struct SdlFileFetcher {
    path: PathBuf,
}

impl SdlFileFetcher {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FetchSchema for SdlFileFetcher {
    async fn fetch(&self) -> Result<SchemaRef> {
        schema_from_file(&self.path).await
    }
}

/// Either schema source, chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyFetcher {
    Introspection(IntrospectionFetcher),
    SdlFile(SdlFileFetcher),
}

impl FetchSchema for AnyFetcher {
    async fn fetch(&self) -> Result<SchemaRef> {
        match self {
            Self::Introspection(fetcher) => fetcher.fetch().await,
            Self::SdlFile(fetcher) => fetcher.fetch().await,
        }
    }
}
