//! Schema acquisition for gql-typegen.
//!
//! Fetches the schema from a GraphQL endpoint via introspection, keeps the
//! current schema in a [`SchemaStore`] and optionally polls for changes with a
//! [`SchemaWatcher`].
//!
//! # Examples
//!
//! ```no_run
//! use gql_typegen_config::PluginConfig;
//! use gql_typegen_introspect::{IntrospectionFetcher, SchemaStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PluginConfig::new("https://api.example.com/graphql").normalized();
//! let store = SchemaStore::new(IntrospectionFetcher::from_config(&config));
//! let schema = store.get().await?;
//! println!("{} types", schema.types.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod fetcher;
mod query;
mod schema;
mod sdl;
mod store;
mod types;
mod watcher;

pub use client::IntrospectionClient;
pub use error::{IntrospectionError, Result};
pub use fetcher::{AnyFetcher, FetchSchema, IntrospectionFetcher, SdlFileFetcher};
pub use query::INTROSPECTION_QUERY;
pub use schema::{schema_from_file, schema_from_sdl, SchemaRef};
pub use sdl::introspection_to_sdl;
pub use store::SchemaStore;
pub use types::*;
pub use watcher::SchemaWatcher;

/// Introspects the configured endpoint and renders the schema as SDL.
#[tracing::instrument(skip(config), fields(url = %config.url))]
pub async fn download_sdl(config: &gql_typegen_config::PluginConfig) -> Result<String> {
    let endpoint = config.schema_endpoint().resolve()?;
    tracing::info!("Starting introspection");
    let sdl = IntrospectionClient::from_options(&config.schema_options)
        .with_headers(endpoint.headers)
        .fetch_sdl(&endpoint.url)
        .await?;
    tracing::info!(sdl_length = sdl.len(), "Introspection complete");
    Ok(sdl)
}
