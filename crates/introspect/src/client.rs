//! HTTP client for the introspection query.

use crate::{
    schema_from_sdl, introspection_to_sdl, IntrospectionError, IntrospectionResponse,
    IntrospectionSchema, Result, SchemaRef, INTROSPECTION_QUERY,
};
use gql_typegen_config::{SchemaOptions, DEFAULT_TIMEOUT_SECS};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Sends the introspection query to an endpoint.
///
/// ```no_run
/// use gql_typegen_introspect::IntrospectionClient;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = IntrospectionClient::new()
///     .with_header("Authorization", "Bearer my-token")
///     .with_timeout(Duration::from_secs(60));
/// let sdl = client.fetch_sdl("https://api.example.com/graphql").await?;
/// println!("{sdl}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    headers: BTreeMap<String, String>,
    timeout: Duration,
    connect_timeout: Duration,
}

impl Default for IntrospectionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IntrospectionClient {
    /// A client with a 30 second request timeout and a 10 second connection
    /// timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            headers: BTreeMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// A client using the `schemaOptions` timeouts.
    #[must_use]
    pub fn from_options(options: &SchemaOptions) -> Self {
        let client = Self::new().with_timeout(Duration::from_secs(options.timeout_secs()));
        match options.connect_timeout {
            Some(secs) => client.with_connect_timeout(Duration::from_secs(secs)),
            None => client,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.insert(name.into(), value.into());
        }
        self
    }

    /// Maximum time for the whole request (connection and transfer).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Runs the introspection query and returns the schema payload.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, url: &str) -> Result<IntrospectionSchema> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| {
                IntrospectionError::Network(format!("Failed to create HTTP client: {e}"))
            })?;

        let mut request = client.post(url);
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        tracing::info!("Sending introspection query");
        let response = request
            .json(&serde_json::json!({ "query": INTROSPECTION_QUERY }))
            .send()
            .await
            .map_err(|e| self.request_error(&e))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Received response");

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(IntrospectionError::Http(status.as_u16(), error_body));
        }

        let introspection: IntrospectionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                IntrospectionError::Timeout(self.timeout)
            } else {
                IntrospectionError::Parse(e.to_string())
            }
        })?;
        let schema = introspection.into_schema()?;

        tracing::info!(types = schema.types.len(), "Introspection successful");
        Ok(schema)
    }

    /// Introspects `url` and renders the result as SDL.
    pub async fn fetch_sdl(&self, url: &str) -> Result<String> {
        let schema = self.execute(url).await?;
        Ok(introspection_to_sdl(&schema))
    }

    /// Introspects `url` and builds a validated schema from the result.
    pub async fn fetch_schema(&self, url: &str) -> Result<SchemaRef> {
        let sdl = self.fetch_sdl(url).await?;
        schema_from_sdl(&sdl, url)
    }

    fn request_error(&self, error: &reqwest::Error) -> IntrospectionError {
        if error.is_timeout() {
            IntrospectionError::Timeout(self.timeout)
        } else {
            IntrospectionError::Network(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_default() {
        let client = IntrospectionClient::new();
        assert!(client.headers.is_empty());
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_client_with_headers() {
        let client = IntrospectionClient::new()
            .with_header("Authorization", "Bearer token")
            .with_headers([("X-API-Key", "key123"), ("Content-Type", "application/json")]);

        assert_eq!(client.headers.len(), 3);
        assert_eq!(
            client.headers.get("Authorization").map(String::as_str),
            Some("Bearer token")
        );
    }

    #[test]
    fn test_client_from_options() {
        let client = IntrospectionClient::from_options(&SchemaOptions {
            timeout: Some(5),
            connect_timeout: Some(1),
        });
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.connect_timeout, Duration::from_secs(1));

        let client = IntrospectionClient::from_options(&SchemaOptions::default());
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.connect_timeout, Duration::from_secs(10));
    }
}
