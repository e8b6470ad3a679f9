use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntrospectionError>;

/// Failure to obtain a schema.
///
/// Cloneable so that every caller waiting on the same in-flight fetch can be
/// handed the outcome.
#[derive(Debug, Clone, Error)]
pub enum IntrospectionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Schema fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to parse introspection response: {0}")]
    Parse(String),

    #[error("Invalid schema: {0}")]
    Invalid(String),

    #[error("Failed to read schema file: {0}")]
    Io(String),

    #[error("Invalid endpoint configuration: {0}")]
    Config(String),
}

impl From<gql_typegen_config::ConfigError> for IntrospectionError {
    fn from(error: gql_typegen_config::ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}
