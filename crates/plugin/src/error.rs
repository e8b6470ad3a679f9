use gql_typegen_dts::DtsError;
use gql_typegen_extract::ExtractError;
use gql_typegen_introspect::IntrospectionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PluginError>;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to load the GraphQL schema: {0}")]
    Schema(#[from] IntrospectionError),

    #[error("{id}: {source}")]
    Transform {
        id: String,
        #[source]
        source: ExtractError,
    },

    #[error(transparent)]
    Declarations(#[from] DtsError),
}

impl PluginError {
    /// Offset in the transformed file, for errors raised by a transform.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Transform { source, .. } => source.offset(),
            Self::Config(_) | Self::Schema(_) | Self::Declarations(_) => None,
        }
    }
}
