//! Exit codes for the gql-typegen CLI.
//!
//! Distinct codes let scripts and CI systems tell failure modes apart.

use gql_typegen_config::ConfigError;
use gql_typegen_dts::DtsError;
use gql_typegen_extract::ExtractError;
use gql_typegen_introspect::IntrospectionError;
use gql_typegen_plugin::PluginError;

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no errors
    Success = 0,
    /// A query call failed to project or is malformed; also used for
    /// failures of no particular kind
    ValidationError = 1,
    /// Configuration error (missing or invalid config file)
    ConfigError = 2,
    /// Schema load error (introspection failed, file not found)
    SchemaError = 3,
    /// I/O error (file read/write failure)
    IoError = 4,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// The code for the first error in the chain with a known kind.
    #[must_use]
    pub fn for_error(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if let Some(error) = cause.downcast_ref::<PluginError>() {
                return match error {
                    PluginError::Config(_) => Self::ConfigError,
                    PluginError::Schema(_) => Self::SchemaError,
                    PluginError::Transform { source, .. } => Self::for_extract_error(source),
                    PluginError::Declarations(_) => Self::IoError,
                };
            }
            if let Some(error) = cause.downcast_ref::<ExtractError>() {
                return Self::for_extract_error(error);
            }
            if cause.is::<ConfigError>() {
                return Self::ConfigError;
            }
            if cause.is::<IntrospectionError>() {
                return Self::SchemaError;
            }
            if cause.is::<DtsError>() || cause.is::<std::io::Error>() {
                return Self::IoError;
            }
        }
        Self::ValidationError
    }

    fn for_extract_error(error: &ExtractError) -> Self {
        match error {
            ExtractError::Io { .. } => Self::IoError,
            ExtractError::Pattern { .. } => Self::ConfigError,
            ExtractError::Usage { .. } | ExtractError::Projection { .. } | ExtractError::Edit(_) => {
                Self::ValidationError
            }
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ValidationError => write!(f, "validation error"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema load error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
