use gql_typegen_codegen::ProjectionError;
use gql_typegen_types::{Diagnostic, OverlappingEdit};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The query function is called in a way that cannot be analysed
    #[error("{message}")]
    Usage { message: String, offset: usize },

    /// A query failed to project while errors are fatal
    #[error("{error}")]
    Projection {
        error: ProjectionError,
        /// Offset of the failure in the file
        offset: usize,
    },

    #[error(transparent)]
    Edit(#[from] OverlappingEdit),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

impl ExtractError {
    pub(crate) fn usage(message: impl Into<String>, offset: usize) -> Self {
        Self::Usage {
            message: message.into(),
            offset,
        }
    }

    /// Byte offset in the source file the error points at.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Usage { offset, .. } | Self::Projection { offset, .. } => Some(*offset),
            Self::Edit(overlap) => Some(overlap.rejected.start),
            Self::Io { .. } | Self::Pattern { .. } => None,
        }
    }

    #[must_use]
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string(), self.offset())
    }
}
