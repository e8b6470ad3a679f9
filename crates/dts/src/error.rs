use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DtsError>;

#[derive(Debug, Error)]
pub enum DtsError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The declaration aggregator has stopped")]
    Stopped,
}
