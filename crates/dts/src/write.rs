use crate::{DtsError, Result};
use std::path::Path;

/// Write `contents` to `path` unless the file already holds exactly that
/// text. Missing parent directories are created. Returns whether the file
/// was written.
#[tracing::instrument(skip(contents), fields(path = %path.display(), len = contents.len()))]
pub async fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    let io_error = |source| DtsError::Io {
        path: path.to_path_buf(),
        source,
    };

    match tokio::fs::read_to_string(path).await {
        Ok(existing) if existing == contents => {
            tracing::debug!("Declaration file unchanged");
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_error(e)),
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, contents).await.map_err(io_error)?;
    tracing::info!("Wrote declaration file");
    Ok(true)
}
