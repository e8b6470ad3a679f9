use crate::{ExtractError, Result};
use gql_typegen_types::Language;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Expand glob patterns into the sorted, deduplicated list of source files
/// they match. Anything under `node_modules` and files of other languages are
/// skipped.
pub fn collect_sources<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries = glob::glob(pattern).map_err(|e| ExtractError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable path");
                    continue;
                }
            };
            if is_in_node_modules(&path) || Language::from_path(&path).is_none() || !path.is_file()
            {
                continue;
            }
            files.insert(path);
        }
    }

    tracing::debug!(count = files.len(), "Collected source files");
    Ok(files.into_iter().collect())
}

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_in_node_modules(path: &Path) -> bool {
    path.components()
        .any(|component| component.as_os_str() == "node_modules")
}
