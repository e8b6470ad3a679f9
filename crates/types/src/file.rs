//! File-related types: [`FileId`], [`Language`].

use std::path::Path;
use std::sync::Arc;

/// Identifier of a source file in the declaration registry.
///
/// Wraps the path as the host reports it (usually relative to the working
/// directory) so that the same file seen twice maps to the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(Arc<str>);

impl FileId {
    /// Create a new `FileId` from a string.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Create a `FileId` from a path, using `/` separators on every platform.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self(Arc::from(path.to_string_lossy().replace('\\', "/")))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source language of a file (determines the parser configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// TypeScript (.ts, .mts, .cts)
    TypeScript,
    /// TypeScript with JSX (.tsx)
    Tsx,
    /// JavaScript, with JSX allowed (.js, .jsx, .mjs, .cjs)
    JavaScript,
}

impl Language {
    /// Detect language from a file path based on its extension.
    ///
    /// Returns `None` if the extension is not a JavaScript-family language.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        match extension {
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Returns `true` for the TypeScript dialects.
    #[must_use]
    pub const fn is_typescript(self) -> bool {
        matches!(self, Self::TypeScript | Self::Tsx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_id() {
        let id = FileId::new("src/main.ts");
        assert_eq!(id.as_str(), "src/main.ts");
        assert_eq!(id.to_string(), "src/main.ts");
        assert_eq!(FileId::from_path(Path::new("src/main.ts")), id);
    }

    #[test]
    fn test_file_id_ordering() {
        let mut ids = vec![FileId::new("src/b.ts"), FileId::new("src/a.ts")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "src/a.ts");
    }

    #[test]
    fn test_language_from_path() {
        assert_eq!(
            Language::from_path(&PathBuf::from("component.ts")),
            Some(Language::TypeScript)
        );
        assert_eq!(
            Language::from_path(&PathBuf::from("component.tsx")),
            Some(Language::Tsx)
        );
        assert_eq!(
            Language::from_path(&PathBuf::from("script.js")),
            Some(Language::JavaScript)
        );
        assert_eq!(
            Language::from_path(&PathBuf::from("script.mjs")),
            Some(Language::JavaScript)
        );
        assert_eq!(
            Language::from_path(&PathBuf::from("component.jsx")),
            Some(Language::JavaScript)
        );
        assert_eq!(Language::from_path(&PathBuf::from("schema.graphql")), None);
        assert_eq!(Language::from_path(&PathBuf::from("README")), None);
    }

    #[test]
    fn test_is_typescript() {
        assert!(Language::TypeScript.is_typescript());
        assert!(Language::Tsx.is_typescript());
        assert!(!Language::JavaScript.is_typescript());
    }
}
