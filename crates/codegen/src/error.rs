use gql_typegen_types::{LineColumn, LineIndex};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Classification of a projection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionErrorKind {
    /// The query text is not valid GraphQL syntax
    Parse,
    /// The document is not a single operation made of fields
    Structure,
    /// A selected field does not exist on its parent type
    FieldNotFound,
    /// A union selection is not an inline fragment on one of its members
    UnionMember,
    /// A scalar has no TypeScript mapping
    UnknownScalar,
    /// A type is used where it cannot appear
    UnsupportedType,
}

/// Why a query could not be projected, and where in the query text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProjectionError {
    pub kind: ProjectionErrorKind,
    pub message: String,
    /// 1-based position inside the query text
    pub location: Option<LineColumn>,
}

impl ProjectionError {
    pub(crate) fn new(
        kind: ProjectionErrorKind,
        message: impl Into<String>,
        location: Option<LineColumn>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }

    /// Byte offset of the error inside `query`, the text that was projected.
    #[must_use]
    pub fn offset_in(&self, query: &str) -> Option<usize> {
        self.location
            .and_then(|location| LineIndex::new(query).offset(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_in() {
        let error = ProjectionError::new(
            ProjectionErrorKind::FieldNotFound,
            "Property 'rating' does not exist on type Film",
            Some(LineColumn::new(3, 5)),
        );
        let query = "query {\n  film {\n    rating\n  }\n}";
        assert_eq!(error.offset_in(query), Some(21));
        assert_eq!(&query[21..27], "rating");
        assert_eq!(error.to_string(), "Property 'rating' does not exist on type Film");
    }

    #[test]
    fn test_offset_without_location() {
        let error = ProjectionError::new(ProjectionErrorKind::Structure, "Expected a query", None);
        assert_eq!(error.offset_in("{}"), None);
    }
}
