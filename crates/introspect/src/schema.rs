use crate::{IntrospectionError, Result};
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use std::sync::Arc;

/// A validated schema, shared read-only between every consumer. A refresh
/// replaces the whole value.
pub type SchemaRef = Arc<Valid<Schema>>;

/// Parses and validates SDL. `source` names the origin in diagnostics.
pub fn schema_from_sdl(sdl: &str, source: &str) -> Result<SchemaRef> {
    Schema::parse_and_validate(sdl, source)
        .map(Arc::new)
        .map_err(|with_errors| IntrospectionError::Invalid(with_errors.errors.to_string()))
}

/// Reads and validates an SDL file.
pub async fn schema_from_file(path: &std::path::Path) -> Result<SchemaRef> {
    let sdl = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| IntrospectionError::Io(format!("{}: {e}", path.display())))?;
    schema_from_sdl(&sdl, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_from_sdl() {
        let schema = schema_from_sdl("type Query { hello: String }", "schema.graphql").unwrap();
        assert!(schema.types.contains_key("Query"));
    }

    #[test]
    fn test_schema_from_sdl_invalid() {
        let err = schema_from_sdl("type Query { hello: Missing }", "schema.graphql").unwrap_err();
        assert!(matches!(err, IntrospectionError::Invalid(_)));
        assert!(err.to_string().contains("Missing"));
    }

    #[tokio::test]
    async fn test_schema_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.graphql");
        std::fs::write(&path, "type Query { hello: String }").unwrap();

        let schema = schema_from_file(&path).await.unwrap();
        assert!(schema.types.contains_key("Query"));
    }
}
