//! Query extraction from TypeScript and JavaScript sources.
//!
//! A source is parsed with swc, scanned for the default import of the query
//! module, and walked for calls of that import. Every call's literal query is
//! projected against the schema and, optionally, rewritten into its wire
//! payload.

mod error;
mod files;
mod parse;
mod scan;
mod walk;

pub use error::{ExtractError, Result};
pub use files::{collect_sources, read_source};
pub use parse::ParsedSource;
pub use scan::find_import;
pub use walk::{walk, ErrorMode, WalkContext, WalkOutput};

use gql_typegen_types::Language;

/// Parse, scan and walk one source.
///
/// Returns `Ok(None)` when the source does not parse or never imports
/// `module_id`.
pub fn extract_queries(
    source: &str,
    language: Language,
    module_id: &str,
    context: &WalkContext<'_>,
    rewrite: bool,
) -> Result<Option<WalkOutput>> {
    let Some(parsed) = ParsedSource::parse(source, language) else {
        return Ok(None);
    };
    let Some(alias) = find_import(&parsed, module_id) else {
        return Ok(None);
    };
    walk(&parsed, &alias, context, rewrite).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gql_typegen_codegen::ProjectionOptions;
    use gql_typegen_test_utils::fixtures::TS_SOURCE;
    use gql_typegen_test_utils::swapi_schema;

    fn extract(source: &str, module_id: &str) -> Result<Option<WalkOutput>> {
        let schema = swapi_schema();
        let options = ProjectionOptions::default();
        let context = WalkContext {
            schema: &schema,
            options: &options,
            mode: ErrorMode::Fatal,
        };
        extract_queries(source, Language::TypeScript, module_id, &context, true)
    }

    #[test]
    fn test_extract_through_import() {
        let output = extract(TS_SOURCE, "$gql").unwrap().unwrap();
        assert_eq!(output.queries.len(), 2);
    }

    #[test]
    fn test_custom_module_id() {
        assert!(extract(TS_SOURCE, "virtual:gql").unwrap().is_none());

        let source = TS_SOURCE.replace("'$gql'", "'virtual:gql'");
        let output = extract(&source, "virtual:gql").unwrap().unwrap();
        assert_eq!(output.queries.len(), 2);
    }

    #[test]
    fn test_aliased_import() {
        let source = "import query from '$gql';\nquery(`{ film { id } }`);\ngql(`{ nope }`);";
        let output = extract(source, "$gql").unwrap().unwrap();
        assert_eq!(output.queries.keys().collect::<Vec<_>>(), vec!["{ film { id } }"]);
    }

    #[test]
    fn test_unparseable_source_is_skipped() {
        let source = "import gql from '$gql';\ngql(`{ film { id } }`;";
        assert!(extract(source, "$gql").unwrap().is_none());
    }
}
