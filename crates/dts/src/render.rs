use crate::Registry;
use gql_typegen_codegen::{quote, Projection};
use std::fmt::Write;

const HEADER: &str = "// This file is generated by gql-typegen. Do not edit it by hand.\n";

/// Render the declaration module for `module_id`.
///
/// Each distinct query literal gets one overload of the default export. The
/// output only depends on the registry contents, so an unchanged registry
/// renders to identical text.
#[must_use]
pub fn render_declarations(module_id: &str, registry: &Registry) -> String {
    let mut out = String::from(HEADER);
    let _ = writeln!(out, "\ndeclare module '{module_id}' {{");

    for (query, projection) in registry.queries() {
        let literal = quote(query);
        match projection {
            Projection::Success {
                variables,
                return_type,
            } => {
                let variables = variables.as_deref().map_or_else(
                    || "variables?: undefined".to_string(),
                    |variables| format!("variables: {variables}"),
                );
                let _ = writeln!(
                    out,
                    "    export default function gql(query: {literal}, {variables}): Promise<{return_type}>;"
                );
            }
            Projection::Error { error } => {
                let _ = writeln!(out, "    /** @deprecated {} */", doc_text(error));
                let _ = writeln!(
                    out,
                    "    export default function gql(query: {literal}, variables?: Record<string, unknown>): Promise<never>;"
                );
            }
        }
    }

    out.push_str(
        "    export default function gql(query: string, variables?: Record<string, unknown>): Promise<any>;\n",
    );
    out.push_str("}\n");
    out
}

/// Error text safe to place inside a `/** */` comment on one line.
fn doc_text(message: &str) -> String {
    message.replace("*/", "*\\/").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileRecord;
    use gql_typegen_codegen::{project_query, ProjectionOptions};
    use gql_typegen_test_utils::fixtures::{ALL_FILMS_QUERY, STARSHIP_QUERY};
    use gql_typegen_test_utils::swapi_schema;
    use gql_typegen_types::FileId;
    use std::collections::BTreeMap;

    fn registry(files: &[(&str, &[&str])]) -> Registry {
        let schema = swapi_schema();
        let options = ProjectionOptions::default();
        let mut registry = Registry::new();
        for (file, queries) in files {
            let queries: BTreeMap<String, Projection> = queries
                .iter()
                .map(|query| {
                    (
                        (*query).to_string(),
                        project_query(query, &schema, &options).into(),
                    )
                })
                .collect();
            registry.insert(FileId::new(*file), FileRecord::new(queries, schema.clone()));
        }
        registry
    }

    #[test]
    fn test_empty_registry() {
        insta::assert_snapshot!(render_declarations("$gql", &Registry::new()), @r"
        // This file is generated by gql-typegen. Do not edit it by hand.

        declare module '$gql' {
            export default function gql(query: string, variables?: Record<string, unknown>): Promise<any>;
        }
        ");
    }

    #[test]
    fn test_overloads_across_files() {
        let registry = registry(&[
            ("src/films.ts", &[ALL_FILMS_QUERY]),
            ("src/ships.ts", &[STARSHIP_QUERY, ALL_FILMS_QUERY]),
        ]);
        insta::assert_snapshot!(render_declarations("$gql", &registry), @r#"
        // This file is generated by gql-typegen. Do not edit it by hand.

        declare module '$gql' {
            export default function gql(query: "query ($id: ID!) { starship(id: $id) { name id } }", variables: { "id": string }): Promise<{ "starship": { "name": string | null; "id": string } | null } | null>;
            export default function gql(query: "query { allFilms { films { title director } } }", variables?: undefined): Promise<{ "allFilms": { "films": Array<{ "title": string | null; "director": string | null } | null> | null } | null } | null>;
            export default function gql(query: string, variables?: Record<string, unknown>): Promise<any>;
        }
        "#);
    }

    #[test]
    fn test_failed_projection_is_deprecated() {
        let registry = registry(&[("src/a.ts", &["{ film { rating } }"])]);
        let rendered = render_declarations("virtual:gql", &registry);

        assert!(rendered.contains("declare module 'virtual:gql' {"));
        assert!(rendered.contains(
            "    /** @deprecated Property 'rating' does not exist on type Film */\n    export default function gql(query: \"{ film { rating } }\", variables?: Record<string, unknown>): Promise<never>;\n"
        ));
    }

    #[test]
    fn test_multiline_literal_is_escaped() {
        let query = "{\n\tfilm(id: \"1\") { id }\n}";
        let rendered = render_declarations("$gql", &registry(&[("src/a.ts", &[query])]));

        assert!(rendered.contains(r#"gql(query: "{\n\tfilm(id: \"1\") { id }\n}", variables?: undefined)"#));
        assert!(rendered.contains(&format!("gql(query: {}, ", quote(query))));
    }

    #[test]
    fn test_doc_text_cannot_close_comment() {
        assert_eq!(doc_text("bad */ text\nmore"), "bad *\\/ text more");
    }
}
