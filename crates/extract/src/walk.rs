//! Extraction of query calls and rewriting of their arguments.

use crate::{ExtractError, ParsedSource, Result};
use apollo_compiler::Schema;
use gql_typegen_codegen::{project_query, wire_payload, Projection, ProjectionOptions};
use gql_typegen_types::{Diagnostic, EditBuffer, EditedSource};
use std::collections::BTreeMap;
use swc_common::Spanned;
use swc_core::ecma::ast::{CallExpr, Callee, Expr, Lit};
use swc_core::ecma::visit::{Visit, VisitWith};

/// What happens when a query fails to project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// The whole file fails (production builds)
    Fatal,
    /// The failure becomes a warning and the call throws at runtime
    #[default]
    Deferred,
}

/// Everything a walk needs besides the source.
#[derive(Clone, Copy)]
pub struct WalkContext<'a> {
    pub schema: &'a Schema,
    pub options: &'a ProjectionOptions,
    pub mode: ErrorMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    /// Literal query text to its projection, for every call in the file
    pub queries: BTreeMap<String, Projection>,
    pub warnings: Vec<Diagnostic>,
    /// Present when the walk was asked to rewrite the source
    pub edited: Option<EditedSource>,
}

/// Visit every call of `alias` in `parsed`.
///
/// Each call's first argument must be a string literal or a template literal
/// without interpolation. Its query is projected and recorded; with `rewrite`
/// set the argument is replaced by the wire payload, or by an immediately
/// thrown error for queries that failed in [`ErrorMode::Deferred`].
#[tracing::instrument(level = "debug", skip(parsed, context), fields(mode = ?context.mode))]
pub fn walk(
    parsed: &ParsedSource<'_>,
    alias: &str,
    context: &WalkContext<'_>,
    rewrite: bool,
) -> Result<WalkOutput> {
    let mut walker = Walker {
        parsed,
        alias,
        context,
        edits: rewrite.then(EditBuffer::new),
        queries: BTreeMap::new(),
        warnings: Vec::new(),
        failure: None,
    };
    parsed.program().visit_with(&mut walker);

    if let Some(error) = walker.failure {
        return Err(error);
    }

    tracing::debug!(
        queries = walker.queries.len(),
        warnings = walker.warnings.len(),
        "Walked source"
    );
    Ok(WalkOutput {
        edited: walker.edits.map(|edits| edits.apply(parsed.source())),
        queries: walker.queries,
        warnings: walker.warnings,
    })
}

/// The expression a failed query's argument is replaced with.
fn deferred_throw(message: &str) -> String {
    let message = serde_json::Value::String(message.to_string());
    format!("(() => {{ throw new Error({message}); }})()")
}

/// Offset in the raw literal text of byte `offset` of its decoded value.
///
/// Line terminators decode to `\n`. Any other difference before `offset`
/// (an escape sequence) leaves the position unknown.
fn source_offset(raw: &str, decoded: &str, offset: usize) -> Option<usize> {
    let (raw, decoded) = (raw.as_bytes(), decoded.as_bytes());
    let mut position = 0;
    for &byte in decoded.get(..offset)? {
        position += match raw.get(position..)? {
            [b'\r', b'\n', ..] if byte == b'\n' => 2,
            [b'\r', ..] if byte == b'\n' => 1,
            [first, ..] if *first == byte => 1,
            _ => return None,
        };
    }
    Some(position)
}

struct Walker<'a, 'p> {
    parsed: &'a ParsedSource<'p>,
    alias: &'a str,
    context: &'a WalkContext<'a>,
    edits: Option<EditBuffer>,
    queries: BTreeMap<String, Projection>,
    warnings: Vec<Diagnostic>,
    failure: Option<ExtractError>,
}

impl Walker<'_, '_> {
    fn is_query_call(&self, call: &CallExpr) -> bool {
        match &call.callee {
            Callee::Expr(callee) => {
                matches!(&**callee, Expr::Ident(ident) if &*ident.sym == self.alias)
            }
            Callee::Super(_) | Callee::Import(_) => false,
        }
    }

    fn query_call(&mut self, call: &CallExpr) -> Result<()> {
        let alias = self.alias;
        let Some(argument) = call.args.first() else {
            return Err(ExtractError::usage(
                format!("{alias} requires a query argument"),
                self.parsed.offset(call.span.lo),
            ));
        };

        let not_literal = || {
            format!("The first argument to {alias} must be a literal string (i.e. `query {{ ... }}`)")
        };
        let (query, span) = match &*argument.expr {
            Expr::Tpl(template) if !template.exprs.is_empty() => {
                return Err(ExtractError::usage(
                    format!("The query argument to {alias} can't have interpolation"),
                    self.parsed.offset(template.span.lo),
                ));
            }
            Expr::Tpl(template) if argument.spread.is_none() => (
                template
                    .quasis
                    .first()
                    .and_then(|quasi| quasi.cooked.as_ref())
                    .and_then(|cooked| cooked.as_str()),
                template.span,
            ),
            Expr::Lit(Lit::Str(string)) if argument.spread.is_none() => {
                (string.value.as_str(), string.span)
            }
            other => {
                return Err(ExtractError::usage(
                    not_literal(),
                    self.parsed.offset(other.span().lo),
                ));
            }
        };
        // invalid escapes and lone surrogates have no text value
        let (Some(query), Some((raw, content_start))) = (query, self.parsed.literal_source(span))
        else {
            return Err(ExtractError::usage(
                not_literal(),
                self.parsed.offset(span.lo),
            ));
        };
        let query = query.to_string();

        let result = project_query(&query, self.context.schema, self.context.options);
        let replacement = match &result {
            Ok(_) => wire_payload(&query),
            Err(error) => {
                let offset = content_start
                    + error
                        .offset_in(&query)
                        .and_then(|at| source_offset(raw, &query, at))
                        .unwrap_or(0);
                match self.context.mode {
                    ErrorMode::Fatal => {
                        return Err(ExtractError::Projection {
                            error: error.clone(),
                            offset,
                        });
                    }
                    ErrorMode::Deferred => {
                        tracing::warn!(offset, error = %error, "Query failed to project");
                        self.warnings
                            .push(Diagnostic::warning(error.message.clone(), Some(offset)));
                        deferred_throw(&error.message)
                    }
                }
            }
        };

        if let Some(edits) = &mut self.edits {
            edits.replace(self.parsed.range(span), replacement)?;
        }
        self.queries.insert(query, result.into());
        Ok(())
    }
}

impl Visit for Walker<'_, '_> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if self.failure.is_some() {
            return;
        }
        if self.is_query_call(call) {
            if let Err(error) = self.query_call(call) {
                self.failure = Some(error);
                return;
            }
        }
        call.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gql_typegen_codegen::ProjectionErrorKind;
    use gql_typegen_test_utils::fixtures::TS_SOURCE;
    use gql_typegen_test_utils::swapi_schema;
    use gql_typegen_types::Language;

    fn run(source: &str, mode: ErrorMode) -> Result<WalkOutput> {
        let schema = swapi_schema();
        let options = ProjectionOptions::default();
        let context = WalkContext {
            schema: &schema,
            options: &options,
            mode,
        };
        let parsed = ParsedSource::parse(source, Language::TypeScript).unwrap();
        walk(&parsed, "gql", &context, true)
    }

    #[test]
    fn test_rewrites_template_and_string_calls() {
        let output = run(TS_SOURCE, ErrorMode::Fatal).unwrap();

        assert_eq!(output.queries.len(), 2);
        assert!(output.warnings.is_empty());
        let code = output.edited.unwrap().code;
        assert!(code.contains(r#"gql("\"query{allFilms{films{title director}}}\"")"#));
        assert!(code.contains(r#"gql("\"query($id:ID!){starship(id:$id){name id}}\"", { id })"#));
        assert!(!code.contains("allFilms {"));
    }

    #[test]
    fn test_records_projection_per_literal() {
        let output = run(TS_SOURCE, ErrorMode::Fatal).unwrap();
        let projection = &output.queries["query ($id: ID!) { starship(id: $id) { name id } }"];
        assert_eq!(
            projection,
            &Projection::Success {
                variables: Some(r#"{ "id": string }"#.to_string()),
                return_type: r#"{ "starship": { "name": string | null; "id": string } | null } | null"#
                    .to_string(),
            }
        );
    }

    #[test]
    fn test_interpolation_is_rejected() {
        let source = "import gql from '$gql';\nconst id = '1';\ngql(`{ film(id: \"${id}\") { title } }`);\n";
        let err = run(source, ErrorMode::Deferred).unwrap_err();
        assert!(matches!(err, ExtractError::Usage { .. }));
        assert_eq!(err.to_string(), "The query argument to gql can't have interpolation");
        assert_eq!(err.offset(), source.find('`'));
    }

    #[test]
    fn test_missing_argument() {
        let err = run("gql();", ErrorMode::Deferred).unwrap_err();
        assert_eq!(err.to_string(), "gql requires a query argument");
        assert_eq!(err.offset(), Some(0));
    }

    #[test]
    fn test_non_literal_argument() {
        let err = run("const q = '{ film { id } }';\ngql(q);", ErrorMode::Deferred).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The first argument to gql must be a literal string (i.e. `query { ... }`)"
        );
    }

    #[test]
    fn test_fatal_projection_error_offset() {
        let source = "gql(`{ film { rating } }`);";
        let err = run(source, ErrorMode::Fatal).unwrap_err();
        let ExtractError::Projection { error, offset } = &err else {
            panic!("expected a projection error, got {err:?}");
        };
        assert_eq!(error.kind, ProjectionErrorKind::FieldNotFound);
        assert_eq!(Some(*offset), source.find("rating"));
    }

    #[test]
    fn test_deferred_projection_error() {
        let source = "gql('{ film { rating } }');\ngql('{ film { id } }');";
        let output = run(source, ErrorMode::Deferred).unwrap();

        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].offset, source.find("rating"));
        assert_eq!(
            output.queries["{ film { rating } }"],
            Projection::error("Property 'rating' does not exist on type Film")
        );
        assert!(!output.queries["{ film { id } }"].is_error());

        let code = output.edited.unwrap().code;
        assert!(code.starts_with(
            r#"gql((() => { throw new Error("Property 'rating' does not exist on type Film"); })());"#
        ));
        assert!(code.ends_with(r#"gql("\"{film{id}}\"");"#));
    }

    #[test]
    fn test_other_callees_are_ignored() {
        let output = run("other(`{ film { rating } }`);\nobj.gql(1);", ErrorMode::Fatal).unwrap();
        assert!(output.queries.is_empty());
        assert_eq!(output.edited.unwrap().code, "other(`{ film { rating } }`);\nobj.gql(1);");
    }

    #[test]
    fn test_nested_calls_in_variables() {
        let source = "gql('{ film { id } }', { nested: gql('{ releaseDates }') });";
        let schema = swapi_schema();
        let mut options = ProjectionOptions::default();
        options.scalars.insert("Date", "string");
        let context = WalkContext {
            schema: &schema,
            options: &options,
            mode: ErrorMode::Fatal,
        };
        let parsed = ParsedSource::parse(source, Language::JavaScript).unwrap();
        let output = walk(&parsed, "gql", &context, false).unwrap();
        assert_eq!(output.queries.len(), 2);
        assert!(output.edited.is_none());
    }

    #[test]
    fn test_crlf_template_decodes_line_endings() {
        let source = "import gql from '$gql';\r\ngql(`{\r\n  film { rating }\r\n}`);\r\ngql(`{\r\n  film { id }\r\n}`);\r\n";
        let output = run(source, ErrorMode::Deferred).unwrap();

        assert_eq!(
            output.queries.keys().collect::<Vec<_>>(),
            vec!["{\n  film { id }\n}", "{\n  film { rating }\n}"]
        );
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].offset, source.find("rating"));
        assert!(output.edited.unwrap().code.contains(r#"gql("\"{film{id}}\"");"#));
    }

    #[test]
    fn test_string_escapes_are_decoded() {
        let source = r"gql('{\n  film { rating }\n}');";
        let output = run(source, ErrorMode::Deferred).unwrap();

        assert!(output.queries.contains_key("{\n  film { rating }\n}"));
        // the escape precedes the failure, so only the literal is located
        assert_eq!(output.warnings[0].offset, source.find('{'));

        let source = r"gql('{ film { rating } }\n');";
        let output = run(source, ErrorMode::Deferred).unwrap();
        assert!(output.queries.contains_key("{ film { rating } }\n"));
        assert_eq!(output.warnings[0].offset, source.find("rating"));
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let source = r#"gql('{ film(id: "\uD83D\uDE00") { rating } }');"#;
        let output = run(source, ErrorMode::Deferred).unwrap();

        assert_eq!(
            output.queries.keys().collect::<Vec<_>>(),
            vec!["{ film(id: \"\u{1F600}\") { rating } }"]
        );
        assert_eq!(output.warnings[0].offset, source.find('{'));
    }

    #[test]
    fn test_source_offset() {
        assert_eq!(source_offset("a\r\nb", "a\nb", 2), Some(3));
        assert_eq!(source_offset("a\rb", "a\nb", 2), Some(2));
        assert_eq!(source_offset(r"a\nb", "a\nb", 1), Some(1));
        assert_eq!(source_offset(r"a\nb", "a\nb", 2), None);
    }
}
