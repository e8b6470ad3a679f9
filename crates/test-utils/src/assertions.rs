//! Formatting helpers for snapshot tests.

use gql_typegen_types::Diagnostic;

/// Format a list of diagnostics for snapshot testing.
///
/// ```ignore
/// insta::assert_snapshot!(format_diagnostics(&output.warnings));
/// ```
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return String::from("(no diagnostics)");
    }

    diagnostics
        .iter()
        .enumerate()
        .map(|(i, d)| format!("[{}] {d}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format messages only, without severity or offset.
pub fn format_diagnostic_messages(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return String::from("(no diagnostics)");
    }

    diagnostics
        .iter()
        .enumerate()
        .map(|(i, d)| format!("[{}] {}", i + 1, d.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_diagnostics_empty() {
        assert_eq!(format_diagnostics(&[]), "(no diagnostics)");
        assert_eq!(format_diagnostic_messages(&[]), "(no diagnostics)");
    }

    #[test]
    fn test_format_diagnostics_multiple() {
        let diagnostics = vec![
            Diagnostic::warning("Property 'rating' does not exist on type Film", Some(12)),
            Diagnostic::error("gql requires a query argument", None),
        ];
        assert_eq!(
            format_diagnostics(&diagnostics),
            "[1] warning: Property 'rating' does not exist on type Film (at offset 12)\n\
             [2] error: gql requires a query argument"
        );
        assert_eq!(
            format_diagnostic_messages(&diagnostics),
            "[1] Property 'rating' does not exist on type Film\n[2] gql requires a query argument"
        );
    }
}
