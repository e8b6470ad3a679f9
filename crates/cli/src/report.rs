//! Terminal rendering of diagnostics.

use colored::Colorize;
use gql_typegen_types::{Diagnostic, DiagnosticSeverity, LineIndex};
use std::path::Path;

/// `path:line:column` of a diagnostic, or just the path when it has no
/// offset.
pub fn location(path: &Path, source: &str, diagnostic: &Diagnostic) -> String {
    match diagnostic.offset {
        Some(offset) => format!(
            "{}:{}",
            path.display(),
            LineIndex::new(source).line_column(offset)
        ),
        None => path.display().to_string(),
    }
}

pub fn print_diagnostic(path: &Path, source: &str, diagnostic: &Diagnostic) {
    let (severity, message) = match diagnostic.severity {
        DiagnosticSeverity::Error => ("error:".red().bold(), diagnostic.message.red()),
        DiagnosticSeverity::Warning => ("warning:".yellow().bold(), diagnostic.message.yellow()),
    };
    eprintln!(
        "{}: {} {}",
        location(path, source, diagnostic),
        severity,
        message
    );
}

pub fn diagnostic_json(path: &Path, source: &str, diagnostic: &Diagnostic) -> serde_json::Value {
    let position = diagnostic
        .offset
        .map(|offset| LineIndex::new(source).line_column(offset));
    serde_json::json!({
        "type": "diagnostic",
        "file": path.display().to_string(),
        "severity": diagnostic.severity.to_string(),
        "message": diagnostic.message,
        "location": position.map(|position| serde_json::json!({
            "line": position.line,
            "column": position.column,
        })),
    })
}

/// Current wall clock time as `HH:MM:SS` (UTC)
pub fn clock_now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
