//! Severity and diagnostic types shared by the transform pipeline.

/// Diagnostic severity level for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Aborts the current file transform
    Error,
    /// Reported, but the transform continues
    Warning,
}

impl DiagnosticSeverity {
    /// Returns true if this severity indicates an error.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A message attached to an optional byte offset in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// Byte offset in the file the diagnostic refers to
    pub offset: Option<usize>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(message: impl Into<String>, offset: Option<usize>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            message: message.into(),
            offset,
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>, offset: Option<usize>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            offset,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{}: {} (at offset {offset})", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}
