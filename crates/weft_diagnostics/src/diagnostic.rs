//! Structured diagnostic messages.

use crate::severity::Severity;

/// A single diagnostic message.
///
/// Diagnostics produced while ingesting external text carry the 1-based
/// line number of the offending record; diagnostics about programmatic
/// state carry no line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of this diagnostic.
    pub severity: Severity,
    /// The human-readable message.
    pub message: String,
    /// The 1-based input line the diagnostic refers to, if any.
    pub line: Option<usize>,
}

impl Diagnostic {
    /// Creates a note diagnostic with no line reference.
    pub fn note(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
            line: None,
        }
    }

    /// Creates a warning diagnostic with no line reference.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line: None,
        }
    }

    /// Creates a warning diagnostic referring to an input line.
    pub fn warning_at(message: impl Into<String>, line: usize) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line: Some(line),
        }
    }

    /// Creates an error diagnostic with no line reference.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            line: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_constructor() {
        let d = Diagnostic::warning("unknown node 'x'");
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.message, "unknown node 'x'");
        assert_eq!(d.line, None);
    }

    #[test]
    fn warning_at_carries_line() {
        let d = Diagnostic::warning_at("malformed record", 12);
        assert_eq!(d.line, Some(12));
    }

    #[test]
    fn error_constructor() {
        let d = Diagnostic::error("boom");
        assert_eq!(d.severity, Severity::Error);
    }
}
