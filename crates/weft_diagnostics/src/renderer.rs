//! Terminal rendering of accumulated diagnostics.

use crate::diagnostic::Diagnostic;
use std::io::{self, Write};

/// Renders diagnostics as single `severity: message` lines for a terminal.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new() -> Self {
        Self
    }

    /// Formats a single diagnostic as one line of text.
    pub fn format(&self, diag: &Diagnostic) -> String {
        match diag.line {
            Some(line) => format!("{}: line {}: {}", diag.severity, line, diag.message),
            None => format!("{}: {}", diag.severity, diag.message),
        }
    }

    /// Writes all diagnostics to the given writer, one per line.
    pub fn render_all<W: Write>(&self, diags: &[Diagnostic], out: &mut W) -> io::Result<()> {
        for diag in diags {
            writeln!(out, "{}", self.format(diag))?;
        }
        Ok(())
    }
}
