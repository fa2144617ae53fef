//! Diagnostic creation, severity management, and rendering.
//!
//! This crate provides structured [`Diagnostic`] messages with severity
//! levels and optional input line numbers. The thread-safe
//! [`DiagnosticSink`] accumulates diagnostics while bulk external text is
//! ingested (per-record recovery: warn and skip), and the
//! [`TerminalRenderer`] formats accumulated diagnostics for stderr.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use diagnostic::Diagnostic;
pub use renderer::TerminalRenderer;
pub use severity::Severity;
pub use sink::DiagnosticSink;
