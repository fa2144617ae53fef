//! Error types for the dataflow model.

/// Errors raised by kernel import and export.
///
/// Malformed records inside an input file are not errors: the importers
/// report them through the diagnostic sink and skip the record.
#[derive(Debug, thiserror::Error)]
pub enum DfgError {
    /// The kernel description could not be read.
    #[error("failed to read kernel description: {0}")]
    ReadInput(std::io::Error),

    /// The dataflow artifact could not be created or written.
    #[error("failed to write dataflow artifact: {0}")]
    ExportIo(std::io::Error),
}
