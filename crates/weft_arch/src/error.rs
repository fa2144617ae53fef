//! Error types for the topology model.

use weft_common::InternalError;

/// Errors raised by aggregate construction and export.
///
/// Structural errors (`PositionOccupied`, `UnknownElement`) indicate a
/// caller bug and fail the offending call immediately; they are never
/// recovered per-record.
#[derive(Debug, thiserror::Error)]
pub enum ArchError {
    /// An element was added at a position that already holds one.
    #[error("position (col {col}, row {row}) is already occupied")]
    PositionOccupied {
        /// Column of the occupied position.
        col: i32,
        /// Row of the occupied position.
        row: i32,
    },

    /// An interconnect or query endpoint did not resolve to a registered
    /// element (dangling ID or empty grid coordinate).
    #[error("unknown element: {0}")]
    UnknownElement(String),

    /// A border-side selector did not match any known side name.
    #[error("unknown port side '{0}' (expected left, right, top, bottom, horizontal, vertical, or all)")]
    UnknownPortSide(String),

    /// The export file could not be created or written.
    #[error("failed to write architecture artifact: {0}")]
    ExportIo(#[from] std::io::Error),

    /// A model invariant was broken; this is a bug in Weft.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
