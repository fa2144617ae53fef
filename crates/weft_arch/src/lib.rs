//! Fabric topology model for the Weft CGRA front end.
//!
//! This crate models a target hardware fabric as an [`Aggregate`]: a grid of
//! [`ProcessingElement`] and [`StreamPort`] tiles with an explicit
//! latency-weighted interconnect and a directive log describing the bulk
//! patterns applied to it. The model is populated through the bulk topology
//! generators (orthogonal grid, diagonals, full mesh, border stream ports,
//! wraparound markers) or the ready-made presets, and serialized to the
//! `.cmpa` architecture artifact consumed by the downstream mapper.
//!
//! # Usage
//!
//! ```
//! use weft_arch::{presets, PortSides};
//!
//! let agg = presets::standard_cgra(2, 3, 1, false, Some(PortSides::ALL), true).unwrap();
//! assert_eq!(agg.pe_count(), 6);
//! ```

#![warn(missing_docs)]

pub mod aggregate;
pub mod directive;
pub mod element;
pub mod error;
pub mod export;
pub mod generators;
pub mod ids;
pub mod pe_library;
pub mod presets;

pub use aggregate::{Aggregate, ElementRef, Position};
pub use directive::{Directive, PatternKind, WrapSide};
pub use element::{
    Element, ProcessingElement, RegisterFile, RfDestination, StreamPort, PE_COLOR,
    STREAM_PORT_COLOR,
};
pub use error::ArchError;
pub use export::{export_architecture, write_architecture};
pub use generators::{PortSides, StreamPortCounts};
pub use ids::ElementId;
pub use pe_library::{import_pe_from_json, load_pe_library, PeImportError};
