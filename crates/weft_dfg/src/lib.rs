//! Dataflow-graph model for the Weft CGRA front end.
//!
//! This crate models one kernel as a [`DataflowGraph`]: [`Instruction`]
//! nodes, ordinary dependency edges, and cross-iteration recurrence
//! records. Kernels are imported either from the structured line format
//! ([`import_structured`]) or from a generic DOT-style description
//! ([`import_generic`], which classifies loop-closing edges as
//! recurrences), and serialized to the `.dfg` artifact consumed by the
//! downstream mapper after canonical renumbering.

#![warn(missing_docs)]

pub mod error;
pub mod export;
pub mod graph;
pub mod ids;
pub mod import_dot;
pub mod import_text;
pub mod instr;

pub use error::DfgError;
pub use export::{export_dataflow, write_dataflow};
pub use graph::{DataflowGraph, Recurrence};
pub use ids::InstrId;
pub use import_dot::{import_generic, parse_generic};
pub use import_text::{import_structured, parse_structured};
pub use instr::{Instruction, Opcode};
