//! Shared foundational types used across the Weft CGRA front end.
//!
//! This crate provides the slotted [`Arena`] that backs both the topology
//! and dataflow models, and the common result types for internal errors.

#![warn(missing_docs)]

pub mod arena;
pub mod result;

pub use arena::{Arena, ArenaId};
pub use result::{InternalError, WeftResult};
