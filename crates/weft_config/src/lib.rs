//! Fabric configuration loading for the Weft CGRA front end.
//!
//! A fabric description (`weft.toml`-style) declares the grid size, the
//! bulk interconnect pattern, stream-port placement, and the processing
//! element and memory-interface parameters applied uniformly to the
//! fabric. The CLI loads one of these files and drives `weft_arch` with it.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{FabricConfig, FabricSection, InterconnectPattern, MemorySection, PeSection};
