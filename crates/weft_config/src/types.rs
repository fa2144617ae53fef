//! Deserialized fabric configuration structures.

use serde::Deserialize;

/// The bulk interconnect pattern applied to the fabric grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterconnectPattern {
    /// Right neighbor and one-row-down neighbor.
    #[default]
    Standard,
    /// Standard plus the north-west diagonal.
    Diagonals,
    /// Standard plus both diagonals, always bidirectional.
    Full,
    /// Right neighbor only.
    Horizontal,
    /// One-row-down neighbor only.
    Vertical,
}

/// The `[fabric]` section: grid dimensions and interconnect shape.
#[derive(Debug, Clone, Deserialize)]
pub struct FabricSection {
    /// Number of grid rows (processing elements, before stream ports).
    pub rows: u32,
    /// Number of grid columns.
    pub cols: u32,
    /// Interconnect latency in cycles.
    #[serde(default = "default_latency")]
    pub latency: u32,
    /// Bulk interconnect pattern.
    #[serde(default)]
    pub pattern: InterconnectPattern,
    /// Whether interconnects are bidirectional.
    #[serde(default)]
    pub bidirectional: bool,
    /// Sides on which to insert stream ports: any of `left`, `right`,
    /// `top`, `bottom`, `horizontal`, `vertical`, `all`. Empty means none.
    #[serde(default)]
    pub stream_ports: Vec<String>,
    /// Whether inserted stream ports are simultaneously input- and
    /// output-capable rather than split by side.
    #[serde(default)]
    pub merge_ios: bool,
}

/// The `[pe]` section: parameters applied uniformly to every processing element.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PeSection {
    /// Operation mnemonics supported by every PE.
    pub operations: Vec<String>,
    /// Register-file size (words).
    pub register_file_size: u32,
    /// Output-register count (at least 1).
    pub output_registers: u32,
    /// Constant-unit count.
    pub constant_units: u32,
    /// Pipeline-stage count.
    pub pipeline_stages: u32,
    /// Register-file read ports feeding the functional unit.
    pub rf_read_ports_fu: u32,
    /// Register-file read ports feeding the output registers.
    pub rf_read_ports_output: u32,
}

impl Default for PeSection {
    fn default() -> Self {
        Self {
            operations: Vec::new(),
            register_file_size: 1,
            output_registers: 1,
            constant_units: 0,
            pipeline_stages: 1,
            rf_read_ports_fu: 0,
            rf_read_ports_output: 0,
        }
    }
}

/// The `[memory]` section: stream-engine bandwidths and data width.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemorySection {
    /// Load bandwidth in bytes per cycle.
    pub load_bandwidth: u32,
    /// Store bandwidth in bytes per cycle.
    pub store_bandwidth: u32,
    /// Data-word width in bytes.
    pub data_width: u32,
}

impl Default for MemorySection {
    fn default() -> Self {
        Self {
            load_bandwidth: 128,
            store_bandwidth: 128,
            data_width: 4,
        }
    }
}

/// A complete fabric configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FabricConfig {
    /// Grid dimensions and interconnect shape.
    pub fabric: FabricSection,
    /// Uniform processing-element parameters.
    #[serde(default)]
    pub pe: PeSection,
    /// Memory-interface parameters.
    #[serde(default)]
    pub memory: MemorySection,
}

fn default_latency() -> u32 {
    1
}
