//! Fabric elements: processing elements and stream ports.
//!
//! An [`Element`] is a closed tagged variant. Code that must treat the two
//! kinds differently (interconnect generators, the exporter) dispatches by
//! exhaustive pattern match, so rules like "stream ports never connect
//! directly to each other" are structural rather than runtime type checks.

use serde::{Deserialize, Serialize};

/// Default display color for processing elements.
pub const PE_COLOR: &str = "#befe6c";

/// Default display color for stream ports.
pub const STREAM_PORT_COLOR: &str = "#f0ff75";

/// The destination fed by register-file read ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RfDestination {
    /// Read ports feeding the functional unit operand inputs.
    FunctionalUnit,
    /// Read ports feeding the output registers.
    OutputRegisters,
}

/// A processing element's local register file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterFile {
    /// Storage size in words.
    pub size: u32,
    /// Read ports feeding the functional unit.
    pub read_ports_fu: u32,
    /// Read ports feeding the output registers.
    pub read_ports_output: u32,
}

impl RegisterFile {
    /// Creates a register file of the given size with no read ports.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            read_ports_fu: 0,
            read_ports_output: 0,
        }
    }

    /// Adds `num` read ports toward the given destination.
    pub fn add_read_ports(&mut self, destination: RfDestination, num: u32) {
        match destination {
            RfDestination::FunctionalUnit => self.read_ports_fu += num,
            RfDestination::OutputRegisters => self.read_ports_output += num,
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new(1)
    }
}

/// A compute tile supporting a set of operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingElement {
    /// Template name, if this PE was imported from a template library.
    pub name: String,
    /// Supported operation mnemonics, ordered and unique.
    pub operations: Vec<String>,
    /// Output-register count, always at least 1.
    pub output_registers: u32,
    /// The local register file.
    pub register_file: RegisterFile,
    /// Constant-unit count.
    pub constant_units: u32,
    /// Pipeline-stage count.
    pub pipeline_stages: u32,
    /// Input multiplexer count (informational, from template imports).
    pub muxes: u32,
    /// Display color.
    pub color: String,
}

impl ProcessingElement {
    /// Creates a processing element with no operations and default parameters.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            operations: Vec::new(),
            output_registers: 1,
            register_file: RegisterFile::default(),
            constant_units: 0,
            pipeline_stages: 1,
            muxes: 0,
            color: PE_COLOR.to_string(),
        }
    }

    /// Adds a supported operation mnemonic, keeping the set ordered and unique.
    pub fn add_operation(&mut self, op: &str) {
        if !self.operations.iter().any(|o| o == op) {
            self.operations.push(op.to_string());
        }
    }

    /// Removes a supported operation mnemonic, if present.
    pub fn remove_operation(&mut self, op: &str) {
        self.operations.retain(|o| o != op);
    }

    /// Sets the output-register count, clamping to the minimum of 1.
    pub fn set_output_registers(&mut self, num: u32) {
        self.output_registers = num.max(1);
    }

    /// Sets the register-file size.
    pub fn set_register_file_size(&mut self, size: u32) {
        self.register_file.size = size;
    }

    /// Sets the pipeline-stage count.
    pub fn set_pipeline_stages(&mut self, num: u32) {
        self.pipeline_stages = num;
    }

    /// Sets the constant-unit count.
    pub fn set_constant_units(&mut self, num: u32) {
        self.constant_units = num;
    }
}

impl Default for ProcessingElement {
    fn default() -> Self {
        Self::new()
    }
}

/// A boundary tile moving data between the fabric and external streams.
///
/// The `(is_input, is_output)` pair encodes one of four directionalities:
/// input-only, output-only, bidirectional merged, or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPort {
    /// Whether this port can feed data into the fabric.
    pub is_input: bool,
    /// Whether this port can drain data out of the fabric.
    pub is_output: bool,
    /// Display color.
    pub color: String,
}

impl StreamPort {
    /// Creates a stream port with the given directionality.
    pub fn new(is_input: bool, is_output: bool) -> Self {
        Self {
            is_input,
            is_output,
            color: STREAM_PORT_COLOR.to_string(),
        }
    }

    /// Creates an input-only port.
    pub fn input() -> Self {
        Self::new(true, false)
    }

    /// Creates an output-only port.
    pub fn output() -> Self {
        Self::new(false, true)
    }

    /// Creates a bidirectional merged port.
    pub fn merged() -> Self {
        Self::new(true, true)
    }

    /// Returns the architecture-artifact grid code for this port:
    /// `-2` input-only, `-3` output-only, `-4` bidirectional, `-1` neither.
    pub fn grid_code(&self) -> i32 {
        match (self.is_input, self.is_output) {
            (true, false) => -2,
            (false, true) => -3,
            (true, true) => -4,
            (false, false) => -1,
        }
    }
}

/// An addressable hardware element placed on the fabric grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    /// A compute tile.
    Processing(ProcessingElement),
    /// A stream port on the fabric boundary.
    Stream(StreamPort),
}

impl Element {
    /// Returns `true` if this element is a processing element.
    pub fn is_processing(&self) -> bool {
        matches!(self, Element::Processing(_))
    }

    /// Returns `true` if this element is a stream port.
    pub fn is_stream(&self) -> bool {
        matches!(self, Element::Stream(_))
    }

    /// Returns the processing-element payload, if any.
    pub fn as_processing(&self) -> Option<&ProcessingElement> {
        match self {
            Element::Processing(pe) => Some(pe),
            Element::Stream(_) => None,
        }
    }

    /// Returns the mutable processing-element payload, if any.
    pub fn as_processing_mut(&mut self) -> Option<&mut ProcessingElement> {
        match self {
            Element::Processing(pe) => Some(pe),
            Element::Stream(_) => None,
        }
    }

    /// Returns the stream-port payload, if any.
    pub fn as_stream(&self) -> Option<&StreamPort> {
        match self {
            Element::Stream(sp) => Some(sp),
            Element::Processing(_) => None,
        }
    }
}

impl From<ProcessingElement> for Element {
    fn from(pe: ProcessingElement) -> Self {
        Element::Processing(pe)
    }
}

impl From<StreamPort> for Element {
    fn from(sp: StreamPort) -> Self {
        Element::Stream(sp)
    }
}
