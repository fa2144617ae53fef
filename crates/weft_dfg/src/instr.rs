//! Instructions and opcodes.

use serde::{Deserialize, Serialize};

/// The operation an instruction performs.
///
/// Stream and constant operations are distinguished structurally because
/// they change export behavior: constants sort last during canonical
/// renumbering and carry a literal value, and stream opcodes are spelled
/// out in full in the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// A literal constant feeding the kernel.
    Const,
    /// A stream input bringing data into the kernel.
    StreamIn,
    /// A stream output draining results from the kernel.
    StreamOut,
    /// An arithmetic or shift operation, by mnemonic.
    Alu(String),
}

impl Opcode {
    /// Parses a structured-format mnemonic (`CONST`, `S_IN`, `S_OUT`, or
    /// any ALU mnemonic).
    pub fn parse(mnemonic: &str) -> Opcode {
        match mnemonic {
            "CONST" => Opcode::Const,
            "S_IN" => Opcode::StreamIn,
            "S_OUT" => Opcode::StreamOut,
            other => Opcode::Alu(other.to_string()),
        }
    }

    /// Parses a generic-graph opcode attribute (`input`, `output`,
    /// `const`, or any lowercase ALU mnemonic).
    pub fn parse_generic(opcode: &str) -> Opcode {
        match opcode {
            "input" => Opcode::StreamIn,
            "output" => Opcode::StreamOut,
            "const" => Opcode::Const,
            other => Opcode::Alu(other.to_uppercase()),
        }
    }

    /// The short mnemonic used in structured input and for auto-naming.
    pub fn mnemonic(&self) -> &str {
        match self {
            Opcode::Const => "CONST",
            Opcode::StreamIn => "S_IN",
            Opcode::StreamOut => "S_OUT",
            Opcode::Alu(op) => op,
        }
    }

    /// The spelled-out opcode written to the dataflow artifact.
    pub fn export_name(&self) -> &str {
        match self {
            Opcode::StreamIn => "STREAM_IN",
            Opcode::StreamOut => "STREAM_OUT",
            Opcode::Const => "CONST",
            Opcode::Alu(op) => op,
        }
    }

    /// Returns `true` for constants, which sort last in canonical order.
    pub fn is_const(&self) -> bool {
        matches!(self, Opcode::Const)
    }
}

/// One node of a dataflow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Export ID; provisional until canonical renumbering runs.
    pub id: u32,
    /// The operation performed.
    pub opcode: Opcode,
    /// Latency in cycles.
    pub latency: u32,
    /// Literal value, meaningful only when the opcode is `Const`.
    pub const_value: i64,
    /// Display name; auto-derived from the opcode when left empty.
    pub name: String,
}

impl Instruction {
    /// Creates an instruction with a zero constant value.
    pub fn new(id: u32, opcode: Opcode, latency: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            opcode,
            latency,
            const_value: 0,
            name: name.into(),
        }
    }
}
