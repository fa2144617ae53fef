//! Dataflow artifact writer.
//!
//! Serializes a [`DataflowGraph`] to the `.dfg` text format consumed by
//! the downstream mapper. Canonical renumbering runs first, so exporting
//! mutates the graph's instruction IDs and derived names.

use crate::error::DfgError;
use crate::graph::DataflowGraph;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Writes the `.dfg` serialization of `dfg` to `out`, renumbering the
/// instructions into canonical order first.
///
/// The artifact holds the instruction count, one line per instruction
/// (`name opcode latency #inputs #outputs #recurrences #const-inputs
/// const-value`), one adjacency line per instruction (input IDs followed
/// by output IDs), and one line per recurrence (`source target distance`).
pub fn write_dataflow<W: Write>(dfg: &mut DataflowGraph, out: &mut W) -> io::Result<()> {
    let sorted = dfg.sort_and_renumber_instructions();

    writeln!(out, "{}", dfg.size())?;

    for &id in &sorted {
        let Some(instr) = dfg.instruction(id) else {
            continue;
        };
        let inputs = dfg.get_inputs(id);
        let outputs = dfg.get_outputs(id);
        let const_inputs = inputs
            .iter()
            .filter(|&&input| {
                dfg.instruction(input).is_some_and(|i| i.opcode.is_const())
            })
            .count();
        let const_value = if instr.opcode.is_const() {
            instr.const_value
        } else {
            0
        };
        writeln!(
            out,
            "{} {} {} {} {} {} {} {}",
            instr.name,
            instr.opcode.export_name(),
            instr.latency,
            inputs.len(),
            outputs.len(),
            dfg.recurrence_count(id),
            const_inputs,
            const_value
        )?;
    }

    for &id in &sorted {
        for neighbor in dfg.get_inputs(id).into_iter().chain(dfg.get_outputs(id)) {
            if let Some(instr) = dfg.instruction(neighbor) {
                write!(out, "{} ", instr.id)?;
            }
        }
        writeln!(out)?;
    }

    for &id in &sorted {
        let Some(source) = dfg.instruction(id) else {
            continue;
        };
        for rec in dfg.recurrences(id) {
            if let Some(target) = dfg.instruction(rec.target) {
                writeln!(out, "{} {} {}", source.id, target.id, rec.distance)?;
            }
        }
    }

    Ok(())
}

/// Exports `dfg` to `<base>.dfg`, returning the path written.
pub fn export_dataflow(dfg: &mut DataflowGraph, base: &str) -> Result<PathBuf, DfgError> {
    let path = PathBuf::from(format!("{base}.dfg"));
    let file = File::create(&path).map_err(DfgError::ExportIo)?;
    let mut out = BufWriter::new(file);
    write_dataflow(dfg, &mut out).map_err(DfgError::ExportIo)?;
    out.flush().map_err(DfgError::ExportIo)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instr::{Instruction, Opcode};

    fn render(dfg: &mut DataflowGraph) -> String {
        let mut buf = Vec::new();
        write_dataflow(dfg, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_graph_exports_count_only() {
        let mut dfg = DataflowGraph::new();
        assert_eq!(render(&mut dfg), "0\n");
    }

    #[test]
    fn stream_opcodes_are_spelled_out() {
        let mut dfg = DataflowGraph::new();
        dfg.add_instr(Instruction::new(1, Opcode::StreamIn, 1, "in0"));
        dfg.add_instr(Instruction::new(2, Opcode::StreamOut, 1, "out0"));
        let text = render(&mut dfg);
        assert!(text.contains("in0 STREAM_IN 1 0 0 0 0 0\n"));
        assert!(text.contains("out0 STREAM_OUT 1 0 0 0 0 0\n"));
    }

    #[test]
    fn const_value_and_const_input_counts() {
        let mut dfg = DataflowGraph::new();
        let mut k = Instruction::new(1, Opcode::Const, 0, "k");
        k.const_value = 7;
        let k = dfg.add_instr(k);
        let m = dfg.add_instr(Instruction::new(2, Opcode::parse("MUL"), 2, "m"));
        dfg.add_dependency(k, m, 0, false);

        let text = render(&mut dfg);
        // MUL sorts first; it has one input, which is a constant.
        assert!(text.contains("m MUL 2 1 0 0 1 0\n"));
        assert!(text.contains("k CONST 0 0 1 0 0 7\n"));
    }

    #[test]
    fn adjacency_lines_use_canonical_ids() {
        let mut dfg = DataflowGraph::new();
        let a = dfg.add_instr(Instruction::new(1, Opcode::parse("MUL"), 2, "m1"));
        let b = dfg.add_instr(Instruction::new(2, Opcode::parse("ADD"), 1, "a1"));
        dfg.add_dependency(a, b, 0, false);
        let text = render(&mut dfg);
        let lines: Vec<&str> = text.lines().collect();
        // m1's outputs, then a1's inputs, by canonical ID.
        assert_eq!(lines[3], "2 ");
        assert_eq!(lines[4], "1 ");
    }

    #[test]
    fn export_writes_dfg_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("kernel");
        let mut dfg = DataflowGraph::new();
        dfg.add_instr(Instruction::new(1, Opcode::parse("ADD"), 1, "a"));
        let path = export_dataflow(&mut dfg, base.to_str().unwrap()).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("dfg"));
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "1\na ADD 1 0 0 0 0 0\n\n");
    }
}
