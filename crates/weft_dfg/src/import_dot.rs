//! Generic graph-description importer.
//!
//! Reads a DOT-style kernel description where nodes carry `opcode` (and,
//! for constants, `constVal`) attributes and edges are `src -> dst` lines.
//! The ordinary dependency relation is kept acyclic: before each edge is
//! added, the forward graph built so far is queried for a path from the
//! edge's target back to its source, and an edge that would close a loop
//! is recorded as a recurrence with distance 1 instead. This format cannot
//! express larger distances.

use crate::error::DfgError;
use crate::graph::DataflowGraph;
use crate::ids::InstrId;
use crate::instr::{Instruction, Opcode};
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use weft_diagnostics::{Diagnostic, DiagnosticSink};

/// Imports a generic kernel description from a file.
pub fn import_generic(path: &Path, sink: &DiagnosticSink) -> Result<DataflowGraph, DfgError> {
    let text = fs::read_to_string(path).map_err(DfgError::ReadInput)?;
    Ok(parse_generic(&text, sink))
}

fn parse_attributes(raw: &str) -> HashMap<&str, &str> {
    raw.trim_end_matches(']')
        .split(',')
        .filter_map(|attr| attr.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim().trim_matches('"')))
        .collect()
}

/// Parses generic graph text into a dataflow graph.
pub fn parse_generic(text: &str, sink: &DiagnosticSink) -> DataflowGraph {
    let mut graph = DataflowGraph::new();
    let mut by_name: HashMap<String, (InstrId, NodeIndex)> = HashMap::new();
    let mut forward: DiGraph<(), ()> = DiGraph::new();
    let mut ordinal = 0u32;

    // First pass: node definitions.
    for raw in text.lines() {
        let mut line = raw.trim();
        if line.is_empty() || line.starts_with("digraph") || line == "{" || line == "}" {
            continue;
        }
        if line.contains("->") {
            continue;
        }
        line = line.trim_end_matches(';');
        let (name, attrs) = match line.split_once('[') {
            Some((name, attrs)) => (name.trim(), parse_attributes(attrs)),
            None => (line.trim(), HashMap::new()),
        };
        let opcode = Opcode::parse_generic(attrs.get("opcode").copied().unwrap_or(""));
        let const_value = if opcode.is_const() {
            attrs
                .get("constVal")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(0)
        } else {
            0
        };
        ordinal += 1;
        let mut instr = Instruction::new(ordinal, opcode, 1, name);
        instr.const_value = const_value;
        let id = graph.add_instr(instr);
        let node = forward.add_node(());
        by_name.insert(name.to_string(), (id, node));
    }

    // Second pass: edges, classified against the forward graph so far.
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if !line.contains("->") {
            continue;
        }
        let line = line.trim_end_matches(';');
        let mut parts = line.split("->");
        let (Some(src_raw), Some(dst_raw)) = (parts.next(), parts.next()) else {
            continue;
        };
        let src_name = src_raw.trim();
        let dst_name = dst_raw
            .split_whitespace()
            .next()
            .unwrap_or("")
            .split('[')
            .next()
            .unwrap_or("")
            .trim();
        let (Some(&(src, src_node)), Some(&(dst, dst_node))) =
            (by_name.get(src_name), by_name.get(dst_name))
        else {
            sink.emit(Diagnostic::warning_at(
                format!("unknown node in dependency: {src_name} -> {dst_name}"),
                line_no + 1,
            ));
            continue;
        };
        if has_path_connecting(&forward, dst_node, src_node, None) {
            // This edge would close a loop: record it as a recurrence.
            graph.add_recurrence(src, dst, 1);
        } else {
            graph.add_dependency(src, dst, 0, false);
            forward.add_edge(src_node, dst_node, ());
        }
    }

    graph
}
