//! Structured kernel-description importer.
//!
//! The structured format is line-oriented and read in three passes:
//!
//! 1. Instruction lines (`name op latency` or `op latency`), identified by
//!    the absence of a comma. Unnamed instructions are named
//!    `<op><ordinal>` from their 1-based declaration ordinal.
//! 2. Dependency lines (`producer,consumer`).
//! 3. Recurrence lines (`rec source,target,distance`); an unparsable
//!    distance defaults to 1.
//!
//! Malformed records and references to unknown instruction names are
//! reported through the diagnostic sink and skipped.

use crate::error::DfgError;
use crate::graph::DataflowGraph;
use crate::ids::InstrId;
use crate::instr::{Instruction, Opcode};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use weft_diagnostics::{Diagnostic, DiagnosticSink};

/// Imports a structured kernel description from a file.
pub fn import_structured(path: &Path, sink: &DiagnosticSink) -> Result<DataflowGraph, DfgError> {
    let text = fs::read_to_string(path).map_err(DfgError::ReadInput)?;
    Ok(parse_structured(&text, sink))
}

/// Parses structured kernel text into a dataflow graph.
pub fn parse_structured(text: &str, sink: &DiagnosticSink) -> DataflowGraph {
    let mut graph = DataflowGraph::new();
    let mut by_name: HashMap<String, InstrId> = HashMap::new();
    let mut ordinal = 0u32;

    // Pass 1: instructions.
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.contains(',') {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (name, op, lat) = match parts.as_slice() {
            [name, op, lat] => (*name, *op, *lat),
            [op, lat] => ("", *op, *lat),
            _ => {
                sink.emit(Diagnostic::warning_at(
                    format!("skipping invalid instruction line: {line}"),
                    line_no + 1,
                ));
                continue;
            }
        };
        let latency = match lat.parse::<u32>() {
            Ok(latency) => latency,
            Err(_) => {
                sink.emit(Diagnostic::warning_at(
                    format!("skipping instruction with invalid latency: {line}"),
                    line_no + 1,
                ));
                continue;
            }
        };
        ordinal += 1;
        let name = if name.is_empty() {
            format!("{op}{ordinal}")
        } else {
            name.to_string()
        };
        let id = graph.add_instr(Instruction::new(ordinal, Opcode::parse(op), latency, &name));
        by_name.insert(name, id);
    }

    // Pass 2: dependencies.
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if !line.contains(',') || line.starts_with("rec ") {
            continue;
        }
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let [producer, consumer] = parts.as_slice() else {
            sink.emit(Diagnostic::warning_at(
                format!("skipping invalid dependency line: {line}"),
                line_no + 1,
            ));
            continue;
        };
        let (Some(&from), Some(&to)) = (by_name.get(*producer), by_name.get(*consumer)) else {
            sink.emit(Diagnostic::warning_at(
                format!("unknown instruction in dependency: {producer},{consumer}"),
                line_no + 1,
            ));
            continue;
        };
        graph.add_dependency(from, to, 0, false);
    }

    // Pass 3: recurrences.
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let Some(rest) = line.strip_prefix("rec ") else {
            continue;
        };
        let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
        let [source, target, distance] = parts.as_slice() else {
            sink.emit(Diagnostic::warning_at(
                format!("invalid recurrence format: {line}"),
                line_no + 1,
            ));
            continue;
        };
        let distance = distance.parse::<u32>().unwrap_or(1);
        let (Some(&from), Some(&to)) = (by_name.get(*source), by_name.get(*target)) else {
            sink.emit(Diagnostic::warning_at(
                format!("unknown instruction in recurrence: {source},{target}"),
                line_no + 1,
            ));
            continue;
        };
        graph.add_recurrence(from, to, distance);
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (DataflowGraph, DiagnosticSink) {
        let sink = DiagnosticSink::new();
        let graph = parse_structured(text, &sink);
        (graph, sink)
    }

    #[test]
    fn named_and_unnamed_instructions() {
        let (g, sink) = parse("m1 MUL 2\nADD 1\n");
        assert_eq!(g.size(), 2);
        let names: Vec<&str> = g.instructions().map(|(_, i)| i.name.as_str()).collect();
        assert_eq!(names, vec!["m1", "ADD2"]);
        assert_eq!(sink.warning_count(), 0);
    }

    #[test]
    fn dependencies_resolve_by_name() {
        let (g, _) = parse("m1 MUL 2\na1 ADD 1\nm1,a1\n");
        let ids: Vec<InstrId> = g.instructions().map(|(id, _)| id).collect();
        assert_eq!(g.get_outputs(ids[0]), vec![ids[1]]);
    }

    #[test]
    fn recurrence_with_explicit_distance() {
        let (g, _) = parse("a1 ADD 1\nrec a1,a1,3\n");
        let (id, _) = g.instructions().next().unwrap();
        assert_eq!(g.recurrences(id)[0].distance, 3);
        assert_eq!(g.recurrences(id)[0].target, id);
    }

    #[test]
    fn unparsable_distance_defaults_to_one() {
        let (g, sink) = parse("a1 ADD 1\nrec a1,a1,soon\n");
        let (id, _) = g.instructions().next().unwrap();
        assert_eq!(g.recurrences(id)[0].distance, 1);
        assert_eq!(sink.warning_count(), 0);
    }

    #[test]
    fn malformed_lines_warn_and_skip() {
        let (g, sink) = parse("a1 ADD one\nb1 SUB 1 extra junk\nx1,y1\nrec a1,a1\n");
        assert_eq!(g.size(), 0);
        assert_eq!(sink.warning_count(), 4);
    }

    #[test]
    fn unknown_dependency_names_warn() {
        let (g, sink) = parse("a1 ADD 1\na1,ghost\n");
        let (id, _) = g.instructions().next().unwrap();
        assert!(g.get_outputs(id).is_empty());
        assert_eq!(sink.warning_count(), 1);
    }

    #[test]
    fn import_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kernel.txt");
        fs::write(&path, "m1 MUL 2\na1 ADD 1\nm1,a1\n").unwrap();
        let sink = DiagnosticSink::new();
        let g = import_structured(&path, &sink).unwrap();
        assert_eq!(g.size(), 2);
    }
}
