//! The `weft dfg` subcommand: import a kernel description and export the
//! dataflow artifact.

use std::path::Path;

use weft_dfg::{export_dataflow, import_generic, import_structured, DataflowGraph};
use weft_diagnostics::{DiagnosticSink, TerminalRenderer};

use crate::DfgArgs;

/// Imports the kernel named by `args.input` and writes `<out>.dfg`.
pub fn run(args: &DfgArgs, quiet: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let input = Path::new(&args.input);
    let sink = DiagnosticSink::new();
    let mut graph = import_kernel(input, &sink)?;

    let failed = sink.has_errors();
    let renderer = TerminalRenderer::new();
    renderer.render_all(&sink.take_all(), &mut std::io::stderr())?;
    if failed {
        return Ok(1);
    }

    let path = export_dataflow(&mut graph, &args.out)?;
    if !quiet {
        let recurrences: usize = graph
            .instructions()
            .map(|(id, _)| graph.recurrence_count(id))
            .sum();
        eprintln!(
            "wrote {} ({} instructions, {} recurrences)",
            path.display(),
            graph.size(),
            recurrences
        );
    }
    Ok(0)
}

/// Dispatches on file extension: `.txt` structured, `.dot` generic.
fn import_kernel(path: &Path, sink: &DiagnosticSink) -> Result<DataflowGraph, Box<dyn std::error::Error>> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let graph = match extension {
        "txt" => import_structured(path, sink)?,
        "dot" => import_generic(path, sink)?,
        other => {
            return Err(format!(
                "unsupported kernel description extension '{other}' (expected .txt or .dot)"
            )
            .into())
        }
    };
    Ok(graph)
}
