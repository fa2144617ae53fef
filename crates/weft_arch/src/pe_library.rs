//! PE template import.
//!
//! Templates are JSON descriptions of a processing element's internals
//! (registers, muxes, functional units, output connections). A whole
//! directory of templates can be scanned into a name-keyed library;
//! malformed or unnamed templates are reported through the diagnostic sink
//! and skipped rather than failing the scan.

use crate::element::ProcessingElement;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use weft_diagnostics::{Diagnostic, DiagnosticSink};

/// Errors raised when importing a single PE template.
#[derive(Debug, thiserror::Error)]
pub enum PeImportError {
    /// The template file could not be read.
    #[error("failed to read PE template: {0}")]
    Io(#[from] std::io::Error),

    /// The template file is not valid JSON or lacks the expected shape.
    #[error("failed to parse PE template: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(rename = "PE")]
    pe: Template,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Template {
    name: Option<String>,
    registers: Vec<String>,
    muxes: Vec<serde_json::Value>,
    fus: Vec<FunctionalUnit>,
    outputs: Vec<String>,
    connections: Vec<Connection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FunctionalUnit {
    ops: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Connection {
    #[serde(rename = "from")]
    source: String,
    #[serde(rename = "to")]
    target: String,
}

/// Imports one PE template from a JSON file.
///
/// The register-file size starts as the register count and is decremented
/// once for each register wired directly to an output: such registers act
/// as output registers, not general-purpose storage.
pub fn import_pe_from_json(path: &Path) -> Result<ProcessingElement, PeImportError> {
    let text = fs::read_to_string(path)?;
    let file: TemplateFile = serde_json::from_str(&text)?;
    let template = file.pe;

    let mut pe = ProcessingElement::new();
    pe.name = template.name.unwrap_or_default();
    pe.muxes = template.muxes.len() as u32;
    for fu in &template.fus {
        for op in &fu.ops {
            pe.add_operation(op);
        }
    }

    let mut rf_size = template.registers.len() as u32;
    for conn in &template.connections {
        let register_to_output = template.registers.iter().any(|r| r == &conn.source)
            && template.outputs.iter().any(|o| o == &conn.target);
        if register_to_output {
            rf_size = rf_size.saturating_sub(1);
        }
    }
    pe.set_register_file_size(rf_size);

    Ok(pe)
}

/// Derives a stable display color from a template name.
fn color_for(name: &str) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    name.hash(&mut hasher);
    format!("#{:06x}", hasher.finish() & 0xff_ffff)
}

/// Scans a directory for `*.json` PE templates and builds a name-keyed
/// library.
///
/// Unreadable or malformed templates and templates without a name are
/// skipped with a warning; a duplicate name overwrites the earlier entry
/// with a warning. Files are visited in path order, so the result is
/// deterministic.
pub fn load_pe_library(
    dir: &Path,
    sink: &DiagnosticSink,
) -> Result<BTreeMap<String, ProcessingElement>, PeImportError> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut library = BTreeMap::new();
    for path in paths {
        let mut pe = match import_pe_from_json(&path) {
            Ok(pe) => pe,
            Err(err) => {
                sink.emit(Diagnostic::warning(format!(
                    "skipping PE template {}: {err}",
                    path.display()
                )));
                continue;
            }
        };
        if pe.name.is_empty() {
            sink.emit(Diagnostic::warning(format!(
                "skipping PE template {}: no PE name found",
                path.display()
            )));
            continue;
        }
        pe.color = color_for(&pe.name);
        if library.contains_key(&pe.name) {
            sink.emit(Diagnostic::warning(format!(
                "duplicate PE name '{}' in {}: overwriting earlier template",
                pe.name,
                path.display()
            )));
        }
        library.insert(pe.name.clone(), pe);
    }
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEMPLATE: &str = r#"{
        "PE": {
            "name": "alu_tile",
            "registers": ["r0", "r1", "r2"],
            "muxes": ["m0", "m1"],
            "fus": [
                { "ops": ["ADD", "SUB"] },
                { "ops": ["MUL"] }
            ],
            "outputs": ["out0"],
            "connections": [
                { "from": "r2", "to": "out0" },
                { "from": "m0", "to": "out0" }
            ]
        }
    }"#;

    fn write_template(dir: &Path, file: &str, text: &str) {
        let mut f = fs::File::create(dir.join(file)).unwrap();
        f.write_all(text.as_bytes()).unwrap();
    }

    #[test]
    fn import_reads_template_fields() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "alu.json", TEMPLATE);
        let pe = import_pe_from_json(&dir.path().join("alu.json")).unwrap();
        assert_eq!(pe.name, "alu_tile");
        assert_eq!(pe.operations, vec!["ADD", "SUB", "MUL"]);
        assert_eq!(pe.muxes, 2);
        // 3 registers, one wired straight to an output.
        assert_eq!(pe.register_file.size, 2);
    }

    #[test]
    fn import_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "bad.json", "{ not json");
        let err = import_pe_from_json(&dir.path().join("bad.json")).unwrap_err();
        assert!(matches!(err, PeImportError::Parse(_)));
    }

    #[test]
    fn library_scan_skips_bad_and_unnamed_templates() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "alu.json", TEMPLATE);
        write_template(dir.path(), "bad.json", "not json at all");
        write_template(dir.path(), "unnamed.json", r#"{ "PE": { "fus": [] } }"#);
        write_template(dir.path(), "notes.txt", "ignored");

        let sink = DiagnosticSink::new();
        let library = load_pe_library(dir.path(), &sink).unwrap();
        assert_eq!(library.len(), 1);
        assert!(library.contains_key("alu_tile"));
        assert_eq!(sink.warning_count(), 2);
    }

    #[test]
    fn duplicate_names_overwrite_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "a.json", TEMPLATE);
        write_template(dir.path(), "b.json", TEMPLATE);
        let sink = DiagnosticSink::new();
        let library = load_pe_library(dir.path(), &sink).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(sink.warning_count(), 1);
    }

    #[test]
    fn template_color_is_stable() {
        assert_eq!(color_for("alu_tile"), color_for("alu_tile"));
        assert_ne!(color_for("alu_tile"), color_for("mem_tile"));
    }
}
