//! Command-line interface for the Weft CGRA front end.
//!
//! Provides `weft arch` for building a fabric from a TOML description and
//! exporting the architecture artifact, and `weft dfg` for importing a
//! kernel description (format chosen by file extension) and exporting the
//! dataflow artifact.

#![warn(missing_docs)]

mod arch;
mod dfg;

use std::process;

use clap::{Parser, Subcommand};

/// Weft, a CGRA design-automation front end.
#[derive(Parser, Debug)]
#[command(name = "weft", version, about = "Weft CGRA front end")]
pub struct Cli {
    /// Suppress all output except errors and diagnostics.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a fabric from a TOML description and export it.
    Arch(ArchArgs),
    /// Import a kernel description and export the dataflow artifact.
    Dfg(DfgArgs),
}

/// Arguments for the `weft arch` subcommand.
#[derive(Parser, Debug)]
pub struct ArchArgs {
    /// Path to the fabric configuration file.
    pub config: String,

    /// Output base name; `<out>.cmpa` is written.
    #[arg(short, long, default_value = "design")]
    pub out: String,

    /// Directory of JSON PE templates to report on while building.
    #[arg(long)]
    pub pe_library: Option<String>,
}

/// Arguments for the `weft dfg` subcommand.
#[derive(Parser, Debug)]
pub struct DfgArgs {
    /// Path to the kernel description (`.txt` structured, `.dot` generic).
    pub input: String,

    /// Output base name; `<out>.dfg` is written.
    #[arg(short, long, default_value = "kernel")]
    pub out: String,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Arch(ref args) => arch::run(args, cli.quiet),
        Command::Dfg(ref args) => dfg::run(args, cli.quiet),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
