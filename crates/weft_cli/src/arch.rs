//! The `weft arch` subcommand: build a fabric from a TOML description and
//! export the architecture artifact.

use std::path::Path;

use weft_arch::{
    export_architecture, load_pe_library, Aggregate, PortSides, ProcessingElement, RfDestination,
};
use weft_config::{load_config, FabricConfig, InterconnectPattern};
use weft_diagnostics::{DiagnosticSink, TerminalRenderer};

use crate::ArchArgs;

/// Builds the configured fabric and writes `<out>.cmpa`.
pub fn run(args: &ArchArgs, quiet: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(Path::new(&args.config))?;
    let sink = DiagnosticSink::new();

    if let Some(dir) = &args.pe_library {
        let library = load_pe_library(Path::new(dir), &sink)?;
        if !quiet {
            for (name, pe) in &library {
                eprintln!("pe template '{name}': {} operations", pe.operations.len());
            }
        }
    }

    let agg = build_fabric(&config)?;

    let failed = sink.has_errors();
    let renderer = TerminalRenderer::new();
    renderer.render_all(&sink.take_all(), &mut std::io::stderr())?;
    if failed {
        return Ok(1);
    }

    let path = export_architecture(&agg, &args.out)?;
    if !quiet {
        eprintln!(
            "wrote {} ({} elements, {} interconnects)",
            path.display(),
            agg.size(),
            agg.interconnect_count()
        );
    }
    Ok(0)
}

/// Assembles the aggregate described by a validated configuration.
fn build_fabric(config: &FabricConfig) -> Result<Aggregate, Box<dyn std::error::Error>> {
    let fabric = &config.fabric;

    let template = pe_template(config);
    let mut agg = Aggregate::new();
    for row in 0..fabric.rows as i32 {
        for col in 0..fabric.cols as i32 {
            agg.add_element(template.clone(), col, row)?;
        }
    }

    match fabric.pattern {
        InterconnectPattern::Standard => {
            agg.connect_grid_standard(fabric.latency, fabric.bidirectional)
        }
        InterconnectPattern::Diagonals => {
            agg.connect_grid_diagonals(fabric.latency, fabric.bidirectional)
        }
        InterconnectPattern::Full => agg.connect_grid_full(fabric.latency),
        InterconnectPattern::Horizontal => {
            agg.connect_horizontal(fabric.latency, fabric.bidirectional)
        }
        InterconnectPattern::Vertical => agg.connect_vertical(fabric.latency, fabric.bidirectional),
    }

    if let Some(sides) = port_sides(&fabric.stream_ports)? {
        agg.add_stream_ports(
            sides,
            fabric.latency,
            true,
            fabric.bidirectional,
            fabric.merge_ios,
        )?;
    }

    agg.set_stream_bandwidth(
        Some(config.memory.load_bandwidth),
        Some(config.memory.store_bandwidth),
    );
    agg.set_data_width(config.memory.data_width);
    Ok(agg)
}

/// Builds the uniform PE template from the `[pe]` section.
fn pe_template(config: &FabricConfig) -> ProcessingElement {
    let pe = &config.pe;
    let mut template = ProcessingElement::new();
    for op in &pe.operations {
        template.add_operation(op);
    }
    template.set_register_file_size(pe.register_file_size);
    template.set_output_registers(pe.output_registers);
    template.set_constant_units(pe.constant_units);
    template.set_pipeline_stages(pe.pipeline_stages);
    template
        .register_file
        .add_read_ports(RfDestination::FunctionalUnit, pe.rf_read_ports_fu);
    template
        .register_file
        .add_read_ports(RfDestination::OutputRegisters, pe.rf_read_ports_output);
    template
}

/// Folds the configured side names into a single side set.
fn port_sides(names: &[String]) -> Result<Option<PortSides>, Box<dyn std::error::Error>> {
    let mut sides: Option<PortSides> = None;
    for name in names {
        let parsed: PortSides = name.parse()?;
        sides = Some(match sides {
            Some(acc) => acc | parsed,
            None => parsed,
        });
    }
    Ok(sides)
}
