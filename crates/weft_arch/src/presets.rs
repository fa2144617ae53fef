//! Ready-made fabric constructors.
//!
//! Each preset builds a rectangular PE grid and applies one of the bulk
//! interconnect generators, optionally flanking or ringing the grid with
//! stream ports.

use crate::aggregate::Aggregate;
use crate::directive::Directive;
use crate::element::{ProcessingElement, StreamPort};
use crate::error::ArchError;
use crate::generators::PortSides;

fn pe_grid(rows: u32, cols: u32, template: Option<&ProcessingElement>) -> Result<Aggregate, ArchError> {
    let mut agg = Aggregate::new();
    for row in 0..rows {
        for col in 0..cols {
            let pe = template.cloned().unwrap_or_default();
            agg.add_element(pe, col as i32, row as i32)?;
        }
    }
    Ok(agg)
}

/// A PE grid flanked by an input stream column on the left and an output
/// stream column on the right, with no interconnects.
pub fn empty_with_streams(rows: u32, cols: u32, use_streams: bool) -> Result<Aggregate, ArchError> {
    let mut agg = Aggregate::new();
    let offset = i32::from(use_streams);
    for row in 0..rows as i32 {
        if use_streams {
            agg.add_element(StreamPort::input(), 0, row)?;
        }
        for col in 0..cols as i32 {
            agg.add_element(ProcessingElement::new(), col + offset, row)?;
        }
        if use_streams {
            agg.add_element(StreamPort::output(), cols as i32 + 1, row)?;
        }
    }
    if use_streams {
        agg.push_directive(Directive::StreamConn);
    }
    Ok(agg)
}

/// A unidirectional PE grid (standard or diagonal pattern), optionally
/// bordered by input stream ports.
pub fn standard_grid(
    rows: u32,
    cols: u32,
    latency: u32,
    diagonals: bool,
    stream_sides: Option<PortSides>,
) -> Result<Aggregate, ArchError> {
    let mut agg = pe_grid(rows, cols, None)?;
    if diagonals {
        agg.connect_grid_diagonals(latency, false);
    } else {
        agg.connect_grid_standard(latency, false);
    }
    if let Some(sides) = stream_sides {
        agg.add_stream_ports(sides, latency, true, false, false)?;
    }
    Ok(agg)
}

/// A bidirectional PE grid (standard or diagonal pattern), optionally
/// bordered by stream ports that may be merged input/output ports.
pub fn standard_cgra(
    rows: u32,
    cols: u32,
    latency: u32,
    diagonals: bool,
    stream_sides: Option<PortSides>,
    merge_ios: bool,
) -> Result<Aggregate, ArchError> {
    let mut agg = pe_grid(rows, cols, None)?;
    if diagonals {
        agg.connect_grid_diagonals(latency, true);
    } else {
        agg.connect_grid_standard(latency, true);
    }
    if let Some(sides) = stream_sides {
        agg.add_stream_ports(sides, latency, true, true, merge_ios)?;
    }
    Ok(agg)
}

/// A full-mesh PE grid, optionally flanked by input/output stream columns.
pub fn full_grid(rows: u32, cols: u32, latency: u32, use_streams: bool) -> Result<Aggregate, ArchError> {
    let mut agg = empty_with_streams(rows, cols, use_streams)?;
    agg.connect_grid_full(latency);
    Ok(agg)
}

/// Like [`standard_grid`], with every PE cloned from `template`.
pub fn homogeneous_grid(
    rows: u32,
    cols: u32,
    template: &ProcessingElement,
    latency: u32,
    diagonals: bool,
    stream_sides: Option<PortSides>,
) -> Result<Aggregate, ArchError> {
    let mut agg = pe_grid(rows, cols, Some(template))?;
    if diagonals {
        agg.connect_grid_diagonals(latency, false);
    } else {
        agg.connect_grid_standard(latency, false);
    }
    if let Some(sides) = stream_sides {
        agg.add_stream_ports(sides, latency, true, false, false)?;
    }
    Ok(agg)
}

/// Like [`standard_cgra`], with every PE cloned from `template`.
pub fn homogeneous_cgra(
    rows: u32,
    cols: u32,
    template: &ProcessingElement,
    latency: u32,
    diagonals: bool,
    stream_sides: Option<PortSides>,
) -> Result<Aggregate, ArchError> {
    let mut agg = pe_grid(rows, cols, Some(template))?;
    if diagonals {
        agg.connect_grid_diagonals(latency, true);
    } else {
        agg.connect_grid_standard(latency, true);
    }
    if let Some(sides) = stream_sides {
        agg.add_stream_ports(sides, latency, true, true, false)?;
    }
    Ok(agg)
}
