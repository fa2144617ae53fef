//! Architecture artifact writer.
//!
//! Serializes an [`Aggregate`] to the `.cmpa` text format consumed by the
//! downstream mapper: a header line, the element grid, per-PE parameter
//! lines, per-PE operation lines, and the directive log.

use crate::aggregate::Aggregate;
use crate::element::Element;
use crate::error::ArchError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Writes the `.cmpa` serialization of `agg` to `out`.
///
/// The grid spans row 0 to the deepest occupied row and column 0 to the
/// rightmost occupied column; unoccupied cells are written as `-1`. An
/// empty aggregate still produces a 1x1 grid holding a single `-1`.
pub fn write_architecture<W: Write>(agg: &Aggregate, out: &mut W) -> io::Result<()> {
    let (mut rows, mut cols) = (0usize, 0usize);
    for (id, _) in agg.elements() {
        if let Some((col, row)) = agg.position(id) {
            rows = rows.max(row.unsigned_abs() as usize);
            cols = cols.max(col.max(0) as usize);
        }
    }
    rows += 1;
    cols += 1;

    let mut grid: Vec<Vec<Option<&Element>>> = vec![vec![None; cols]; rows];
    for (id, element) in agg.elements() {
        if let Some((col, row)) = agg.position(id) {
            if col >= 0 {
                grid[row.unsigned_abs() as usize][col as usize] = Some(element);
            }
        }
    }

    writeln!(
        out,
        "{} {} {} {} {}",
        rows,
        cols,
        agg.load_bandwidth(),
        agg.store_bandwidth(),
        agg.data_width()
    )?;

    for row in &grid {
        for cell in row {
            let code = match cell {
                Some(Element::Stream(sp)) => sp.grid_code(),
                Some(Element::Processing(pe)) => pe.operations.len() as i32,
                None => -1,
            };
            write!(out, "{code} ")?;
        }
        writeln!(out)?;
    }

    for (r, row) in grid.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if let Some(Element::Processing(pe)) = cell {
                writeln!(
                    out,
                    "{} {} {} {} {} {} {} {}",
                    r,
                    c,
                    pe.output_registers,
                    pe.register_file.size,
                    pe.register_file.read_ports_fu,
                    pe.register_file.read_ports_output,
                    pe.constant_units,
                    pe.pipeline_stages
                )?;
            }
        }
    }

    for (r, row) in grid.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if let Some(Element::Processing(pe)) = cell {
                for op in &pe.operations {
                    writeln!(out, "{r} {c} {op}")?;
                }
            }
        }
    }

    for directive in agg.directives() {
        writeln!(out, "{}", directive.render())?;
    }

    Ok(())
}

/// Exports `agg` to `<base>.cmpa`, returning the path written.
///
/// Validates model consistency first; nothing is written if the
/// aggregate fails its internal checks.
pub fn export_architecture(agg: &Aggregate, base: &str) -> Result<PathBuf, ArchError> {
    agg.validate()?;
    let path = PathBuf::from(format!("{base}.cmpa"));
    let file = File::create(&path)?;
    let mut out = BufWriter::new(file);
    write_architecture(agg, &mut out)?;
    out.flush()?;
    Ok(path)
}
