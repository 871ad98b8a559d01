//! PYPOWER case exporter
//!
//! Writes the case as a single Python assignment, `ppc = {...}`, so the file
//! can be imported or `exec`'d by PYPOWER tooling directly.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use cimppc_core::{Cell, PpcCase};

use crate::exporters::{create_output, ExportMetadata};

/// Export a case to a `.py` file
pub fn export_case_to_pypower(
    case: &PpcCase,
    output_path: impl AsRef<Path>,
    metadata: Option<&ExportMetadata>,
) -> Result<()> {
    let path = output_path.as_ref();
    let mut writer = create_output(path)?;
    write_pypower_case(case, &mut writer, metadata)?;
    writer
        .flush()
        .with_context(|| format!("flushing output file: {}", path.display()))
}

/// Write `ppc = {...}` into `writer`
pub fn write_pypower_case(
    case: &PpcCase,
    mut writer: impl Write,
    metadata: Option<&ExportMetadata>,
) -> Result<()> {
    if let Some(meta) = metadata {
        if let Some(source) = meta.source_description() {
            writeln!(writer, "# Source: {}", source)?;
        }
        if let Some(ts) = meta.creation_timestamp() {
            writeln!(writer, "# Generated at {}", ts)?;
        }
    }

    write!(
        writer,
        "ppc = {{'version': '{}', 'baseMVA': {}, ",
        case.version.replace('\'', "\\'"),
        py_float(case.base_mva)
    )?;
    write!(writer, "'bus': ")?;
    write_table(&mut writer, case.bus.iter().map(|r| r.cells()))?;
    write!(writer, ", 'gen': ")?;
    write_table(&mut writer, case.gen.iter().map(|r| r.cells()))?;
    write!(writer, ", 'branch': ")?;
    write_table(&mut writer, case.branch.iter().map(|r| r.cells()))?;
    write!(writer, ", 'gencost': ")?;
    write_table(&mut writer, case.gencost.iter().map(|r| r.cells()))?;
    writeln!(writer, "}}")?;
    Ok(())
}

fn write_table(
    writer: &mut impl Write,
    rows: impl Iterator<Item = Vec<Cell>>,
) -> std::io::Result<()> {
    write!(writer, "[")?;
    for (i, row) in rows.enumerate() {
        if i > 0 {
            write!(writer, ", ")?;
        }
        let cells: Vec<String> = row.iter().map(py_cell).collect();
        write!(writer, "[{}]", cells.join(", "))?;
    }
    write!(writer, "]")
}

fn py_cell(cell: &Cell) -> String {
    match *cell {
        Cell::Int(v) => v.to_string(),
        Cell::Float(v) => py_float(v),
    }
}

/// Python `repr` of a float.
fn py_float(value: f64) -> String {
    if value.is_nan() {
        return "float('nan')".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}float('inf')");
    }
    let text = format!("{:?}", value);
    match text.split_once('e') {
        // Python always signs the exponent and pads it to two digits
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}
