//! MATPOWER .m file exporter
//!
//! Writes a converted case as a MATPOWER case function. Integer columns are
//! written as integers and real columns with six decimals.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use cimppc_core::{Cell, PpcCase};

use crate::exporters::{create_output, ExportMetadata};

/// Export a case to MATPOWER .m format
pub fn export_case_to_matpower(
    case: &PpcCase,
    output_path: impl AsRef<Path>,
    metadata: Option<&ExportMetadata>,
) -> Result<()> {
    let path = output_path.as_ref();
    // MATLAB requires the function name to match the file name
    let function_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("case");
    let mut writer = create_output(path)?;
    write_matpower_case(case, function_name, &mut writer, metadata)?;
    writer
        .flush()
        .with_context(|| format!("flushing output file: {}", path.display()))
}

/// Write a case as a MATPOWER function named `function_name`
pub fn write_matpower_case(
    case: &PpcCase,
    function_name: &str,
    mut writer: impl Write,
    metadata: Option<&ExportMetadata>,
) -> Result<()> {
    write_matpower_metadata(&mut writer, metadata)?;

    // Write header
    writeln!(writer, "function mpc = {}", function_name)?;
    writeln!(writer, "%% MATPOWER Case Format : Version {}", case.version)?;
    writeln!(writer, "%% Converted from CIM by cimppc")?;
    writeln!(writer)?;

    writeln!(writer, "mpc.version = '{}';", case.version)?;
    writeln!(writer, "mpc.baseMVA = {};", case.base_mva)?;
    writeln!(writer)?;

    writeln!(writer, "%% bus data")?;
    writeln!(
        writer,
        "%%\tbus_i\ttype\tPd\tQd\tGs\tBs\tarea\tVm\tVa\tbaseKV\tzone\tVmax\tVmin"
    )?;
    write_matrix(&mut writer, "bus", case.bus.iter().map(|r| r.cells()))?;

    writeln!(writer, "%% generator data")?;
    writeln!(
        writer,
        "%%\tbus\tPg\tQg\tQmax\tQmin\tVg\tmBase\tstatus\tPmax\tPmin"
    )?;
    write_matrix(&mut writer, "gen", case.gen.iter().map(|r| r.cells()))?;

    // Converted switches carry base kV and container id in the first two columns
    writeln!(writer, "%% branch data")?;
    writeln!(
        writer,
        "%%\tbaseKV\tcontainer\tr\tx\tb\trateA\trateB\trateC\tratio\tangle\tstatus\tangmin\tangmax"
    )?;
    write_matrix(&mut writer, "branch", case.branch.iter().map(|r| r.cells()))?;

    // Write generator cost data if present
    if !case.gencost.is_empty() {
        writeln!(writer, "%% generator cost data")?;
        writeln!(writer, "%%\tmodel\tstartup\tshutdown\tn\tc(n-1)\t...\tc0")?;
        write_matrix(&mut writer, "gencost", case.gencost.iter().map(|r| r.cells()))?;
    }

    Ok(())
}

fn write_matrix(
    writer: &mut impl Write,
    name: &str,
    rows: impl Iterator<Item = Vec<Cell>>,
) -> Result<()> {
    writeln!(writer, "mpc.{} = [", name)?;
    for row in rows {
        for cell in &row {
            match cell {
                Cell::Int(v) => write!(writer, "\t{}", v)?,
                Cell::Float(v) => write!(writer, "\t{:.6}", v)?,
            }
        }
        writeln!(writer, ";")?;
    }
    writeln!(writer, "];")?;
    writeln!(writer)?;
    Ok(())
}

fn write_matpower_metadata(
    writer: &mut impl Write,
    metadata: Option<&ExportMetadata>,
) -> Result<()> {
    if let Some(meta) = metadata {
        if let Some(desc) = meta.source_description() {
            writeln!(writer, "%% Source: {}", desc)?;
        }
        if let Some(ts) = meta.creation_timestamp() {
            writeln!(writer, "%% Converted at {}", ts)?;
        }
        if let Some(version) = meta.tool_version() {
            writeln!(writer, "%% Generated by cimppc {}", version)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimppc_core::{BranchRow, BusRow, GenCostRow, GenRow};
    use tempfile::tempdir;

    fn sample_case() -> PpcCase {
        let mut case = PpcCase::new();
        case.bus.push(BusRow::with_defaults(1, 11.0));
        case.bus.push(BusRow::with_defaults(2, 11.0));
        case.branch.push(BranchRow::placeholder(11.0, 2));
        case
    }

    #[test]
    fn test_export_sections() -> Result<()> {
        let mut buf = Vec::new();
        write_matpower_case(&sample_case(), "ppc_1", &mut buf, None)?;
        let content = String::from_utf8(buf)?;

        assert!(content.starts_with("function mpc = ppc_1\n"));
        assert!(content.contains("mpc.version = '2';"));
        assert!(content.contains("mpc.baseMVA = 1;"));
        assert!(content.contains("mpc.bus = ["));
        assert!(content.contains("mpc.gen = ["));
        assert!(content.contains("mpc.branch = ["));
        assert!(!content.contains("mpc.gencost"));
        assert!(content.contains(
            "\t1\t1\t0.000000\t0.000000\t0.000000\t0.000000\t1\t1.000000\t0.000000\t11.000000\t1\t1.100000\t0.900000;"
        ));
        assert!(content.contains("\t11.000000\t2\t0.000000"));
        Ok(())
    }

    #[test]
    fn test_export_gen_and_gencost() -> Result<()> {
        let mut case = sample_case();
        case.gen.push(GenRow {
            gen_bus: 1,
            pg: 10.0,
            qg: 0.0,
            qmax: 50.0,
            qmin: -50.0,
            vg: 1.0,
            mbase: 100.0,
            gen_status: 1,
            pmax: 100.0,
            pmin: 0.0,
        });
        case.gencost.push(GenCostRow {
            model: 2,
            startup: 0.0,
            shutdown: 0.0,
            ncost: 3,
            cost: vec![0.01, 20.0, 0.0],
        });

        let mut buf = Vec::new();
        write_matpower_case(&case, "case", &mut buf, None)?;
        let content = String::from_utf8(buf)?;
        assert!(content.contains("mpc.gencost = ["));
        assert!(content.contains("\t2\t0.000000\t0.000000\t3\t0.010000\t20.000000\t0.000000;"));
        assert!(content.contains("\t1\t10.000000\t0.000000\t50.000000\t-50.000000"));
        Ok(())
    }

    #[test]
    fn test_export_file_uses_stem_as_function_name() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ppc_3.m");
        let meta = ExportMetadata::for_source("data/3.xml");
        export_case_to_matpower(&sample_case(), &path, Some(&meta))?;

        let content = std::fs::read_to_string(&path)?;
        assert!(content.starts_with("%% Source: data/3.xml\n"));
        assert!(content.contains("function mpc = ppc_3\n"));
        assert!(content.contains("%% Generated by cimppc"));
        Ok(())
    }
}
