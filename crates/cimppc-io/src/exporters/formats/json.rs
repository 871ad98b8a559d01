//! JSON case exporter
//!
//! Wraps the case record in a small versioned envelope:
//!
//! ```json
//! {
//!   "format": "ppc",
//!   "schema_version": 1,
//!   "source": "data/1.xml",
//!   "ppc": { "version": "2", "baseMVA": 1.0, "bus": [[...]], ... }
//! }
//! ```

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use cimppc_core::PpcCase;
use serde::Serialize;

use crate::exporters::{create_output, ExportMetadata};

/// Version of the envelope layout; bump on incompatible changes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct CaseDocument<'a> {
    pub format: &'static str,
    pub schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    pub ppc: &'a PpcCase,
}

impl<'a> CaseDocument<'a> {
    pub fn new(case: &'a PpcCase, metadata: Option<&'a ExportMetadata>) -> Self {
        Self {
            format: "ppc",
            schema_version: SCHEMA_VERSION,
            source: metadata.and_then(|m| m.source_description()),
            generated_at: metadata.and_then(|m| m.creation_timestamp()),
            generator: metadata
                .and_then(|m| m.tool_version())
                .map(|v| format!("cimppc {v}")),
            ppc: case,
        }
    }
}

/// Export a case to a JSON file
pub fn export_case_to_json(
    case: &PpcCase,
    output_path: impl AsRef<Path>,
    metadata: Option<&ExportMetadata>,
) -> Result<()> {
    let path = output_path.as_ref();
    let mut writer = create_output(path)?;
    write_json_case(case, &mut writer, metadata)?;
    writer
        .flush()
        .with_context(|| format!("flushing output file: {}", path.display()))
}

/// Serialize a case as pretty-printed JSON into `writer`
pub fn write_json_case(
    case: &PpcCase,
    mut writer: impl Write,
    metadata: Option<&ExportMetadata>,
) -> Result<()> {
    let document = CaseDocument::new(case, metadata);
    serde_json::to_writer_pretty(&mut writer, &document).context("serializing case to JSON")?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimppc_core::{BranchRow, BusRow};
    use serde_json::{json, Value};

    #[test]
    fn test_json_envelope_layout() -> Result<()> {
        let mut case = PpcCase::new();
        case.bus.push(BusRow::with_defaults(1, 11.0));
        case.branch.push(BranchRow::placeholder(11.0, 1));

        let mut buf = Vec::new();
        write_json_case(&case, &mut buf, None)?;
        let value: Value = serde_json::from_slice(&buf)?;

        assert_eq!(value["format"], "ppc");
        assert_eq!(value["schema_version"], 1);
        assert!(value.get("source").is_none());
        assert_eq!(
            value["ppc"]["bus"],
            json!([[1, 1, 0.0, 0.0, 0.0, 0.0, 1, 1.0, 0.0, 11.0, 1, 1.1, 0.9]])
        );
        assert_eq!(
            value["ppc"]["branch"],
            json!([[11.0, 1, 0.0, 0.0, 0.0, 9999.0, 9999.0, 9999.0, 0.0, 0.0, 1, -360, 360]])
        );
        assert_eq!(value["ppc"]["gen"], json!([]));
        assert_eq!(value["ppc"]["baseMVA"], 1.0);
        Ok(())
    }

    #[test]
    fn test_json_includes_metadata() -> Result<()> {
        let meta = ExportMetadata::for_source("data/2.xml");
        let mut buf = Vec::new();
        write_json_case(&PpcCase::new(), &mut buf, Some(&meta))?;
        let value: Value = serde_json::from_slice(&buf)?;
        assert_eq!(value["source"], "data/2.xml");
        assert!(value["generated_at"].is_string());
        assert!(value["generator"].as_str().unwrap().starts_with("cimppc "));
        Ok(())
    }
}
