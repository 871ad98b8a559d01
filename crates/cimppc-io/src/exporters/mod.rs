//! Case exporters.
//!
//! Every converted document is written to exactly one file, `ppc_<index>.<ext>`,
//! in one of the [`ExportFormat`]s. Writers go through a scoped
//! [`BufWriter`] that is flushed explicitly and dropped on every exit path.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cimppc_core::PpcCase;
use serde::{Deserialize, Serialize};

pub mod formats;
pub mod metadata;

pub use formats::{
    export_case_to_json, export_case_to_matpower, export_case_to_pypower, write_json_case,
    write_matpower_case, write_pypower_case, SCHEMA_VERSION,
};
pub use metadata::ExportMetadata;

/// Output serialization for converted cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Versioned JSON envelope around the case record.
    #[default]
    Json,
    /// `ppc = {...}` Python literal, importable by PYPOWER tooling.
    Python,
    /// MATPOWER `.m` case function.
    Matpower,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Python => "py",
            ExportFormat::Matpower => "m",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Python => "python",
            ExportFormat::Matpower => "matpower",
        }
    }
}

/// Output file name for the 1-based input position `index`.
pub fn output_file_name(index: usize, format: ExportFormat) -> String {
    format!("ppc_{}.{}", index, format.extension())
}

/// Output path for the 1-based input position `index` inside `output_dir`.
pub fn output_path(output_dir: &Path, index: usize, format: ExportFormat) -> PathBuf {
    output_dir.join(output_file_name(index, format))
}

/// Write `case` to `path` in `format`.
pub fn export_case(
    case: &PpcCase,
    path: impl AsRef<Path>,
    format: ExportFormat,
    metadata: Option<&ExportMetadata>,
) -> Result<()> {
    match format {
        ExportFormat::Json => export_case_to_json(case, path, metadata),
        ExportFormat::Python => export_case_to_pypower(case, path, metadata),
        ExportFormat::Matpower => export_case_to_matpower(case, path, metadata),
    }
}

pub(crate) fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("creating output file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}
