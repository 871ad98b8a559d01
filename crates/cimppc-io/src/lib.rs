//! # cimppc-io: CIM import, PPC export, batch conversion
//!
//! Reads IEC 61970 CIM RDF/XML documents, converts them into PYPOWER PPC
//! cases and writes them out as JSON, a Python literal, or a MATPOWER case.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cimppc_io::exporters::{export_case, ExportFormat, ExportMetadata};
//! use cimppc_io::importers::parse_cim;
//! use cimppc_io::ConvertOptions;
//!
//! fn main() -> anyhow::Result<()> {
//!     let result = parse_cim("data/1.xml", &ConvertOptions::default())?;
//!     let meta = ExportMetadata::for_source("data/1.xml");
//!     export_case(&result.case, "ppc_1.json", ExportFormat::Json, Some(&meta))?;
//!     println!("{}", result.diagnostics.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`importers`] - namespace-aware CIM reader, conversion and post-conversion checks
//! - [`exporters`] - JSON, PYPOWER and MATPOWER writers plus provenance metadata
//! - [`batch`] - converts a list of documents, one output file each, with a manifest
//! - [`options`] - conversion knobs (demand policy, strict references, fallback kV)

pub mod batch;
pub mod exporters;
pub mod importers;
pub mod options;

pub use batch::{run_batch, BatchConfig, BatchSummary};
pub use exporters::{export_case, ExportFormat, ExportMetadata};
pub use importers::{parse_cim, ImportResult};
pub use options::{ConvertOptions, DemandPolicy};
