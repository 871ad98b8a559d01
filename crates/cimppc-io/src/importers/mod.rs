//! CIM RDF/XML import.
//!
//! - [`cim_reader`] - namespace-aware XML reader producing a [`CimDocument`]
//! - [`cim`] - CIM → PPC conversion
//! - [`cim_validator`] - post-conversion reference checks (warnings only)
//!
//! ```no_run
//! use cimppc_io::{importers::parse_cim, ConvertOptions};
//!
//! let result = parse_cim("data/1.xml", &ConvertOptions::default())?;
//! println!("{} buses, {}", result.case.bus.len(), result.diagnostics.summary());
//! # Ok::<(), cimppc_core::ConversionError>(())
//! ```

pub mod cim;
pub mod cim_reader;
mod cim_validator;

pub use cim::{build_base_voltage_lookup, convert_cim_document, parse_cim, ImportResult};
pub use cim_reader::{CimDocument, CimElement, CimProperty, CIM_NS, RDF_NS};
pub use cim_validator::{check_case, validate_case, CimValidationError};
