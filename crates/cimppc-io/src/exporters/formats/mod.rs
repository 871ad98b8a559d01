//! Format-specific case writers.
//!
//! - **JSON** - versioned envelope, the default
//! - **PYPOWER** - `ppc = {...}` Python literal
//! - **MATPOWER** (.m files) - case function with `mpc.*` matrices
//!
//! ```no_run
//! use cimppc_core::PpcCase;
//! use cimppc_io::exporters::formats::export_case_to_matpower;
//!
//! # fn main() -> anyhow::Result<()> {
//! export_case_to_matpower(&PpcCase::new(), "ppc_1.m", None)?;
//! # Ok(())
//! # }
//! ```

pub mod json;
pub mod matpower;
pub mod pypower;

pub use json::{export_case_to_json, write_json_case, CaseDocument, SCHEMA_VERSION};
pub use matpower::{export_case_to_matpower, write_matpower_case};
pub use pypower::{export_case_to_pypower, write_pypower_case};
