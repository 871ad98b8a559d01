//! # cimppc-core: PYPOWER case model
//!
//! Provides the in-memory case record that CIM documents are converted into,
//! together with the identifier remapper, the conversion error taxonomy and
//! the import diagnostics shared by the I/O and CLI crates.
//!
//! ## Design Philosophy
//!
//! A case is a flat, ordered set of tables exactly as PYPOWER expects them:
//! - **bus**: one [`BusRow`] per connectivity or topological node
//! - **gen** / **gencost**: generator tables (carried for layout fidelity)
//! - **branch**: one [`BranchRow`] per switching device
//!
//! Rows are typed structs internally and serialize as plain numeric arrays in
//! PPC column order, with integer columns kept integral.
//!
//! ## Quick Start
//!
//! ```rust
//! use cimppc_core::*;
//!
//! let mut ids = IdRemapper::new();
//! let mut case = PpcCase::new();
//!
//! let bus = ids.map("tn1");
//! case.bus.push(BusRow::with_defaults(bus, 11.0));
//!
//! assert_eq!(case.bus.len(), 1);
//! assert_eq!(case.bus[0].bus_i, 1);
//! ```
//!
//! ## Modules
//!
//! - [`case`] - Case record and row types
//! - [`ids`] - First-seen sequential identifier assignment
//! - [`error`] - Conversion error taxonomy
//! - [`diagnostics`] - Non-fatal issues collected during conversion

pub mod case;
pub mod diagnostics;
pub mod error;
pub mod ids;

pub use case::{BranchRow, BusRow, Cell, GenCostRow, GenRow, PpcCase, PPC_VERSION};
pub use diagnostics::{ImportDiagnostics, ImportIssue, ImportStats};
pub use error::{ConversionError, ConversionResult};
pub use ids::IdRemapper;
