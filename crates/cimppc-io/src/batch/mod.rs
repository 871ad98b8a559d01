//! Multi-document conversion with per-document isolation.

pub mod manifest;
pub mod runner;

pub use manifest::{load_batch_manifest, write_batch_manifest, BatchDocumentRecord, BatchManifest};
pub use runner::{default_inputs, run_batch, BatchConfig, BatchSummary, MANIFEST_FILE};
