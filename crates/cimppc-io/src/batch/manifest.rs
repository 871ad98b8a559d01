use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Outcome of converting one input document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchDocumentRecord {
    /// 1-based position in the input list.
    pub index: usize,
    pub input: String,
    pub output: Option<String>,
    pub status: String,
    pub error: Option<String>,
    pub error_kind: Option<String>,
    pub buses: usize,
    pub branches: usize,
    pub warnings: usize,
}

impl BatchDocumentRecord {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchManifest {
    pub created_at: DateTime<Utc>,
    pub format: String,
    pub num_documents: usize,
    pub success: usize,
    pub failure: usize,
    pub documents: Vec<BatchDocumentRecord>,
}

pub fn write_batch_manifest(path: &Path, manifest: &BatchManifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating manifest directory '{}'", parent.display()))?;
    }
    let json =
        serde_json::to_string_pretty(manifest).context("serializing batch manifest to JSON")?;
    fs::write(path, json)
        .with_context(|| format!("writing batch manifest '{}'", path.display()))?;
    Ok(())
}

pub fn load_batch_manifest(path: &Path) -> Result<BatchManifest> {
    let file = fs::File::open(path)
        .with_context(|| format!("opening batch manifest '{}'", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("parsing batch manifest '{}'", path.display()))
}
