//! TOML configuration for `cimppc convert`.
//!
//! Every section is optional; unspecified values use the defaults, which
//! convert `data/1.xml`, `data/2.xml` and `data/3.xml` into the current
//! directory as JSON.
//!
//! ```toml
//! [batch]
//! inputs = ["grids/north.xml", "grids/south.xml"]
//! output_dir = "out"
//! format = "matpower"
//! threads = 0
//!
//! [convert]
//! demand_policy = "sum"
//! strict_references = false
//! fallback_base_kv = 1.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cimppc_io::batch::default_inputs;
use cimppc_io::{ConvertOptions, ExportFormat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CimppcConfig {
    pub batch: BatchSection,
    pub convert: ConvertOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub format: ExportFormat,
    /// Number of worker threads (0 = auto-detect).
    pub threads: usize,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            inputs: default_inputs(),
            output_dir: PathBuf::from("."),
            format: ExportFormat::Json,
            threads: 1,
        }
    }
}

impl CimppcConfig {
    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file '{}'", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }
}
