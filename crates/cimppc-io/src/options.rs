//! Knobs that change conversion semantics.

use serde::{Deserialize, Serialize};

/// How repeated loads on the same bus combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DemandPolicy {
    /// The last-processed consumer's P/Q replace earlier values.
    #[default]
    Overwrite,
    /// Consumer P/Q accumulate on the bus.
    Sum,
}

impl DemandPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandPolicy::Overwrite => "overwrite",
            DemandPolicy::Sum => "sum",
        }
    }
}

/// Options for converting one CIM document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub demand_policy: DemandPolicy,

    /// Fail on unknown base voltages and on loads without a bus instead of
    /// defaulting/dropping them.
    pub strict_references: bool,

    /// Base voltage (kV) used when a reference cannot be resolved.
    pub fallback_base_kv: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            demand_policy: DemandPolicy::Overwrite,
            strict_references: false,
            fallback_base_kv: 1.0,
        }
    }
}
