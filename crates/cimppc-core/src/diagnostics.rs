//! Diagnostics collected while converting a document.
//!
//! Fatal problems are [`crate::ConversionError`]s. Everything else (a base
//! voltage that fell back to the default, a load whose container has no bus,
//! a dangling branch reference) is recorded here and surfaced to the user
//! without aborting the conversion.

use serde::Serialize;

/// A single warning recorded during conversion
#[derive(Debug, Clone, Serialize)]
pub struct ImportIssue {
    pub category: String, // "reference", "demand", "validation"
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>, // "Disconnector 'sw1'"
}

impl std::fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[warning:{}] {}", self.category, self.message)?;
        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }
        Ok(())
    }
}

/// Statistics about the conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub buses: usize,
    pub branches: usize,
    pub loads_applied: usize,
    pub loads_dropped: usize,
    pub defaulted_voltages: usize,
}

/// Complete diagnostics for one converted document
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportDiagnostics {
    pub stats: ImportStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ImportIssue>,
}

impl ImportDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning with an entity reference (e.g., "TopologicalNode 'tn1'")
    pub fn add_warning_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.issues.push(ImportIssue {
            category: category.to_string(),
            message: message.to_string(),
            entity: Some(entity.to_string()),
        });
    }

    /// Add a validation warning (post-conversion)
    pub fn add_validation_warning(&mut self, entity: &str, message: &str) {
        self.add_warning_with_entity("validation", message, entity);
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn issues_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a ImportIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    /// Merge another diagnostics into this one (for combining conversion + validation)
    pub fn merge(&mut self, other: ImportDiagnostics) {
        self.issues.extend(other.issues);
        // Stats are not merged - they are owned by the converter
    }

    pub fn summary(&self) -> String {
        match self.warning_count() {
            0 => "No issues".to_string(),
            1 => "1 warning".to_string(),
            w => format!("{} warnings", w),
        }
    }
}
