use std::collections::HashSet;

use cimppc_core::{ImportDiagnostics, PpcCase};

/// Represents a validation finding on a converted case
#[derive(Debug, Clone, PartialEq)]
pub struct CimValidationError {
    pub entity_type: String, // "Bus", "Branch", "Case"
    pub entity_id: String,
    pub issue: String,
}

impl std::fmt::Display for CimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.entity_type, self.entity_id, self.issue
        )
    }
}

/// Check reference integrity and basic sanity of a converted case.
///
/// Nothing here is fatal: a branch pointing at a container with no bus row,
/// for instance, is exactly what the conversion produces for such input.
pub fn check_case(case: &PpcCase) -> Vec<CimValidationError> {
    let mut findings = Vec::new();

    if case.bus.is_empty() {
        findings.push(CimValidationError {
            entity_type: "Case".to_string(),
            entity_id: "n/a".to_string(),
            issue: "Case has no buses".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for bus in &case.bus {
        if !seen.insert(bus.bus_i) {
            findings.push(CimValidationError {
                entity_type: "Bus".to_string(),
                entity_id: bus.bus_i.to_string(),
                issue: "Duplicate bus id".to_string(),
            });
        }
        if bus.base_kv <= 0.0 {
            findings.push(CimValidationError {
                entity_type: "Bus".to_string(),
                entity_id: bus.bus_i.to_string(),
                issue: format!("Invalid base voltage: {} kV", bus.base_kv),
            });
        }
    }

    for (idx, branch) in case.branch.iter().enumerate() {
        if !seen.contains(&branch.container) {
            findings.push(CimValidationError {
                entity_type: "Branch".to_string(),
                entity_id: (idx + 1).to_string(),
                issue: format!("Container {} has no bus row", branch.container),
            });
        }
    }

    findings
}

/// Run [`check_case`] and report the findings as validation warnings.
pub fn validate_case(case: &PpcCase) -> ImportDiagnostics {
    let mut diagnostics = ImportDiagnostics::new();
    for finding in check_case(case) {
        diagnostics.add_validation_warning(
            &format!("{} {}", finding.entity_type, finding.entity_id),
            &finding.issue,
        );
    }
    diagnostics
}
