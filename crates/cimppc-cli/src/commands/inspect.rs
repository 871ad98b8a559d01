//! Single-document inspection: converts in memory, writes nothing.

use std::path::Path;

use anyhow::{Context, Result};
use cimppc_cli::{CimppcConfig, ConversionFlags};
use cimppc_io::exporters::write_json_case;
use cimppc_io::importers::parse_cim;

const ISSUE_CATEGORIES: [&str; 3] = ["reference", "demand", "validation"];

pub fn handle(input: &Path, json: bool, flags: &ConversionFlags) -> Result<()> {
    let mut options = CimppcConfig::load(flags.config.as_deref())?.convert;
    flags.apply(&mut options);

    let result = parse_cim(input, &options)
        .with_context(|| format!("converting '{}'", input.display()))?;
    let stats = &result.diagnostics.stats;

    println!("Document: {}", input.display());
    println!("  Demand policy:      {}", options.demand_policy.as_str());
    println!("  Buses:              {}", result.case.bus.len());
    println!("  Branches:           {}", result.case.branch.len());
    println!("  Generators:         {}", result.case.gen.len());
    println!("  Loads applied:      {}", stats.loads_applied);
    println!("  Loads dropped:      {}", stats.loads_dropped);
    println!("  Defaulted voltages: {}", stats.defaulted_voltages);

    let total_pd: f64 = result.case.bus.iter().map(|b| b.pd).sum();
    let total_qd: f64 = result.case.bus.iter().map(|b| b.qd).sum();
    println!("  Total demand:       {:.3} MW / {:.3} MVAr", total_pd, total_qd);

    println!("Diagnostics: {}", result.diagnostics.summary());
    if result.diagnostics.has_issues() {
        for category in ISSUE_CATEGORIES {
            for issue in result.diagnostics.issues_by_category(category) {
                println!("  {}", issue);
            }
        }
    }

    if json {
        let stdout = std::io::stdout();
        write_json_case(&result.case, stdout.lock(), None)?;
    }
    Ok(())
}
