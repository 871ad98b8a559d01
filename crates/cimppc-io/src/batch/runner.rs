use crate::batch::manifest::{write_batch_manifest, BatchDocumentRecord, BatchManifest};
use crate::exporters::{export_case, output_path, ExportFormat, ExportMetadata};
use crate::importers::parse_cim;
use crate::options::ConvertOptions;
use anyhow::{Context, Result};
use chrono::Utc;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Manifest written next to the converted cases.
pub const MANIFEST_FILE: &str = "batch_manifest.json";

/// The fixed input list converted when nothing else is configured.
pub fn default_inputs() -> Vec<PathBuf> {
    ["data/1.xml", "data/2.xml", "data/3.xml"]
        .iter()
        .map(PathBuf::from)
        .collect()
}

/// Settings for converting a list of CIM documents.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub format: ExportFormat,
    pub options: ConvertOptions,
    /// Worker threads; 0 uses every CPU.
    pub threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            inputs: default_inputs(),
            output_dir: PathBuf::from("."),
            format: ExportFormat::default(),
            options: ConvertOptions::default(),
            threads: 1,
        }
    }
}

/// Counts and per-document records from one batch run.
pub struct BatchSummary {
    pub success: usize,
    pub failure: usize,
    pub manifest_path: PathBuf,
    pub documents: Vec<BatchDocumentRecord>,
}

/// Convert every input independently; one failing document never stops the others.
///
/// Output for the input at 1-based position `i` goes to `ppc_<i>.<ext>`, so
/// the result does not depend on the thread count.
pub fn run_batch(config: &BatchConfig) -> Result<BatchSummary> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "creating output directory '{}'",
            config.output_dir.display()
        )
    })?;

    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building Rayon thread pool for batch conversion")?;

    let documents: Vec<BatchDocumentRecord> = pool.install(|| {
        config
            .inputs
            .par_iter()
            .enumerate()
            .map(|(idx, input)| convert_document(idx + 1, input, config))
            .collect()
    });

    let success = documents.iter().filter(|record| record.is_ok()).count();
    let failure = documents.len() - success;

    let manifest = BatchManifest {
        created_at: Utc::now(),
        format: config.format.as_str().to_string(),
        num_documents: documents.len(),
        success,
        failure,
        documents: documents.clone(),
    };
    let manifest_path = config.output_dir.join(MANIFEST_FILE);
    write_batch_manifest(&manifest_path, &manifest)?;

    Ok(BatchSummary {
        success,
        failure,
        manifest_path,
        documents,
    })
}

fn convert_document(index: usize, input: &Path, config: &BatchConfig) -> BatchDocumentRecord {
    let mut record = BatchDocumentRecord {
        index,
        input: input.display().to_string(),
        output: None,
        status: "error".to_string(),
        error: None,
        error_kind: None,
        buses: 0,
        branches: 0,
        warnings: 0,
    };

    let output = output_path(&config.output_dir, index, config.format);
    let result = match parse_cim(input, &config.options) {
        Ok(result) => result,
        Err(err) => {
            error!("conversion of {} failed: {err}", input.display());
            record.error_kind = Some(err.kind().to_string());
            record.error = Some(err.to_string());
            remove_stale_output(&output);
            return record;
        }
    };
    record.buses = result.case.bus.len();
    record.branches = result.case.branch.len();
    record.warnings = result.diagnostics.warning_count();

    let metadata = ExportMetadata::for_source(record.input.clone());
    match export_case(&result.case, &output, config.format, Some(&metadata)) {
        Ok(()) => {
            info!(
                "Conversion to PYPOWER PPC format completed successfully for {}, saved as {}",
                input.display(),
                output.display()
            );
            record.status = "ok".to_string();
            record.output = Some(output.display().to_string());
        }
        Err(err) => {
            error!("writing {} failed: {err:#}", output.display());
            record.error_kind = Some("export".to_string());
            record.error = Some(format!("{err:#}"));
            remove_stale_output(&output);
        }
    }
    record
}

/// A failed document must not leave an earlier run's `ppc_<i>` behind.
fn remove_stale_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => warn!("removed stale output {}", path.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!("could not remove stale output {}: {err}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const VALID: &str = r##"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:cim="http://iec.ch/TC57/2016/CIM-schema-cim17#">
  <cim:BaseVoltage rdf:ID="bv1">
    <cim:BaseVoltage.nominalVoltage>11.0</cim:BaseVoltage.nominalVoltage>
  </cim:BaseVoltage>
  <cim:TopologicalNode rdf:ID="tn1">
    <cim:IdentifiedObject.name>N1</cim:IdentifiedObject.name>
    <cim:TopologicalNode.BaseVoltage rdf:resource="#bv1"/>
  </cim:TopologicalNode>
</rdf:RDF>"##;

    const BROKEN: &str = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:cim="http://iec.ch/TC57/2016/CIM-schema-cim17#">
  <cim:ConnectivityNode rdf:ID="cn1"/>
</rdf:RDF>"#;

    #[test]
    fn test_default_config_uses_fixed_inputs() {
        let config = BatchConfig::default();
        assert_eq!(
            config.inputs,
            vec![
                PathBuf::from("data/1.xml"),
                PathBuf::from("data/2.xml"),
                PathBuf::from("data/3.xml")
            ]
        );
        assert_eq!(config.format, ExportFormat::Json);
        assert_eq!(config.threads, 1);
    }

    #[test]
    fn test_failure_is_isolated_per_document() -> Result<()> {
        let dir = tempdir()?;
        let good = dir.path().join("good.xml");
        let bad = dir.path().join("bad.xml");
        fs::write(&good, VALID)?;
        fs::write(&bad, BROKEN)?;
        let out = dir.path().join("out");

        let config = BatchConfig {
            inputs: vec![bad.clone(), dir.path().join("missing.xml"), good.clone()],
            output_dir: out.clone(),
            threads: 2,
            ..BatchConfig::default()
        };
        let summary = run_batch(&config)?;

        assert_eq!(summary.success, 1);
        assert_eq!(summary.failure, 2);
        assert_eq!(summary.documents[0].error_kind.as_deref(), Some("missing-field"));
        assert_eq!(summary.documents[1].error_kind.as_deref(), Some("io"));
        assert!(summary.documents[2].is_ok());
        assert_eq!(summary.documents[2].buses, 1);

        assert!(!out.join("ppc_1.json").exists());
        assert!(!out.join("ppc_2.json").exists());
        assert!(out.join("ppc_3.json").exists());
        assert!(summary.manifest_path.exists());
        Ok(())
    }

    #[test]
    fn test_failed_rerun_removes_previous_output() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("grid.xml");
        let out = dir.path().join("out");
        fs::write(&input, VALID)?;

        let config = BatchConfig {
            inputs: vec![input.clone()],
            output_dir: out.clone(),
            ..BatchConfig::default()
        };
        run_batch(&config)?;
        assert!(out.join("ppc_1.json").exists());

        fs::write(&input, BROKEN)?;
        let summary = run_batch(&config)?;
        assert_eq!(summary.failure, 1);
        assert_eq!(summary.documents[0].output, None);
        assert!(!out.join("ppc_1.json").exists());
        Ok(())
    }

    #[test]
    fn test_python_output_naming() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("grid.xml");
        fs::write(&input, VALID)?;

        let config = BatchConfig {
            inputs: vec![input],
            output_dir: dir.path().to_path_buf(),
            format: ExportFormat::Python,
            ..BatchConfig::default()
        };
        let summary = run_batch(&config)?;
        let output = dir.path().join("ppc_1.py");
        assert_eq!(summary.documents[0].output.as_deref(), Some(output.to_str().unwrap()));
        let text = fs::read_to_string(output)?;
        assert!(text.contains("'bus': [[1, 1, 0.0, 0.0, 0.0, 0.0, 1, 1.0, 0.0, 11.0, 1, 1.1, 0.9]]"));
        Ok(())
    }
}
