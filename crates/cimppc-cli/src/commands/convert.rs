use std::io::{self, Write};

use anyhow::{Context, Result};
use cimppc_cli::{CimppcConfig, ConvertArgs};
use cimppc_io::batch::{run_batch, BatchConfig, BatchDocumentRecord, BatchSummary};
use tabwriter::TabWriter;
use tracing::info;

/// Run the batch and print a per-document table. Returns the summary so the
/// caller can pick the exit status.
pub fn handle(args: &ConvertArgs) -> Result<BatchSummary> {
    let config = CimppcConfig::load(args.conversion.config.as_deref())?;
    let batch = resolve_batch_config(args, config);
    info!(
        "Converting {} document(s) to {} in {}",
        batch.inputs.len(),
        batch.format.as_str(),
        batch.output_dir.display()
    );

    let summary = run_batch(&batch).context("running batch conversion")?;
    print_summary(&summary.documents)?;
    println!(
        "{} succeeded, {} failed; manifest: {}",
        summary.success,
        summary.failure,
        summary.manifest_path.display()
    );
    Ok(summary)
}

/// Command-line flags win over the configuration file.
pub fn resolve_batch_config(args: &ConvertArgs, config: CimppcConfig) -> BatchConfig {
    let CimppcConfig {
        batch,
        convert: mut options,
    } = config;
    args.conversion.apply(&mut options);

    BatchConfig {
        inputs: if args.inputs.is_empty() {
            batch.inputs
        } else {
            args.inputs.clone()
        },
        output_dir: args.output_dir.clone().unwrap_or(batch.output_dir),
        format: args.format.map(Into::into).unwrap_or(batch.format),
        options,
        threads: args.threads.unwrap_or(batch.threads),
    }
}

fn print_summary(records: &[BatchDocumentRecord]) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "#\tINPUT\tSTATUS\tBUSES\tBRANCHES\tWARNINGS\tOUTPUT")?;
    for record in records {
        let output = match (&record.output, &record.error) {
            (Some(path), _) => path.clone(),
            (None, Some(err)) => err.clone(),
            (None, None) => "-".to_string(),
        };
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.index,
            record.input,
            record.status,
            record.buses,
            record.branches,
            record.warnings,
            output
        )?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimppc_cli::{ConversionFlags, ConvertFormat, DemandPolicyArg};
    use cimppc_io::{DemandPolicy, ExportFormat};
    use std::path::PathBuf;

    #[test]
    fn defaults_come_from_config() {
        let batch = resolve_batch_config(&ConvertArgs::default(), CimppcConfig::default());
        assert_eq!(batch.inputs.len(), 3);
        assert_eq!(batch.output_dir, PathBuf::from("."));
        assert_eq!(batch.format, ExportFormat::Json);
        assert_eq!(batch.threads, 1);
        assert_eq!(batch.options.demand_policy, DemandPolicy::Overwrite);
    }

    #[test]
    fn flags_override_config() {
        let mut config = CimppcConfig::default();
        config.batch.format = ExportFormat::Matpower;
        config.convert.fallback_base_kv = 0.4;

        let args = ConvertArgs {
            inputs: vec![PathBuf::from("x.xml")],
            output_dir: Some(PathBuf::from("out")),
            format: Some(ConvertFormat::Python),
            threads: Some(4),
            conversion: ConversionFlags {
                demand_policy: Some(DemandPolicyArg::Sum),
                strict: true,
                ..ConversionFlags::default()
            },
        };
        let batch = resolve_batch_config(&args, config);
        assert_eq!(batch.inputs, vec![PathBuf::from("x.xml")]);
        assert_eq!(batch.output_dir, PathBuf::from("out"));
        assert_eq!(batch.format, ExportFormat::Python);
        assert_eq!(batch.threads, 4);
        assert_eq!(batch.options.demand_policy, DemandPolicy::Sum);
        assert!(batch.options.strict_references);
        assert_eq!(batch.options.fallback_base_kv, 0.4);
    }
}
