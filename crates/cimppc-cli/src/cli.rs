use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use cimppc_io::{ConvertOptions, DemandPolicy, ExportFormat};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cimppc", author, version, about = "Convert CIM RDF/XML grids to PYPOWER cases", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert CIM documents to PPC cases, one output file per input
    Convert(ConvertArgs),
    /// Convert one document in memory and report what came out
    Inspect {
        /// CIM RDF/XML document
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Also print the converted case as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        conversion: ConversionFlags,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ConvertArgs {
    /// Input documents (defaults to data/1.xml data/2.xml data/3.xml)
    #[arg(value_hint = ValueHint::FilePath)]
    pub inputs: Vec<PathBuf>,

    /// Directory receiving ppc_<n> files and the batch manifest
    #[arg(short = 'o', long = "out-dir", value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<ConvertFormat>,

    /// Worker threads (0 = all CPUs)
    #[arg(long)]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub conversion: ConversionFlags,
}

/// Flags shared by every command that converts a document.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ConversionFlags {
    /// TOML configuration file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// How repeated loads on one bus combine
    #[arg(long, value_enum)]
    pub demand_policy: Option<DemandPolicyArg>,

    /// Fail on unresolved references instead of defaulting
    #[arg(long)]
    pub strict: bool,

    /// Base voltage (kV) for unresolved references
    #[arg(long = "fallback-kv")]
    pub fallback_kv: Option<f64>,
}

impl ConversionFlags {
    /// Override `options` with whatever was given on the command line.
    pub fn apply(&self, options: &mut ConvertOptions) {
        if let Some(policy) = self.demand_policy {
            options.demand_policy = policy.into();
        }
        if self.strict {
            options.strict_references = true;
        }
        if let Some(kv) = self.fallback_kv {
            options.fallback_base_kv = kv;
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConvertFormat {
    Json,
    Python,
    Matpower,
}

impl From<ConvertFormat> for ExportFormat {
    fn from(value: ConvertFormat) -> Self {
        match value {
            ConvertFormat::Json => ExportFormat::Json,
            ConvertFormat::Python => ExportFormat::Python,
            ConvertFormat::Matpower => ExportFormat::Matpower,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DemandPolicyArg {
    Overwrite,
    Sum,
}

impl From<DemandPolicyArg> for DemandPolicy {
    fn from(value: DemandPolicyArg) -> Self {
        match value {
            DemandPolicyArg::Overwrite => DemandPolicy::Overwrite,
            DemandPolicyArg::Sum => DemandPolicy::Sum,
        }
    }
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
