use std::process::ExitCode;

use clap::Parser;
use cimppc_cli::{Cli, Commands};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
    }

    match &cli.command {
        Commands::Convert(args) => match commands::convert::handle(args) {
            Ok(summary) if summary.failure == 0 => {
                info!("Conversion successful!");
                ExitCode::SUCCESS
            }
            Ok(summary) => {
                error!("{} document(s) failed to convert", summary.failure);
                ExitCode::FAILURE
            }
            Err(e) => {
                error!("Conversion failed: {:?}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Inspect {
            input,
            json,
            conversion,
        } => match commands::inspect::handle(input, *json, conversion) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Inspect failed: {:?}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Completions { shell, out } => {
            match commands::completions::handle(*shell, out.as_deref()) {
                Ok(()) => {
                    info!("Completions generated");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("Completions generation failed: {:?}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
