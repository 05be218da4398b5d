//! Reportsync Report Extractor
//!
//! Command line entry point: turns a downloaded vendor report into the
//! identifier list that goes to the spreadsheet.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod cli;
mod pipeline;

use cli::{Cli, Commands};
use reportsync_utils::{init_logging, AppConfig, JsonPreviewWriter, SheetWriter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Detect { path, format } => {
            let format = pipeline::detect(&config, &path, format)
                .with_context(|| format!("Cannot detect format of {}", path.display()))?;
            println!("{}", format);
        }
        Commands::Extract(args) => {
            args.apply(&mut config);
            info!(path = %args.path.display(), "Starting report extraction");

            let mut preview = JsonPreviewWriter::new(std::io::stdout());
            let writer: Option<&mut dyn SheetWriter> = if args.preview {
                Some(&mut preview)
            } else {
                None
            };

            let report = pipeline::run(&config, &args.path, writer)
                .with_context(|| format!("Extraction failed for {}", args.path.display()))?;

            if let Some(files) = &report.backup {
                eprintln!("Backup: {}, {}", files.records.display(), files.identifiers.display());
            }
            eprintln!(
                "Extracted {} identifiers from {} ({})",
                report.result.count(),
                args.path.display(),
                report.result.format
            );
            if !args.preview {
                for id in report.result.outcome.iter() {
                    println!("{}", id);
                }
            }
        }
    }

    Ok(())
}
