use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use reportsync_models::{SheetLayout, SourceFormat, DEFAULT_LABEL};
use reportsync_utils::{AppConfig, OdsStrategy};

#[derive(Debug, Parser)]
#[command(name = "reportsync")]
#[command(about = "Extract product identifiers from vendor report exports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract identifiers from a downloaded report
    Extract(ExtractArgs),
    /// Print the format the extractor would use for a file
    Detect {
        path: PathBuf,
        /// Force a format instead of using the file extension
        #[arg(long, value_parser = parse_format)]
        format: Option<SourceFormat>,
    },
}

#[derive(Debug, clap::Args)]
pub struct ExtractArgs {
    pub path: PathBuf,

    /// Force a format instead of using the file extension
    #[arg(long, value_parser = parse_format)]
    pub format: Option<SourceFormat>,

    #[arg(long, value_enum)]
    pub ods_strategy: Option<OdsStrategyArg>,

    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Label written next to every id in the with-label layout
    #[arg(long, env = "REPORTSYNC_LABEL")]
    pub label: Option<String>,

    /// Also emit the bare product id of composite product-variant codes
    #[arg(long)]
    pub expand_product_ids: bool,

    #[arg(long)]
    pub no_backup: bool,

    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// Print the sheet payload as JSON
    #[arg(long)]
    pub preview: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OdsStrategyArg {
    Structured,
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    IdOnly,
    WithLabel,
}

fn parse_format(value: &str) -> Result<SourceFormat, String> {
    SourceFormat::from_extension(value.trim_start_matches('.'))
        .ok_or_else(|| format!("unsupported format '{}' (expected csv, txt, xls, xlsx or ods)", value))
}

impl ExtractArgs {
    /// Layer command line flags over the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(format) = self.format {
            config.extraction.source_format_hint = Some(format);
        }
        if let Some(strategy) = self.ods_strategy {
            config.extraction.ods_strategy = match strategy {
                OdsStrategyArg::Structured => OdsStrategy::Structured,
                OdsStrategyArg::Columns => OdsStrategy::Columns,
            };
        }
        if self.expand_product_ids {
            config.extraction.expand_product_ids = true;
        }

        match self.layout {
            Some(LayoutArg::IdOnly) => config.sheet.layout = SheetLayout::IdOnly,
            Some(LayoutArg::WithLabel) => {
                let current = match &config.sheet.layout {
                    SheetLayout::IdWithLabel { label } => Some(label.clone()),
                    SheetLayout::IdOnly => None,
                };
                let label = self
                    .label
                    .clone()
                    .or(current)
                    .unwrap_or_else(|| DEFAULT_LABEL.to_string());
                config.sheet.layout = SheetLayout::IdWithLabel { label };
            }
            None => {
                if let (Some(new_label), SheetLayout::IdWithLabel { label }) =
                    (&self.label, &mut config.sheet.layout)
                {
                    *label = new_label.clone();
                }
            }
        }

        if self.no_backup {
            config.backup.enabled = false;
        }
        if let Some(dir) = &self.backup_dir {
            config.backup.output_dir = dir.clone();
        }
    }
}
