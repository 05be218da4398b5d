use config::{Config, ConfigError, Environment, File};
use reportsync_models::{SheetLayout, SourceFormat, WriteMode, DEFAULT_RANGE};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate]
    pub extraction: ExtractionConfig,
    #[validate]
    pub sheet: SheetConfig,
    pub backup: BackupConfig,
    pub logging: LoggingConfig,
}

/// How ODS reports are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OdsStrategy {
    /// Archive + XML paragraph walk, regex scan on failure
    #[default]
    Structured,
    /// Spreadsheet reader + column selector
    Columns,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Overrides extension-based format detection
    pub source_format_hint: Option<SourceFormat>,
    #[validate(length(min = 1, message = "At least one column keyword is required"))]
    pub keyword_priority_list: Vec<String>,
    #[validate(length(min = 1, message = "At least one separator is required"))]
    pub separator_priority_list: Vec<char>,
    pub ods_strategy: OdsStrategy,
    /// Also emit the bare product id after each composite `product-variant` code
    pub expand_product_ids: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SheetConfig {
    pub spreadsheet_id: Option<String>,
    #[validate(length(min = 1, message = "Sheet range must not be empty"))]
    pub range: String,
    pub layout: SheetLayout,
    pub write_mode: WriteMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    pub enabled: bool,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Local overrides (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("REPORTSYNC").separator("__"));

        config.build()?.try_deserialize()
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            source_format_hint: None,
            keyword_priority_list: ["iai", "kod", "code", "id", "sku", "ean"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            // newline > comma > semicolon
            separator_priority_list: vec!['\n', ',', ';'],
            ods_strategy: OdsStrategy::Structured,
            expand_product_ids: false,
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            range: DEFAULT_RANGE.to_string(),
            layout: SheetLayout::default(),
            write_mode: WriteMode::Overwrite,
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}
