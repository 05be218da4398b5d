use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Terminal failures of the extraction stage
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionError {
    #[error("Unsupported format: '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("Unreadable file {path}: {message}")]
    UnreadableFile { path: String, message: String },

    #[error("No identifiers found in {path}")]
    EmptyResult { path: String },
}

impl ExtractionError {
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn unreadable(path: &Path, message: impl ToString) -> Self {
        Self::UnreadableFile {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn empty(path: &Path) -> Self {
        Self::EmptyResult {
            path: path.display().to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::UnreadableFile { .. } => "UNREADABLE_FILE",
            Self::EmptyResult { .. } => "EMPTY_RESULT",
        }
    }
}

pub type ExtractionOutput<T> = Result<T, ExtractionError>;

/// Pipeline failures, categorized by the stage that raised them
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Upload error: {message}")]
    Upload { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "extraction",
            Self::Upload { .. } => "upload",
            Self::Configuration { .. } => "configuration",
            Self::Io(_) => "io",
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Extraction(e) => e.error_code(),
            Self::Upload { .. } => "UPLOAD_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl From<config::ConfigError> for PipelineError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(error: serde_json::Error) -> Self {
        Self::upload(error.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(error: csv::Error) -> Self {
        Self::Io(error.into())
    }
}
