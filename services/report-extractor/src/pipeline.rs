//! Extraction run: extract, back up, hand off to the sheet writer.

use std::path::Path;
use tracing::{info, warn};

use reportsync_models::{ExtractionResult, SourceFormat};
use reportsync_utils::{
    detect_format, upload, validate_config, AppConfig, BackupFiles, BackupWriter, IdentifierExtractor,
    PipelineResult, SheetWriter, WriteSummary,
};

/// Everything one run produced
#[derive(Debug)]
pub struct RunReport {
    pub result: ExtractionResult,
    pub backup: Option<BackupFiles>,
    pub upload: Option<WriteSummary>,
}

/// Format `extract` would use for `path`; a flag beats the configured hint
pub fn detect(config: &AppConfig, path: &Path, format: Option<SourceFormat>) -> PipelineResult<SourceFormat> {
    Ok(detect_format(path, format.or(config.extraction.source_format_hint))?)
}

pub fn run(config: &AppConfig, path: &Path, writer: Option<&mut dyn SheetWriter>) -> PipelineResult<RunReport> {
    validate_config(config)?;

    let extractor = IdentifierExtractor::new(config.extraction.clone());
    let result = extractor.extract(path)?;

    for warning in &result.warnings {
        warn!("{}", warning);
    }

    // Backup is diagnostic; a failed write never aborts the run
    let backup = if config.backup.enabled {
        match BackupWriter::new(&config.backup.output_dir, config.sheet.layout.clone()).write(&result) {
            Ok(files) => Some(files),
            Err(e) => {
                warn!(error = %e, "Backup write failed");
                None
            }
        }
    } else {
        None
    };

    let summary = match writer {
        Some(writer) => Some(upload(&result, &config.sheet, writer)?),
        None => None,
    };

    info!(
        run_id = %result.run_id,
        count = result.count(),
        "Run finished"
    );

    Ok(RunReport {
        result,
        backup,
        upload: summary,
    })
}
