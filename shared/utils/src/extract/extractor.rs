//! Identifier Extractor
//!
//! Detects the report format, runs the matching reader and normalizes the
//! result into one `ExtractionResult`.

use std::path::Path;
use tracing::{error, info, instrument, warn};

use reportsync_models::{ExtractionOutcome, ExtractionResult, SourceFormat};

use super::delimited::read_delimited;
use super::format::detect_format;
use super::ods::OdsReader;
use super::selector::ColumnSelector;
use super::spreadsheet::read_spreadsheet;
use super::table::Table;
use crate::config::{ExtractionConfig, OdsStrategy};
use crate::error::{ExtractionError, ExtractionOutput};

/// Multi-format identifier extractor
pub struct IdentifierExtractor {
    config: ExtractionConfig,
    selector: ColumnSelector,
    ods: OdsReader,
}

impl Default for IdentifierExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl IdentifierExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        let selector = ColumnSelector::new(&config.keyword_priority_list, &config.separator_priority_list)
            .with_product_ids(config.expand_product_ids);
        let ods = OdsReader::new(&config.separator_priority_list).with_product_ids(config.expand_product_ids);

        Self {
            config,
            selector,
            ods,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Format this extractor would use for `path`
    pub fn detect(&self, path: &Path) -> ExtractionOutput<SourceFormat> {
        detect_format(path, self.config.source_format_hint)
    }

    /// Extract identifiers from a report file
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn extract(&self, path: &Path) -> ExtractionOutput<ExtractionResult> {
        let format = self.detect(path).map_err(|e| {
            error!(error = %e, "Format detection failed");
            e
        })?;

        let result = self.read(path, format).map_err(|e| {
            error!(format = %format, code = e.error_code(), error = %e, "Extraction failed");
            e
        })?;

        info!(
            format = %format,
            count = result.count(),
            heuristic = result.outcome.is_heuristic(),
            "Extracted identifiers"
        );
        Ok(result)
    }

    fn read(&self, path: &Path, format: SourceFormat) -> ExtractionOutput<ExtractionResult> {
        let result = match format {
            SourceFormat::Csv | SourceFormat::Txt => self.from_table(path, format, read_delimited(path)?)?,
            SourceFormat::Xls | SourceFormat::Xlsx => self.from_table(path, format, read_spreadsheet(path)?)?,
            SourceFormat::Ods => match self.config.ods_strategy {
                OdsStrategy::Structured => self.from_ods(path)?,
                OdsStrategy::Columns => self.from_table(path, format, read_spreadsheet(path)?)?,
            },
        };

        if result.outcome.is_empty() {
            return Err(ExtractionError::empty(path));
        }
        Ok(result)
    }

    fn from_table(&self, path: &Path, format: SourceFormat, table: Table) -> ExtractionOutput<ExtractionResult> {
        if table.is_empty() {
            return Err(ExtractionError::empty(path));
        }

        let selection = self
            .selector
            .extract(&table)
            .ok_or_else(|| ExtractionError::empty(path))?;

        let mut result = ExtractionResult::new(path, format, ExtractionOutcome::Structured(selection.identifiers));
        if selection.column.fallback {
            result.warnings.push(format!(
                "No column matched {:?}; used first column '{}'",
                self.config.keyword_priority_list, selection.column.name
            ));
        }
        result.selected_column = Some(selection.column.name);
        result.records = selection.records;
        Ok(result)
    }

    fn from_ods(&self, path: &Path) -> ExtractionOutput<ExtractionResult> {
        let ods = self.ods.read(path)?;

        let mut result = ExtractionResult::new(path, SourceFormat::Ods, ods.outcome);
        result.records = ods.records;
        if let Some(reason) = ods.fallback_reason {
            warn!(reason = %reason, "Using heuristic ODS identifiers; order is not preserved");
            result
                .warnings
                .push(format!("Structured ODS parse failed ({}); used regex scan", reason));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn csv_file(content: &[u8]) -> NamedTempFile {
        let mut tmp = Builder::new().suffix(".csv").tempfile().unwrap();
        tmp.write_all(content).unwrap();
        tmp
    }

    fn strings(result: &ExtractionResult) -> Vec<String> {
        result.identifier_strings()
    }

    #[test]
    fn test_csv_split_and_skip_blank() {
        let tmp = csv_file(b"sku\nA-1\n\"A-2,A-3\"\n\"\"\n");
        let result = IdentifierExtractor::default().extract(tmp.path()).unwrap();

        assert_eq!(strings(&result), vec!["A-1", "A-2", "A-3"]);
        assert_eq!(result.count(), 3);
        assert_eq!(result.format, SourceFormat::Csv);
        assert_eq!(result.selected_column.as_deref(), Some("sku"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_header_only_csv_is_empty_result() {
        let tmp = csv_file(b"sku;name\n");
        let err = IdentifierExtractor::default().extract(tmp.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyResult { .. }));
    }

    #[test]
    fn test_blank_column_is_empty_result() {
        let tmp = csv_file(b"sku;name\n;a\n  ;b\n");
        let err = IdentifierExtractor::default().extract(tmp.path()).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_RESULT");
    }

    #[test]
    fn test_pdf_rejected_without_reading() {
        let err = IdentifierExtractor::default()
            .extract(Path::new("/does/not/exist/report.pdf"))
            .unwrap_err();
        assert_eq!(err, ExtractionError::unsupported_format("pdf"));
    }

    #[test]
    fn test_first_column_fallback_records_warning() {
        let tmp = csv_file(b"Nazwa;Ilosc\nP-100;2\nP-200;1\n");
        let result = IdentifierExtractor::default().extract(tmp.path()).unwrap();

        assert_eq!(strings(&result), vec!["P-100", "P-200"]);
        assert_eq!(result.selected_column.as_deref(), Some("Nazwa"));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_format_hint_overrides_extension() {
        let mut tmp = Builder::new().suffix(".dat").tempfile().unwrap();
        tmp.write_all(b"kod\nX-1\n").unwrap();

        let config = ExtractionConfig {
            source_format_hint: Some(SourceFormat::Txt),
            ..ExtractionConfig::default()
        };
        let result = IdentifierExtractor::new(config).extract(tmp.path()).unwrap();
        assert_eq!(result.format, SourceFormat::Txt);
        assert_eq!(strings(&result), vec!["X-1"]);
    }
}
