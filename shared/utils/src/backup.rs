//! CSV backup of an extraction run.
//!
//! Diagnostic only: nothing downstream reads these files.

use chrono::{DateTime, Local};
use reportsync_models::{ExtractionResult, SheetLayout, SheetPayload, WriteMode};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineResult;

/// Paths written by one backup
#[derive(Debug, Clone)]
pub struct BackupFiles {
    pub records: PathBuf,
    pub identifiers: PathBuf,
}

pub struct BackupWriter {
    output_dir: PathBuf,
    layout: SheetLayout,
}

impl BackupWriter {
    pub fn new(output_dir: impl Into<PathBuf>, layout: SheetLayout) -> Self {
        Self {
            output_dir: output_dir.into(),
            layout,
        }
    }

    pub fn write(&self, result: &ExtractionResult) -> PipelineResult<BackupFiles> {
        self.write_at(result, Local::now())
    }

    /// Write both snapshot files stamped with `at`
    pub fn write_at(&self, result: &ExtractionResult, at: DateTime<Local>) -> PipelineResult<BackupFiles> {
        fs::create_dir_all(&self.output_dir)?;
        let timestamp = at.format("%Y%m%d_%H%M%S");

        let records = self.output_dir.join(format!("products_full_{}.csv", timestamp));
        write_records(&records, result)?;

        let identifiers = self.output_dir.join(format!("products_ids_{}.csv", timestamp));
        let payload = SheetPayload::build(result.outcome.iter(), &self.layout, "", WriteMode::Overwrite);
        let mut writer = csv::Writer::from_path(&identifiers)?;
        for row in &payload.values {
            writer.write_record(row)?;
        }
        writer.flush()?;

        tracing::info!(
            records = %records.display(),
            identifiers = %identifiers.display(),
            "Backup written"
        );
        Ok(BackupFiles { records, identifiers })
    }
}

fn write_records(path: &Path, result: &ExtractionResult) -> PipelineResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["row", "column", "column_name", "text"])?;
    for record in &result.records {
        writer.write_record([
            record.position.row.to_string(),
            record.position.column.to_string(),
            record.column_name.clone().unwrap_or_default(),
            record.text.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reportsync_models::{ExtractionOutcome, Identifier, RawRecord, SourceFormat};

    #[test]
    fn test_backup_files() {
        let dir = tempfile::tempdir().unwrap();
        let ids = vec![Identifier::parse("A-2").unwrap(), Identifier::parse("A-3").unwrap()];
        let mut result = ExtractionResult::new("r.csv", SourceFormat::Csv, ExtractionOutcome::Structured(ids));
        result.records = vec![RawRecord::new("A-2,A-3", 1, 0).with_column_name("sku")];

        let at = Local.with_ymd_and_hms(2026, 10, 19, 8, 30, 5).unwrap();
        let files = BackupWriter::new(dir.path().join("output"), SheetLayout::default())
            .write_at(&result, at)
            .unwrap();

        assert!(files.records.ends_with("products_full_20261019_083005.csv"));
        assert!(files.identifiers.ends_with("products_ids_20261019_083005.csv"));

        let records = fs::read_to_string(&files.records).unwrap();
        assert_eq!(records, "row,column,column_name,text\n1,0,sku,\"A-2,A-3\"\n");

        let ids = fs::read_to_string(&files.identifiers).unwrap();
        assert_eq!(ids, "id,custom_label_2\nA-2,wyp\nA-3,wyp\n");
    }
}
