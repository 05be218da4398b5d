//! Spreadsheet writer seam.
//!
//! Authenticated API writers live outside this workspace; they implement
//! `SheetWriter`. The JSON preview writer prints what would be sent.

use reportsync_models::{ExtractionResult, SheetPayload};
use serde::Serialize;
use std::io::Write;
use tracing::info;

use crate::config::SheetConfig;
use crate::error::{PipelineError, PipelineResult};

/// What a writer reports back after a write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub updated_range: String,
    pub updated_rows: usize,
    pub updated_cells: usize,
}

pub trait SheetWriter {
    fn write(&mut self, payload: &SheetPayload) -> PipelineResult<WriteSummary>;
}

/// Build the payload for `result` and hand it to `writer`
pub fn upload<W: SheetWriter + ?Sized>(
    result: &ExtractionResult,
    config: &SheetConfig,
    writer: &mut W,
) -> PipelineResult<WriteSummary> {
    if result.count() == 0 {
        return Err(PipelineError::upload("Refusing to write an empty identifier list"));
    }

    let payload = SheetPayload::build(
        result.outcome.iter(),
        &config.layout,
        config.range.clone(),
        config.write_mode,
    );
    let summary = writer.write(&payload)?;

    info!(
        range = %summary.updated_range,
        rows = summary.updated_rows,
        cells = summary.updated_cells,
        "Sheet updated"
    );
    Ok(summary)
}

/// Writes the payload as pretty JSON instead of calling a sheet API
pub struct JsonPreviewWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonPreviewWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SheetWriter for JsonPreviewWriter<W> {
    fn write(&mut self, payload: &SheetPayload) -> PipelineResult<WriteSummary> {
        serde_json::to_writer_pretty(&mut self.out, payload)?;
        writeln!(self.out)?;

        Ok(WriteSummary {
            updated_range: payload.range.clone(),
            updated_rows: payload.values.len(),
            updated_cells: payload.cell_count(),
        })
    }
}
