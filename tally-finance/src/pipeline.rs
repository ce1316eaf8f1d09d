//! One upload in, one dashboard out.
//!
//! `process_upload` runs the full pipeline from scratch; nothing is shared
//! between calls.

use serde::Serialize;
use tally_core::Statement;
use tally_ingest::{
    normalize, read_csv_table, read_pdf_table, IngestError, NormalizeOptions, NormalizeReport,
    PdfOptions, SourceKind,
};
use tracing::{debug, info};

use crate::aggregate::{self, DailyFlow, MonthlyFlow, RunningPoint, Summary};

/// The raw upload: bytes plus what the user told us about them
#[derive(Debug, Clone)]
pub struct Upload<'a> {
    pub kind: SourceKind,
    pub bytes: &'a [u8],
    pub password: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub normalize: NormalizeOptions,
    pub pdf: PdfOptions,
}

/// Everything the presentation layer consumes
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub statement: Statement,
    pub report: NormalizeReport,
    pub summary: Summary,
    pub daily: Vec<DailyFlow>,
    pub monthly: Vec<MonthlyFlow>,
    pub running: Vec<RunningPoint>,
}

impl Dashboard {
    pub fn from_statement(statement: Statement, report: NormalizeReport) -> Self {
        Self {
            summary: aggregate::summarize(&statement),
            daily: aggregate::daily(&statement),
            monthly: aggregate::monthly(&statement),
            running: aggregate::running_total(&statement),
            statement,
            report,
        }
    }
}

pub fn process_upload(upload: &Upload<'_>, opts: &PipelineOptions) -> Result<Dashboard, IngestError> {
    let table = match upload.kind {
        SourceKind::Csv => read_csv_table(upload.bytes)?,
        SourceKind::Pdf => read_pdf_table(upload.bytes, upload.password, &opts.pdf)?,
    };
    debug!(kind = ?upload.kind, headers = ?table.headers, rows = table.rows.len(), "extracted table");

    let normalized = normalize(&table, &opts.normalize)?;
    info!(
        records = normalized.statement.len(),
        dropped = normalized.report.dropped_dates,
        "statement normalized"
    );

    Ok(Dashboard::from_statement(normalized.statement, normalized.report))
}
