//! PDF statement table extraction

pub mod extract;
pub mod layout;

pub use extract::{extract_pages, fragments_from_ops};
pub use layout::{assemble_table, group_rows, TextFragment};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::types::RawTable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    /// The header is the first row with at least this many cells
    pub min_columns: usize,
    /// Max baseline distance for fragments to share a row
    pub row_tolerance: f32,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            min_columns: 5,
            row_tolerance: 2.0,
        }
    }
}

/// Extract the statement table from PDF bytes; the first wide row is the header.
pub fn read_pdf_table(bytes: &[u8], password: Option<&str>, opts: &PdfOptions) -> Result<RawTable> {
    let pages: Vec<_> = extract_pages(bytes, password)?
        .iter()
        .map(|frags| group_rows(frags, opts.row_tolerance))
        .collect();

    let table = assemble_table(&pages, opts.min_columns);
    if table.headers.is_empty() {
        return Err(IngestError::EmptyTable);
    }
    debug!(pages = pages.len(), rows = table.rows.len(), "assembled PDF table");
    Ok(table)
}
