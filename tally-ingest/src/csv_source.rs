//! CSV statement intake.
//!
//! Bank exports often carry a few preamble lines (account holder, period)
//! before the header. The first record containing a date-column alias is
//! taken as the header; without one, the first non-empty record is.

use tracing::debug;

use crate::aliases::{lookup, CanonicalField};
use crate::error::Result;
use crate::types::RawTable;

/// Read CSV bytes into a raw table. Ragged rows are kept as-is.
pub fn read_csv_table(bytes: &[u8]) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(bytes);

    let mut records: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        records.push(record.iter().map(|s| s.to_string()).collect());
    }

    let is_header = |r: &Vec<String>| r.iter().any(|c| lookup(c) == Some(CanonicalField::TxnDate));
    let is_empty = |r: &Vec<String>| r.iter().all(|c| c.trim().is_empty());

    let header_idx = records
        .iter()
        .position(is_header)
        .or_else(|| records.iter().position(|r| !is_empty(r)));

    let Some(header_idx) = header_idx else {
        return Ok(RawTable::default());
    };

    if header_idx > 0 {
        debug!(skipped = header_idx, "skipped preamble lines before CSV header");
    }

    let mut rows = records.split_off(header_idx);
    let mut headers = rows.remove(0);
    if let Some(first) = headers.first_mut() {
        *first = first.trim_start_matches('\u{feff}').to_string();
    }

    Ok(RawTable::new(headers, rows))
}
