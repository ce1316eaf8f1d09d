//! Raw table -> `Statement`: header mapping, coercion, row drops.

use serde::{Deserialize, Serialize};
use tally_core::{Statement, TransactionRecord};
use tracing::{debug, warn};

use crate::aliases::{CanonicalField, ColumnMap};
use crate::coerce::{coerce_amount, direction_suffix, parse_date, split_signed, Coerced};
use crate::error::{IngestError, Result};
use crate::types::RawTable;

/// What to do with a row whose date cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadDatePolicy {
    #[default]
    Drop,
    Reject,
}

/// What to do with a non-blank amount that cannot be read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadAmountPolicy {
    #[default]
    Zero,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub day_first: bool,
    pub bad_dates: BadDatePolicy,
    pub bad_amounts: BadAmountPolicy,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            day_first: true,
            bad_dates: BadDatePolicy::Drop,
            bad_amounts: BadAmountPolicy::Zero,
        }
    }
}

/// Diagnostic counts from one normalization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub input_rows: usize,
    pub dropped_dates: usize,
    /// Non-blank amounts that could not be read and took the default
    pub defaulted_amounts: usize,
    /// Amounts that needed the second coercion stage
    pub repaired_amounts: usize,
    /// Kept records without a usable balance
    pub missing_balances: usize,
}

impl NormalizeReport {
    pub fn kept_rows(&self) -> usize {
        self.input_rows - self.dropped_dates
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub statement: Statement,
    pub report: NormalizeReport,
}

/// Map headers, coerce every row and build a date-ordered statement.
///
/// Fails only when the date column is missing, the table has no header, or a
/// `Reject` policy trips.
pub fn normalize(table: &RawTable, opts: &NormalizeOptions) -> Result<Normalized> {
    if table.headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::EmptyTable);
    }

    let headers: Vec<String> = table.headers.iter().map(|h| h.trim().to_string()).collect();
    let map = ColumnMap::resolve(&headers);

    let Some(date_col) = map.txn_date else {
        return Err(IngestError::MissingColumn {
            column: CanonicalField::TxnDate.label(),
            found: headers.join(", "),
        });
    };

    debug!(?map, rows = table.rows.len(), "resolved statement columns");

    let extra_headers: Vec<String> = map.extras.iter().map(|&i| headers[i].clone()).collect();
    let mut report = NormalizeReport {
        input_rows: table.rows.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        let row_no = i + 1;
        let cell = |idx: Option<usize>| idx.and_then(|j| row.get(j)).map(|s| s.trim()).unwrap_or("");

        let raw_date = cell(Some(date_col));
        let Some(txn_date) = parse_date(raw_date, opts.day_first) else {
            match opts.bad_dates {
                BadDatePolicy::Drop => {
                    report.dropped_dates += 1;
                    debug!(row = row_no, value = raw_date, "dropping row with unreadable date");
                    continue;
                }
                BadDatePolicy::Reject => {
                    return Err(IngestError::Coercion {
                        row: row_no,
                        column: CanonicalField::TxnDate.label(),
                        value: raw_date.to_string(),
                    });
                }
            }
        };

        let mut amount = |field: CanonicalField, raw: &str| -> Result<Option<f64>> {
            match coerce_amount(raw) {
                Coerced::Strict(v) => Ok(Some(v)),
                Coerced::Repaired(v) => {
                    report.repaired_amounts += 1;
                    Ok(Some(v))
                }
                Coerced::Blank => Ok(None),
                Coerced::Invalid => match opts.bad_amounts {
                    BadAmountPolicy::Zero => {
                        report.defaulted_amounts += 1;
                        warn!(row = row_no, column = field.label(), value = raw, "unreadable amount, using default");
                        Ok(None)
                    }
                    BadAmountPolicy::Reject => Err(IngestError::Coercion {
                        row: row_no,
                        column: field.label(),
                        value: raw.to_string(),
                    }),
                },
            }
        };

        let (debit, credit) = if map.uses_single_amount() {
            let raw = cell(map.amount);
            match amount(CanonicalField::Amount, raw)? {
                Some(v) => split_signed(v, direction_suffix(raw)),
                None => (0.0, 0.0),
            }
        } else {
            let debit = amount(CanonicalField::Debit, cell(map.debit))?.map_or(0.0, f64::abs);
            let credit = amount(CanonicalField::Credit, cell(map.credit))?.map_or(0.0, f64::abs);
            (debit, credit)
        };

        let balance = amount(CanonicalField::Balance, cell(map.balance))?;
        if balance.is_none() {
            report.missing_balances += 1;
        }

        let extras = map
            .extras
            .iter()
            .map(|&j| row.get(j).map(|s| s.trim().to_string()).unwrap_or_default())
            .collect();

        records.push(
            TransactionRecord::new(txn_date, cell(map.description), debit, credit, balance)
                .with_extras(extras),
        );
    }

    if report.dropped_dates > 0 {
        warn!(dropped = report.dropped_dates, "rows without a readable date were dropped");
    }
    debug!(?report, "normalized statement");

    Ok(Normalized {
        statement: Statement::new(extra_headers, records),
        report,
    })
}
