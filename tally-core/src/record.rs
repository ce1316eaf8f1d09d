//! Transaction record types shared by ingest, aggregation and presentation

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Direction of a record, derived from its debit column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxnType {
    #[serde(rename = "Debit")]
    Debit,
    #[serde(rename = "Credit")]
    Credit,
}

impl TxnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Debit => "Debit",
            TxnType::Credit => "Credit",
        }
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized statement row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Transaction date (never null; rows without one are dropped upstream)
    pub txn_date: NaiveDate,
    /// Free-text narration, empty when the statement has no such column
    pub description: String,
    /// Outgoing magnitude, >= 0
    pub debit: f64,
    /// Incoming magnitude, >= 0
    pub credit: f64,
    /// Running balance as printed on the statement
    pub balance: Option<f64>,
    /// Values of non-canonical input columns, aligned with `Statement::extra_headers`
    #[serde(default)]
    pub extras: Vec<String>,
    /// Prefix sum of net amount in date order; filled by `Statement::new`
    #[serde(default)]
    pub cumulative: f64,
}

impl TransactionRecord {
    pub fn new(
        txn_date: NaiveDate,
        description: impl Into<String>,
        debit: f64,
        credit: f64,
        balance: Option<f64>,
    ) -> Self {
        Self {
            txn_date,
            description: description.into(),
            debit,
            credit,
            balance,
            extras: Vec::new(),
            cumulative: 0.0,
        }
    }

    pub fn with_extras(mut self, extras: Vec<String>) -> Self {
        self.extras = extras;
        self
    }

    /// `Credit` when nothing was debited, else `Debit`
    pub fn txn_type(&self) -> TxnType {
        if self.debit == 0.0 {
            TxnType::Credit
        } else {
            TxnType::Debit
        }
    }

    /// Credit minus debit
    pub fn net_amount(&self) -> f64 {
        self.credit - self.debit
    }

    /// Full English month name, e.g. "January"
    pub fn month_name(&self) -> &'static str {
        match self.txn_date.month() {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            _ => "December",
        }
    }

    pub fn year(&self) -> i32 {
        self.txn_date.year()
    }

    /// Calendar month key, "YYYY-MM"
    pub fn month_year(&self) -> String {
        format!("{:04}-{:02}", self.txn_date.year(), self.txn_date.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_credit_only_record() {
        let r = TransactionRecord::new(date(2024, 3, 1), "SALARY", 0.0, 500.0, Some(1500.0));
        assert_eq!(r.txn_type(), TxnType::Credit);
        assert_eq!(r.net_amount(), 500.0);
    }

    #[test]
    fn test_debit_record() {
        let r = TransactionRecord::new(date(2024, 3, 2), "UPI/GROCER", 250.75, 0.0, None);
        assert_eq!(r.txn_type(), TxnType::Debit);
        assert_eq!(r.net_amount(), -250.75);
    }

    #[test]
    fn test_zero_row_counts_as_credit() {
        let r = TransactionRecord::new(date(2024, 3, 2), "", 0.0, 0.0, None);
        assert_eq!(r.txn_type(), TxnType::Credit);
    }

    #[test]
    fn test_month_fields() {
        let r = TransactionRecord::new(date(2023, 11, 30), "x", 1.0, 0.0, None);
        assert_eq!(r.month_name(), "November");
        assert_eq!(r.year(), 2023);
        assert_eq!(r.month_year(), "2023-11");
    }

    #[test]
    fn test_type_serializes_as_label() {
        let json = serde_json::to_string(&TxnType::Credit).unwrap();
        assert_eq!(json, "\"Credit\"");
    }
}
