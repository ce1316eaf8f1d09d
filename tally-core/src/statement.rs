//! A date-ordered set of records produced from one upload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::TransactionRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Statement {
    /// Headers of pass-through input columns, in input order
    pub extra_headers: Vec<String>,
    /// Records sorted by `txn_date` ascending
    pub records: Vec<TransactionRecord>,
}

impl Statement {
    /// Sort records by date and fill the cumulative net column.
    ///
    /// The sort is stable: rows sharing a date keep their input order.
    pub fn new(extra_headers: Vec<String>, mut records: Vec<TransactionRecord>) -> Self {
        records.sort_by_key(|r| r.txn_date);

        let mut running = 0.0;
        for r in records.iter_mut() {
            running += r.net_amount();
            r.cumulative = running;
        }

        Self {
            extra_headers,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep the rows matching `pred`, preserving order and cumulative values.
    pub fn retain_matching(&self, pred: impl Fn(&TransactionRecord) -> bool) -> Statement {
        Statement {
            extra_headers: self.extra_headers.clone(),
            records: self.records.iter().filter(|r| pred(r)).cloned().collect(),
        }
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.txn_date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.txn_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(d: u32, desc: &str, debit: f64, credit: f64) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            desc,
            debit,
            credit,
            None,
        )
    }

    #[test]
    fn test_sorts_and_accumulates() {
        let st = Statement::new(
            vec![],
            vec![rec(5, "c", 30.0, 0.0), rec(1, "a", 0.0, 100.0), rec(3, "b", 20.0, 0.0)],
        );
        let descs: Vec<_> = st.records.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descs, ["a", "b", "c"]);
        let cum: Vec<_> = st.records.iter().map(|r| r.cumulative).collect();
        assert_eq!(cum, [100.0, 80.0, 50.0]);
    }

    #[test]
    fn test_same_day_rows_keep_input_order() {
        let st = Statement::new(
            vec![],
            vec![rec(2, "first", 1.0, 0.0), rec(1, "early", 1.0, 0.0), rec(2, "second", 1.0, 0.0)],
        );
        let descs: Vec<_> = st.records.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descs, ["early", "first", "second"]);
    }

    #[test]
    fn test_retain_keeps_cumulative() {
        let st = Statement::new(vec![], vec![rec(1, "a", 0.0, 10.0), rec(2, "b", 0.0, 5.0)]);
        let only_b = st.retain_matching(|r| r.description == "b");
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b.records[0].cumulative, 15.0);
    }
}
