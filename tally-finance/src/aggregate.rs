//! Summary metrics and grouped cash-flow tables.
//!
//! Every function here is a pure reduction over a date-ordered `Statement`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_core::Statement;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub record_count: usize,
    pub total_debit: f64,
    pub total_credit: f64,
    /// total_credit - total_debit
    pub net: f64,
    /// Balance printed on the chronologically last record
    pub closing_balance: Option<f64>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub debit: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFlow {
    /// "YYYY-MM"
    pub month_year: String,
    pub debit: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningPoint {
    pub date: NaiveDate,
    pub cumulative: f64,
}

pub fn summarize(statement: &Statement) -> Summary {
    let total_debit: f64 = statement.records.iter().map(|r| r.debit).sum();
    let total_credit: f64 = statement.records.iter().map(|r| r.credit).sum();

    Summary {
        record_count: statement.len(),
        total_debit,
        total_credit,
        net: total_credit - total_debit,
        closing_balance: statement.records.last().and_then(|r| r.balance),
        first_date: statement.first_date(),
        last_date: statement.last_date(),
    }
}

/// Debit/credit sums per transaction date, ascending
pub fn daily(statement: &Statement) -> Vec<DailyFlow> {
    let mut by_day: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for r in &statement.records {
        let entry = by_day.entry(r.txn_date).or_insert((0.0, 0.0));
        entry.0 += r.debit;
        entry.1 += r.credit;
    }

    by_day
        .into_iter()
        .map(|(date, (debit, credit))| DailyFlow { date, debit, credit })
        .collect()
}

/// Debit/credit sums per calendar month, ascending
pub fn monthly(statement: &Statement) -> Vec<MonthlyFlow> {
    let mut by_month: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for r in &statement.records {
        let entry = by_month.entry(r.month_year()).or_insert((0.0, 0.0));
        entry.0 += r.debit;
        entry.1 += r.credit;
    }

    by_month
        .into_iter()
        .map(|(month_year, (debit, credit))| MonthlyFlow {
            month_year,
            debit,
            credit,
        })
        .collect()
}

/// Cumulative net amount per record, in date order
pub fn running_total(statement: &Statement) -> Vec<RunningPoint> {
    statement
        .records
        .iter()
        .map(|r| RunningPoint {
            date: r.txn_date,
            cumulative: r.cumulative,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::TransactionRecord;

    fn rec(m: u32, d: u32, debit: f64, credit: f64, balance: Option<f64>) -> TransactionRecord {
        TransactionRecord::new(NaiveDate::from_ymd_opt(2024, m, d).unwrap(), "t", debit, credit, balance)
    }

    fn sample() -> Statement {
        Statement::new(
            vec![],
            vec![
                rec(1, 1, 0.0, 1000.0, Some(1000.0)),
                rec(1, 1, 200.0, 0.0, Some(800.0)),
                rec(1, 15, 50.0, 0.0, Some(750.0)),
                rec(2, 3, 0.0, 500.0, Some(1250.0)),
                rec(2, 10, 125.5, 0.0, None),
            ],
        )
    }

    #[test]
    fn test_summary_totals() {
        let s = summarize(&sample());
        assert_eq!(s.record_count, 5);
        assert_eq!(s.total_debit, 375.5);
        assert_eq!(s.total_credit, 1500.0);
        assert_eq!(s.net, 1124.5);
        assert_eq!(s.closing_balance, None);
        assert_eq!(s.first_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_closing_balance_is_last_record() {
        let st = Statement::new(vec![], vec![rec(3, 2, 1.0, 0.0, Some(99.0)), rec(3, 1, 0.0, 100.0, Some(100.0))]);
        assert_eq!(summarize(&st).closing_balance, Some(99.0));
    }

    #[test]
    fn test_daily_sums_match_total() {
        let st = sample();
        let days = daily(&st);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].debit, 200.0);
        assert_eq!(days[0].credit, 1000.0);
        let sum: f64 = days.iter().map(|d| d.debit).sum();
        assert_eq!(sum, summarize(&st).total_debit);
    }

    #[test]
    fn test_monthly_groups() {
        let months = monthly(&sample());
        assert_eq!(
            months,
            vec![
                MonthlyFlow { month_year: "2024-01".into(), debit: 250.0, credit: 1000.0 },
                MonthlyFlow { month_year: "2024-02".into(), debit: 125.5, credit: 500.0 },
            ]
        );
    }

    #[test]
    fn test_running_total_ends_at_net() {
        let st = sample();
        let run = running_total(&st);
        assert_eq!(run.len(), 5);
        assert!(run.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(run.last().unwrap().cumulative, summarize(&st).net);
    }

    #[test]
    fn test_empty_statement() {
        let st = Statement::default();
        let s = summarize(&st);
        assert_eq!(s.record_count, 0);
        assert_eq!(s.total_debit, 0.0);
        assert_eq!(s.closing_balance, None);
        assert!(daily(&st).is_empty());
        assert!(running_total(&st).is_empty());
    }
}
