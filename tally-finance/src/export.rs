//! CSV re-serialization of a (possibly filtered) statement.
//!
//! Column order: canonical fields, pass-through input columns, derived fields.

use anyhow::{Context, Result};
use std::io::Write;
use tally_core::Statement;

const CANONICAL: &[&str] = &["Txn Date", "Description", "Debit", "Credit", "Balance"];
const DERIVED: &[&str] = &["Type", "Net Amount", "Month", "Year", "Month-Year", "Cumulative"];

/// Header row for an export of `statement`
pub fn export_headers(statement: &Statement) -> Vec<String> {
    CANONICAL
        .iter()
        .map(|s| s.to_string())
        .chain(statement.extra_headers.iter().cloned())
        .chain(DERIVED.iter().map(|s| s.to_string()))
        .collect()
}

fn amount(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn write_csv<W: Write>(statement: &Statement, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(export_headers(statement))
        .context("write export header")?;

    for r in &statement.records {
        let mut row = vec![
            r.txn_date.format("%Y-%m-%d").to_string(),
            r.description.clone(),
            amount(r.debit),
            amount(r.credit),
            r.balance.map(amount).unwrap_or_default(),
        ];
        for i in 0..statement.extra_headers.len() {
            row.push(r.extras.get(i).cloned().unwrap_or_default());
        }
        row.extend([
            r.txn_type().to_string(),
            amount(r.net_amount()),
            r.month_name().to_string(),
            r.year().to_string(),
            r.month_year(),
            amount(r.cumulative),
        ]);
        wtr.write_record(&row)
            .with_context(|| format!("write export row for {}", r.txn_date))?;
    }

    wtr.flush().context("flush export")?;
    Ok(())
}

/// Export into an in-memory UTF-8 string
pub fn to_csv_string(statement: &Statement) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(statement, &mut buf)?;
    String::from_utf8(buf).context("export is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tally_core::TransactionRecord;

    #[test]
    fn test_export_layout() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        let st = Statement::new(
            vec!["Value Date".to_string()],
            vec![
                TransactionRecord::new(d, "SALARY, ACME", 0.0, 500.0, Some(1500.0))
                    .with_extras(vec!["10/02/2024".to_string()]),
                TransactionRecord::new(d, "ATM", 250.75, 0.0, None),
            ],
        );
        let out = to_csv_string(&st).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines[0],
            "Txn Date,Description,Debit,Credit,Balance,Value Date,Type,Net Amount,Month,Year,Month-Year,Cumulative"
        );
        assert_eq!(
            lines[1],
            "2024-02-09,\"SALARY, ACME\",0.00,500.00,1500.00,10/02/2024,Credit,500.00,February,2024,2024-02,500.00"
        );
        assert_eq!(
            lines[2],
            "2024-02-09,ATM,250.75,0.00,,,Debit,-250.75,February,2024,2024-02,249.25"
        );
    }
}
