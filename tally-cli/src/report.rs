//! Plain-text renderings for the report commands.

use tally_core::{format_money, group_thousands, Statement};
use tally_finance::Dashboard;

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn render_summary(dash: &Dashboard, symbol: &str) -> String {
    let s = &dash.summary;
    let mut out = String::new();

    out.push_str(&format!("Records:          {}\n", s.record_count));
    if let (Some(first), Some(last)) = (s.first_date, s.last_date) {
        out.push_str(&format!("Period:           {} .. {}\n", first, last));
    }
    out.push_str(&format!("Total Spent:      {}\n", format_money(s.total_debit, symbol)));
    out.push_str(&format!("Total Received:   {}\n", format_money(s.total_credit, symbol)));
    out.push_str(&format!("Net:              {}\n", format_money(s.net, symbol)));
    let closing = s
        .closing_balance
        .map(|b| format_money(b, symbol))
        .unwrap_or_else(|| "n/a".to_string());
    out.push_str(&format!("Closing Balance:  {}\n", closing));

    let r = &dash.report;
    if r.dropped_dates > 0 {
        out.push_str(&format!(
            "\nDropped {} of {} rows without a readable date\n",
            r.dropped_dates, r.input_rows
        ));
    }
    if r.defaulted_amounts > 0 {
        out.push_str(&format!("{} unreadable amount(s) counted as zero\n", r.defaulted_amounts));
    }
    out
}

pub fn render_daily(dash: &Dashboard) -> String {
    let mut out = format!("{:<12}{:>16}{:>16}\n", "Date", "Debit", "Credit");
    for d in &dash.daily {
        out.push_str(&format!(
            "{:<12}{:>16}{:>16}\n",
            d.date.to_string(),
            group_thousands(d.debit),
            group_thousands(d.credit)
        ));
    }
    out
}

pub fn render_monthly(dash: &Dashboard) -> String {
    let mut out = format!("{:<10}{:>16}{:>16}{:>16}\n", "Month", "Debit", "Credit", "Net");
    for m in &dash.monthly {
        out.push_str(&format!(
            "{:<10}{:>16}{:>16}{:>16}\n",
            m.month_year,
            group_thousands(m.debit),
            group_thousands(m.credit),
            format_money(m.credit - m.debit, "")
        ));
    }
    out
}

pub fn render_running(dash: &Dashboard) -> String {
    let mut out = format!("{:<12}{:>18}\n", "Date", "Cumulative");
    for p in &dash.running {
        out.push_str(&format!(
            "{:<12}{:>18}\n",
            p.date.to_string(),
            format_money(p.cumulative, "")
        ));
    }
    out
}

/// Record listing capped at `limit` rows; `total` is the unfiltered count
pub fn render_table(statement: &Statement, total: usize, limit: usize) -> String {
    let mut out = format!(
        "{:<12}{:<8}{:>14}{:>14}{:>16}  {}\n",
        "Date", "Type", "Debit", "Credit", "Balance", "Description"
    );
    for r in statement.records.iter().take(limit) {
        out.push_str(&format!(
            "{:<12}{:<8}{:>14}{:>14}{:>16}  {}\n",
            r.txn_date.to_string(),
            r.txn_type().as_str(),
            group_thousands(r.debit),
            group_thousands(r.credit),
            r.balance.map(group_thousands).unwrap_or_default(),
            truncate(&r.description, 48)
        ));
    }
    out.push_str(&format!(
        "\nShowing {} of {} matching ({} total)\n",
        statement.len().min(limit),
        statement.len(),
        total
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_finance::{process_upload, PipelineOptions, Upload};
    use tally_ingest::SourceKind;

    fn dashboard() -> Dashboard {
        let csv = "Txn Date,Description,Debit,Credit,Balance\n\
                   01/03/2024,SALARY,,\"25,000.00\",\"25,000.00\"\n\
                   ??,broken,,,\n\
                   04/03/2024,RENT,\"12,500\",,\"12,500.00\"\n";
        let upload = Upload {
            kind: SourceKind::Csv,
            bytes: csv.as_bytes(),
            password: None,
        };
        process_upload(&upload, &PipelineOptions::default()).unwrap()
    }

    #[test]
    fn test_summary_lines() {
        let text = render_summary(&dashboard(), "₹");
        assert!(text.contains("Total Spent:      ₹12,500.00"));
        assert!(text.contains("Total Received:   ₹25,000.00"));
        assert!(text.contains("Closing Balance:  ₹12,500.00"));
        assert!(text.contains("Dropped 1 of 3 rows"));
    }

    #[test]
    fn test_table_limit_footer() {
        let dash = dashboard();
        let text = render_table(&dash.statement, dash.statement.len(), 1);
        assert!(text.contains("SALARY"));
        assert!(!text.contains("RENT"));
        assert!(text.contains("Showing 1 of 2 matching (2 total)"));
    }

    #[test]
    fn test_monthly_rows() {
        let text = render_monthly(&dashboard());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2024-03"));
        assert!(lines[1].ends_with("12,500.00"));
    }

    #[test]
    fn test_truncate_long_description() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
