//! Rebuild table rows from positioned text fragments.
//!
//! PDF content streams carry no table structure, only text drawn at
//! coordinates. Fragments sharing a baseline form a row; once a header row
//! is found, its fragments serve as column anchors and every later cell is
//! assigned to the nearest anchor by x.

use crate::types::RawTable;

/// A run of text drawn at one position, in PDF user space (y grows upward)
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

impl TextFragment {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// Group one page's fragments into rows, top to bottom, cells left to right.
pub fn group_rows(fragments: &[TextFragment], tolerance: f32) -> Vec<Vec<TextFragment>> {
    let mut sorted: Vec<&TextFragment> = fragments
        .iter()
        .filter(|f| !f.text.trim().is_empty())
        .collect();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<Vec<TextFragment>> = Vec::new();
    let mut row_y = f32::NAN;
    for frag in sorted {
        if (row_y - frag.y).abs() <= tolerance {
            if let Some(row) = rows.last_mut() {
                row.push(frag.clone());
                continue;
            }
        }
        row_y = frag.y;
        rows.push(vec![frag.clone()]);
    }

    for row in rows.iter_mut() {
        row.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    rows
}

/// Index of the anchor closest to `x`
fn nearest_anchor(anchors: &[f32], x: f32) -> usize {
    anchors
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - x).abs().total_cmp(&(*b - x).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Place a row's fragments under the header columns; fragments landing on
/// the same column are joined with a space.
fn align_to_anchors(row: &[TextFragment], anchors: &[f32]) -> Vec<String> {
    let mut cells = vec![String::new(); anchors.len()];
    for frag in row {
        let cell = &mut cells[nearest_anchor(anchors, frag.x)];
        if !cell.is_empty() {
            cell.push(' ');
        }
        cell.push_str(frag.text.trim());
    }
    cells
}

/// Filled cells a data row needs: date, description and one amount
const MIN_DATA_CELLS: usize = 3;

/// Flatten the rows of every page into one table.
///
/// The first row with at least `min_columns` fragments is the header. Later
/// rows are aligned under it and kept when they fill enough cells, so a row
/// with an empty debit or credit still lines up. Rows equal to the header
/// (repeated on each page) are skipped.
pub fn assemble_table(pages: &[Vec<Vec<TextFragment>>], min_columns: usize) -> RawTable {
    let mut anchors: Vec<f32> = Vec::new();
    let mut table = RawTable::default();

    for row in pages.iter().flatten() {
        if anchors.is_empty() {
            if row.len() >= min_columns {
                anchors = row.iter().map(|f| f.x).collect();
                table.headers = row.iter().map(|f| f.text.trim().to_string()).collect();
            }
            continue;
        }

        let cells = align_to_anchors(row, &anchors);
        if cells == table.headers {
            continue;
        }
        let filled = cells.iter().filter(|c| !c.is_empty()).count();
        if filled < MIN_DATA_CELLS.min(anchors.len()) {
            continue;
        }
        table.rows.push(cells);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(y: f32, cells: &[(f32, &str)]) -> Vec<TextFragment> {
        cells.iter().map(|(x, t)| TextFragment::new(*x, y, *t)).collect()
    }

    const HEADER: &[(f32, &str)] = &[
        (40.0, "Txn Date"),
        (110.0, "Description"),
        (300.0, "Debit"),
        (380.0, "Credit"),
        (460.0, "Balance"),
    ];

    #[test]
    fn test_group_rows_by_baseline() {
        let frags = vec![
            TextFragment::new(300.0, 700.2, "500.00"),
            TextFragment::new(40.0, 700.0, "01/01/2024"),
            TextFragment::new(40.0, 680.0, "02/01/2024"),
            TextFragment::new(110.0, 699.1, "ATM"),
            TextFragment::new(200.0, 650.0, "   "),
        ];
        let rows = group_rows(&frags, 2.0);
        assert_eq!(rows.len(), 2);
        let texts: Vec<_> = rows[0].iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, ["01/01/2024", "ATM", "500.00"]);
        assert_eq!(rows[1][0].text, "02/01/2024");
    }

    #[test]
    fn test_assemble_uses_first_wide_row_as_header() {
        let page = vec![
            row(780.0, &[(40.0, "ACME BANK"), (300.0, "Statement")]),
            row(700.0, HEADER),
            row(680.0, &[(40.0, "01/01/2024"), (110.0, "SALARY"), (382.0, "1,000.00"), (455.0, "1,000.00"), (200.0, "NEFT")]),
        ];
        let t = assemble_table(&[page], 5);
        assert_eq!(t.headers, ["Txn Date", "Description", "Debit", "Credit", "Balance"]);
        assert_eq!(t.rows.len(), 1);
        assert_eq!(t.rows[0], ["01/01/2024", "SALARY NEFT", "", "1,000.00", "1,000.00"]);
    }

    #[test]
    fn test_sparse_rows_dropped_and_repeated_header_skipped() {
        let page1 = vec![
            row(700.0, HEADER),
            row(680.0, &[(40.0, "01/01/2024"), (110.0, "UPI"), (110.0, "GROCER"), (298.0, "250.75"), (462.0, "749.25")]),
            row(670.0, &[(110.0, "continued narration")]),
        ];
        let page2 = vec![
            row(700.0, HEADER),
            row(680.0, &[(40.0, "03/01/2024"), (110.0, "ATM"), (300.0, "100"), (380.0, ""), (460.0, "649.25")]),
        ];
        let t = assemble_table(&[page1, page2], 5);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], ["01/01/2024", "UPI GROCER", "250.75", "", "749.25"]);
        assert_eq!(t.rows[1][0], "03/01/2024");
    }

    #[test]
    fn test_rows_with_one_empty_amount_cell_are_kept() {
        let page = vec![
            row(700.0, HEADER),
            row(680.0, &[(40.0, "01/01/2024"), (110.0, "SALARY"), (381.0, "1,000.00"), (459.0, "1,000.00")]),
            row(660.0, &[(40.0, "02/01/2024"), (110.0, "ATM"), (301.0, "100.00"), (461.0, "900.00")]),
            row(640.0, &[(400.0, "Page 1 of 1")]),
        ];
        let t = assemble_table(&[page], 5);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], ["01/01/2024", "SALARY", "", "1,000.00", "1,000.00"]);
        assert_eq!(t.rows[1], ["02/01/2024", "ATM", "100.00", "", "900.00"]);
    }

    #[test]
    fn test_no_wide_rows() {
        let page = vec![row(700.0, &[(40.0, "only"), (80.0, "two")])];
        let t = assemble_table(&[page], 5);
        assert!(t.headers.is_empty());
        assert!(t.rows.is_empty());
    }
}
