//! Header alias table: raw statement header -> canonical field.
//!
//! Lookup keys are produced by [`header_key`], so `"Txn_Date "`, `"TXN DATE"`
//! and `"Txn Date (IST)"` all resolve to the same entry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    TxnDate,
    Description,
    Debit,
    Credit,
    Balance,
    /// Single signed/suffixed amount column; used only without Debit and Credit
    Amount,
}

impl CanonicalField {
    /// Column name used in exports and error messages
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::TxnDate => "Txn Date",
            CanonicalField::Description => "Description",
            CanonicalField::Debit => "Debit",
            CanonicalField::Credit => "Credit",
            CanonicalField::Balance => "Balance",
            CanonicalField::Amount => "Amount",
        }
    }
}

const ALIASES: &[(&str, CanonicalField)] = &[
    ("txn date", CanonicalField::TxnDate),
    ("date", CanonicalField::TxnDate),
    ("transaction date", CanonicalField::TxnDate),
    ("tran date", CanonicalField::TxnDate),
    ("trans date", CanonicalField::TxnDate),
    ("posting date", CanonicalField::TxnDate),
    ("description", CanonicalField::Description),
    ("narration", CanonicalField::Description),
    ("particulars", CanonicalField::Description),
    ("details", CanonicalField::Description),
    ("remarks", CanonicalField::Description),
    ("transaction details", CanonicalField::Description),
    ("debit", CanonicalField::Debit),
    ("withdrawal", CanonicalField::Debit),
    ("withdrawals", CanonicalField::Debit),
    ("withdrawal amt", CanonicalField::Debit),
    ("dr", CanonicalField::Debit),
    ("debit amount", CanonicalField::Debit),
    ("credit", CanonicalField::Credit),
    ("deposit", CanonicalField::Credit),
    ("deposits", CanonicalField::Credit),
    ("deposit amt", CanonicalField::Credit),
    ("cr", CanonicalField::Credit),
    ("credit amount", CanonicalField::Credit),
    ("balance", CanonicalField::Balance),
    ("closing balance", CanonicalField::Balance),
    ("running balance", CanonicalField::Balance),
    ("available balance", CanonicalField::Balance),
    ("amount", CanonicalField::Amount),
    ("transaction amount", CanonicalField::Amount),
];

/// Normalize a raw header into its lookup key.
///
/// Trims (including a UTF-8 BOM), drops a trailing parenthetical unit,
/// lowercases, turns `_ - .` into spaces and collapses whitespace.
pub fn header_key(raw: &str) -> String {
    let mut s = raw.trim().trim_start_matches('\u{feff}').trim();
    if s.ends_with(')') {
        if let Some(open) = s.rfind('(') {
            if open > 0 {
                s = s[..open].trim_end();
            }
        }
    }

    s.to_lowercase()
        .chars()
        .map(|c| if matches!(c, '_' | '-' | '.') { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a raw header to a canonical field, if it is a known alias
pub fn lookup(raw: &str) -> Option<CanonicalField> {
    let key = header_key(raw);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, field)| *field)
}

/// Column positions of the canonical fields within one header row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    pub txn_date: Option<usize>,
    pub description: Option<usize>,
    pub debit: Option<usize>,
    pub credit: Option<usize>,
    pub balance: Option<usize>,
    pub amount: Option<usize>,
    /// Unmapped columns (and later duplicates), in input order
    pub extras: Vec<usize>,
}

impl ColumnMap {
    /// Map every header; the first header claiming a field wins.
    pub fn resolve(headers: &[String]) -> Self {
        let mut map = ColumnMap::default();
        for (idx, header) in headers.iter().enumerate() {
            let slot = match lookup(header) {
                Some(CanonicalField::TxnDate) => &mut map.txn_date,
                Some(CanonicalField::Description) => &mut map.description,
                Some(CanonicalField::Debit) => &mut map.debit,
                Some(CanonicalField::Credit) => &mut map.credit,
                Some(CanonicalField::Balance) => &mut map.balance,
                Some(CanonicalField::Amount) => &mut map.amount,
                None => {
                    map.extras.push(idx);
                    continue;
                }
            };
            if slot.is_none() {
                *slot = Some(idx);
            } else {
                map.extras.push(idx);
            }
        }

        // Amount only feeds debit/credit when neither is present; otherwise it passes through
        if !map.uses_single_amount() {
            if let Some(idx) = map.amount.take() {
                map.extras.push(idx);
                map.extras.sort_unstable();
            }
        }
        map
    }

    /// True when the statement uses one signed amount column instead of Debit/Credit
    pub fn uses_single_amount(&self) -> bool {
        self.debit.is_none() && self.credit.is_none() && self.amount.is_some()
    }
}
