//! Cell coercion: amounts (two-stage) and day-first dates.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[^a-z])(dr|cr)\.?\)?\s*$").unwrap());
static CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)₹|\$|€|£|\binr\b|\brs\b\.?").unwrap());
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)").unwrap());
static TIME_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:T|\s+)\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:\s*[ap]m)?(?:Z|[+-]\d{2}:?\d{2})?\s*$")
        .unwrap()
});

/// Cell texts treated as absent: spreadsheet NA markers and dash placeholders
const BLANK_MARKERS: &[&str] = &["", "-", "--", "nan", "-nan", "na", "n/a", "#n/a", "null", "none"];

/// Outcome of coercing one amount cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    /// Empty or an NA marker; takes the default silently
    Blank,
    /// Parsed as-is
    Strict(f64),
    /// Parsed after stripping separators, symbols and DR/CR
    Repaired(f64),
    /// Not a number even after repair
    Invalid,
}

impl Coerced {
    pub fn value(&self) -> Option<f64> {
        match self {
            Coerced::Strict(v) | Coerced::Repaired(v) => Some(*v),
            Coerced::Blank | Coerced::Invalid => None,
        }
    }
}

/// Currency direction printed next to an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Debit,
    Credit,
}

pub fn is_blank(raw: &str) -> bool {
    let t = raw.trim().to_ascii_lowercase();
    BLANK_MARKERS.contains(&t.as_str())
}

/// Trailing `DR` / `CR` marker, if any
pub fn direction_suffix(raw: &str) -> Option<Direction> {
    let caps = DIRECTION_SUFFIX.captures(raw.trim())?;
    if caps[1].eq_ignore_ascii_case("dr") {
        Some(Direction::Debit)
    } else {
        Some(Direction::Credit)
    }
}

/// Two-stage coercion: strict parse, then strip-and-extract.
pub fn coerce_amount(raw: &str) -> Coerced {
    let trimmed = raw.trim();
    if is_blank(trimmed) {
        return Coerced::Blank;
    }

    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_finite() {
            return Coerced::Strict(v);
        }
    }

    // DR/CR trails the number, so extracting the leading run drops it
    let without_symbols = CURRENCY.replace_all(trimmed, "");
    let cleaned: String = without_symbols
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    match LEADING_NUMBER.find(&cleaned) {
        Some(m) => match m.as_str().parse::<f64>() {
            Ok(v) if v.is_finite() => Coerced::Repaired(v),
            _ => Coerced::Invalid,
        },
        None => Coerced::Invalid,
    }
}

/// Parse a debit/credit magnitude. `"1,234.50 DR"` -> `1234.5`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    coerce_amount(raw).value().map(f64::abs)
}

/// Split a single signed amount into `(debit, credit)`.
///
/// A `DR` suffix or a negative value is a debit; `CR` or a positive value is
/// a credit.
pub fn split_signed(value: f64, direction: Option<Direction>) -> (f64, f64) {
    match direction {
        Some(Direction::Debit) => (value.abs(), 0.0),
        Some(Direction::Credit) => (0.0, value.abs()),
        None if value < 0.0 => (value.abs(), 0.0),
        None => (0.0, value),
    }
}

const ISO_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y", "%d-%m-%y", "%d.%m.%y",
    "%d %b %Y", "%d-%b-%Y", "%d %b %y", "%d-%b-%y",
    "%d %B %Y", "%d-%B-%Y", "%d %B, %Y",
];

const MONTH_FIRST_FORMATS: &[&str] = &[
    "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%m-%d-%y",
    "%b %d %Y", "%b %d, %Y", "%B %d %Y", "%B %d, %Y",
];

/// Parse a statement date. With `day_first`, `05/01/2024` is 5 January;
/// a reading that only works month-first (`12/25/2024`) is still accepted.
///
/// chrono's `%Y` also takes two digits, so years before 1900 are treated as
/// misreads and the next format is tried.
pub fn parse_date(raw: &str, day_first: bool) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = TIME_SUFFIX.replace(trimmed, "");
    let s = date_part.trim();

    let (primary, fallback) = if day_first {
        (DAY_FIRST_FORMATS, MONTH_FIRST_FORMATS)
    } else {
        (MONTH_FIRST_FORMATS, DAY_FIRST_FORMATS)
    };

    ISO_FORMATS
        .iter()
        .chain(primary)
        .chain(fallback)
        .find_map(|fmt| {
            NaiveDate::parse_from_str(s, fmt)
                .ok()
                .filter(|d| d.year() >= 1900)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_suffixed_amounts() {
        assert_eq!(parse_amount("1,234.50 DR"), Some(1234.50));
        assert_eq!(parse_amount("2,000 CR"), Some(2000.0));
        assert_eq!(parse_amount("99.10Cr."), Some(99.10));
    }

    #[test]
    fn test_strict_vs_repaired() {
        assert_eq!(coerce_amount("250.75"), Coerced::Strict(250.75));
        assert_eq!(coerce_amount("₹ 1,00,000.00"), Coerced::Repaired(100000.0));
        assert_eq!(coerce_amount("Rs. 45"), Coerced::Repaired(45.0));
        assert_eq!(coerce_amount("$12.30"), Coerced::Repaired(12.30));
    }

    #[test]
    fn test_blank_and_invalid() {
        assert_eq!(coerce_amount(""), Coerced::Blank);
        assert_eq!(coerce_amount("  NaN "), Coerced::Blank);
        assert_eq!(coerce_amount("n/a"), Coerced::Blank);
        assert_eq!(coerce_amount("pending"), Coerced::Invalid);
        assert_eq!(coerce_amount(" - "), Coerced::Blank);
        assert_eq!(coerce_amount("--"), Coerced::Blank);
        assert_eq!(coerce_amount("-x"), Coerced::Invalid);
        assert_eq!(coerce_amount("inf"), Coerced::Invalid);
    }

    #[test]
    fn test_amount_magnitude_is_non_negative() {
        assert_eq!(parse_amount("-42.00"), Some(42.0));
    }

    #[test]
    fn test_direction_suffix() {
        assert_eq!(direction_suffix("1,234.50 DR"), Some(Direction::Debit));
        assert_eq!(direction_suffix("2,000 cr"), Some(Direction::Credit));
        assert_eq!(direction_suffix("2,000 (Dr)"), Some(Direction::Debit));
        assert_eq!(direction_suffix("2,000"), None);
        assert_eq!(direction_suffix("ADR"), None);
    }

    #[test]
    fn test_split_signed() {
        assert_eq!(split_signed(100.0, Some(Direction::Debit)), (100.0, 0.0));
        assert_eq!(split_signed(100.0, Some(Direction::Credit)), (0.0, 100.0));
        assert_eq!(split_signed(-5.5, None), (5.5, 0.0));
        assert_eq!(split_signed(7.0, None), (0.0, 7.0));
    }

    #[test]
    fn test_day_first_dates() {
        assert_eq!(parse_date("05/01/2024", true), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("05-01-24", true), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("5 Jan 2024", true), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("05-Jan-24", true), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05", true), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_month_first_fallback_and_option() {
        assert_eq!(parse_date("12/25/2024", true), Some(ymd(2024, 12, 25)));
        assert_eq!(parse_date("05/01/2024", false), Some(ymd(2024, 5, 1)));
    }

    #[test]
    fn test_dates_with_time() {
        assert_eq!(parse_date("05/01/2024 14:32:10", true), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T00:00:00", true), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("05/01/2024 09:15 AM", true), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_date("", true), None);
        assert_eq!(parse_date("Opening Balance", true), None);
        assert_eq!(parse_date("31/02/2024", true), None);
    }
}
