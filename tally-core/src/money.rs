//! Currency display helpers

/// Format an amount with thousands separators and two decimals, e.g. `₹1,234.50`.
pub fn format_money(amount: f64, symbol: &str) -> String {
    let digits = group_thousands(amount.abs());
    let sign = if amount < 0.0 && digits != "0.00" { "-" } else { "" };
    format!("{sign}{symbol}{digits}")
}

/// `1234567.891` -> `1,234,567.89`
pub fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out.push('.');
    out.push_str(frac_part);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0.00");
        assert_eq!(group_thousands(999.5), "999.50");
        assert_eq!(group_thousands(1234.5), "1,234.50");
        assert_eq!(group_thousands(1234567.891), "1,234,567.89");
    }

    #[test]
    fn test_format_money_sign_before_symbol() {
        assert_eq!(format_money(2000.0, "₹"), "₹2,000.00");
        assert_eq!(format_money(-250.75, "$"), "-$250.75");
    }

    #[test]
    fn test_format_money_no_negative_zero() {
        assert_eq!(format_money(-0.004, "₹"), "₹0.00");
        assert_eq!(format_money(-0.005001, "₹"), "-₹0.01");
    }
}
