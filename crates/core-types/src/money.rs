/// Formats an amount the way en-US currency formatting does: `$1,234.50`, `-$50.00`.
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${amount}");
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_grouping_and_sign() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(500.0), "$500.00");
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(-50.0), "-$50.00");
        assert_eq!(format_usd(-671.1409), "-$671.14");
        assert_eq!(format_usd(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn negative_amount_rounding_to_zero_has_no_sign() {
        assert_eq!(format_usd(-0.001), "$0.00");
    }
}
