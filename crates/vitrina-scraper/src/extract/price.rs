//! Used-car header price: colones or dollars in, a dollar string out.

/// Fixed colón → dollar rate applied to prices quoted in colones.
pub const COLONES_PER_USD: i64 = 530;

/// Convert a header price to `"$ 12,500"` form.
///
/// Parentheses, asterisks, `$` and thousands separators are stripped. A
/// price containing `¢` is converted from colones by floor division.
///
/// # Errors
///
/// The cleaned text when it is not an integer (for example `"ND"`).
pub fn usd_price(raw: &str) -> Result<String, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '*' | '$'))
        .collect::<String>()
        .trim()
        .replace(',', "");

    if cleaned.contains('¢') {
        let colones = cleaned.replace('¢', "");
        let colones = colones.trim();
        return colones
            .parse::<i64>()
            .map(|amount| format_usd(amount.div_euclid(COLONES_PER_USD)))
            .map_err(|_| colones.to_string());
    }

    cleaned
        .parse::<i64>()
        .map(format_usd)
        .map_err(|_| cleaned)
}

/// `"$ "` followed by `amount` with comma thousands separators.
#[must_use]
pub fn format_usd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("$ {sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colones_convert_to_dollars() {
        assert_eq!(usd_price("¢ 1,000,000").unwrap(), "$ 1,886");
    }

    #[test]
    fn dollars_keep_their_value() {
        assert_eq!(usd_price("$12,500").unwrap(), "$ 12,500");
        assert_eq!(usd_price(" ($ 8,900) *").unwrap(), "$ 8,900");
    }

    #[test]
    fn unpriced_listing_returns_cleaned_text() {
        assert_eq!(usd_price("$ND").unwrap_err(), "ND");
        assert_eq!(usd_price("¢ consultar").unwrap_err(), "consultar");
    }

    #[test]
    fn grouping() {
        assert_eq!(format_usd(0), "$ 0");
        assert_eq!(format_usd(999), "$ 999");
        assert_eq!(format_usd(1_000), "$ 1,000");
        assert_eq!(format_usd(1_234_567), "$ 1,234,567");
    }
}
