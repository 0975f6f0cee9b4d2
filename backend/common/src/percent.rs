//! # Percentage Format
//!
//! Rates are stored as fractions (`0.32`) and shown the way pt-BR formats
//! percentages: `32,00%`. Always two decimals, `.` groups thousands.
//! Ties round half away from zero, like `Intl.NumberFormat`.

const DECIMALS: usize = 2;
const SCALE: f64 = 100.0 * 100.0;

pub fn format_percent(fraction: f64) -> String {
    if fraction.is_nan() {
        return "NaN%".to_string();
    }

    if fraction.is_infinite() {
        let sign = if fraction.is_sign_negative() { "-" } else { "" };
        return format!("{sign}∞%");
    }

    // f64::round breaks ties away from zero, `{:.2}` alone would round to even
    let rounded = (fraction * SCALE).round() / 100.0;
    let fixed = format!("{:.*}", DECIMALS, rounded);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (integer, decimals) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    // -0,00% reads oddly, Intl drops the sign too
    let sign = if integer.bytes().all(|b| b == b'0') && decimals.bytes().all(|b| b == b'0') {
        ""
    } else {
        sign
    };

    format!("{sign}{},{decimals}%", group_thousands(integer))
}

fn group_thousands(integer: &str) -> String {
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);

    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::format_percent;

    #[test]
    fn test_basic() {
        assert_eq!(format_percent(0.32), "32,00%");
        assert_eq!(format_percent(0.755), "75,50%");
        assert_eq!(format_percent(0.0), "0,00%");
        assert_eq!(format_percent(1.0), "100,00%");
        assert_eq!(format_percent(0.05), "5,00%");
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        assert_eq!(format_percent(0.123456), "12,35%");
        assert_eq!(format_percent(0.00001), "0,00%");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_percent(0.00125), "0,13%");
        assert_eq!(format_percent(0.00375), "0,38%");
        assert_eq!(format_percent(0.12345), "12,35%");
        assert_eq!(format_percent(-0.00125), "-0,13%");
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(format_percent(12.345), "1.234,50%");
        assert_eq!(format_percent(10000.0), "1.000.000,00%");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_percent(-0.1), "-10,00%");
        assert_eq!(format_percent(-0.00001), "0,00%");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_percent(f64::NAN), "NaN%");
        assert_eq!(format_percent(f64::INFINITY), "∞%");
        assert_eq!(format_percent(f64::NEG_INFINITY), "-∞%");
    }

    #[test]
    fn test_unit_interval_has_two_decimals() {
        for step in 0..=100 {
            let formatted = format_percent(step as f64 / 100.0);
            let (_, decimals) = formatted.split_once(',').unwrap();

            assert_eq!(decimals.len(), 3, "{formatted}");
            assert!(decimals.ends_with('%'));
        }
    }
}
