//! Number formatting for tables and axis labels (Brazilian grouping).

use num_format::{Locale, ToFormattedString};

const LOCALE: Locale = Locale::pt;

/// Fixed decimals with locale thousands separators, e.g. `1.234.567,89`.
pub fn format_number(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return "-".to_string();
    }

    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let int_val: i64 = int_part.parse().unwrap_or(0);

    let mut res = int_val.to_formatted_string(&LOCALE);
    if decimals > 0 {
        res.push_str(LOCALE.decimal());
        res.push_str(frac_part);
    }

    // Avoid "-0,00" for tiny negatives
    if n.is_sign_negative() && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

/// Integer counts, e.g. `9.855 linhas`.
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&LOCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1_234_567.891, 2), "1.234.567,89");
        assert_eq!(format_number(0.5, 2), "0,50");
        assert_eq!(format_number(-1500.0, 0), "-1.500");
        assert_eq!(format_number(-0.001, 2), "0,00");
        assert_eq!(format_number(f64::NAN, 2), "-");
    }

    #[test]
    fn test_format_int() {
        assert_eq!(format_int(9855usize), "9.855");
    }
}
