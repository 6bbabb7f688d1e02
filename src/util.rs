// Parsing and formatting helpers.
//
// Loaders lean on the `parse_*` functions to turn raw CSV cells into typed
// values; anything that does not parse comes back as `None` and the caller
// decides how fatal that is. The `format_*` functions are presentation only.
use chrono::Month;
use num_format::{Locale, ToFormattedString};

/// Numeric cell from the price or purchase table (`Silver_Price_INR_per_kg`,
/// `Silver_Purchased_kg`, ...). Spreadsheet exports write `25,000` for
/// twenty-five thousand, so commas are dropped; a cell with letters in it
/// (`12kg`, `N/A`) is not a number and yields `None`.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let cell = s.map(str::trim).filter(|c| !c.is_empty())?;
    if cell.contains(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    cell.chars()
        .filter(|&c| c != ',')
        .collect::<String>()
        .parse::<f64>()
        .ok()
}

/// `Year` cell. No separators, no decimals.
pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    s.map(str::trim)
        .filter(|c| !c.is_empty())
        .and_then(|c| c.parse::<i32>().ok())
}

/// Parse a three-letter month abbreviation (`Jan` .. `Dec`, any case).
///
/// Full month names are rejected; the price table only ever carries the
/// short form and a longer value is more likely a column mix-up.
pub fn parse_month_abbrev(s: Option<&str>) -> Option<Month> {
    let s = s?.trim();
    if s.len() != 3 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    s.parse::<Month>().ok()
}

/// Canonical abbreviation for a month, e.g. `Month::September` -> `"Sep"`.
pub fn month_abbrev(m: Month) -> &'static str {
    &m.name()[..3]
}

/// Arithmetic mean. `None` for an empty slice so callers cannot mistake
/// "no data" for a real zero.
pub fn average(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

/// Fixed decimals plus `en` thousands separators, e.g. `1,234,567.89`.
/// Non-finite values render as `n/a`.
pub fn format_number(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return "n/a".to_string();
    }
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let mut res = group_thousands(int_part);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    // "-0.00" is not worth a sign
    if n.is_sign_negative() && res.chars().any(|c| matches!(c, '1'..='9')) {
        format!("-{}", res)
    } else {
        res
    }
}

// Works on the digit string so magnitudes past i64 keep their digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Row counts and ranks, e.g. `30 states` or `1,200 rows`.
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// `format_number` for an optional aggregate; undefined values render as `n/a`.
pub fn format_opt(n: Option<f64>, decimals: usize) -> String {
    match n {
        Some(v) => format_number(v, decimals),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_with_thousands_separators() {
        assert_eq!(parse_f64_safe(Some(" 25,000.5 ")), Some(25000.5));
        assert_eq!(parse_f64_safe(Some("12kg")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
        assert_eq!(parse_i32_safe(Some(" 2012 ")), Some(2012));
        assert_eq!(parse_i32_safe(Some("2012.5")), None);
        assert_eq!(parse_i32_safe(Some("  ")), None);
    }

    #[test]
    fn month_abbreviations_are_case_insensitive() {
        assert_eq!(parse_month_abbrev(Some("Jan")), Some(Month::January));
        assert_eq!(parse_month_abbrev(Some("sep")), Some(Month::September));
        assert_eq!(parse_month_abbrev(Some("DEC")), Some(Month::December));
        assert_eq!(parse_month_abbrev(Some("January")), None);
        assert_eq!(parse_month_abbrev(Some("Foo")), None);
        assert_eq!(month_abbrev(Month::March), "Mar");
    }

    #[test]
    fn average_of_empty_is_undefined() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1500.0, 0), "-1,500");
        assert_eq!(format_number(0.0, 1), "0.0");
        assert_eq!(format_int(9855), "9,855");
        assert_eq!(format_opt(None, 2), "n/a");
    }

    #[test]
    fn large_and_non_finite_values_keep_their_digits() {
        assert_eq!(format_number(1e19, 2), "10,000,000,000,000,000,000.00");
        assert_eq!(format_number(123.0, 0), "123");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(f64::INFINITY, 2), "n/a");
        assert_eq!(format_number(f64::NAN, 0), "n/a");
    }
}
