//! Number and money formatting shared by the console report and dashboard.

use chrono::NaiveDate;

/// Format `value` with thousands separators and a fixed number of decimals.
///
/// ```
/// use sales_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a scaled epsilon so exact binary midpoints (1.005) round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let grouped = group_thousands(&(rounded.trunc() as u64).to_string());

    let body = if decimals == 0 {
        grouped
    } else {
        let frac = format!("{:.prec$}", rounded.fract(), prec = decimals as usize);
        // `frac` is "0.xx"; keep ".xx". Rounding can carry into "1.00".
        if frac.starts_with('1') {
            let carried = group_thousands(&(rounded.trunc() as u64 + 1).to_string());
            format!("{}{}", carried, &frac[1..])
        } else {
            format!("{}{}", grouped, &frac[1..])
        }
    };

    if negative && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", body)
    } else {
        body
    }
}

/// Format an amount of money as `$1,234.56`.
///
/// ```
/// use sales_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56), "$1,234.56");
/// assert_eq!(format_currency(0.0), "$0.00");
/// ```
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("$-{}", format_number(amount.abs(), 2))
    } else {
        format!("${}", format_number(amount, 2))
    }
}

/// Short money label for chart bars: `$950`, `$12.3K`, `$4.56M`.
pub fn format_currency_compact(amount: f64) -> String {
    let abs = amount.abs();
    let sign = if amount < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("{sign}${:.2}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{sign}${:.1}K", abs / 1_000.0)
    } else {
        format!("{sign}${:.0}", abs)
    }
}

/// `(part / whole) * 100`, rounded; `0.0` when `whole` is zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// `2025-01-01 to 2025-03-01`, or a placeholder when either end is unknown.
pub fn format_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!("{} to {}", s.format("%Y-%m-%d"), e.format("%Y-%m-%d")),
        _ => "not available".to_string(),
    }
}

fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
