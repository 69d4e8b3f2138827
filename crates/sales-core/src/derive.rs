//! Derived-field computation: validates a [`RawSalesRow`] and turns it into a
//! [`SalesLine`] with `line_revenue` and `day_of_week` populated.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::RowError;
use crate::models::{Channel, CustomerSegment, Discount, RawSalesRow, SalesLine};

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses calendar dates from the formats found in exported sales files.
pub struct DateParser;

impl DateParser {
    const DATE_FORMATS: &'static [&'static str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y"];

    const DATETIME_FORMATS: &'static [&'static str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    /// Parse `s` into a [`NaiveDate`], discarding any time-of-day part.
    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in Self::DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }
        for fmt in Self::DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.date());
            }
        }
        None
    }
}

// ── Revenue ───────────────────────────────────────────────────────────────────

/// Revenue of one line after discount.
///
/// A fractional discount scales the gross amount; an absolute discount is
/// subtracted from it. The result is clamped at zero.
///
/// ```
/// use sales_core::derive::line_revenue;
/// use sales_core::models::Discount;
///
/// assert!((line_revenue(3, 10.0, Discount::Fraction(0.1)) - 27.0).abs() < 1e-9);
/// assert_eq!(line_revenue(2, 5.0, Discount::Amount(1.0)), 9.0);
/// assert_eq!(line_revenue(1, 1.0, Discount::Amount(5.0)), 0.0);
/// ```
pub fn line_revenue(quantity: u32, unit_price: f64, discount: Discount) -> f64 {
    let gross = f64::from(quantity) * unit_price;
    let net = match discount {
        Discount::None => gross,
        Discount::Fraction(f) => gross * (1.0 - f),
        Discount::Amount(a) => gross - a,
    };
    net.max(0.0)
}

// ── Row derivation ────────────────────────────────────────────────────────────

/// Validate `raw` and compute its derived fields.
///
/// Returns the first problem found; the caller counts it and skips the row.
pub fn derive_line(raw: &RawSalesRow) -> Result<SalesLine, RowError> {
    let order_id = non_empty(&raw.order_id)
        .or_else(|| non_empty(&raw.transaction_id))
        .ok_or(RowError::MissingField("order_id"))?
        .to_string();

    let date_str = required(&raw.date, "date")?;
    let date = DateParser::parse(date_str).ok_or_else(|| RowError::InvalidDate(date_str.to_string()))?;

    let store_location = required(&raw.store_location, "store_location")?.to_string();
    let channel: Channel = required(&raw.channel, "channel")?.parse()?;
    let product_category = required(&raw.product_category, "product_category")?.to_string();
    let product_name = required(&raw.product_name, "product_name")?.to_string();

    let quantity = parse_quantity(required(&raw.quantity, "quantity")?)?;
    let unit_price = parse_number("unit_price", required(&raw.unit_price, "unit_price")?)?;
    if unit_price < 0.0 {
        return Err(RowError::NegativePrice(unit_price));
    }

    let discount = parse_discount(raw)?;

    let customer_segment = match non_empty(&raw.customer_segment) {
        Some(s) => Some(s.parse::<CustomerSegment>()?),
        None => None,
    };

    Ok(SalesLine {
        order_id,
        date,
        store_id: non_empty(&raw.store_id).map(str::to_string),
        store_location,
        channel,
        product_category,
        product_name,
        quantity,
        unit_price,
        discount,
        customer_id: non_empty(&raw.customer_id).map(str::to_string),
        customer_segment,
        line_revenue: line_revenue(quantity, unit_price, discount),
        day_of_week: date.weekday(),
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, RowError> {
    non_empty(value).ok_or(RowError::MissingField(field))
}

fn parse_number(field: &'static str, s: &str) -> Result<f64, RowError> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowError::InvalidNumber {
            field,
            value: s.to_string(),
        })
}

/// Whole numbers written as `"3"` or `"3.0"` are accepted.
fn parse_quantity(s: &str) -> Result<u32, RowError> {
    let whole = match s.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f = parse_number("quantity", s)?;
            if f.fract() != 0.0 {
                return Err(RowError::InvalidNumber {
                    field: "quantity",
                    value: s.to_string(),
                });
            }
            f as i64
        }
    };
    if whole <= 0 {
        return Err(RowError::NonPositiveQuantity(whole));
    }
    u32::try_from(whole).map_err(|_| RowError::InvalidNumber {
        field: "quantity",
        value: s.to_string(),
    })
}

/// `discount` (fraction) takes precedence over `discount_applied` (amount).
fn parse_discount(raw: &RawSalesRow) -> Result<Discount, RowError> {
    if let Some(s) = non_empty(&raw.discount) {
        let f = parse_number("discount", s)?;
        if !(0.0..=1.0).contains(&f) {
            return Err(RowError::DiscountOutOfRange(f));
        }
        return Ok(Discount::Fraction(f));
    }
    if let Some(s) = non_empty(&raw.discount_applied) {
        let a = parse_number("discount_applied", s)?;
        if a < 0.0 {
            return Err(RowError::NegativeDiscountAmount(a));
        }
        return Ok(Discount::Amount(a));
    }
    Ok(Discount::None)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn raw() -> RawSalesRow {
        RawSalesRow {
            order_id: Some("ORD-1".to_string()),
            date: Some("2025-01-03".to_string()),
            store_location: Some("Downtown".to_string()),
            channel: Some("Online".to_string()),
            product_category: Some("Beverages".to_string()),
            product_name: Some("Orange Juice 1L".to_string()),
            quantity: Some("3".to_string()),
            unit_price: Some("10.0".to_string()),
            discount: Some("0.1".to_string()),
            ..Default::default()
        }
    }

    // ── line_revenue ──────────────────────────────────────────────────────────

    #[test]
    fn test_line_revenue_fractional_discount() {
        let rev = line_revenue(3, 10.0, Discount::Fraction(0.1));
        assert!((rev - 27.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_revenue_no_discount() {
        assert_eq!(line_revenue(4, 2.5, Discount::None), 10.0);
    }

    #[test]
    fn test_line_revenue_full_discount_is_zero() {
        assert_eq!(line_revenue(4, 2.5, Discount::Fraction(1.0)), 0.0);
    }

    #[test]
    fn test_line_revenue_amount_clamped_at_zero() {
        assert_eq!(line_revenue(1, 1.5, Discount::Amount(2.0)), 0.0);
    }

    // ── DateParser ────────────────────────────────────────────────────────────

    #[test]
    fn test_date_parser_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(DateParser::parse("2025-01-03"), Some(expected));
        assert_eq!(DateParser::parse("2025/01/03"), Some(expected));
        assert_eq!(DateParser::parse("03-01-2025"), Some(expected));
        assert_eq!(DateParser::parse("2025-01-03 10:15:00"), Some(expected));
        assert_eq!(DateParser::parse("2025-01-03T10:15:00"), Some(expected));
        assert_eq!(DateParser::parse(" 2025-01-03 "), Some(expected));
    }

    #[test]
    fn test_date_parser_rejects_garbage() {
        assert_eq!(DateParser::parse(""), None);
        assert_eq!(DateParser::parse("yesterday"), None);
        assert_eq!(DateParser::parse("2025-13-40"), None);
    }

    // ── derive_line ───────────────────────────────────────────────────────────

    #[test]
    fn test_derive_line_populates_derived_fields() {
        let line = derive_line(&raw()).unwrap();
        assert!((line.line_revenue - 27.0).abs() < 1e-9);
        assert_eq!(line.day_of_week, Weekday::Fri);
        assert_eq!(line.channel, Channel::Online);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.discount, Discount::Fraction(0.1));
        assert!(line.customer_segment.is_none());
    }

    #[test]
    fn test_derive_line_transaction_id_alias() {
        let mut r = raw();
        r.order_id = None;
        r.transaction_id = Some("TXN-2025-0001".to_string());
        assert_eq!(derive_line(&r).unwrap().order_id, "TXN-2025-0001");
    }

    #[test]
    fn test_derive_line_discount_applied_amount() {
        let mut r = raw();
        r.discount = None;
        r.discount_applied = Some("2.0".to_string());
        let line = derive_line(&r).unwrap();
        assert_eq!(line.discount, Discount::Amount(2.0));
        assert!((line.line_revenue - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_derive_line_missing_quantity() {
        let mut r = raw();
        r.quantity = Some("  ".to_string());
        assert_eq!(derive_line(&r), Err(RowError::MissingField("quantity")));
    }

    #[test]
    fn test_derive_line_negative_quantity() {
        let mut r = raw();
        r.quantity = Some("-2".to_string());
        assert_eq!(derive_line(&r), Err(RowError::NonPositiveQuantity(-2)));
    }

    #[test]
    fn test_derive_line_fractional_quantity_rejected() {
        let mut r = raw();
        r.quantity = Some("2.5".to_string());
        assert!(matches!(
            derive_line(&r),
            Err(RowError::InvalidNumber { field: "quantity", .. })
        ));
        r.quantity = Some("2.0".to_string());
        assert_eq!(derive_line(&r).unwrap().quantity, 2);
    }

    #[test]
    fn test_derive_line_negative_price() {
        let mut r = raw();
        r.unit_price = Some("-1.25".to_string());
        assert_eq!(derive_line(&r), Err(RowError::NegativePrice(-1.25)));
    }

    #[test]
    fn test_derive_line_unparseable_price() {
        let mut r = raw();
        r.unit_price = Some("ten".to_string());
        assert!(matches!(
            derive_line(&r),
            Err(RowError::InvalidNumber { field: "unit_price", .. })
        ));
    }

    #[test]
    fn test_derive_line_bad_date() {
        let mut r = raw();
        r.date = Some("not-a-date".to_string());
        assert_eq!(
            derive_line(&r),
            Err(RowError::InvalidDate("not-a-date".to_string()))
        );
    }

    #[test]
    fn test_derive_line_discount_out_of_range() {
        let mut r = raw();
        r.discount = Some("1.5".to_string());
        assert_eq!(derive_line(&r), Err(RowError::DiscountOutOfRange(1.5)));
    }

    #[test]
    fn test_derive_line_unknown_channel() {
        let mut r = raw();
        r.channel = Some("Catalogue".to_string());
        assert_eq!(
            derive_line(&r),
            Err(RowError::UnknownChannel("Catalogue".to_string()))
        );
    }

    #[test]
    fn test_derive_line_optional_fields() {
        let mut r = raw();
        r.store_id = Some("S1".to_string());
        r.customer_id = Some("C042".to_string());
        r.customer_segment = Some("Loyal".to_string());
        let line = derive_line(&r).unwrap();
        assert_eq!(line.store_id.as_deref(), Some("S1"));
        assert_eq!(line.customer_id.as_deref(), Some("C042"));
        assert_eq!(line.customer_segment, Some(CustomerSegment::Loyal));
    }
}
