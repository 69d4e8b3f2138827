//! Filter engine: conjunctive criteria over sales lines.
//!
//! Each criterion restricts one field; an absent date bound or an empty
//! selection set places no restriction. Within a selection set the values are
//! alternatives (OR); across criteria every restriction must hold (AND).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Channel, CustomerSegment, SalesLine};

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// The set of predicates active for one filtered view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub store_locations: BTreeSet<String>,
    pub channels: BTreeSet<Channel>,
    pub product_categories: BTreeSet<String>,
    /// Lines without a segment never match a non-empty segment selection.
    pub customer_segments: BTreeSet<CustomerSegment>,
}

impl FilterCriteria {
    /// Criteria that match every line.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range = DateRange::new(start, end);
        self
    }

    pub fn with_store_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store_locations = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_channels<I: IntoIterator<Item = Channel>>(mut self, channels: I) -> Self {
        self.channels = channels.into_iter().collect();
        self
    }

    pub fn with_product_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_customer_segments<I: IntoIterator<Item = CustomerSegment>>(
        mut self,
        segments: I,
    ) -> Self {
        self.customer_segments = segments.into_iter().collect();
        self
    }

    /// `true` when no criterion restricts anything.
    pub fn is_empty(&self) -> bool {
        self.date_range.is_unbounded()
            && self.store_locations.is_empty()
            && self.channels.is_empty()
            && self.product_categories.is_empty()
            && self.customer_segments.is_empty()
    }

    /// Per-line predicate.
    pub fn matches(&self, line: &SalesLine) -> bool {
        if !self.date_range.contains(line.date) {
            return false;
        }
        if !self.store_locations.is_empty() && !self.store_locations.contains(&line.store_location) {
            return false;
        }
        if !self.channels.is_empty() && !self.channels.contains(&line.channel) {
            return false;
        }
        if !self.product_categories.is_empty()
            && !self.product_categories.contains(&line.product_category)
        {
            return false;
        }
        if !self.customer_segments.is_empty() {
            match line.customer_segment {
                Some(seg) if self.customer_segments.contains(&seg) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Return the lines of `records` that satisfy `criteria`, in input order.
///
/// Accepts either a slice of owned lines or a previous filtered view, so
/// filters compose without copying records:
///
/// ```
/// use sales_core::filter::{apply_filters, FilterCriteria};
/// use sales_core::models::SalesLine;
///
/// let records: Vec<SalesLine> = Vec::new();
/// let criteria = FilterCriteria::new();
/// let once = apply_filters(&records, &criteria);
/// let twice = apply_filters(once.iter().copied(), &criteria);
/// assert_eq!(once, twice);
/// ```
pub fn apply_filters<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a SalesLine>
where
    I: IntoIterator<Item = &'a SalesLine>,
{
    records
        .into_iter()
        .filter(|line| criteria.matches(line))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::line_revenue;
    use crate::models::Discount;
    use chrono::Datelike;

    fn make_line(
        date: (i32, u32, u32),
        store: &str,
        channel: Channel,
        category: &str,
        segment: Option<CustomerSegment>,
    ) -> SalesLine {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        SalesLine {
            order_id: format!("{store}-{date}"),
            date,
            store_id: None,
            store_location: store.to_string(),
            channel,
            product_category: category.to_string(),
            product_name: format!("{category} item"),
            quantity: 1,
            unit_price: 10.0,
            discount: Discount::None,
            customer_id: None,
            customer_segment: segment,
            line_revenue: line_revenue(1, 10.0, Discount::None),
            day_of_week: date.weekday(),
        }
    }

    fn sample() -> Vec<SalesLine> {
        vec![
            make_line((2025, 1, 1), "Downtown", Channel::Online, "Snacks", Some(CustomerSegment::New)),
            make_line((2025, 1, 5), "Uptown", Channel::InStore, "Beverages", Some(CustomerSegment::Loyal)),
            make_line((2025, 1, 10), "Suburban", Channel::Online, "Personal Care", None),
            make_line((2025, 1, 15), "Downtown", Channel::InStore, "Beverages", Some(CustomerSegment::Regular)),
            make_line((2025, 1, 20), "Uptown", Channel::Online, "Snacks", Some(CustomerSegment::Loyal)),
        ]
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_empty_criteria_returns_all_records_in_order() {
        let records = sample();
        let criteria = FilterCriteria::new();
        assert!(criteria.is_empty());
        let out = apply_filters(&records, &criteria);
        assert_eq!(out.len(), records.len());
        for (a, b) in out.iter().zip(records.iter()) {
            assert!(std::ptr::eq(*a, b));
        }
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let records = sample();
        let criteria = FilterCriteria::new().with_date_range(Some(d(2025, 1, 5)), Some(d(2025, 1, 15)));
        let out = apply_filters(&records, &criteria);
        let dates: Vec<NaiveDate> = out.iter().map(|l| l.date).collect();
        assert_eq!(dates, vec![d(2025, 1, 5), d(2025, 1, 10), d(2025, 1, 15)]);
    }

    #[test]
    fn test_open_ended_date_range() {
        let records = sample();
        let from = FilterCriteria::new().with_date_range(Some(d(2025, 1, 15)), None);
        assert_eq!(apply_filters(&records, &from).len(), 2);
        let until = FilterCriteria::new().with_date_range(None, Some(d(2025, 1, 1)));
        assert_eq!(apply_filters(&records, &until).len(), 1);
    }

    #[test]
    fn test_values_within_one_criterion_are_or() {
        let records = sample();
        let criteria = FilterCriteria::new().with_store_locations(["Downtown", "Suburban"]);
        assert_eq!(apply_filters(&records, &criteria).len(), 3);
    }

    #[test]
    fn test_criteria_are_and() {
        let records = sample();
        let criteria = FilterCriteria::new()
            .with_store_locations(["Downtown", "Uptown"])
            .with_channels([Channel::Online])
            .with_product_categories(["Snacks"]);
        let out = apply_filters(&records, &criteria);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|l| l.channel == Channel::Online && l.product_category == "Snacks"));
    }

    #[test]
    fn test_segment_filter_excludes_lines_without_segment() {
        let records = sample();
        let criteria = FilterCriteria::new()
            .with_customer_segments([CustomerSegment::Loyal, CustomerSegment::Regular]);
        let out = apply_filters(&records, &criteria);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|l| l.customer_segment.is_some()));
    }

    #[test]
    fn test_filter_matching_nothing_is_empty_not_error() {
        let records = sample();
        let criteria = FilterCriteria::new().with_store_locations(["Airport"]);
        assert!(apply_filters(&records, &criteria).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample();
        let criteria = FilterCriteria::new()
            .with_date_range(Some(d(2025, 1, 2)), None)
            .with_channels([Channel::Online, Channel::InStore])
            .with_product_categories(["Beverages", "Snacks"]);
        let once = apply_filters(&records, &criteria);
        let twice = apply_filters(once.iter().copied(), &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let records = sample();
        let before = records.clone();
        let criteria = FilterCriteria::new().with_channels([Channel::InStore]);
        let _ = apply_filters(&records, &criteria);
        assert_eq!(records, before);
    }
}
