//! Group-and-sum over filtered sales views.
//!
//! Every operation takes any iterator of borrowed lines, so it works equally
//! on a full record slice and on the output of
//! [`apply_filters`](sales_core::filter::apply_filters).

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use sales_core::models::{Channel, Dimension, SalesLine};
use serde::Serialize;

/// Default length of the top-products ranking.
pub const DEFAULT_TOP_N: usize = 5;

// ── GroupTotal ────────────────────────────────────────────────────────────────

/// Revenue and volume accumulated for one dimension value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub revenue: f64,
    pub lines: usize,
    pub quantity: u64,
}

impl GroupTotal {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    fn add_line(&mut self, line: &SalesLine) {
        self.revenue += line.line_revenue;
        self.lines += 1;
        self.quantity += u64::from(line.quantity);
    }
}

// ── AggregationResult ─────────────────────────────────────────────────────────

/// Dimension values ranked by summed revenue, highest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub dimension: Dimension,
    pub groups: Vec<GroupTotal>,
}

impl AggregationResult {
    /// Sum of revenue over every group.
    pub fn total(&self) -> f64 {
        self.groups.iter().map(|g| g.revenue).sum()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&GroupTotal> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupTotal> {
        self.groups.iter()
    }

    /// Revenue of the top group, or `0.0`; used to scale bar charts.
    pub fn max_revenue(&self) -> f64 {
        self.groups.iter().map(|g| g.revenue).fold(0.0, f64::max)
    }
}

// ── Kpis / DailyRevenue ───────────────────────────────────────────────────────

/// Headline numbers for a filtered view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total_revenue: f64,
    pub line_count: usize,
    /// Distinct `order_id` values.
    pub transaction_count: usize,
    /// `total_revenue / transaction_count`, `0.0` with no transactions.
    pub average_order_value: f64,
    /// Distinct non-empty `customer_id` values.
    pub unique_customers: usize,
    pub units_sold: u64,
}

/// Revenue on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups sales lines and ranks the groups.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Group by `dimension`, sum revenue, sort descending.
    ///
    /// Groups with equal revenue keep the order in which their key was first
    /// seen, so the ranking is deterministic for a given input order.
    pub fn aggregate<'a, I>(records: I, dimension: Dimension) -> AggregationResult
    where
        I: IntoIterator<Item = &'a SalesLine>,
    {
        Self::aggregate_over(records, dimension, std::iter::empty::<String>())
    }

    /// Like [`aggregate`](Self::aggregate), but every value of `domain`
    /// appears in the result even when no line carries it.
    ///
    /// Domain values are seeded first, in the given order, so an empty view
    /// yields all-zero groups in domain order.
    pub fn aggregate_over<'a, I, D, S>(records: I, dimension: Dimension, domain: D) -> AggregationResult
    where
        I: IntoIterator<Item = &'a SalesLine>,
        D: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut groups: Vec<GroupTotal> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for key in domain {
            let key: String = key.into();
            if !index.contains_key(&key) {
                index.insert(key.clone(), groups.len());
                groups.push(GroupTotal::new(key));
            }
        }

        for line in records {
            let key = dimension.key(line);
            let slot = match index.get(key) {
                Some(&i) => i,
                None => {
                    index.insert(key.to_string(), groups.len());
                    groups.push(GroupTotal::new(key));
                    groups.len() - 1
                }
            };
            groups[slot].add_line(line);
        }

        // `sort_by` is stable: ties keep first-seen order.
        groups.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));

        AggregationResult { dimension, groups }
    }

    /// The `n` best-selling products by revenue; ties broken by name.
    pub fn top_products<'a, I>(records: I, n: usize) -> AggregationResult
    where
        I: IntoIterator<Item = &'a SalesLine>,
    {
        Self::top_n(records, Dimension::ProductName, n)
    }

    /// The `n` highest-revenue values of `dimension`, ties broken by key
    /// ascending.
    pub fn top_n<'a, I>(records: I, dimension: Dimension, n: usize) -> AggregationResult
    where
        I: IntoIterator<Item = &'a SalesLine>,
    {
        let mut result = Self::aggregate(records, dimension);
        result
            .groups
            .sort_by(|a, b| b.revenue.total_cmp(&a.revenue).then_with(|| a.key.cmp(&b.key)));
        result.groups.truncate(n);
        result
    }

    /// Revenue per calendar day, ascending by date.
    pub fn daily_trend<'a, I>(records: I) -> Vec<DailyRevenue>
    where
        I: IntoIterator<Item = &'a SalesLine>,
    {
        let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for line in records {
            *by_day.entry(line.date).or_insert(0.0) += line.line_revenue;
        }
        by_day
            .into_iter()
            .map(|(date, revenue)| DailyRevenue { date, revenue })
            .collect()
    }

    pub fn kpis<'a, I>(records: I) -> Kpis
    where
        I: IntoIterator<Item = &'a SalesLine>,
    {
        let mut kpis = Kpis::default();
        let mut orders: HashSet<&str> = HashSet::new();
        let mut customers: HashSet<&str> = HashSet::new();

        for line in records {
            kpis.total_revenue += line.line_revenue;
            kpis.line_count += 1;
            kpis.units_sold += u64::from(line.quantity);
            orders.insert(&line.order_id);
            if let Some(id) = line.customer_id.as_deref() {
                customers.insert(id);
            }
        }

        kpis.transaction_count = orders.len();
        kpis.unique_customers = customers.len();
        if kpis.transaction_count > 0 {
            kpis.average_order_value = kpis.total_revenue / kpis.transaction_count as f64;
        }
        kpis
    }

    /// Line counts per channel; both channels are always present.
    pub fn channel_counts<'a, I>(records: I) -> Vec<(Channel, usize)>
    where
        I: IntoIterator<Item = &'a SalesLine>,
    {
        let mut counts: Vec<(Channel, usize)> = Channel::ALL.iter().map(|&c| (c, 0)).collect();
        for line in records {
            if let Some(slot) = counts.iter_mut().find(|(c, _)| *c == line.channel) {
                slot.1 += 1;
            }
        }
        counts
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
