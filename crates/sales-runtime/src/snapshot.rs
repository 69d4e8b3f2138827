//! Everything the dashboard draws for one set of filter criteria.

use sales_core::filter::{apply_filters, FilterCriteria};
use sales_core::models::{Channel, CustomerSegment, Dimension, SalesLine};
use sales_data::aggregator::{AggregationResult, DailyRevenue, Kpis, SalesAggregator};
use sales_data::store::RecordStore;

/// Number of customers listed next to the top products.
pub const TOP_CUSTOMERS: usize = 5;

/// Filtered lines shown in the raw-data panel.
pub const SAMPLE_ROWS: usize = 20;

/// Filter and aggregation output for one dashboard frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub criteria: FilterCriteria,
    pub kpis: Kpis,
    pub by_store: AggregationResult,
    pub by_channel: AggregationResult,
    pub by_category: AggregationResult,
    pub by_segment: AggregationResult,
    pub daily_trend: Vec<DailyRevenue>,
    pub top_products: AggregationResult,
    pub top_customers: AggregationResult,
    /// First [`SAMPLE_ROWS`] filtered lines in file order.
    pub sample: Vec<SalesLine>,
    pub filtered_count: usize,
    pub total_count: usize,
}

impl DashboardSnapshot {
    /// Filter `store` by `criteria` and run every dashboard aggregation.
    ///
    /// Breakdowns cover the full option domain of the store, so a filter
    /// that matches nothing still lists every store, channel and category
    /// with zero revenue.
    pub fn compute(store: &RecordStore, criteria: &FilterCriteria, top_n: usize) -> Self {
        let overview = store.overview();
        let view = apply_filters(store.records(), criteria);

        let snapshot = Self {
            criteria: criteria.clone(),
            kpis: SalesAggregator::kpis(view.iter().copied()),
            by_store: SalesAggregator::aggregate_over(
                view.iter().copied(),
                Dimension::StoreLocation,
                overview.locations.iter().cloned(),
            ),
            by_channel: SalesAggregator::aggregate_over(
                view.iter().copied(),
                Dimension::Channel,
                Channel::ALL.iter().map(|c| c.as_str()),
            ),
            by_category: SalesAggregator::aggregate_over(
                view.iter().copied(),
                Dimension::ProductCategory,
                overview.categories.iter().cloned(),
            ),
            by_segment: SalesAggregator::aggregate_over(
                view.iter().copied(),
                Dimension::CustomerSegment,
                CustomerSegment::ALL.iter().map(|s| s.as_str()),
            ),
            daily_trend: SalesAggregator::daily_trend(view.iter().copied()),
            top_products: SalesAggregator::top_products(view.iter().copied(), top_n),
            top_customers: SalesAggregator::top_n(
                view.iter().copied().filter(|line| line.customer_id.is_some()),
                Dimension::CustomerId,
                TOP_CUSTOMERS,
            ),
            sample: view.iter().take(SAMPLE_ROWS).map(|line| (*line).clone()).collect(),
            filtered_count: view.len(),
            total_count: store.len(),
        };

        tracing::debug!(
            filtered = snapshot.filtered_count,
            total = snapshot.total_count,
            revenue = snapshot.kpis.total_revenue,
            "dashboard snapshot computed"
        );
        snapshot
    }

    /// `true` when the criteria excluded every line.
    pub fn is_empty(&self) -> bool {
        self.filtered_count == 0
    }
}
