//! The in-memory record store and its overview.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sales_core::models::{Channel, CustomerSegment, SalesLine};
use serde::Serialize;

use crate::quality::DataQualityReport;

/// Every valid sales line from one source, in file order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    source: Option<PathBuf>,
    records: Vec<SalesLine>,
    report: DataQualityReport,
}

impl RecordStore {
    pub fn new(records: Vec<SalesLine>, report: DataQualityReport) -> Self {
        Self {
            source: None,
            records,
            report,
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn records(&self) -> &[SalesLine] {
        &self.records
    }

    pub fn report(&self) -> &DataQualityReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sanity-check summary and the option lists the dashboard offers.
    pub fn overview(&self) -> Overview {
        let mut overview = Overview {
            row_count: self.records.len(),
            ..Overview::default()
        };

        for line in &self.records {
            overview.date_range = Some(match overview.date_range {
                None => (line.date, line.date),
                Some((lo, hi)) => (lo.min(line.date), hi.max(line.date)),
            });
            overview.locations.insert(line.store_location.clone());
            overview.categories.insert(line.product_category.clone());
            overview.channels.insert(line.channel);
            if let Some(seg) = line.customer_segment {
                overview.segments.insert(seg);
            }
            if let Some(id) = &line.store_id {
                overview
                    .store_locations_by_id
                    .entry(id.clone())
                    .or_insert_with(|| line.store_location.clone());
            }
        }

        overview
    }
}

/// Distinct values and bounds observed across a [`RecordStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overview {
    pub row_count: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// First location seen for each store id.
    pub store_locations_by_id: BTreeMap<String, String>,
    pub locations: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub channels: BTreeSet<Channel>,
    pub segments: BTreeSet<CustomerSegment>,
}

impl Overview {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.date_range.map(|(s, _)| s)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.date_range.map(|(_, e)| e)
    }

    pub fn store_ids(&self) -> impl Iterator<Item = &str> {
        self.store_locations_by_id.keys().map(String::as_str)
    }
}
