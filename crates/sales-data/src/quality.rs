//! Data-quality bookkeeping for rows rejected during load.

use std::collections::BTreeMap;

use sales_core::error::RowError;
use serde::Serialize;

/// How many individual issues are kept verbatim for display.
pub const MAX_SAMPLES: usize = 10;

/// One rejected row, with its 1-based line number in the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    pub line: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Summary of what a load kept and what it skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataQualityReport {
    pub rows_read: usize,
    pub rows_loaded: usize,
    pub issues_by_kind: BTreeMap<&'static str, usize>,
    pub samples: Vec<RowIssue>,
}

impl DataQualityReport {
    /// Count a successfully derived row.
    pub fn record_loaded(&mut self) {
        self.rows_read += 1;
        self.rows_loaded += 1;
    }

    /// Count a rejected row; the first [`MAX_SAMPLES`] are kept as samples.
    pub fn record_issue(&mut self, line: u64, error: &RowError) {
        self.rows_read += 1;
        *self.issues_by_kind.entry(error.kind()).or_insert(0) += 1;
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(RowIssue {
                line,
                kind: error.kind(),
                message: error.to_string(),
            });
        }
    }

    pub fn rows_skipped(&self) -> usize {
        self.rows_read - self.rows_loaded
    }

    pub fn has_issues(&self) -> bool {
        self.rows_skipped() > 0
    }

    /// `"998 of 1000 rows loaded, 2 skipped"`.
    pub fn summary_line(&self) -> String {
        format!(
            "{} of {} rows loaded, {} skipped",
            self.rows_loaded,
            self.rows_read,
            self.rows_skipped()
        )
    }
}
