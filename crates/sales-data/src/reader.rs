//! CSV loading for UrbanMart sales files.
//!
//! Reads the flat sales file, checks the header for the required columns,
//! derives every row into a [`SalesLine`] and quarantines the rows that fail
//! in a [`DataQualityReport`].

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use sales_core::derive::derive_line;
use sales_core::error::{Result, RowError, SalesError};
use sales_core::models::{RawSalesRow, SalesLine};
use tracing::{debug, warn};

use crate::quality::DataQualityReport;
use crate::store::RecordStore;

/// Columns every data file must carry. `order_id` may be spelled
/// `transaction_id`.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "order_id",
    "date",
    "store_location",
    "channel",
    "product_category",
    "product_name",
    "quantity",
    "unit_price",
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `path` into a [`RecordStore`].
///
/// A missing or unreadable file and a header without the required columns are
/// fatal. Individual bad rows are skipped and counted.
pub fn load_sales_file(path: &Path) -> Result<RecordStore> {
    let file = std::fs::File::open(path).map_err(|source| SalesError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let store = read_sales(file, path)?.with_source(path);

    let report = store.report();
    if report.has_issues() {
        warn!(
            "Skipped {} malformed rows in {} ({})",
            report.rows_skipped(),
            path.display(),
            report.summary_line()
        );
    }
    debug!("{}: {}", path.display(), report.summary_line());

    Ok(store)
}

/// Parse CSV text from any reader. `origin` is only used in error messages.
pub fn read_sales<R: Read>(source: R, origin: &Path) -> Result<RecordStore> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let headers: StringRecord = rdr.headers()?.iter().map(normalize_header).collect();
    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        return Err(SalesError::MissingColumns {
            path: origin.to_path_buf(),
            columns: missing,
        });
    }
    rdr.set_headers(headers.clone());

    let mut records: Vec<SalesLine> = Vec::new();
    let mut report = DataQualityReport::default();

    for (index, result) in rdr.records().enumerate() {
        // Header is line 1; fall back to the row index if the parser has no position.
        let fallback_line = index as u64 + 2;
        match result {
            Ok(record) => {
                let line_no = record.position().map_or(fallback_line, |p| p.line());
                match parse_record(&record, &headers) {
                    Ok(line) => {
                        records.push(line);
                        report.record_loaded();
                    }
                    Err(e) => {
                        debug!("Skipping line {}: {}", line_no, e);
                        report.record_issue(line_no, &e);
                    }
                }
            }
            Err(e) => {
                let line_no = e.position().map_or(fallback_line, |p| p.line());
                let row_err = RowError::Malformed(e.to_string());
                debug!("Skipping line {}: {}", line_no, row_err);
                report.record_issue(line_no, &row_err);
            }
        }
    }

    Ok(RecordStore::new(records, report))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Lowercase, trim, strip a BOM and turn inner spaces into underscores.
fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

fn missing_columns(headers: &StringRecord) -> Vec<String> {
    let has = |name: &str| headers.iter().any(|h| h == name);
    REQUIRED_COLUMNS
        .iter()
        .filter(|&&col| {
            if col == "order_id" {
                !has("order_id") && !has("transaction_id")
            } else {
                !has(col)
            }
        })
        .map(|col| col.to_string())
        .collect()
}

fn parse_record(record: &StringRecord, headers: &StringRecord) -> std::result::Result<SalesLine, RowError> {
    let raw: RawSalesRow = record
        .deserialize(Some(headers))
        .map_err(|e| RowError::Malformed(e.to_string()))?;
    derive_line(&raw)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core::models::{Channel, CustomerSegment, Discount};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    const HEADER: &str = "order_id,date,store_location,channel,product_category,product_name,quantity,unit_price,discount,customer_segment";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    // ── load_sales_file ───────────────────────────────────────────────────────

    #[test]
    fn test_load_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "sales.csv",
            &[
                HEADER,
                "T1,2025-01-06,Downtown,Online,Snacks,Chips,3,10.0,0.1,Loyal",
                "T2,2025-01-07,Uptown,In-store,Beverages,Cola,2,1.5,,",
            ],
        );

        let store = load_sales_file(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.source(), Some(path.as_path()));
        assert!(!store.report().has_issues());

        let first = &store.records()[0];
        assert_eq!(first.order_id, "T1");
        assert_eq!(first.channel, Channel::Online);
        assert_eq!(first.discount, Discount::Fraction(0.1));
        assert_eq!(first.customer_segment, Some(CustomerSegment::Loyal));
        assert!((first.line_revenue - 27.0).abs() < 1e-9);

        let second = &store.records()[1];
        assert_eq!(second.discount, Discount::None);
        assert!(second.customer_segment.is_none());
        assert!((second.line_revenue - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file_is_file_read_error() {
        let dir = TempDir::new().unwrap();
        let err = load_sales_file(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, SalesError::FileRead { .. }));
    }

    #[test]
    fn test_missing_columns_are_reported_together() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "sales.csv",
            &["order_id,date,store_location,channel,product_category", "T1,2025-01-01,A,Online,Snacks"],
        );
        match load_sales_file(&path).unwrap_err() {
            SalesError::MissingColumns { columns, .. } => {
                assert_eq!(columns, vec!["product_name", "quantity", "unit_price"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_is_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "empty.csv", &[]);
        assert!(matches!(
            load_sales_file(&path),
            Err(SalesError::MissingColumns { .. })
        ));
    }

    #[test]
    fn test_headers_are_normalized_and_transaction_id_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "sales.csv",
            &[
                " Transaction_ID , Date ,Store Location,CHANNEL,product_category,product_name,quantity,unit_price,discount_applied,store_id,customer_id",
                "TX9,2025/02/01,Airport,instore,Bakery,Bagel,4,2.5,1.0,S7,C42",
            ],
        );
        let store = load_sales_file(&path).unwrap();
        assert_eq!(store.len(), 1);
        let line = &store.records()[0];
        assert_eq!(line.order_id, "TX9");
        assert_eq!(line.store_location, "Airport");
        assert_eq!(line.channel, Channel::InStore);
        assert_eq!(line.discount, Discount::Amount(1.0));
        assert!((line.line_revenue - 9.0).abs() < 1e-9);
        assert_eq!(line.store_id.as_deref(), Some("S7"));
        assert_eq!(line.customer_id.as_deref(), Some("C42"));
    }

    #[test]
    fn test_malformed_rows_are_skipped_and_counted() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "sales.csv",
            &[
                HEADER,
                "T1,2025-01-01,Downtown,Online,Snacks,Chips,1,2.0,,",
                "T2,not-a-date,Downtown,Online,Snacks,Chips,1,2.0,,",
                "T3,2025-01-02,Downtown,Online,Snacks,Chips,0,2.0,,",
                "T4,2025-01-03,Downtown,Drone,Snacks,Chips,1,2.0,,",
                "T5,2025-01-04,Downtown,Online,Snacks,Chips,abc,2.0,,",
                "T6,2025-01-05,Downtown,Online,Snacks,Chips,1,2.0,1.7,",
                "T7,2025-01-06",
                "T8,2025-01-07,Uptown,Online,Snacks,Chips,2,2.0,,",
            ],
        );

        let store = load_sales_file(&path).unwrap();
        let ids: Vec<&str> = store.records().iter().map(|l| l.order_id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T8"]);

        let report = store.report();
        assert_eq!(report.rows_read, 8);
        assert_eq!(report.rows_loaded, 2);
        assert_eq!(report.rows_skipped(), 6);
        assert_eq!(report.issues_by_kind.get("invalid_date"), Some(&1));
        assert_eq!(report.issues_by_kind.get("non_positive_quantity"), Some(&1));
        assert_eq!(report.issues_by_kind.get("unknown_channel"), Some(&1));
        assert_eq!(report.issues_by_kind.get("invalid_number"), Some(&1));
        assert_eq!(report.issues_by_kind.get("invalid_discount"), Some(&1));
        assert_eq!(report.issues_by_kind.get("missing_field"), Some(&1));

        let lines: Vec<u64> = report.samples.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_records_keep_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "sales.csv",
            &[
                HEADER,
                "T3,2025-03-01,A,Online,Snacks,Chips,1,1.0,,",
                "T1,2025-01-01,A,Online,Snacks,Chips,1,1.0,,",
                "T2,2025-02-01,A,Online,Snacks,Chips,1,1.0,,",
            ],
        );
        let store = load_sales_file(&path).unwrap();
        let ids: Vec<&str> = store.records().iter().map(|l| l.order_id.as_str()).collect();
        assert_eq!(ids, vec!["T3", "T1", "T2"]);
    }

    #[test]
    fn test_read_sales_from_memory() {
        let data = format!("{HEADER}\nT1,2025-01-01,A,Online,Snacks,Chips,2,5.0,0.5,New\n");
        let store = read_sales(data.as_bytes(), Path::new("<memory>")).unwrap();
        assert_eq!(store.len(), 1);
        assert!((store.records()[0].line_revenue - 5.0).abs() < 1e-9);
        assert!(store.source().is_none());
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff}Order_ID"), "order_id");
        assert_eq!(normalize_header("  Store Location "), "store_location");
    }
}
