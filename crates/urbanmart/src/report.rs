//! Plain-text report sections shared by summary mode and the console menu.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use sales_core::formatting::{format_currency, format_number};
use sales_core::models::{Channel, Dimension};
use sales_data::aggregator::{AggregationResult, SalesAggregator};
use sales_data::quality::DataQualityReport;
use sales_data::store::RecordStore;

/// Customers listed in the summary tables.
pub const SUMMARY_TOP_CUSTOMERS: usize = 10;

// ── TextTable ─────────────────────────────────────────────────────────────────

/// Column-aligned text table padded by display width, so product names with
/// accents or wide characters line up.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    right_aligned: Vec<bool>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let right_aligned = vec![false; headers.len()];
        Self {
            headers,
            right_aligned,
            rows: Vec::new(),
        }
    }

    pub fn align_right(mut self, column: usize) -> Self {
        if let Some(flag) = self.right_aligned.get_mut(column) {
            *flag = true;
        }
        self
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.width());
                }
            }
        }

        let mut out = String::new();
        out.push_str(&self.render_row(&self.headers, &widths));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(rule.join("  ").trim_end());
        out.push('\n');
        for row in &self.rows {
            out.push_str(&self.render_row(row, &widths));
            out.push('\n');
        }
        out
    }

    fn render_row(&self, cells: &[String], widths: &[usize]) -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let fill = " ".repeat(width.saturating_sub(cell.width()));
                if self.right_aligned.get(i).copied().unwrap_or(false) {
                    format!("{fill}{cell}")
                } else {
                    format!("{cell}{fill}")
                }
            })
            .collect();
        padded.join("  ").trim_end().to_string()
    }
}

/// Two-column `key | revenue` table for an aggregation.
pub fn revenue_table(result: &AggregationResult) -> TextTable {
    let mut table = TextTable::new([result.dimension.label(), "Revenue"]).align_right(1);
    for group in result.iter() {
        table.push_row([group.key.clone(), format_currency(group.revenue)]);
    }
    table
}

// ── Report sections ───────────────────────────────────────────────────────────

pub fn print_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Welcome to UrbanMart Sales Analysis")?;
    writeln!(out, "{}", "-".repeat(50))
}

/// Warn about skipped rows; prints nothing for a clean load.
pub fn print_load_warning<W: Write>(out: &mut W, report: &DataQualityReport) -> io::Result<()> {
    if report.has_issues() {
        writeln!(out, "\n[WARNING] {}", report.summary_line())?;
    }
    Ok(())
}

pub fn print_channel_counts<W: Write>(out: &mut W, store: &RecordStore) -> io::Result<()> {
    writeln!(out, "\n[Channel Counts]")?;
    for (channel, count) in SalesAggregator::channel_counts(store.records()) {
        let label = match channel {
            Channel::Online => "Online transactions  ",
            Channel::InStore => "In-store transactions",
        };
        writeln!(out, "{label}: {count}")?;
    }
    Ok(())
}

pub fn print_sanity_checks<W: Write>(out: &mut W, store: &RecordStore) -> io::Result<()> {
    let overview = store.overview();

    writeln!(out, "\n[Basic Sanity Checks]")?;
    writeln!(out, "Total number of rows: {}", overview.row_count)?;

    let ids: Vec<&str> = overview.store_ids().collect();
    if ids.is_empty() {
        writeln!(out, "Unique store IDs: none recorded")?;
    } else {
        writeln!(out, "Unique store IDs: {}", ids.join(", "))?;
    }

    match overview.date_range {
        Some((start, end)) => writeln!(out, "Date range: {start} to {end}")?,
        None => writeln!(out, "Date range: not available")?,
    }

    let categories: Vec<&str> = overview.categories.iter().map(String::as_str).collect();
    writeln!(out, "Product categories: {}", categories.join(", "))?;

    if !overview.store_locations_by_id.is_empty() {
        writeln!(out, "Store mapping (store_id -> store_location):")?;
        for (id, location) in &overview.store_locations_by_id {
            writeln!(out, "  {id} -> {location}")?;
        }
    }
    Ok(())
}

pub fn print_summary_tables<W: Write>(out: &mut W, store: &RecordStore) -> io::Result<()> {
    let records = store.records();
    writeln!(out, "\n[Summary Tables]")?;

    for (title, dimension) in [
        ("Revenue by Category", Dimension::ProductCategory),
        ("Revenue by Store Location", Dimension::StoreLocation),
    ] {
        writeln!(out, "\n{title}:")?;
        write!(out, "{}", revenue_table(&SalesAggregator::aggregate(records, dimension)).render())?;
    }

    writeln!(out, "\nRevenue by Channel:")?;
    let by_channel = SalesAggregator::aggregate(records, Dimension::Channel);
    write!(out, "{}", revenue_table(&by_channel).render())?;

    writeln!(out, "\nTop Customers by Revenue:")?;
    let identified = records.iter().filter(|line| line.customer_id.is_some());
    let customers = SalesAggregator::top_n(identified, Dimension::CustomerId, SUMMARY_TOP_CUSTOMERS);
    if customers.is_empty() {
        writeln!(out, "No customer ids recorded.")
    } else {
        write!(out, "{}", revenue_table(&customers).render())
    }
}

/// Detailed data-quality report: counts per problem kind and sample rows.
pub fn print_data_quality<W: Write>(out: &mut W, report: &DataQualityReport) -> io::Result<()> {
    writeln!(out, "\n[Data Quality]")?;
    writeln!(out, "{}", report.summary_line())?;
    if !report.has_issues() {
        return Ok(());
    }

    let mut kinds = TextTable::new(["Problem", "Rows"]).align_right(1);
    for (kind, count) in &report.issues_by_kind {
        kinds.push_row([kind.to_string(), format_number(*count as f64, 0)]);
    }
    write!(out, "{}", kinds.render())?;

    writeln!(out, "\nFirst skipped rows:")?;
    for issue in &report.samples {
        writeln!(out, "  line {}: {}", issue.line, issue.message)?;
    }
    Ok(())
}

/// Everything printed before the console menu, and all of summary mode.
pub fn print_full_report<W: Write>(out: &mut W, store: &RecordStore) -> io::Result<()> {
    print_banner(out)?;
    print_load_warning(out, store.report())?;
    print_channel_counts(out, store)?;
    print_sanity_checks(out, store)?;
    print_summary_tables(out, store)?;
    out.flush()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sales_data::reader::read_sales;
    use std::path::Path;

    fn sample_store() -> RecordStore {
        let csv = "\
order_id,date,store_id,store_location,channel,product_category,product_name,quantity,unit_price,discount,customer_id,customer_segment
T1,2025-01-01,S1,Downtown,Online,Snacks,Chips,3,10.0,0.1,C1,Loyal
T2,2025-01-01,S2,Uptown,In-store,Beverages,Cola,2,2.5,,C2,New
T3,2025-01-02,S1,Downtown,In-store,Beverages,Café Latte,4,2.5,,C1,Loyal
T4,2025-01-03,S3,Suburban,Online,Bakery,Bagel,not-a-number,1.5,,C3,Regular
";
        read_sales(csv.as_bytes(), Path::new("<test>")).unwrap()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_table_pads_by_display_width() {
        let mut table = TextTable::new(["Product", "Revenue"]).align_right(1);
        table.push_row(["Café Latte", "$10.00"]);
        table.push_row(["Chips", "$27.00"]);
        let text = table.render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Product     Revenue");
        assert_eq!(lines[1], "----------  -------");
        assert_eq!(lines[2], "Café Latte   $10.00");
        assert_eq!(lines[3], "Chips        $27.00");
    }

    #[test]
    fn test_banner() {
        let text = render(|out| print_banner(out));
        assert!(text.starts_with("Welcome to UrbanMart Sales Analysis\n"));
        assert!(text.contains(&"-".repeat(50)));
    }

    #[test]
    fn test_sanity_checks() {
        let store = sample_store();
        let text = render(|out| print_sanity_checks(out, &store));
        assert!(text.contains("Total number of rows: 3"));
        assert!(text.contains("Unique store IDs: S1, S2"));
        assert!(text.contains("Date range: 2025-01-01 to 2025-01-02"));
        assert!(text.contains("Product categories: Beverages, Snacks"));
        assert!(text.contains("  S1 -> Downtown"));
    }

    #[test]
    fn test_channel_counts() {
        let store = sample_store();
        let text = render(|out| print_channel_counts(out, &store));
        assert!(text.contains("Online transactions  : 1"));
        assert!(text.contains("In-store transactions: 2"));
    }

    #[test]
    fn test_load_warning_and_quality_report() {
        let store = sample_store();
        let warning = render(|out| print_load_warning(out, store.report()));
        assert!(warning.contains("3 of 4 rows loaded, 1 skipped"));

        let details = render(|out| print_data_quality(out, store.report()));
        assert!(details.contains("line 5:"));
    }

    #[test]
    fn test_full_report_sections() {
        let store = sample_store();
        let text = render(|out| print_full_report(out, &store));
        for heading in [
            "[Channel Counts]",
            "[Basic Sanity Checks]",
            "Revenue by Category:",
            "Revenue by Store Location:",
            "Revenue by Channel:",
            "Top Customers by Revenue:",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
        // C1: 27 + 10
        assert!(text.contains("$37.00"));
    }

    fn anonymous_store() -> RecordStore {
        let csv = "\
order_id,date,store_location,channel,product_category,product_name,quantity,unit_price
T1,2025-01-01,Downtown,Online,Snacks,Chips,1,5.0
T2,2025-01-02,Uptown,In-store,Snacks,Chips,1,5.0
";
        read_sales(csv.as_bytes(), Path::new("<test>")).unwrap()
    }

    #[test]
    fn test_top_customers_skipped_without_customer_ids() {
        let store = anonymous_store();
        let text = render(|out| print_summary_tables(out, &store));
        let customers = &text[text.find("Top Customers by Revenue:").unwrap()..];
        assert!(customers.contains("No customer ids recorded."));
        assert!(!customers.contains("Unknown"));
    }

    #[test]
    fn test_channel_table_keeps_first_seen_order_on_ties() {
        let store = anonymous_store();
        let text = render(|out| print_summary_tables(out, &store));
        let start = text.find("Revenue by Channel:").unwrap();
        let end = text.find("Top Customers by Revenue:").unwrap();
        let section = &text[start..end];
        assert!(section.find("Online").unwrap() < section.find("In-store").unwrap());
    }
}
