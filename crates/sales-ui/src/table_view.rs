//! Tables and the error panel for the dashboard.
//!
//! Ranked tables are a bordered [`ratatui::widgets::Table`] with one row per
//! group plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use sales_core::formatting::{format_currency, format_number, percentage};
use sales_core::models::SalesLine;
use sales_data::aggregator::AggregationResult;

use crate::themes::Theme;

/// Render a ranked revenue table for `result` into `area`.
///
/// `key_header` names the first column (e.g. `"Product"`). Shares are taken
/// against `grand_total`, the revenue of the whole filtered view, so a top-N
/// table shows each entry's share of all sales rather than of the top N.
pub fn render_ranked_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    key_header: &str,
    result: &AggregationResult,
    grand_total: f64,
    theme: &Theme,
) {
    let header_cells = ["#", key_header, "Revenue", "Units", "Lines", "Share"]
        .into_iter()
        .map(|h| Cell::from(h.to_string()).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let mut rows: Vec<Row> = result
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(group.key.clone()),
                Cell::from(format_currency(group.revenue)),
                Cell::from(format_number(group.quantity as f64, 0)),
                Cell::from(format_number(group.lines as f64, 0)),
                Cell::from(format!("{:.1}%", percentage(group.revenue, grand_total, 1))),
            ])
            .style(style)
        })
        .collect();

    let shown = result.total();
    rows.push(
        Row::new(vec![
            Cell::from(""),
            Cell::from("TOTAL"),
            Cell::from(format_currency(shown)),
            Cell::from(format_number(result.iter().map(|g| g.quantity).sum::<u64>() as f64, 0)),
            Cell::from(format_number(result.iter().map(|g| g.lines).sum::<usize>() as f64, 0)),
            Cell::from(format!("{:.1}%", percentage(shown, grand_total, 1))),
        ])
        .style(theme.table_total),
    );

    let widths = [
        Constraint::Length(3),
        Constraint::Min(12),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render the first filtered lines as they appear in the data file.
///
/// `filtered_count` is the size of the whole filtered view; the title says
/// how many of those the table shows.
pub fn render_sample_table(
    frame: &mut Frame,
    area: Rect,
    lines: &[SalesLine],
    filtered_count: usize,
    theme: &Theme,
) {
    let header_cells = ["Order", "Date", "Store", "Channel", "Category", "Product", "Qty", "Revenue"]
        .into_iter()
        .map(|h| Cell::from(h.to_string()).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(line.order_id.clone()),
                Cell::from(line.date.to_string()),
                Cell::from(line.store_location.clone()),
                Cell::from(line.channel.as_str()),
                Cell::from(line.product_category.clone()),
                Cell::from(line.product_name.clone()),
                Cell::from(line.quantity.to_string()),
                Cell::from(format_currency(line.line_revenue)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Min(10),
        Constraint::Length(8),
        Constraint::Min(10),
        Constraint::Min(12),
        Constraint::Length(4),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(
                    " Sample raw data (filtered): {} of {} ",
                    lines.len(),
                    filtered_count
                )),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Full-screen error panel, used when no data could be loaded at all.
pub fn render_error(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Could not load sales data", theme.error)),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.text)),
        Line::from(""),
        Line::from(Span::styled(
            "Fix the file and it will be picked up automatically.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.error)
                    .title(" UrbanMart "),
            ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sales_core::models::Dimension;
    use sales_data::aggregator::GroupTotal;
    use sales_data::reader::read_sales;
    use std::path::Path;

    fn result() -> AggregationResult {
        AggregationResult {
            dimension: Dimension::ProductName,
            groups: vec![
                GroupTotal {
                    key: "Chips".to_string(),
                    revenue: 27.0,
                    lines: 1,
                    quantity: 3,
                },
                GroupTotal {
                    key: "Cola".to_string(),
                    revenue: 15.0,
                    lines: 2,
                    quantity: 6,
                },
            ],
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_ranked_table_shows_rows_and_total() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        let theme = Theme::dark();
        let result = result();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_ranked_table(frame, area, "Top products", "Product", &result, 84.0, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Top products"));
        assert!(text.contains("Chips"));
        assert!(text.contains("$27.00"));
        assert!(text.contains("TOTAL"));
        assert!(text.contains("$42.00"));
        assert!(text.contains("50.0%"));
    }

    #[test]
    fn test_render_ranked_table_empty_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        let theme = Theme::light();
        let empty = AggregationResult {
            dimension: Dimension::ProductName,
            groups: vec![],
        };

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_ranked_table(frame, area, "Top products", "Product", &empty, 0.0, &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("0.0%"));
    }

    #[test]
    fn test_render_sample_table_lists_lines() {
        let mut terminal = Terminal::new(TestBackend::new(100, 8)).unwrap();
        let theme = Theme::dark();
        let csv = "\
order_id,date,store_location,channel,product_category,product_name,quantity,unit_price
TXN-0001,2025-01-06,Downtown,In-store,Snacks,Chips,2,3.5
TXN-0002,2025-01-07,Uptown,Online,Bakery,Bagel,1,1.5
";
        let store = read_sales(csv.as_bytes(), Path::new("<test>")).unwrap();
        let lines = store.records().to_vec();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_sample_table(frame, area, &lines, 12, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Sample raw data (filtered): 2 of 12"));
        assert!(text.contains("Order"));
        assert!(text.contains("TXN-0001"));
        assert!(text.contains("In-store"));
        assert!(text.contains("$7.00"));
    }

    #[test]
    fn test_render_error_shows_message() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let theme = Theme::classic();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_error(frame, area, "missing columns: quantity", &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Could not load sales data"));
        assert!(text.contains("missing columns: quantity"));
    }
}
