//! Full-screen dashboard: header, filter sidebar, KPIs, breakdown charts,
//! daily trend, the top products and customers tables and a sample of the
//! filtered rows.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use sales_core::formatting::{format_currency, format_date_range};
use sales_core::models::Channel;
use sales_data::aggregator::AggregationResult;
use sales_runtime::snapshot::DashboardSnapshot;

use crate::components::bars::{sparkline, BarConfig, ChannelSplitBar, RevenueBar};
use crate::components::header::Header;
use crate::components::kpi::KpiPanel;
use crate::filter_panel::FilterPanel;
use crate::table_view;
use crate::themes::Theme;

/// Columns taken by the filter sidebar.
pub const SIDEBAR_WIDTH: u16 = 32;

/// Everything one dashboard frame needs.
pub struct DashboardView<'a> {
    /// Data file name shown in the header.
    pub source: &'a str,
    pub snapshot: &'a DashboardSnapshot,
    pub panel: &'a FilterPanel,
    /// Rows skipped as malformed during the last successful load.
    pub skipped: usize,
    /// Error from a failed reload while older data is still on screen.
    pub warning: Option<&'a str>,
}

pub fn render_dashboard(frame: &mut Frame, area: Rect, view: &DashboardView, theme: &Theme) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let header = Header::new(
        view.source,
        view.snapshot.filtered_count,
        view.snapshot.total_count,
        view.skipped,
        theme,
    )
    .with_warning(view.warning);
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), outer[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(outer[1]);

    render_sidebar(frame, body[0], view.panel, theme);

    if view.snapshot.is_empty() {
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(body[1]);
        frame.render_widget(Paragraph::new(no_data_notice(theme)), main[0]);
        render_main(frame, main[1], view.snapshot, theme);
    } else {
        render_main(frame, body[1], view.snapshot, theme);
    }

    frame.render_widget(Paragraph::new(key_help(theme)), outer[2]);
}

fn render_sidebar(frame: &mut Frame, area: Rect, panel: &FilterPanel, theme: &Theme) {
    let paragraph = Paragraph::new(Text::from(panel.to_lines(theme))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.table_border)
            .title(" Filters "),
    );
    frame.render_widget(paragraph, area);
}

fn render_main(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, theme: &Theme) {
    // Each chart column: title, one bar per group, blank, second title.
    let left_lines = snapshot.by_store.len() + 3;
    let right_lines = snapshot.by_category.len() + snapshot.by_segment.len() + 3;
    let chart_height = left_lines.max(right_lines) as u16 + 2;
    // Header, totals row and borders.
    let table_height = snapshot.top_products.len().max(snapshot.top_customers.len()) as u16 + 4;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(chart_height),
            Constraint::Length(3),
            Constraint::Length(table_height),
            Constraint::Min(0),
        ])
        .split(area);

    let kpis = KpiPanel::new(&snapshot.kpis, theme);
    frame.render_widget(
        Paragraph::new(Text::from(kpis.to_lines())).block(titled(
            " Key figures ",
            &format_date_range(snapshot.criteria.date_range.start, snapshot.criteria.date_range.end),
            theme,
        )),
        rows[0],
    );

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let mut left = breakdown_lines("By store", &snapshot.by_store, charts[0].width, theme);
    left.push(Line::from(""));
    left.push(Line::from(Span::styled("By channel", theme.bold)));
    let shares: Vec<(Channel, f64)> = Channel::ALL
        .iter()
        .map(|c| (*c, snapshot.by_channel.get(c.as_str()).map_or(0.0, |g| g.revenue)))
        .collect();
    let mut split = ChannelSplitBar::new(shares, theme);
    split.width = charts[0].width.saturating_sub(30).clamp(10, 40);
    left.push(split.to_line());
    frame.render_widget(
        Paragraph::new(Text::from(left)).block(plain_block(" Revenue breakdown ", theme)),
        charts[0],
    );

    let mut right = breakdown_lines("By category", &snapshot.by_category, charts[1].width, theme);
    right.push(Line::from(""));
    right.extend(breakdown_lines("By customer segment", &snapshot.by_segment, charts[1].width, theme));
    frame.render_widget(
        Paragraph::new(Text::from(right)).block(plain_block(" ", theme)),
        charts[1],
    );

    let values: Vec<f64> = snapshot.daily_trend.iter().map(|d| d.revenue).collect();
    let spark_width = rows[2].width.saturating_sub(2) as usize;
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(sparkline(&values, spark_width), theme.sparkline)))
            .block(plain_block(" Daily revenue ", theme)),
        rows[2],
    );

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[3]);
    table_view::render_ranked_table(
        frame,
        tables[0],
        "Top products",
        "Product",
        &snapshot.top_products,
        snapshot.kpis.total_revenue,
        theme,
    );
    table_view::render_ranked_table(
        frame,
        tables[1],
        "Top customers",
        "Customer",
        &snapshot.top_customers,
        snapshot.kpis.total_revenue,
        theme,
    );

    table_view::render_sample_table(frame, rows[4], &snapshot.sample, snapshot.filtered_count, theme);
}

/// One-line banner above the zeroed figures when the filters exclude every row.
fn no_data_notice(theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(" No sales match the current filters. ", theme.warning),
        Span::styled("Widen the date range or press 'r' to reset.", theme.dim),
    ])
}

/// Section title followed by one bar per group.
fn breakdown_lines<'a>(title: &'a str, result: &'a AggregationResult, width: u16, theme: &'a Theme) -> Vec<Line<'a>> {
    let max = result.max_revenue();
    // Borders, label column, gap and amount.
    let bar_width = width.saturating_sub(2 + 16 + 1 + 9).clamp(5, 30);

    let mut lines = vec![Line::from(Span::styled(title, theme.bold))];
    for (i, group) in result.iter().enumerate() {
        let bar = RevenueBar::new(&group.key, group.revenue, max, theme.bar_style(i), theme).with_config(BarConfig {
            width: bar_width,
            ..BarConfig::default()
        });
        lines.push(bar.to_line());
    }
    lines
}

fn plain_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(title)
}

fn titled<'a>(title: &'a str, subtitle: &str, theme: &Theme) -> Block<'a> {
    plain_block(title, theme).title_bottom(Line::from(Span::styled(format!(" {} ", subtitle), theme.dim)))
}

fn key_help(theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(" Tab", theme.info),
        Span::styled(" section  ", theme.dim),
        Span::styled("↑↓", theme.info),
        Span::styled(" move  ", theme.dim),
        Span::styled("Space", theme.info),
        Span::styled(" toggle  ", theme.dim),
        Span::styled("[ ]", theme.info),
        Span::styled(" start  ", theme.dim),
        Span::styled("{ }", theme.info),
        Span::styled(" end  ", theme.dim),
        Span::styled("r", theme.info),
        Span::styled(" reset  ", theme.dim),
        Span::styled("F5", theme.info),
        Span::styled(" reload  ", theme.dim),
        Span::styled("q", theme.info),
        Span::styled(" quit", theme.dim),
    ])
}

/// Revenue total as shown in the KPI panel, for callers that log it.
pub fn headline(snapshot: &DashboardSnapshot) -> String {
    format!(
        "{} across {} of {} rows",
        format_currency(snapshot.kpis.total_revenue),
        snapshot.filtered_count,
        snapshot.total_count
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────
