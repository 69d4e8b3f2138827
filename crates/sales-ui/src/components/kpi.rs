use crate::themes::Theme;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use sales_core::formatting::{format_currency, format_number};
use sales_data::aggregator::Kpis;

// ── KpiIndicator ─────────────────────────────────────────────────────────────

/// One headline number with an icon and a label.
///
/// Format: `"💰 Total revenue: $12,345.67"`
pub struct KpiIndicator<'a> {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
    pub style: Style,
    pub theme: &'a Theme,
}

impl<'a> KpiIndicator<'a> {
    pub fn new(icon: &'static str, label: &'static str, value: String, theme: &'a Theme) -> Self {
        Self {
            icon,
            label,
            value,
            style: theme.value,
            theme,
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        Line::from(vec![
            Span::raw(format!("{} ", self.icon)),
            Span::styled(format!("{}: ", self.label), self.theme.label),
            Span::styled(self.value.clone(), self.style),
        ])
    }
}

// ── KpiPanel ─────────────────────────────────────────────────────────────────

/// The four dashboard KPIs plus units sold.
pub struct KpiPanel<'a> {
    pub kpis: &'a Kpis,
    pub theme: &'a Theme,
}

impl<'a> KpiPanel<'a> {
    pub fn new(kpis: &'a Kpis, theme: &'a Theme) -> Self {
        Self { kpis, theme }
    }

    pub fn indicators(&self) -> Vec<KpiIndicator<'a>> {
        let k = self.kpis;
        let mut revenue = KpiIndicator::new(
            "💰",
            "Total revenue",
            format_currency(k.total_revenue),
            self.theme,
        );
        if k.line_count == 0 {
            revenue.style = self.theme.dim;
        }
        vec![
            revenue,
            KpiIndicator::new(
                "🧾",
                "Transactions",
                format_number(k.transaction_count as f64, 0),
                self.theme,
            ),
            KpiIndicator::new(
                "🛒",
                "Avg order value",
                format_currency(k.average_order_value),
                self.theme,
            ),
            KpiIndicator::new(
                "👥",
                "Unique customers",
                format_number(k.unique_customers as f64, 0),
                self.theme,
            ),
            KpiIndicator::new(
                "📦",
                "Units sold",
                format_number(k.units_sold as f64, 0),
                self.theme,
            ),
        ]
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        self.indicators().iter().map(KpiIndicator::to_line).collect()
    }
}
