use crate::themes::Theme;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use sales_core::formatting::format_currency_compact;
use sales_core::models::Channel;
use unicode_width::UnicodeWidthStr;

/// Characters used by [`sparkline`], lowest to highest.
pub const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Visual settings shared by the horizontal bars.
pub struct BarConfig {
    /// Columns of the bar portion (excluding labels).
    pub width: u16,
    /// Columns reserved for the category label before the bar.
    pub label_width: usize,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 30,
            label_width: 16,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── RevenueBar ───────────────────────────────────────────────────────────────

/// One row of a horizontal revenue chart: label, bar scaled against the
/// largest value in the chart, compact amount.
pub struct RevenueBar<'a> {
    pub label: &'a str,
    pub revenue: f64,
    /// Revenue that fills the whole bar.
    pub max_revenue: f64,
    pub style: Style,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> RevenueBar<'a> {
    pub fn new(label: &'a str, revenue: f64, max_revenue: f64, style: Style, theme: &'a Theme) -> Self {
        Self {
            label,
            revenue,
            max_revenue,
            style,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BarConfig) -> Self {
        self.config = config;
        self
    }

    /// Filled columns; zero when there is nothing to scale against.
    pub fn filled_columns(&self) -> u16 {
        if self.max_revenue <= 0.0 || self.revenue <= 0.0 {
            return 0;
        }
        let ratio = (self.revenue / self.max_revenue).min(1.0);
        // Any positive value gets at least one column.
        ((ratio * self.config.width as f64).round() as u16).max(1)
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled_columns();
        let empty = self.config.width.saturating_sub(filled);

        let filled_str = self.config.filled_char.to_string().repeat(filled as usize);
        let empty_str = self.config.empty_char.to_string().repeat(empty as usize);

        Line::from(vec![
            Span::styled(fit_label(self.label, self.config.label_width), self.theme.label),
            Span::raw(" "),
            Span::styled(filled_str, self.style),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(format!(" {}", format_currency_compact(self.revenue)), self.theme.value),
        ])
    }
}

// ── ChannelSplitBar ──────────────────────────────────────────────────────────

/// Single proportional bar showing each channel's share of revenue.
pub struct ChannelSplitBar<'a> {
    /// `(channel, revenue)` pairs.
    pub shares: Vec<(Channel, f64)>,
    pub theme: &'a Theme,
    pub width: u16,
}

impl<'a> ChannelSplitBar<'a> {
    pub fn new(shares: Vec<(Channel, f64)>, theme: &'a Theme) -> Self {
        Self {
            shares,
            theme,
            width: 40,
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let total: f64 = self.shares.iter().map(|(_, r)| r).sum();
        let mut spans: Vec<Span<'a>> = Vec::new();

        if total > 0.0 {
            for (channel, revenue) in &self.shares {
                let chars = ((revenue / total) * self.width as f64).round() as usize;
                if chars > 0 {
                    spans.push(Span::styled("█".repeat(chars), self.theme.channel_style(*channel)));
                }
            }
        } else {
            spans.push(Span::styled("░".repeat(self.width as usize), self.theme.bar_empty));
        }

        spans.push(Span::raw(" "));

        for (channel, revenue) in &self.shares {
            let pct = if total > 0.0 { revenue / total * 100.0 } else { 0.0 };
            spans.push(Span::styled(
                format!("{}: {:.0}% ", channel, pct),
                self.theme.channel_style(*channel),
            ));
        }

        Line::from(spans)
    }
}

// ── Sparkline ────────────────────────────────────────────────────────────────

/// Render `values` as a row of block characters scaled to the maximum.
///
/// When there are more values than `width`, consecutive values are summed
/// into buckets so the line never exceeds `width` characters.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let bucket = values.len().div_ceil(width);
    let buckets: Vec<f64> = values.chunks(bucket).map(|c| c.iter().sum()).collect();
    let max = buckets.iter().copied().fold(0.0, f64::max);

    buckets
        .iter()
        .map(|&v| {
            if max <= 0.0 {
                SPARK_LEVELS[0]
            } else {
                let level = ((v / max) * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

/// Truncate or right-pad `label` to exactly `width` display columns.
pub fn fit_label(label: &str, width: usize) -> String {
    if label.width() <= width {
        return format!("{}{}", label, " ".repeat(width - label.width()));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
