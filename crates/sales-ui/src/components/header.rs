use crate::themes::Theme;
use ratatui::text::{Line, Span};
use sales_core::formatting::format_number;

/// Decoration placed either side of the application title.
pub const ORNAMENT: &str = "▪ ▫ ▪";

/// Dashboard header rendering four lines:
///
/// 1. Application title.
/// 2. A 60-column `=` separator.
/// 3. `[ source | shown of total rows | skipped ]`.
/// 4. The last reload warning, or an empty line.
pub struct Header<'a> {
    /// Data file name as given on the command line.
    pub source: &'a str,
    /// Rows matching the current filters.
    pub shown: usize,
    /// Rows in the loaded store.
    pub total: usize,
    /// Rows dropped as malformed during load.
    pub skipped: usize,
    pub warning: Option<&'a str>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, shown: usize, total: usize, skipped: usize, theme: &'a Theme) -> Self {
        Self {
            source,
            shown,
            total,
            skipped,
            warning: None,
            theme,
        }
    }

    pub fn with_warning(mut self, warning: Option<&'a str>) -> Self {
        self.warning = warning;
        self
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let skipped_style = if self.skipped > 0 {
            self.theme.warning
        } else {
            self.theme.dim
        };

        let status = match self.warning {
            Some(msg) => Line::from(Span::styled(format!("⚠ {}", msg), self.theme.warning)),
            None => Line::from(""),
        };

        vec![
            Line::from(vec![
                Span::styled(ORNAMENT, self.theme.separator),
                Span::styled(" URBANMART SALES DASHBOARD ", self.theme.header),
                Span::styled(ORNAMENT, self.theme.separator),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!(
                        "{} of {} rows",
                        format_number(self.shown as f64, 0),
                        format_number(self.total as f64, 0)
                    ),
                    self.theme.value,
                ),
                Span::styled(" | ", self.theme.label),
                Span::styled(format!("{} skipped", self.skipped), skipped_style),
                Span::styled(" ]", self.theme.label),
            ]),
            status,
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
