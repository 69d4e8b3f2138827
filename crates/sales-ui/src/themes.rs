use ratatui::style::{Color, Modifier, Style};
use sales_core::models::Channel;

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark and 7–15 light; anything else reads as dark.
pub fn detect_background() -> BackgroundType {
    match std::env::var("COLORFGBG") {
        Ok(val) => background_from_colorfgbg(&val),
        Err(_) => BackgroundType::Dark,
    }
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(n) if n <= 6 => BackgroundType::Dark,
        Some(_) => BackgroundType::Light,
        None => BackgroundType::Dark,
    }
}

/// Styles used by the dashboard widgets.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Sidebar ──────────────────────────────────────────────────────────────
    /// Title of the section that has keyboard focus.
    pub section_focused: Style,
    pub section: Style,
    /// Row under the cursor inside the focused section.
    pub cursor: Style,
    pub checked: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// Series colours, cycled by bar index.
    pub bar_palette: [Style; 4],
    pub bar_empty: Style,
    pub sparkline: Style,
    pub online: Style,
    pub in_store: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            section_focused: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            section: Style::default().fg(Color::Gray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            checked: Style::default().fg(Color::Green),

            bar_palette: [
                Style::default().fg(Color::Cyan),
                Style::default().fg(Color::Magenta),
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Yellow),
            ],
            bar_empty: Style::default().fg(Color::DarkGray),
            sparkline: Style::default().fg(Color::Cyan),
            online: Style::default().fg(Color::Magenta),
            in_store: Style::default().fg(Color::Cyan),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            section_focused: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            section: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            checked: Style::default().fg(Color::Green),

            bar_palette: [
                Style::default().fg(Color::Blue),
                Style::default().fg(Color::Magenta),
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Red),
            ],
            bar_empty: Style::default().fg(Color::Gray),
            sparkline: Style::default().fg(Color::Blue),
            online: Style::default().fg(Color::Magenta),
            in_store: Style::default().fg(Color::Blue),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Basic 8-colour ANSI palette without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            section_focused: Style::default().fg(Color::Yellow),
            section: Style::default().fg(Color::White),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            checked: Style::default().fg(Color::Green),

            bar_palette: [
                Style::default().fg(Color::Cyan),
                Style::default().fg(Color::Magenta),
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Yellow),
            ],
            bar_empty: Style::default().fg(Color::DarkGray),
            sparkline: Style::default().fg(Color::Green),
            online: Style::default().fg(Color::Magenta),
            in_store: Style::default().fg(Color::Cyan),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names (and `"auto"`) auto-detect.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Colour for the `index`-th bar of a chart.
    pub fn bar_style(&self, index: usize) -> Style {
        self.bar_palette[index % self.bar_palette.len()]
    }

    pub fn channel_style(&self, channel: Channel) -> Style {
        match channel {
            Channel::Online => self.online,
            Channel::InStore => self.in_store,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
