//! Sidebar filter controls and their translation into [`FilterCriteria`].
//!
//! Every list section starts with nothing ticked, which places no restriction
//! on that field; ticking values narrows the view to those values. The date
//! bounds start at the first and last date in the data.

use chrono::{Duration, NaiveDate};
use ratatui::text::{Line, Span};
use sales_core::filter::FilterCriteria;
use sales_core::models::{Channel, CustomerSegment};
use sales_data::store::Overview;

use crate::themes::Theme;

// ── Section ───────────────────────────────────────────────────────────────────

/// A group of controls in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dates,
    Stores,
    Channels,
    Categories,
    Segments,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dates,
        Section::Stores,
        Section::Channels,
        Section::Categories,
        Section::Segments,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dates => "Date range",
            Section::Stores => "Store locations",
            Section::Channels => "Channels",
            Section::Categories => "Product categories",
            Section::Segments => "Customer segments",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Section {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Section {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── Choice ────────────────────────────────────────────────────────────────────

/// One tickable option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub value: T,
    pub selected: bool,
}

fn choices<T, I: IntoIterator<Item = T>>(values: I) -> Vec<Choice<T>> {
    values
        .into_iter()
        .map(|value| Choice {
            value,
            selected: false,
        })
        .collect()
}

/// Rebuild `values` as choices, keeping the ticks of values that survive.
fn merge_choices<T: PartialEq, I: IntoIterator<Item = T>>(old: &[Choice<T>], values: I) -> Vec<Choice<T>> {
    values
        .into_iter()
        .map(|value| {
            let selected = old.iter().any(|c| c.selected && c.value == value);
            Choice { value, selected }
        })
        .collect()
}

fn selected<T: Clone>(list: &[Choice<T>]) -> impl Iterator<Item = T> + '_ {
    list.iter().filter(|c| c.selected).map(|c| c.value.clone())
}

// ── FilterPanel ───────────────────────────────────────────────────────────────

/// State of the sidebar.
#[derive(Debug, Clone)]
pub struct FilterPanel {
    /// First and last date present in the data.
    pub bounds: Option<(NaiveDate, NaiveDate)>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub stores: Vec<Choice<String>>,
    pub channels: Vec<Choice<Channel>>,
    pub categories: Vec<Choice<String>>,
    pub segments: Vec<Choice<CustomerSegment>>,
    pub focus: Section,
    cursors: [usize; 5],
}

impl FilterPanel {
    /// Build the controls from the options present in the data.
    ///
    /// Both channels and all three segments are always offered.
    pub fn from_overview(overview: &Overview) -> Self {
        Self {
            bounds: overview.date_range,
            start: overview.start_date(),
            end: overview.end_date(),
            stores: choices(overview.locations.iter().cloned()),
            channels: choices(Channel::ALL),
            categories: choices(overview.categories.iter().cloned()),
            segments: choices(CustomerSegment::ALL),
            focus: Section::Dates,
            cursors: [0; 5],
        }
    }

    /// Refresh the option lists after the data changed, keeping ticks and
    /// date bounds that still apply.
    pub fn sync_options(&mut self, overview: &Overview) {
        self.stores = merge_choices(&self.stores, overview.locations.iter().cloned());
        self.categories = merge_choices(&self.categories, overview.categories.iter().cloned());

        let old_bounds = self.bounds;
        self.bounds = overview.date_range;
        match self.bounds {
            Some((lo, hi)) => {
                // A bound sitting on the old data edge follows the new edge.
                let at_old_start = old_bounds.map(|(s, _)| Some(s) == self.start).unwrap_or(true);
                let at_old_end = old_bounds.map(|(_, e)| Some(e) == self.end).unwrap_or(true);
                let start = if at_old_start { lo } else { self.start.unwrap_or(lo).clamp(lo, hi) };
                let end = if at_old_end { hi } else { self.end.unwrap_or(hi).clamp(lo, hi) };
                self.start = Some(start.min(end));
                self.end = Some(end.max(start));
            }
            None => {
                self.start = None;
                self.end = None;
            }
        }

        for section in Section::ALL {
            let len = self.len_of(section);
            let cursor = &mut self.cursors[section.index()];
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }

    // ── Navigation ────────────────────────────────────────────────────────

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn cursor(&self) -> usize {
        self.cursors[self.focus.index()]
    }

    pub fn cursor_down(&mut self) {
        let len = self.len_of(self.focus);
        let cursor = &mut self.cursors[self.focus.index()];
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        let cursor = &mut self.cursors[self.focus.index()];
        *cursor = cursor.saturating_sub(1);
    }

    // ── Edits ─────────────────────────────────────────────────────────────

    /// Tick or untick the option under the cursor. Returns `true` on change.
    pub fn toggle(&mut self) -> bool {
        let i = self.cursor();
        let flag = match self.focus {
            Section::Dates => None,
            Section::Stores => self.stores.get_mut(i).map(|c| &mut c.selected),
            Section::Channels => self.channels.get_mut(i).map(|c| &mut c.selected),
            Section::Categories => self.categories.get_mut(i).map(|c| &mut c.selected),
            Section::Segments => self.segments.get_mut(i).map(|c| &mut c.selected),
        };
        match flag {
            Some(flag) => {
                *flag = !*flag;
                true
            }
            None => false,
        }
    }

    /// Move the start date by `days`, staying within the data and not past
    /// the end date. Returns `true` on change.
    pub fn shift_start(&mut self, days: i64) -> bool {
        let (Some((lo, _)), Some(start), Some(end)) = (self.bounds, self.start, self.end) else {
            return false;
        };
        let moved = (start + Duration::days(days)).clamp(lo, end);
        let changed = moved != start;
        self.start = Some(moved);
        changed
    }

    /// Move the end date by `days`, staying within the data and not before
    /// the start date. Returns `true` on change.
    pub fn shift_end(&mut self, days: i64) -> bool {
        let (Some((_, hi)), Some(start), Some(end)) = (self.bounds, self.start, self.end) else {
            return false;
        };
        let moved = (end + Duration::days(days)).clamp(start, hi);
        let changed = moved != end;
        self.end = Some(moved);
        changed
    }

    /// Untick everything and restore the full date range.
    pub fn reset(&mut self) {
        for c in &mut self.stores {
            c.selected = false;
        }
        for c in &mut self.channels {
            c.selected = false;
        }
        for c in &mut self.categories {
            c.selected = false;
        }
        for c in &mut self.segments {
            c.selected = false;
        }
        self.start = self.bounds.map(|(lo, _)| lo);
        self.end = self.bounds.map(|(_, hi)| hi);
    }

    /// Criteria described by the current controls.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .with_date_range(self.start, self.end)
            .with_store_locations(selected(&self.stores))
            .with_channels(selected(&self.channels))
            .with_product_categories(selected(&self.categories))
            .with_customer_segments(selected(&self.segments))
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    pub fn to_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        for section in Section::ALL {
            let focused = section == self.focus;
            let title_style = if focused { theme.section_focused } else { theme.section };
            let marker = if focused { "▸ " } else { "  " };

            if section == Section::Dates {
                lines.push(Line::from(Span::styled(format!("{marker}{}", section.title()), title_style)));
                lines.push(Line::from(vec![
                    Span::styled("   from ", theme.label),
                    Span::styled(fmt_date(self.start), theme.value),
                    Span::styled("  [ ]", theme.dim),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("   to   ", theme.label),
                    Span::styled(fmt_date(self.end), theme.value),
                    Span::styled("  { }", theme.dim),
                ]));
                lines.push(Line::from(""));
                continue;
            }

            let labels: Vec<(String, bool)> = match section {
                Section::Stores => self.stores.iter().map(|c| (c.value.clone(), c.selected)).collect(),
                Section::Channels => self.channels.iter().map(|c| (c.value.to_string(), c.selected)).collect(),
                Section::Categories => self.categories.iter().map(|c| (c.value.clone(), c.selected)).collect(),
                Section::Segments => self.segments.iter().map(|c| (c.value.to_string(), c.selected)).collect(),
                Section::Dates => Vec::new(),
            };
            let ticked = labels.iter().filter(|(_, s)| *s).count();
            let summary = if ticked == 0 { "all".to_string() } else { format!("{ticked} selected") };

            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{}", section.title()), title_style),
                Span::styled(format!(" ({summary})"), theme.dim),
            ]));

            for (i, (label, is_selected)) in labels.into_iter().enumerate() {
                let check = if is_selected { "[x] " } else { "[ ] " };
                let mut style = if is_selected { theme.checked } else { theme.text };
                if focused && i == self.cursor() {
                    style = style.patch(theme.cursor);
                }
                lines.push(Line::from(Span::styled(format!("   {check}{label}"), style)));
            }
            lines.push(Line::from(""));
        }

        lines
    }

    fn len_of(&self, section: Section) -> usize {
        match section {
            Section::Dates => 0,
            Section::Stores => self.stores.len(),
            Section::Channels => self.channels.len(),
            Section::Categories => self.categories.len(),
            Section::Segments => self.segments.len(),
        }
    }
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
