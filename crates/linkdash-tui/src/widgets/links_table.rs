//! Links table: optional column sort, row selection, empty state.
//!
//! The Overview screen uses fixed-order tables (recent / top links as the
//! aggregator ordered them); the Links screen uses a sortable one.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use linkdash_core::{LinkSort, ShortLink, SortField};

use crate::theme;
use crate::widgets::fmt::{fmt_count, fmt_datetime, truncate};

const ORIGINAL_URL_WIDTH: usize = 40;

const COLUMNS: [(Option<SortField>, &str); 6] = [
    (Some(SortField::Title), "Title"),
    (Some(SortField::ShortUrl), "Short URL"),
    (None, "Original URL"),
    (Some(SortField::Clicks), "Clicks"),
    (Some(SortField::CreatedAt), "Created"),
    (None, "Status"),
];

pub struct LinksTable {
    title: &'static str,
    sort: Option<LinkSort>,
    /// Links as received, before sorting.
    source: Vec<ShortLink>,
    /// Links in display order.
    rows: Vec<ShortLink>,
    state: TableState,
}

impl LinksTable {
    /// Table whose order follows `sort`, toggled via [`sort_by`](Self::sort_by).
    pub fn sortable(title: &'static str) -> Self {
        Self::build(title, Some(LinkSort::default()))
    }

    /// Table that displays links in the order given.
    pub fn fixed(title: &'static str) -> Self {
        Self::build(title, None)
    }

    fn build(title: &'static str, sort: Option<LinkSort>) -> Self {
        Self {
            title,
            sort,
            source: Vec::new(),
            rows: Vec::new(),
            state: TableState::default(),
        }
    }

    /// Replace the data, keeping the selected link selected when it survives.
    pub fn set_links(&mut self, links: &[ShortLink]) {
        self.source = links.to_vec();
        self.resort();
    }

    pub fn sort(&self) -> Option<LinkSort> {
        self.sort
    }

    /// Toggle sorting on `field`. No-op for fixed tables.
    pub fn sort_by(&mut self, field: SortField) {
        if let Some(sort) = self.sort {
            self.sort = Some(sort.toggle(field));
            self.resort();
        }
    }

    fn resort(&mut self) {
        let selected_id = self.selected().map(|l| l.id.clone());
        self.rows = match self.sort {
            Some(sort) => sort.apply(&self.source),
            None => self.source.clone(),
        };

        let restored = selected_id.and_then(|id| self.rows.iter().position(|l| l.id == id));
        let next = match (restored, self.state.selected()) {
            (Some(idx), _) => Some(idx),
            _ if self.rows.is_empty() => None,
            (None, Some(idx)) => Some(idx.min(self.rows.len() - 1)),
            (None, None) => Some(0),
        };
        self.state.select(next);
    }

    /// Links in display order.
    #[cfg(test)]
    pub fn rows(&self) -> &[ShortLink] {
        &self.rows
    }

    pub fn selected(&self) -> Option<&ShortLink> {
        self.state.selected().and_then(|i| self.rows.get(i))
    }

    /// Move the selection by `delta` rows, clamped to the table.
    pub fn move_selection(&mut self, delta: isize) {
        let Some(last) = self.rows.len().checked_sub(1) else {
            return;
        };
        let current = self.state.selected().unwrap_or(0);
        let next = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs()).min(last)
        };
        self.state.select(Some(next));
    }

    pub fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if let Some(last) = self.rows.len().checked_sub(1) {
            self.state.select(Some(last));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title(Span::styled(format!(" {} ", self.title), theme::title_style()))
            .title_bottom(Line::from(Span::styled(
                format!(" {} links ", self.rows.len()),
                theme::key_hint(),
            )))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if self.rows.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("  No links to show yet", theme::key_hint())),
            ])
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(
            COLUMNS
                .iter()
                .map(|(field, label)| Cell::from(header_label(*field, label, self.sort))),
        )
        .style(theme::table_header());

        let rows = self.rows.iter().map(link_row);

        let widths = [
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(3),
            Constraint::Length(9),
            Constraint::Length(19),
            Constraint::Length(10),
        ];

        let mut table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1);
        if focused {
            table = table
                .row_highlight_style(theme::table_selected())
                .highlight_symbol("▸ ");
        }

        frame.render_stateful_widget(table, area, &mut self.state.clone());
    }
}

/// Column header text with the sort arrow on the active column.
pub fn header_label(field: Option<SortField>, label: &str, sort: Option<LinkSort>) -> String {
    match (field, sort) {
        (Some(f), Some(s)) if s.field == f => format!("{label} {}", s.direction.arrow()),
        _ => label.to_owned(),
    }
}

fn link_row(link: &ShortLink) -> Row<'static> {
    let status = if link.is_active {
        Span::styled("● active", Style::default().fg(theme::SUCCESS_GREEN))
    } else {
        Span::styled("○ inactive", Style::default().fg(theme::BORDER_GRAY))
    };

    Row::new(vec![
        Cell::from(link.display_title().to_owned())
            .style(theme::table_row().add_modifier(Modifier::BOLD)),
        Cell::from(link.short_url.clone()).style(theme::link_style()),
        Cell::from(truncate(&link.original_url, ORIGINAL_URL_WIDTH)).style(theme::key_hint()),
        Cell::from(fmt_count(link.clicks)).style(theme::table_row()),
        Cell::from(fmt_datetime(link.created_at)).style(theme::table_row()),
        Cell::from(status),
    ])
}
