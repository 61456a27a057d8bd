//! Links screen: sortable table with selection, copy-link and a detail popup.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use strum::IntoEnumIterator;

use linkdash_core::{ShortLink, SortField};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::centered_rect;
use crate::widgets::fmt::{MISSING, fmt_count, fmt_datetime};
use crate::widgets::links_table::LinksTable;
use crate::widgets::sub_tabs::render_sub_tabs;

/// Key that sorts by each column.
fn sort_key(field: SortField) -> char {
    match field {
        SortField::Title => 't',
        SortField::ShortUrl => 'u',
        SortField::Clicks => 'c',
        SortField::CreatedAt => 'd',
    }
}

fn field_for_key(c: char) -> Option<SortField> {
    SortField::iter().find(|f| sort_key(*f) == c)
}

pub struct LinksScreen {
    focused: bool,
    table: LinksTable,
    detail: Option<ShortLink>,
}

impl LinksScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            table: LinksTable::sortable("Links"),
            detail: None,
        }
    }

    fn render_sort_bar(&self, frame: &mut Frame, area: Rect) {
        let Some(sort) = self.table.sort() else {
            return;
        };
        let fields: Vec<SortField> = SortField::iter().collect();
        let labels: Vec<String> = fields
            .iter()
            .map(|f| {
                if *f == sort.field {
                    format!("{} {f} {}", sort_key(*f), sort.direction.arrow())
                } else {
                    format!("{} {f}", sort_key(*f))
                }
            })
            .collect();
        let active = fields.iter().position(|f| *f == sort.field).unwrap_or(0);

        let mut line = render_sub_tabs(&labels, active);
        line.spans.insert(0, Span::styled(" Sort  ", theme::key_hint()));
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_detail(frame: &mut Frame, area: Rect, link: &ShortLink) {
        let popup = centered_rect(area, 76, 16);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", link.display_title()),
                theme::title_style(),
            ))
            .title_bottom(Line::from(vec![
                Span::styled(" y ", theme::key_hint_key()),
                Span::styled("copy  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("close ", theme::key_hint()),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let field = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {label:<13}"), theme::key_hint()),
                Span::styled(value, Style::default().fg(theme::DIM_WHITE)),
            ])
        };

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("  {:<13}", "Short URL"), theme::key_hint()),
                Span::styled(link.short_url.clone(), theme::link_style()),
            ]),
            field("Original URL", link.original_url.clone()),
            field("Short code", link.short_code.clone()),
            field(
                "Description",
                link.description
                    .clone()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| MISSING.to_owned()),
            ),
            field("Clicks", fmt_count(link.clicks)),
            field("Created", fmt_datetime(link.created_at)),
            field(
                "Status",
                if link.is_active { "active" } else { "inactive" }.to_owned(),
            ),
            field(
                "Tags",
                if link.tags.is_empty() {
                    MISSING.to_owned()
                } else {
                    link.tags.join(", ")
                },
            ),
            field("ID", link.id.clone()),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            popup,
        );
    }
}

impl Component for LinksScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(detail) = &self.detail {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Enter => Some(Action::CloseDetail),
                KeyCode::Char('y') => Some(Action::CopyLink(detail.short_url.clone())),
                _ => None,
            });
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.table.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.table.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.table.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.table.select_last(),
            KeyCode::Char('y') => {
                return Ok(self
                    .table
                    .selected()
                    .map(|l| Action::CopyLink(l.short_url.clone())));
            }
            KeyCode::Enter => {
                return Ok(self
                    .table
                    .selected()
                    .map(|l| Action::OpenDetail(Box::new(l.clone()))));
            }
            KeyCode::Char(c) => return Ok(field_for_key(c).map(Action::SortBy)),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DashboardUpdated(view) => {
                if let Some(data) = &view.data {
                    self.table.set_links(&data.recent_links);
                }
            }
            Action::SortBy(field) => self.table.sort_by(*field),
            Action::OpenDetail(link) => self.detail = Some(link.as_ref().clone()),
            Action::CloseDetail => self.detail = None,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [sort_bar, table] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);

        self.render_sort_bar(frame, sort_bar);
        self.table.render(frame, table, self.focused);

        if let Some(link) = &self.detail {
            Self::render_detail(frame, area, link);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn key_hints(&self) -> &'static str {
        if self.detail.is_some() {
            "y copy  Esc close"
        } else {
            "j/k move  t/u/c/d sort  y copy  Enter details"
        }
    }
}
