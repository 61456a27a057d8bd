//! Overview screen: headline stats plus the recent and most-clicked links.
//!
//! Layout:
//! ┌─ Total links ─┐┌─ Total clicks ─┐┌─ Active links ─┐┌─ Clicks today ─┐
//! ├─ Recent links ────────────────────────────────────────────────────────┤
//! ├─ Top links ───────────────────────────────────────────────────────────┤
//! └─ top country / top referrer ──────────────────────────────────────────┘

use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use linkdash_core::DashboardData;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::links_table::LinksTable;
use crate::widgets::stats_cards::{CARDS_HEIGHT, render_stats_cards};

pub struct OverviewScreen {
    data: Option<Arc<DashboardData>>,
    recent: LinksTable,
    top: LinksTable,
}

impl OverviewScreen {
    pub fn new() -> Self {
        Self {
            data: None,
            recent: LinksTable::fixed("Recent links"),
            top: LinksTable::fixed("Top links"),
        }
    }
}

impl Component for OverviewScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::DashboardUpdated(view) = action {
            if let Some(data) = &view.data {
                self.recent.set_links(&data.recent_links);
                self.top.set_links(&data.top_links);
                self.data = Some(Arc::clone(data));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [cards, recent, top, footer] = Layout::vertical([
            Constraint::Length(CARDS_HEIGHT),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let stats = self.data.as_ref().map(|d| d.stats.clone()).unwrap_or_default();
        render_stats_cards(frame, cards, &stats);
        self.recent.render(frame, recent, false);
        self.top.render(frame, top, false);

        let footer_line = Line::from(vec![
            Span::styled(" Top country ", theme::key_hint()),
            Span::styled(stats.top_country, theme::key_hint_key()),
            Span::styled("   Top referrer ", theme::key_hint()),
            Span::styled(stats.top_referrer, theme::key_hint_key()),
        ]);
        frame.render_widget(Paragraph::new(footer_line), footer);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use linkdash_core::{DashboardView, FetchState, ShortLink, StatsData};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::widgets::test_util::buffer_text;

    #[test]
    fn renders_stats_and_highlights() {
        let link = ShortLink {
            id: "1".into(),
            title: "Launch post".into(),
            short_url: "https://sho.rt/launch".into(),
            clicks: 1_234,
            ..ShortLink::default()
        };
        let data = DashboardData {
            stats: StatsData::from_links(std::slice::from_ref(&link)),
            recent_links: vec![link.clone()],
            top_links: vec![link],
            click_history: Vec::new(),
        };
        let view = DashboardView {
            state: FetchState::Ready,
            data: Some(Arc::new(data)),
            ..DashboardView::default()
        };

        let mut screen = OverviewScreen::new();
        screen
            .update(&Action::DashboardUpdated(Box::new(view)))
            .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("Recent links"));
        assert!(text.contains("Top links"));
        assert!(text.contains("Launch post"));
        assert!(text.contains("1,234"));
        assert!(text.contains("Poland"));
    }
}
