//! Analytics screen: daily click history, traffic sources and a summary.
//!
//! Country and referrer breakdowns have no backend endpoint yet; those
//! panels show fixed sample figures and say so in their titles.

use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Paragraph, Wrap};

use linkdash_core::{ChartData, ClickHistorySummary, DashboardData};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{MISSING, fmt_count, fmt_day};

/// One row of a traffic-source breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceShare {
    pub name: &'static str,
    pub clicks: u64,
    pub percent: u8,
}

impl SourceShare {
    const fn new(name: &'static str, clicks: u64, percent: u8) -> Self {
        Self {
            name,
            clicks,
            percent,
        }
    }
}

pub const SAMPLE_COUNTRIES: [SourceShare; 5] = [
    SourceShare::new("Poland", 1250, 35),
    SourceShare::new("Germany", 890, 25),
    SourceShare::new("United States", 750, 21),
    SourceShare::new("United Kingdom", 420, 12),
    SourceShare::new("Other", 180, 7),
];

pub const SAMPLE_REFERRERS: [SourceShare; 4] = [
    SourceShare::new("Google", 1850, 45),
    SourceShare::new("Facebook", 1200, 29),
    SourceShare::new("Twitter", 750, 18),
    SourceShare::new("Direct", 320, 8),
];

pub struct AnalyticsScreen {
    data: Option<Arc<DashboardData>>,
    summary: Option<ClickHistorySummary>,
}

impl AnalyticsScreen {
    pub fn new() -> Self {
        Self {
            data: None,
            summary: None,
        }
    }

    fn history(&self) -> &[ChartData] {
        match &self.data {
            Some(data) => &data.click_history,
            None => &[],
        }
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let block = panel(" Click history ")
            .title_bottom(Line::from(vec![
                Span::styled(" ■ ", Style::default().fg(theme::NEON_CYAN)),
                Span::styled("clicks  ", theme::key_hint()),
                Span::styled("■ ", Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled("new links ", theme::key_hint()),
            ]));

        let history = self.history();
        if history.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("No click history yet", theme::key_hint())),
                Line::from(Span::styled(
                    "Daily clicks appear here once the backend reports them.",
                    theme::key_hint(),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let mut chart = BarChart::default()
            .block(block)
            .bar_width(3)
            .bar_gap(0)
            .group_gap(2)
            .value_style(Style::default().fg(theme::BG_DARK).add_modifier(Modifier::BOLD))
            .label_style(theme::key_hint());

        for day in history {
            let bars = [
                Bar::default()
                    .value(day.clicks)
                    .style(Style::default().fg(theme::NEON_CYAN)),
                Bar::default()
                    .value(day.links)
                    .style(Style::default().fg(theme::ELECTRIC_PURPLE)),
            ];
            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(fmt_day(day.date)))
                    .bars(&bars),
            );
        }

        frame.render_widget(chart, area);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let row = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!(" {label:<16}"), theme::key_hint()),
                Span::styled(value, theme::key_hint_key()),
            ])
        };

        let (average, best) = match &self.summary {
            Some(s) => (fmt_count(s.average_clicks_per_day), fmt_day(s.best_day)),
            None => (MISSING.to_owned(), MISSING.to_owned()),
        };
        let (country, referrer) = self.data.as_ref().map_or_else(
            || (MISSING.to_owned(), MISSING.to_owned()),
            |d| (d.stats.top_country.clone(), d.stats.top_referrer.clone()),
        );

        let lines = vec![
            Line::from(""),
            row("Avg clicks/day", average),
            row("Best day", best),
            row("Top country", country),
            row("Top referrer", referrer),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel(" Summary ")), area);
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(title, theme::title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default())
}

/// Breakdown rows rendered as `name  clicks  ████ pct%`.
fn share_lines(rows: &[SourceShare], bar_width: usize) -> Vec<Line<'static>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let filled = bar_width * usize::from(row.percent) / 100;
            let color = theme::CHART_SERIES[i % theme::CHART_SERIES.len()];
            Line::from(vec![
                Span::styled(format!(" {:<15}", row.name), theme::table_row()),
                Span::styled(format!("{:>6} ", fmt_count(row.clicks)), theme::key_hint()),
                Span::styled("█".repeat(filled.max(1)), Style::default().fg(color)),
                Span::styled(format!(" {}%", row.percent), theme::key_hint()),
            ])
        })
        .collect()
}

fn render_shares(frame: &mut Frame, area: Rect, title: &str, rows: &[SourceShare]) {
    let block = panel(title);
    let inner_width = usize::from(block.inner(area).width);
    // name + clicks + percent columns take ~28 cells
    let bar_width = inner_width.saturating_sub(28);
    frame.render_widget(
        Paragraph::new(share_lines(rows, bar_width))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

impl Component for AnalyticsScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::DashboardUpdated(view) = action {
            if let Some(data) = &view.data {
                self.summary = ClickHistorySummary::from_history(&data.click_history);
                self.data = Some(Arc::clone(data));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [history, bottom] =
            Layout::vertical([Constraint::Min(8), Constraint::Length(9)]).areas(area);
        let [countries, referrers, summary] = Layout::horizontal([
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(1),
        ])
        .areas(bottom);

        self.render_history(frame, history);
        render_shares(frame, countries, " Top countries (sample) ", &SAMPLE_COUNTRIES);
        render_shares(frame, referrers, " Top referrers (sample) ", &SAMPLE_REFERRERS);
        self.render_summary(frame, summary);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use linkdash_core::{DashboardView, FetchState};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::widgets::test_util::buffer_text;

    fn render(screen: &AnalyticsScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn screen_with(history: Vec<ChartData>) -> AnalyticsScreen {
        let view = DashboardView {
            state: FetchState::Ready,
            data: Some(Arc::new(DashboardData {
                click_history: history,
                ..DashboardData::default()
            })),
            ..DashboardView::default()
        };
        let mut screen = AnalyticsScreen::new();
        screen
            .update(&Action::DashboardUpdated(Box::new(view)))
            .unwrap();
        screen
    }

    #[test]
    fn sample_shares_add_up() {
        let total = |rows: &[SourceShare]| rows.iter().map(|r| u32::from(r.percent)).sum::<u32>();
        assert_eq!(total(&SAMPLE_COUNTRIES), 100);
        assert_eq!(total(&SAMPLE_REFERRERS), 100);
    }

    #[test]
    fn empty_history_shows_placeholder_summary() {
        let screen = screen_with(Vec::new());
        assert!(screen.summary.is_none());

        let text = render(&screen);
        assert!(text.contains("No click history yet"));
        assert!(text.contains("Top countries (sample)"));
        assert!(text.contains("Germany"));
    }

    #[test]
    fn history_feeds_summary() {
        let day = |d: u32, clicks: u64| ChartData {
            date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
            clicks,
            links: 1,
        };
        let screen = screen_with(vec![day(1, 10), day(2, 40), day(3, 25)]);

        let summary = screen.summary.clone().unwrap();
        assert_eq!(summary.average_clicks_per_day, 25);
        assert_eq!(summary.best_day, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());

        let text = render(&screen);
        assert!(!text.contains("No click history yet"));
        assert!(text.contains("2 Mar"));
    }
}
