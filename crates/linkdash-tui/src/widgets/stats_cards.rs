//! Four headline cards: total links, total clicks, active links, clicks today.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use linkdash_core::StatsData;

use crate::theme;
use crate::widgets::fmt::{fmt_change, fmt_count};

/// Height a card row needs, borders included.
pub const CARDS_HEIGHT: u16 = 5;

/// One headline number with its month-over-month change badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    /// Fixed trend badge; there is no historical series to compute it from yet.
    pub change_pct: i8,
}

/// Cards in display order.
pub fn stat_cards(stats: &StatsData) -> [StatCard; 4] {
    [
        StatCard {
            label: "Total links",
            value: fmt_count(stats.total_links),
            change_pct: 12,
        },
        StatCard {
            label: "Total clicks",
            value: fmt_count(stats.total_clicks),
            change_pct: 8,
        },
        StatCard {
            label: "Active links",
            value: fmt_count(stats.active_links),
            change_pct: 5,
        },
        StatCard {
            label: "Clicks today",
            value: fmt_count(stats.clicks_today),
            change_pct: -2,
        },
    ]
}

/// Render the cards side by side across `area`.
pub fn render_stats_cards(frame: &mut Frame, area: Rect, stats: &StatsData) {
    let areas: [Rect; 4] = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(area);

    for ((card, card_area), accent) in stat_cards(stats)
        .iter()
        .zip(areas)
        .zip(theme::CARD_ACCENTS)
    {
        let block = Block::default()
            .title(Span::styled(format!(" {} ", card.label), theme::title_style()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(accent));

        let change_color = if card.change_pct >= 0 {
            theme::SUCCESS_GREEN
        } else {
            theme::ERROR_RED
        };

        let lines = vec![
            Line::from(Span::styled(
                format!(" {}", card.value),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(
                    format!(" {}", fmt_change(card.change_pct)),
                    Style::default().fg(change_color),
                ),
                Span::styled(" vs previous month", theme::key_hint()),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), card_area);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::widgets::test_util::buffer_text;

    fn stats() -> StatsData {
        StatsData {
            total_links: 2,
            total_clicks: 1_500,
            active_links: 1,
            ..StatsData::default()
        }
    }

    #[test]
    fn cards_follow_display_order() {
        let labels: Vec<_> = stat_cards(&stats()).iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            ["Total links", "Total clicks", "Active links", "Clicks today"]
        );
    }

    #[test]
    fn renders_grouped_values_and_badges() {
        let mut terminal = Terminal::new(TestBackend::new(120, CARDS_HEIGHT)).unwrap();
        terminal
            .draw(|f| render_stats_cards(f, f.area(), &stats()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("Total clicks"));
        assert!(text.contains("1,500"));
        assert!(text.contains("+12%"));
        assert!(text.contains("-2%"));
    }
}
