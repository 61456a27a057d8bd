//! Full-panel spinner shown until the first dashboard snapshot arrives.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::theme;
use crate::widgets::centered_rect;

pub fn render_loading(frame: &mut Frame, area: Rect, label: &str, state: &ThrobberState) {
    let width = u16::try_from(label.chars().count() + 4).unwrap_or(u16::MAX);
    let spinner_area = centered_rect(area, width, 1);

    let throbber = Throbber::default()
        .label(label)
        .style(Style::default().fg(theme::NEON_CYAN))
        .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));

    frame.render_stateful_widget(throbber, spinner_area, &mut state.clone());
}
