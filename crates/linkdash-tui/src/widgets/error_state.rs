//! Full-panel failure display: kind-specific icon, title, message,
//! description, troubleshooting hints and the retry action.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use linkdash_core::ErrorKind;

use crate::theme;
use crate::widgets::centered_rect;

const PANEL_WIDTH: u16 = 72;

/// What to show for a failed fetch.
#[derive(Debug, Clone)]
pub struct ErrorStateProps<'a> {
    pub kind: ErrorKind,
    pub message: &'a str,
    /// A retry is in flight; the action is disabled until it settles.
    pub retrying: bool,
}

/// Text lines of the panel, top to bottom.
pub fn error_lines<'a>(props: &ErrorStateProps<'a>) -> Vec<Line<'a>> {
    let accent = theme::error_color(props.kind);
    let message = if props.message.trim().is_empty() {
        props.kind.default_message()
    } else {
        props.message
    };

    let mut lines = vec![
        Line::from(Span::styled(
            props.kind.icon(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            props.kind.title(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(message, Style::default().fg(theme::DIM_WHITE))),
        Line::from(Span::styled(props.kind.description(), theme::key_hint())),
    ];

    let hints = props.kind.hints();
    if !hints.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Try the following:",
            Style::default().fg(theme::NEON_CYAN),
        )));
        for hint in hints {
            lines.push(Line::from(Span::styled(
                format!("• {hint}"),
                Style::default().fg(theme::DIM_WHITE),
            )));
        }
    }

    lines.push(Line::from(""));
    if props.retrying {
        lines.push(Line::from(Span::styled("Loading...", theme::key_hint())));
    } else {
        lines.push(Line::from(vec![
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("Try again", theme::key_hint()),
        ]));
    }

    #[cfg(debug_assertions)]
    {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Details (debug build)",
            Style::default().fg(theme::BORDER_GRAY),
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "kind: {}  message: {message}  at: {}",
                props.kind,
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            ),
            theme::key_hint(),
        )));
    }

    lines
}

pub fn render_error_state(frame: &mut Frame, area: Rect, props: &ErrorStateProps<'_>) {
    let lines = error_lines(props);
    let height = u16::try_from(lines.len() + 4).unwrap_or(u16::MAX);
    let panel = centered_rect(area, PANEL_WIDTH, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::error_color(props.kind)))
        .padding(ratatui::widgets::Padding::uniform(1));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        panel,
    );
}
