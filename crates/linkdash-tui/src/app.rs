//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use linkdash_core::{DashboardController, DashboardView, ErrorKind, FetchState};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Cadence, Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::error_state::{ErrorStateProps, render_error_state};
use crate::widgets::fmt::fmt_age;
use crate::widgets::loading_state::render_loading;

/// How long a toast stays up.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Action sender: components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver: main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: DashboardController,
    /// Latest snapshot from the controller.
    view: DashboardView,
    /// Cancellation token for the data bridge and auto-refresh tasks.
    data_cancel: CancellationToken,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    throbber_state: ThrobberState,
}

impl App {
    pub fn new(controller: DashboardController) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();
        let view = controller.view();

        Self {
            active_screen: ScreenId::default(),
            screens,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            controller,
            view,
            data_cancel: CancellationToken::new(),
            notification: None,
            throbber_state: ThrobberState::default(),
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let controller = self.controller.clone();
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(controller, tx, cancel).await;
        });

        let mut events = EventReader::new(Cadence::default());

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action
            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Tick => Some(Action::Tick),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// No snapshot to show yet: the loading or error panel replaces the screens.
    fn showing_placeholder(&self) -> bool {
        self.view.data.is_none()
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            // In help mode, Esc or ? closes help
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            // Quit
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            // Help
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }

            // Refresh / retry
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::Refresh)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                return Ok(n.and_then(ScreenId::from_number).map(Action::SwitchScreen));
            }

            // Tab / Shift+Tab for screen cycling
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            _ => {}
        }

        if self.showing_placeholder() {
            return Ok(None);
        }

        // Delegate to active screen component
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action: update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                debug!(width = w, height = h, "terminal resized");
            }

            Action::Tick => {
                self.throbber_state.calc_next();
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() >= NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Refresh => self.request_refresh(),

            Action::DashboardUpdated(view) => {
                self.on_view_updated(view);
                // Every screen keeps its own copy of the data
                let mut follow_ups = Vec::new();
                for screen in self.screens.values_mut() {
                    if let Some(next) = screen.update(action)? {
                        follow_ups.push(next);
                    }
                }
                for next in follow_ups {
                    self.action_tx.send(next)?;
                }
            }

            Action::CopyLink(url) => {
                info!(url = %url, "copy link requested");
                self.notify(Notification::success(format!("Copied {url}")));
            }

            Action::Render => {}

            _ => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(next) = screen.update(action)? {
                        self.action_tx.send(next)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    /// Re-fetch unless a fetch is already in flight.
    fn request_refresh(&mut self) {
        if self.view.loading() {
            debug!(generation = self.view.generation, "refresh already in flight");
            self.notify(Notification::info("Refresh already in progress"));
            return;
        }
        info!("manual refresh requested");
        // The view flips to Loading synchronously; mirror it so a second
        // key press before the bridge catches up is still ignored.
        let _handle = self.controller.spawn_refresh();
        self.view = self.controller.view();
    }

    /// Toast on refresh outcomes when a previous snapshot is on screen.
    fn on_view_updated(&mut self, view: &DashboardView) {
        let was_refreshing = self.view.refreshing;
        self.view = view.clone();

        match view.state {
            FetchState::Failed if view.data.is_some() => {
                let message = view
                    .error
                    .clone()
                    .unwrap_or_else(|| ErrorKind::Generic.default_message().to_owned());
                self.notify(Notification::error(message));
            }
            FetchState::Ready if was_refreshing => {
                self.notify(Notification::success("Dashboard refreshed"));
            }
            _ => {}
        }
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if self.showing_placeholder() {
            self.render_placeholder(frame, content_area);
        } else if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }

        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        // Overlays on top (last = topmost)
        if let Some((notification, _)) = &self.notification {
            Self::render_notification(frame, area, notification);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    /// Loading spinner until the first snapshot, or the error panel when it failed.
    fn render_placeholder(&self, frame: &mut Frame, area: Rect) {
        match (&self.view.error, self.view.error_kind) {
            (Some(message), Some(kind)) => {
                let props = ErrorStateProps {
                    kind,
                    message,
                    retrying: self.view.loading(),
                };
                render_error_state(frame, area, &props);
            }
            _ => render_loading(frame, area, " Loading dashboard...", &self.throbber_state),
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|id| Line::from(format!(" {} {} ", id.number(), id.label())))
            .collect();
        let selected = ScreenId::ALL
            .iter()
            .position(|id| *id == self.active_screen)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .style(theme::tab_inactive())
            .highlight_style(theme::tab_active())
            .divider(Span::styled("│", theme::key_hint()));

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = match self.view.state {
            FetchState::Idle => Span::styled("○ idle", theme::key_hint()),
            FetchState::Loading if self.view.refreshing => {
                Span::styled("◐ refreshing", Style::default().fg(theme::ELECTRIC_YELLOW))
            }
            FetchState::Loading => {
                Span::styled("◐ loading", Style::default().fg(theme::ELECTRIC_YELLOW))
            }
            FetchState::Ready => {
                let label = self.view.updated_at.map_or_else(
                    || "● ready".to_owned(),
                    |t| format!("● {}", fmt_age(t, Utc::now())),
                );
                Span::styled(label, Style::default().fg(theme::SUCCESS_GREEN))
            }
            FetchState::Failed => {
                Span::styled("✗ fetch failed", Style::default().fg(theme::ERROR_RED))
            }
        };

        let mut spans = vec![Span::raw(" "), indicator];
        let screen_hints = if self.showing_placeholder() {
            ""
        } else {
            self.screens
                .get(&self.active_screen)
                .map_or("", |s| s.key_hints())
        };
        if !screen_hints.is_empty() {
            spans.push(Span::styled(format!(" │ {screen_hints}"), theme::key_hint()));
        }
        spans.push(Span::styled(" │ r refresh  ? help  q quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the help overlay centered on screen.
    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 56u16.min(area.width.saturating_sub(4));
        let help_height = 20u16.min(area.height.saturating_sub(4));
        let help_area = crate::widgets::centered_rect(area, help_width, help_height);

        // Clear the background
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };
        let entry = |key: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<12}"), theme::key_hint_key()),
                Span::styled(desc, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            section("Navigation"),
            entry("1-3", "Jump to screen"),
            entry("Tab / S-Tab", "Next / previous screen"),
            entry("j/k ↑/↓", "Move selection"),
            entry("g / G", "First / last row"),
            Line::from(""),
            section("Links"),
            entry("t u c d", "Sort by title, short URL, clicks, date"),
            entry("y", "Copy short URL"),
            entry("Enter", "Link details"),
            entry("Esc", "Close details"),
            Line::from(""),
            section("General"),
            entry("r", "Refresh / retry"),
            entry("?", "Toggle this help"),
            entry("q Ctrl+C", "Quit"),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above tab + status bar
        let toast_area = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
        };

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use linkdash_core::{DashboardConfig, DashboardData, ShortLink};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::widgets::test_util::buffer_text;

    fn app() -> App {
        let url = "http://127.0.0.1:9/api".parse().unwrap();
        let controller = DashboardController::new(DashboardConfig::new(url)).unwrap();
        App::new(controller)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn ready_view() -> DashboardView {
        let link = ShortLink {
            id: "1".into(),
            title: "Docs".into(),
            short_url: "https://sho.rt/docs".into(),
            ..ShortLink::default()
        };
        DashboardView {
            state: FetchState::Ready,
            data: Some(Arc::new(DashboardData {
                recent_links: vec![link.clone()],
                top_links: vec![link],
                ..DashboardData::default()
            })),
            generation: 1,
            updated_at: Some(Utc::now()),
            ..DashboardView::default()
        }
    }

    fn failed_view(retrying: bool) -> DashboardView {
        DashboardView {
            state: if retrying {
                FetchState::Loading
            } else {
                FetchState::Failed
            },
            error: Some(ErrorKind::Network.default_message().to_owned()),
            error_kind: Some(ErrorKind::Network),
            generation: 1,
            ..DashboardView::default()
        }
    }

    #[test]
    fn global_keys_map_to_actions() {
        let mut app = app();
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('q'))).unwrap(),
            Some(Action::Quit)
        ));
        assert!(matches!(
            app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
                .unwrap(),
            Some(Action::Quit)
        ));
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('3'))).unwrap(),
            Some(Action::SwitchScreen(ScreenId::Analytics))
        ));
        assert!(app.handle_key_event(key(KeyCode::Char('7'))).unwrap().is_none());
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('r'))).unwrap(),
            Some(Action::Refresh)
        ));
    }

    #[test]
    fn help_overlay_captures_keys() {
        let mut app = app();
        app.process_action(&Action::ToggleHelp).unwrap();
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap().is_none());
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::ToggleHelp)
        ));
        assert!(draw(&app).contains("Keyboard Shortcuts"));
    }

    #[test]
    fn tab_cycles_screens() {
        let mut app = app();
        let next = app.handle_key_event(key(KeyCode::Tab)).unwrap().unwrap();
        app.process_action(&next).unwrap();
        assert_eq!(app.active_screen, ScreenId::Links);

        let prev = app
            .handle_key_event(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))
            .unwrap()
            .unwrap();
        app.process_action(&prev).unwrap();
        assert_eq!(app.active_screen, ScreenId::Overview);
    }

    #[test]
    fn loading_without_data_shows_spinner() {
        let mut app = app();
        let view = DashboardView {
            state: FetchState::Loading,
            generation: 1,
            ..DashboardView::default()
        };
        app.process_action(&Action::DashboardUpdated(Box::new(view)))
            .unwrap();

        let text = draw(&app);
        assert!(text.contains("Loading dashboard..."));
        assert!(text.contains("◐ loading"));
    }

    #[test]
    fn failure_without_data_shows_error_panel() {
        let mut app = app();
        app.process_action(&Action::DashboardUpdated(Box::new(failed_view(false))))
            .unwrap();

        let text = draw(&app);
        assert!(text.contains(ErrorKind::Network.title()));
        assert!(text.contains("Try again"));
        assert!(app.notification.is_none());
    }

    #[test]
    fn retry_in_flight_disables_retry_action() {
        let mut app = app();
        app.process_action(&Action::DashboardUpdated(Box::new(failed_view(true))))
            .unwrap();

        let text = draw(&app);
        assert!(text.contains("Loading..."));
        assert!(!text.contains("Try again"));

        // Already loading: the refresh request is dropped without spawning
        app.process_action(&Action::Refresh).unwrap();
        assert_eq!(app.view.generation, 1);
        let (notification, _) = app.notification.clone().unwrap();
        assert_eq!(notification.level, NotificationLevel::Info);
    }

    #[test]
    fn screen_keys_are_ignored_until_data_arrives() {
        let mut app = app();
        app.process_action(&Action::SwitchScreen(ScreenId::Links))
            .unwrap();
        assert!(app.handle_key_event(key(KeyCode::Char('c'))).unwrap().is_none());

        app.process_action(&Action::DashboardUpdated(Box::new(ready_view())))
            .unwrap();
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('c'))).unwrap(),
            Some(Action::SortBy(_))
        ));
    }

    #[test]
    fn ready_view_renders_active_screen() {
        let mut app = app();
        app.process_action(&Action::DashboardUpdated(Box::new(ready_view())))
            .unwrap();

        let text = draw(&app);
        assert!(text.contains("Recent links"));
        assert!(text.contains("Docs"));
        assert!(text.contains("updated"));
    }

    #[test]
    fn failed_refresh_with_data_keeps_screen_and_toasts() {
        let mut app = app();
        app.process_action(&Action::DashboardUpdated(Box::new(ready_view())))
            .unwrap();

        let mut failed = ready_view();
        failed.state = FetchState::Failed;
        failed.error = Some("Server error - please try again later".into());
        failed.error_kind = Some(ErrorKind::Server);
        app.process_action(&Action::DashboardUpdated(Box::new(failed)))
            .unwrap();

        let (notification, _) = app.notification.clone().unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);

        let text = draw(&app);
        assert!(text.contains("Recent links"));
        assert!(text.contains("✗ fetch failed"));
    }

    #[test]
    fn completed_refresh_toasts_success() {
        let mut app = app();
        let mut refreshing = ready_view();
        refreshing.state = FetchState::Loading;
        refreshing.refreshing = true;
        app.process_action(&Action::DashboardUpdated(Box::new(refreshing)))
            .unwrap();
        assert!(draw(&app).contains("◐ refreshing"));

        app.process_action(&Action::DashboardUpdated(Box::new(ready_view())))
            .unwrap();
        let (notification, _) = app.notification.clone().unwrap();
        assert_eq!(notification, Notification::success("Dashboard refreshed"));
    }

    #[test]
    fn copy_link_shows_toast() {
        let mut app = app();
        app.process_action(&Action::CopyLink("https://sho.rt/docs".into()))
            .unwrap();
        let text = draw(&app);
        assert!(text.contains("Copied https://sho.rt/docs"));
    }
}
