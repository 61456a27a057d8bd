//! Terminal input pump.
//!
//! A background task merges crossterm input with two clocks: a slow one that
//! drives spinners and toast expiry, and a fast one that paces redraws. The
//! dashboard only reacts to key presses and resizes; everything else the
//! terminal reports is discarded in [`translate`].

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// New terminal size as (cols, rows).
    Resize(u16, u16),
    Tick,
    Render,
}

/// How often the pump emits [`Event::Tick`] and [`Event::Render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub tick: Duration,
    pub render: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            render: Duration::from_millis(33),
        }
    }
}

/// Keep the events the dashboard acts on. Key release and repeat reports
/// (sent by terminals with the kitty protocol) would otherwise double every
/// keystroke.
pub fn translate(event: &CrosstermEvent) -> Option<Event> {
    match *event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

fn clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn pump(tx: mpsc::UnboundedSender<Event>, cadence: Cadence, cancel: CancellationToken) {
    let mut input = EventStream::new();
    let mut tick = clock(cadence.tick);
    let mut render = clock(cadence.render);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = tick.tick() => Event::Tick,
            _ = render.tick() => Event::Render,
            next = input.next() => match next {
                Some(Ok(raw)) => match translate(&raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    warn!(error = %e, "terminal input error");
                    continue;
                }
                None => {
                    debug!("terminal input stream closed");
                    break;
                }
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

/// Handle to the input pump. Dropping it stops the background task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new(cadence: Cadence) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, cadence, cancel.clone()));
        Self { rx, cancel }
    }

    /// `None` once the pump has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{
        KeyCode, KeyEventState, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };

    use super::*;

    fn key(kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn only_key_presses_pass() {
        assert!(matches!(
            translate(&key(KeyEventKind::Press)),
            Some(Event::Key(k)) if k.code == KeyCode::Char('r')
        ));
        assert_eq!(translate(&key(KeyEventKind::Release)), None);
        assert_eq!(translate(&key(KeyEventKind::Repeat)), None);
    }

    #[test]
    fn resize_passes_and_the_rest_is_dropped() {
        assert_eq!(
            translate(&CrosstermEvent::Resize(120, 40)),
            Some(Event::Resize(120, 40))
        );
        assert_eq!(translate(&CrosstermEvent::FocusGained), None);
        assert_eq!(translate(&CrosstermEvent::Paste("sho.rt/abc".into())), None);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(translate(&CrosstermEvent::Mouse(click)), None);
    }

    #[test]
    fn default_cadence_is_4hz_ticks_and_30fps_renders() {
        let cadence = Cadence::default();
        assert_eq!(cadence.tick, Duration::from_millis(250));
        assert_eq!(cadence.render, Duration::from_millis(33));
    }
}
