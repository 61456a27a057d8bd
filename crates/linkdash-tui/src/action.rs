//! All possible UI actions. Actions are the sole mechanism for state mutation.

use linkdash_core::{DashboardView, ShortLink, SortField};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state change in the TUI flows through an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ───────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Data ─────────────────────────────────────────────────────
    /// User asked for a re-fetch.
    Refresh,
    /// The controller published a new view.
    DashboardUpdated(Box<DashboardView>),

    // ── Links table ──────────────────────────────────────────────
    SortBy(SortField),
    /// Copy this short URL.
    CopyLink(String),
    OpenDetail(Box<ShortLink>),
    CloseDetail,
}
