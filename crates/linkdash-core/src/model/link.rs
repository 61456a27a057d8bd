// ── Link domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL with its click counter.
///
/// Identity is `id`. A read-only projection of backend state; the
/// dashboard never edits links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub id: String,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub title: String,
    pub description: Option<String>,
    /// `None` when the backend sent nothing parseable.
    pub created_at: Option<DateTime<Utc>>,
    pub clicks: u64,
    pub is_active: bool,
    pub tags: Vec<String>,
}

impl ShortLink {
    /// Title for display, falling back to the short code for untitled links.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.short_code
        } else {
            &self.title
        }
    }
}

/// A single click on a short link.
///
/// Nothing produces these yet; the type is the landing spot for a
/// click-analytics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickData {
    pub id: String,
    pub link_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub ip_address: String,
    pub user_agent: String,
    pub country: String,
    pub city: String,
    pub referrer: Option<String>,
}
