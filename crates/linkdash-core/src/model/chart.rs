// ── Click history ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Clicks and new links for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    pub date: NaiveDate,
    pub clicks: u64,
    pub links: u64,
}

/// Headline figures for the analytics summary panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickHistorySummary {
    /// Mean clicks per day, rounded half up.
    pub average_clicks_per_day: u64,
    /// Day with the most clicks; the earliest such day on ties.
    pub best_day: NaiveDate,
}

impl ClickHistorySummary {
    /// Summarize a history. `None` for an empty history.
    pub fn from_history(history: &[ChartData]) -> Option<Self> {
        let first = history.first()?;
        let days = u64::try_from(history.len()).ok()?;

        let total: u64 = history
            .iter()
            .fold(0_u64, |sum, day| sum.saturating_add(day.clicks));
        // Integer round-half-up of total / days.
        let average_clicks_per_day = total / days + u64::from(total % days * 2 >= days);

        let best = history
            .iter()
            .fold(first, |best, day| if day.clicks > best.clicks { day } else { best });

        Some(Self {
            average_clicks_per_day,
            best_day: best.date,
        })
    }
}
