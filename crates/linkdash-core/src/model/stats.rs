// ── Aggregate statistics ──

use serde::{Deserialize, Serialize};

use super::link::ShortLink;

/// Fixed values for metrics the backend has no endpoint for yet.
const PLACEHOLDER_TOP_COUNTRY: &str = "Poland";
const PLACEHOLDER_TOP_REFERRER: &str = "Google";

/// Headline numbers for the stats cards.
///
/// `total_links`, `total_clicks` and `active_links` are computed from the
/// link list. The time-windowed and geographic fields are placeholders until
/// a click-analytics endpoint exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub total_links: u64,
    pub total_clicks: u64,
    pub active_links: u64,
    pub clicks_today: u64,
    pub clicks_this_week: u64,
    pub clicks_this_month: u64,
    pub top_country: String,
    pub top_referrer: String,
}

impl StatsData {
    /// Derive stats from a link list. An empty list yields all zeros.
    pub fn from_links(links: &[ShortLink]) -> Self {
        let total_clicks = links
            .iter()
            .fold(0_u64, |sum, link| sum.saturating_add(link.clicks));
        let active_links = links.iter().filter(|link| link.is_active).count();

        Self {
            total_links: u64::try_from(links.len()).unwrap_or(u64::MAX),
            total_clicks,
            active_links: u64::try_from(active_links).unwrap_or(u64::MAX),
            clicks_today: 0,
            clicks_this_week: 0,
            clicks_this_month: 0,
            top_country: PLACEHOLDER_TOP_COUNTRY.into(),
            top_referrer: PLACEHOLDER_TOP_REFERRER.into(),
        }
    }
}

impl Default for StatsData {
    fn default() -> Self {
        Self::from_links(&[])
    }
}
