// ── Dashboard view model ──

use serde::{Deserialize, Serialize};

use super::chart::ChartData;
use super::link::ShortLink;
use super::stats::StatsData;

/// How many links the "recent" and "top" panels show.
pub const HIGHLIGHT_LIMIT: usize = 3;

/// Everything the dashboard renders, built fresh per fetch cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: StatsData,
    /// Newest first, at most [`HIGHLIGHT_LIMIT`].
    pub recent_links: Vec<ShortLink>,
    /// Chronological, oldest first.
    pub click_history: Vec<ChartData>,
    /// Most clicked first, at most [`HIGHLIGHT_LIMIT`].
    pub top_links: Vec<ShortLink>,
}

impl DashboardData {
    /// Combine the three fetch results into one view model.
    ///
    /// `recent_links` orders by `created_at` descending with undated links
    /// last. `top_links` orders by clicks descending. Both sorts are stable,
    /// so ties keep backend order.
    pub fn assemble(links: &[ShortLink], stats: StatsData, click_history: Vec<ChartData>) -> Self {
        let mut recent_links = links.to_vec();
        recent_links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_links.truncate(HIGHLIGHT_LIMIT);

        let mut top_links = links.to_vec();
        top_links.sort_by(|a, b| b.clicks.cmp(&a.clicks));
        top_links.truncate(HIGHLIGHT_LIMIT);

        Self {
            stats,
            recent_links,
            click_history,
            top_links,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn link(id: &str, day: Option<u32>, clicks: u64) -> ShortLink {
        ShortLink {
            id: id.into(),
            created_at: day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()),
            clicks,
            ..ShortLink::default()
        }
    }

    fn ids(links: &[ShortLink]) -> Vec<&str> {
        links.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn recent_and_top_are_bounded_prefixes() {
        let links = vec![
            link("a", Some(1), 10),
            link("b", Some(5), 2),
            link("c", Some(3), 30),
            link("d", Some(4), 7),
            link("e", Some(2), 30),
        ];
        let data = DashboardData::assemble(&links, StatsData::from_links(&links), Vec::new());

        assert_eq!(ids(&data.recent_links), vec!["b", "d", "c"]);
        assert_eq!(ids(&data.top_links), vec!["c", "e", "a"]);
    }

    #[test]
    fn undated_links_sort_after_dated_ones() {
        let links = vec![link("x", None, 0), link("y", Some(1), 0)];
        let data = DashboardData::assemble(&links, StatsData::from_links(&links), Vec::new());
        assert_eq!(ids(&data.recent_links), vec!["y", "x"]);
    }

    #[test]
    fn zero_links_is_empty_not_a_panic() {
        let data = DashboardData::assemble(&[], StatsData::from_links(&[]), Vec::new());
        assert!(data.recent_links.is_empty());
        assert!(data.top_links.is_empty());
        assert_eq!(data.stats.total_links, 0);
    }

    #[test]
    fn source_order_is_untouched() {
        let links = vec![link("a", Some(1), 1), link("b", Some(2), 2)];
        let _ = DashboardData::assemble(&links, StatsData::from_links(&links), Vec::new());
        assert_eq!(ids(&links), vec!["a", "b"]);
    }
}
