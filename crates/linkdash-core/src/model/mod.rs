// ── Dashboard domain model ──
//
// Canonical, already-normalized types the dashboard renders. Built fresh on
// every fetch cycle from `linkdash_api` wire records (see `convert`).

pub mod chart;
pub mod dashboard;
pub mod link;
pub mod sort;
pub mod stats;

// ── Re-exports ──────────────────────────────────────────────────────

pub use chart::{ChartData, ClickHistorySummary};
pub use dashboard::{DashboardData, HIGHLIGHT_LIMIT};
pub use link::{ClickData, ShortLink};
pub use sort::{LinkSort, SortDirection, SortField};
pub use stats::StatsData;
