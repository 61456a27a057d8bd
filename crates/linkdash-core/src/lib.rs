// linkdash-core: Aggregation and fetch lifecycle between linkdash-api and the TUI.
//
// The API crate speaks wire types and transport errors; this crate turns
// them into the dashboard view model, classifies failures into a small set
// of user-facing kinds, and owns the refresh state machine consumers watch.

pub mod aggregator;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregator::Aggregator;
pub use config::{DashboardConfig, TlsVerification};
pub use controller::{DashboardController, DashboardView, FetchState};
pub use error::{CoreError, ErrorKind};

pub use model::{
    ChartData, ClickData, ClickHistorySummary, DashboardData, LinkSort, ShortLink, SortDirection,
    SortField, StatsData,
};
