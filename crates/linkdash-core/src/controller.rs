// ── Dashboard controller ──
//
// Owns the single dashboard view-model slot. Every refresh takes a new
// generation number; a result is published only if no newer refresh was
// issued meanwhile, so overlapping refreshes never overwrite fresh data
// with stale data.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregator::Aggregator;
use crate::config::DashboardConfig;
use crate::error::{CoreError, ErrorKind};
use crate::model::DashboardData;

// ── FetchState ───────────────────────────────────────────────────

/// Lifecycle of the dashboard fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
pub enum FetchState {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

// ── DashboardView ────────────────────────────────────────────────

/// Snapshot published to the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub state: FetchState,
    /// Last successfully assembled data. Survives failed refreshes.
    pub data: Option<Arc<DashboardData>>,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
    /// A refresh is in flight while older data is on screen.
    pub refreshing: bool,
    /// Generation of the most recently issued refresh.
    pub generation: u64,
    /// When `data` was last replaced.
    pub updated_at: Option<DateTime<Utc>>,
}

impl DashboardView {
    pub fn loading(&self) -> bool {
        self.state == FetchState::Loading
    }
}

// ── DashboardController ──────────────────────────────────────────

/// Drives fetches and publishes [`DashboardView`] snapshots.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct DashboardController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: DashboardConfig,
    aggregator: Aggregator,
    view: watch::Sender<DashboardView>,
    /// Highest generation handed out so far.
    generation: AtomicU64,
}

impl DashboardController {
    /// Build a controller and its HTTP client. Does NOT fetch:
    /// call [`start()`](Self::start) or [`refresh()`](Self::refresh).
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let aggregator = Aggregator::new(&config)?;
        Ok(Self::with_aggregator(config, aggregator))
    }

    pub fn with_aggregator(config: DashboardConfig, aggregator: Aggregator) -> Self {
        let (view, _) = watch::channel(DashboardView::default());
        Self {
            inner: Arc::new(ControllerInner {
                config,
                aggregator,
                view,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.inner.aggregator
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to view changes.
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.inner.view.subscribe()
    }

    /// Current view snapshot.
    pub fn view(&self) -> DashboardView {
        self.inner.view.borrow().clone()
    }

    // ── Refresh lifecycle ────────────────────────────────────────

    /// Kick off the first fetch if nothing has been requested yet.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        if self.inner.view.borrow().state != FetchState::Idle {
            return None;
        }
        info!(base_url = %self.inner.config.api_base_url, "starting dashboard");
        Some(self.spawn_refresh())
    }

    /// Fetch and publish, returning this fetch's own outcome.
    ///
    /// The outcome is returned even when a newer refresh superseded this
    /// one and its result was not published.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let generation = self.begin();
        self.complete(generation).await
    }

    /// Fire a refresh on the runtime without awaiting it. The view moves
    /// to `Loading` before this returns.
    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let generation = self.begin();
        let this = self.clone();
        tokio::spawn(async move {
            let _ = this.complete(generation).await;
        })
    }

    /// Refresh every `refresh_interval_secs` until `cancel` fires.
    /// Returns `None` when periodic refresh is disabled.
    pub fn spawn_auto_refresh(&self, cancel: CancellationToken) -> Option<JoinHandle<()>> {
        let secs = self.inner.config.refresh_interval_secs;
        if secs == 0 {
            return None;
        }
        let this = self.clone();
        Some(tokio::spawn(refresh_task(
            this,
            Duration::from_secs(secs),
            cancel,
        )))
    }

    /// Allocate the next generation and publish the `Loading` transition.
    fn begin(&self) -> u64 {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.view.send_modify(|view| {
            view.state = FetchState::Loading;
            view.refreshing = view.data.is_some();
            view.generation = generation;
        });
        debug!(generation, "refresh started");
        generation
    }

    async fn complete(&self, generation: u64) -> Result<(), CoreError> {
        let result = self.inner.aggregator.fetch_dashboard_data().await;
        match result {
            Ok(data) => {
                self.publish(generation, Ok(data));
                Ok(())
            }
            Err(e) => {
                self.publish(generation, Err(&e));
                Err(e)
            }
        }
    }

    /// Apply a finished fetch unless a newer generation has been issued.
    /// Returns whether the view changed.
    fn publish(&self, generation: u64, result: Result<DashboardData, &CoreError>) -> bool {
        let latest = &self.inner.generation;
        let applied = self.inner.view.send_if_modified(|view| {
            if generation != latest.load(Ordering::SeqCst) {
                return false;
            }
            match result {
                Ok(data) => {
                    view.state = FetchState::Ready;
                    view.data = Some(Arc::new(data));
                    view.error = None;
                    view.error_kind = None;
                    view.updated_at = Some(Utc::now());
                }
                Err(e) => {
                    view.state = FetchState::Failed;
                    view.error = Some(e.user_message());
                    view.error_kind = Some(e.kind());
                }
            }
            view.refreshing = false;
            true
        });

        if applied {
            debug!(generation, "refresh published");
        } else {
            debug!(generation, "dropping superseded refresh result");
        }
        applied
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodic refresh loop.
async fn refresh_task(
    controller: DashboardController,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = controller.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
    debug!("refresh task stopped");
}
