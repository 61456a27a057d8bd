// ── Dashboard data aggregator ──
//
// Runs the dashboard's remote fetches and merges them into one
// `DashboardData`. Every failure leaves here as a classified `CoreError`.

use tracing::{debug, warn};

use linkdash_api::LinksClient;

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::model::{ChartData, DashboardData, ShortLink, StatsData};

/// Fetches and combines dashboard data from the links backend.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Aggregator {
    client: LinksClient,
}

impl Aggregator {
    /// Build an aggregator with its own HTTP client from `config`.
    pub fn new(config: &DashboardConfig) -> Result<Self, CoreError> {
        let client = LinksClient::new(config.api_base_url.clone(), &config.transport())?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: LinksClient) -> Self {
        Self { client }
    }

    /// All links, normalized.
    pub async fn fetch_links(&self) -> Result<Vec<ShortLink>, CoreError> {
        let records = self.client.list_links().await?;
        debug!(count = records.len(), "fetched links");
        Ok(records.into_iter().map(ShortLink::from).collect())
    }

    /// Headline stats, derived from a separate links fetch.
    pub async fn fetch_stats(&self) -> Result<StatsData, CoreError> {
        let links = self.fetch_links().await?;
        Ok(StatsData::from_links(&links))
    }

    /// Daily click history. The backend has no endpoint for it yet.
    #[allow(clippy::unused_async)]
    pub async fn fetch_click_history(&self) -> Result<Vec<ChartData>, CoreError> {
        Ok(Vec::new())
    }

    /// Run all three fetches concurrently and assemble the view model.
    ///
    /// The first failing fetch short-circuits the join. Its classified
    /// error comes back wrapped in [`CoreError::Dashboard`].
    pub async fn fetch_dashboard_data(&self) -> Result<DashboardData, CoreError> {
        let result = tokio::try_join!(
            self.fetch_links(),
            self.fetch_stats(),
            self.fetch_click_history(),
        );

        match result {
            Ok((links, stats, history)) => {
                let data = DashboardData::assemble(&links, stats, history);
                debug!(
                    links = links.len(),
                    total_clicks = data.stats.total_clicks,
                    "dashboard data assembled"
                );
                Ok(data)
            }
            Err(e) => {
                warn!(kind = %e.kind(), error = %e, "dashboard fetch failed");
                Err(CoreError::dashboard(e))
            }
        }
    }
}
