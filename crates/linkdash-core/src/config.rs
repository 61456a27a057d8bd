// ── Runtime dashboard configuration ──
//
// Describes *where* the links backend lives and how to talk to it.
// Never touches disk: the config crate or the binary builds a
// `DashboardConfig` and hands it to the controller.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use linkdash_api::transport::{TlsMode, TransportConfig};

/// Backend the dashboard talks to when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for one dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API base URL; request paths are appended to it (`{base}/links`).
    pub api_base_url: Url,
    /// Client-side request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Automatic refresh period in seconds. 0 = manual refresh only.
    pub refresh_interval_secs: u64,
}

impl DashboardConfig {
    /// Config pointing at `api_base_url` with every other knob at its default.
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            timeout: None,
            tls: TlsVerification::default(),
            refresh_interval_secs: 0,
        }
    }

    /// Transport settings for building the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn local() -> DashboardConfig {
        DashboardConfig::new(Url::parse(DEFAULT_API_BASE_URL).unwrap())
    }

    #[test]
    fn new_uses_manual_refresh_and_no_timeout() {
        let cfg = local();
        assert_eq!(cfg.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(cfg.timeout, None);
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert_eq!(cfg.refresh_interval_secs, 0);
    }

    #[test]
    fn transport_carries_tls_and_timeout() {
        let mut cfg = local();
        cfg.tls = TlsVerification::DangerAcceptInvalid;
        cfg.timeout = Some(Duration::from_secs(5));

        let transport = cfg.transport();
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Some(Duration::from_secs(5)));
    }
}
