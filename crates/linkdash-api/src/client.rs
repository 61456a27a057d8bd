// Links API HTTP client
//
// Wraps `reqwest::Client` with base-URL prefixing, status checking and
// envelope normalization. Endpoint methods return canonical record
// sequences; callers never see which wrapper shape the backend used.

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{LinkRecord, LinksEnvelope};
use crate::transport::TransportConfig;

/// Raw HTTP client for the URL-shortener backend.
///
/// All request paths are prefixed with the configured base URL
/// (e.g. `http://localhost:3000/api` + `links`).
#[derive(Debug, Clone)]
pub struct LinksClient {
    http: reqwest::Client,
    base_url: Url,
}

impl LinksClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/{path}`.
    ///
    /// Joined textually rather than with `Url::join`, which would drop the
    /// last base segment when the base has no trailing slash.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    ///
    /// Non-2xx responses become [`Error::Status`] before the body is read.
    pub async fn get_json(&self, path: &str) -> Result<Value, Error> {
        let url = self.endpoint_url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown status").to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET {base}/links`: every link known to the backend.
    pub async fn list_links(&self) -> Result<Vec<LinkRecord>, Error> {
        let body = self.get_json("links").await?;
        let envelope = LinksEnvelope::from_value(body)?;
        debug!(shape = envelope.shape(), "decoded links envelope");
        Ok(envelope.into_links())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> LinksClient {
        LinksClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let c = client("http://localhost:3000/api");
        assert_eq!(
            c.endpoint_url("links").unwrap().as_str(),
            "http://localhost:3000/api/links"
        );
    }

    #[test]
    fn endpoint_url_collapses_duplicate_slashes() {
        let c = client("http://localhost:3000/api/");
        assert_eq!(
            c.endpoint_url("/links").unwrap().as_str(),
            "http://localhost:3000/api/links"
        );
    }

    #[test]
    fn endpoint_url_on_bare_origin() {
        let c = client("https://sho.rt");
        assert_eq!(c.endpoint_url("links").unwrap().as_str(), "https://sho.rt/links");
    }
}
