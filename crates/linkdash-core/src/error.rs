// ── Core error types ──
//
// User-facing errors from linkdash-core. Consumers never match on HTTP
// status codes or reqwest internals: the `From<linkdash_api::Error>` impl
// classifies every transport-layer failure into an `ErrorKind` and a
// human-readable message.

use serde::Serialize;
use thiserror::Error;

// ── Error kinds ──────────────────────────────────────────────────────

/// Failure category used to pick the error-state presentation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The backend could not be reached at all.
    Network,
    /// HTTP 5xx.
    Server,
    /// HTTP 408 or a client-side timeout.
    Timeout,
    /// HTTP 404.
    NotFound,
    /// Any other 4xx, or a response we could not make sense of.
    Generic,
}

const MSG_NOT_FOUND: &str = "The requested resource was not found";
const MSG_SERVER: &str = "Server error - please try again later";
const MSG_TIMEOUT: &str = "The request timed out";
const MSG_REQUEST: &str = "Request error - check the data and try again";
const MSG_NETWORK: &str = "Cannot reach the server - check your network connection";
const MSG_UNEXPECTED: &str = "An unexpected error occurred while loading data";

impl ErrorKind {
    /// Classify an HTTP status code that is not a success.
    ///
    /// Checked in priority order: 404, then 5xx, then 408, then other 4xx.
    /// Anything left over (1xx, 3xx) is an unclassified `Generic`.
    pub fn classify_status(status: u16) -> (Self, &'static str) {
        match status {
            404 => (Self::NotFound, MSG_NOT_FOUND),
            500..=u16::MAX => (Self::Server, MSG_SERVER),
            408 => (Self::Timeout, MSG_TIMEOUT),
            400..=499 => (Self::Generic, MSG_REQUEST),
            _ => (Self::Generic, MSG_UNEXPECTED),
        }
    }

    /// Canned message used when a failure carries no better description.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Network => MSG_NETWORK,
            Self::Server => MSG_SERVER,
            Self::Timeout => MSG_TIMEOUT,
            Self::NotFound => MSG_NOT_FOUND,
            Self::Generic => MSG_UNEXPECTED,
        }
    }

    /// Heading shown on the error screen.
    pub fn title(self) -> &'static str {
        match self {
            Self::Network => "Connection error",
            Self::Server => "Server error",
            Self::Timeout => "Request timed out",
            Self::NotFound => "Not found",
            Self::Generic => "Something went wrong",
        }
    }

    /// Longer hint shown under the message.
    pub fn description(self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and try again.",
            Self::Server => "The server is temporarily unavailable. Try again in a moment.",
            Self::NotFound => "The page or resource you are looking for could not be found.",
            Self::Timeout => "The request took too long. Check your connection and try again.",
            Self::Generic => "Something went wrong. Try again or contact support.",
        }
    }

    /// Single-glyph icon for the error screen.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Network => "⚠",
            Self::Server => "▤",
            Self::Timeout => "◷",
            Self::NotFound => "?",
            Self::Generic => "✖",
        }
    }

    /// Extra troubleshooting bullets; only connectivity failures have any.
    pub fn hints(self) -> &'static [&'static str] {
        match self {
            Self::Network => &[
                "You are connected to the internet",
                "The server is not under maintenance",
                "A firewall is not blocking the connection",
            ],
            _ => &[],
        }
    }
}

// ── CoreError ────────────────────────────────────────────────────────

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API errors (classified, not exposed raw) ─────────────────────
    #[error("{message}")]
    Api {
        kind: ErrorKind,
        message: String,
        /// HTTP status code (if the backend answered at all).
        status: Option<u16>,
    },

    // ── Aggregation errors ───────────────────────────────────────────
    /// One of the dashboard sub-fetches failed. The classified cause is
    /// kept so the kind survives the wrap.
    #[error("Failed to fetch dashboard data: {source}")]
    Dashboard {
        #[source]
        source: Box<CoreError>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Wrap a sub-fetch failure as a dashboard failure.
    pub fn dashboard(source: CoreError) -> Self {
        Self::Dashboard {
            source: Box::new(source),
        }
    }

    /// Failure category, read through any dashboard wrapper.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { kind, .. } => *kind,
            Self::Dashboard { source } => source.kind(),
            Self::Config { .. } => ErrorKind::Generic,
        }
    }

    /// HTTP status behind this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::Dashboard { source } => source.status(),
            Self::Config { .. } => None,
        }
    }

    /// Message suitable for the error screen. Never empty.
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api { message, .. } | Self::Config { message } => message.clone(),
            Self::Dashboard { source } => return source.user_message(),
        };
        if message.trim().is_empty() {
            self.kind().default_message().to_owned()
        } else {
            message
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<linkdash_api::Error> for CoreError {
    fn from(err: linkdash_api::Error) -> Self {
        use linkdash_api::Error as ApiError;

        match err {
            ApiError::Status { status, .. } => {
                let (kind, message) = ErrorKind::classify_status(status);
                CoreError::Api {
                    kind,
                    message: message.into(),
                    status: Some(status),
                }
            }
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Api {
                        kind: ErrorKind::Timeout,
                        message: MSG_TIMEOUT.into(),
                        status: None,
                    }
                } else if let Some(status) = e.status() {
                    let (kind, message) = ErrorKind::classify_status(status.as_u16());
                    CoreError::Api {
                        kind,
                        message: message.into(),
                        status: Some(status.as_u16()),
                    }
                } else if err.is_connectivity() {
                    CoreError::Api {
                        kind: ErrorKind::Network,
                        message: MSG_NETWORK.into(),
                        status: None,
                    }
                } else {
                    CoreError::Api {
                        kind: ErrorKind::Generic,
                        message: MSG_UNEXPECTED.into(),
                        status: None,
                    }
                }
            }
            ApiError::UnexpectedShape { .. } | ApiError::Deserialization { .. } => CoreError::Api {
                kind: ErrorKind::Generic,
                message: err.to_string(),
                status: None,
            },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn status_err(status: u16) -> CoreError {
        CoreError::from(linkdash_api::Error::Status {
            status,
            reason: String::new(),
        })
    }

    #[test]
    fn status_priority_order() {
        assert_eq!(status_err(404).kind(), ErrorKind::NotFound);
        assert_eq!(status_err(500).kind(), ErrorKind::Server);
        assert_eq!(status_err(503).kind(), ErrorKind::Server);
        assert_eq!(status_err(408).kind(), ErrorKind::Timeout);
        assert_eq!(status_err(400).kind(), ErrorKind::Generic);
        assert_eq!(status_err(422).kind(), ErrorKind::Generic);
        assert_eq!(status_err(302).kind(), ErrorKind::Generic);
    }

    #[test]
    fn status_messages_are_canned() {
        assert_eq!(status_err(404).user_message(), MSG_NOT_FOUND);
        assert_eq!(status_err(502).user_message(), MSG_SERVER);
        assert_eq!(status_err(408).user_message(), MSG_TIMEOUT);
        assert_eq!(status_err(401).user_message(), MSG_REQUEST);
        assert_eq!(status_err(404).status(), Some(404));
    }

    #[test]
    fn unexpected_shape_keeps_its_message() {
        let err = CoreError::from(linkdash_api::Error::UnexpectedShape {
            found: "object with keys: foo".into(),
        });
        assert_eq!(err.kind(), ErrorKind::Generic);
        insta::assert_snapshot!(
            err.user_message(),
            @"Expected array of links, but received object with keys: foo"
        );
    }

    #[test]
    fn dashboard_wrap_preserves_kind_and_message() {
        let err = CoreError::dashboard(status_err(503));
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.user_message(), MSG_SERVER);
        assert_eq!(
            err.to_string(),
            "Failed to fetch dashboard data: Server error - please try again later"
        );
    }

    #[test]
    fn empty_message_falls_back_to_kind_default() {
        let err = CoreError::Api {
            kind: ErrorKind::Network,
            message: "  ".into(),
            status: None,
        };
        assert_eq!(err.user_message(), MSG_NETWORK);
    }

    #[test]
    fn every_kind_has_presentation_copy() {
        for kind in ErrorKind::iter() {
            assert!(!kind.title().is_empty());
            assert!(!kind.description().is_empty());
            assert!(!kind.icon().is_empty());
            assert!(!kind.default_message().is_empty());
        }
        assert_eq!(ErrorKind::Network.hints().len(), 3);
        assert!(ErrorKind::Server.hints().is_empty());
    }

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
        assert_eq!(ErrorKind::Network.to_string(), "network");
    }
}
