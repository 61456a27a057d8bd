// linkdash-api: Async Rust client for URL-shortener link APIs

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::LinksClient;
pub use error::Error;
pub use models::{ClickRecord, LinkRecord, LinksEnvelope};
pub use transport::{TlsMode, TransportConfig};
