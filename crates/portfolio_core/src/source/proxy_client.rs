//! HTTP client for the hosted project-source proxy.
//!
//! # Responsibility
//! - Fetch the raw record array the proxy exposes over GET.
//! - Defeat intermediary caching with a timestamp query parameter.
//!
//! # Invariants
//! - Non-2xx responses and non-array bodies are total failures; no partial
//!   record sets are ever returned.
//! - Status filtering and sort order live in the proxy, not here.

use super::{ProjectSource, SourceError, SourceResult};
use log::{debug, info};
use serde_json::Value;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking client for the proxy endpoint.
pub struct ProxyClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl ProxyClient {
    /// Builds a client against the given proxy endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> SourceResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("portfolio_core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    fn request_url(&self) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis());
        cache_busted_url(&self.endpoint, timestamp)
    }
}

impl ProjectSource for ProxyClient {
    fn fetch_records(&self) -> SourceResult<Vec<Value>> {
        let url = self.request_url();
        debug!("event=source_fetch module=source status=start url={url}");

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|err| SourceError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
            });
        }

        let records: Vec<Value> = response
            .json()
            .map_err(|err| SourceError::InvalidBody(err.to_string()))?;

        info!(
            "event=source_fetch module=source status=ok record_count={}",
            records.len()
        );
        Ok(records)
    }
}

fn cache_busted_url(endpoint: &str, timestamp_ms: u128) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{endpoint}{separator}timestamp={timestamp_ms}")
}
