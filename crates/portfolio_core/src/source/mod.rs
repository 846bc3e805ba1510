//! Remote project source contract and adapters.
//!
//! # Responsibility
//! - Define the seam between the loader and whatever serves raw project
//!   records (the hosted proxy in production, fixtures in tests).
//!
//! # Invariants
//! - Adapters return raw records in source order; the loader owns all field
//!   mapping and defaulting.

use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod proxy_client;

pub type SourceResult<T> = Result<T, SourceError>;

/// Failure fetching raw records from the remote source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Connection, DNS or timeout failure.
    Transport(String),
    /// Non-2xx response from the proxy.
    Http { status: u16 },
    /// Response body was not a JSON array of records.
    InvalidBody(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "source transport error: {message}"),
            Self::Http { status } => write!(f, "source returned http status {status}"),
            Self::InvalidBody(message) => write!(f, "source returned invalid body: {message}"),
        }
    }
}

impl Error for SourceError {}

/// Provider of raw remote project records.
pub trait ProjectSource {
    fn fetch_records(&self) -> SourceResult<Vec<Value>>;
}

/// Fixed-record source for tests and offline smoke runs.
pub struct StaticSource {
    records: Vec<Value>,
}

impl StaticSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }
}

impl ProjectSource for StaticSource {
    fn fetch_records(&self) -> SourceResult<Vec<Value>> {
        Ok(self.records.clone())
    }
}
