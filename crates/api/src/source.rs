//! Capability catalog sources.
//!
//! The engine fetches the catalog through [`CapabilitySource`], keyed only by
//! the session credential. The HTTP implementation lives on
//! [`crate::DashboardClient`]; the sources here serve offline use and tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use opsdash_types::CapabilityRecord;
use serde_json::Value;

use crate::CatalogError;

/// Anything that can produce the capability catalog for a credential.
#[async_trait]
pub trait CapabilitySource: Send + Sync {
    async fn fetch_capabilities(&self, credential: &str) -> Result<Vec<CapabilityRecord>, CatalogError>;
}

/// Decodes a catalog payload.
///
/// Accepts a bare JSON array of records or an object carrying the array under
/// `data`.
pub fn decode_capability_list(body: &str) -> Result<Vec<CapabilityRecord>, CatalogError> {
    let value: Value = serde_json::from_str(body)?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Array(_)) => data,
            _ => return Err(CatalogError::decode("expected a list of capability records")),
        },
        _ => return Err(CatalogError::decode("expected a list of capability records")),
    };
    Ok(serde_json::from_value(list)?)
}

/// Reads the catalog from a JSON file. The credential is not consulted.
#[derive(Debug, Clone)]
pub struct FileCapabilitySource {
    path: PathBuf,
}

impl FileCapabilitySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CapabilitySource for FileCapabilitySource {
    async fn fetch_capabilities(&self, _credential: &str) -> Result<Vec<CapabilityRecord>, CatalogError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| CatalogError::io(format!("{}: {error}", self.path.display())))?;
        decode_capability_list(&body)
    }
}

/// In-memory source returning a fixed outcome and counting fetches.
#[derive(Debug)]
pub struct StaticCapabilitySource {
    outcome: Result<Vec<CapabilityRecord>, CatalogError>,
    fetches: AtomicUsize,
}

impl StaticCapabilitySource {
    pub fn new(records: Vec<CapabilityRecord>) -> Self {
        Self {
            outcome: Ok(records),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: CatalogError) -> Self {
        Self {
            outcome: Err(error),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapabilitySource for StaticCapabilitySource {
    async fn fetch_capabilities(&self, _credential: &str) -> Result<Vec<CapabilityRecord>, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
