//! Session-scoped capability catalog state.
//!
//! The catalog is fetched once per credential. Each fetch is tagged with a
//! generation; any credential change bumps the generation so results from a
//! superseded fetch are dropped when they arrive.

use std::sync::Arc;

use indexmap::IndexMap;
use opsdash_api::CatalogError;
use opsdash_types::{CapabilityId, CapabilityRecord};
use serde::Serialize;
use tracing::{debug, warn};

/// Catalog records keyed by id, in the order the service returned them.
pub type CatalogRecords = IndexMap<CapabilityId, CapabilityRecord>;

/// Lifecycle of the catalog for the current credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CatalogStatus {
    /// No credential; nothing loaded.
    Idle,
    /// A fetch for `generation` is in flight.
    Loading { generation: u64 },
    /// Records are loaded for the current credential.
    Ready,
    /// The last fetch failed; retried on the next credential change.
    Failed { message: String },
}

/// Instruction to fetch the catalog, produced on credential changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub credential: String,
}

/// Outcome of applying a fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogUpdate {
    /// The result belonged to a superseded generation and was ignored.
    Stale,
    /// Records were installed; carries the record count.
    Loaded(usize),
    Failed(CatalogError),
}

#[derive(Debug, Clone)]
pub struct CapabilityCatalog {
    records: Arc<CatalogRecords>,
    status: CatalogStatus,
    credential: Option<String>,
    generation: u64,
}

impl Default for CapabilityCatalog {
    fn default() -> Self {
        Self {
            records: Arc::new(CatalogRecords::new()),
            status: CatalogStatus::Idle,
            credential: None,
            generation: 0,
        }
    }
}

impl CapabilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reacts to the session provider's credential.
    ///
    /// Returns a [`FetchRequest`] when a fetch must start. An absent
    /// credential empties the catalog and invalidates any fetch in flight.
    /// While idle or after a failure, any credential (including the same one)
    /// triggers a new fetch.
    pub fn set_credential(&mut self, credential: Option<String>) -> Option<FetchRequest> {
        let Some(credential) = credential.filter(|value| !value.trim().is_empty()) else {
            if self.credential.is_some() || self.status != CatalogStatus::Idle {
                debug!("credential cleared; catalog reset");
            }
            self.credential = None;
            self.generation += 1;
            self.clear_records();
            self.status = CatalogStatus::Idle;
            return None;
        };

        let unchanged = self.credential.as_deref() == Some(credential.as_str());
        if unchanged && matches!(self.status, CatalogStatus::Loading { .. } | CatalogStatus::Ready) {
            return None;
        }

        self.generation += 1;
        self.credential = Some(credential.clone());
        self.clear_records();
        self.status = CatalogStatus::Loading {
            generation: self.generation,
        };
        debug!(generation = self.generation, "catalog fetch requested");
        Some(FetchRequest {
            generation: self.generation,
            credential,
        })
    }

    /// Applies the result of the fetch tagged `generation`.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<CapabilityRecord>, CatalogError>) -> CatalogUpdate {
        if generation != self.generation || !matches!(self.status, CatalogStatus::Loading { .. }) {
            debug!(generation, current = self.generation, "discarding stale catalog result");
            return CatalogUpdate::Stale;
        }

        match result {
            Ok(records) => {
                let mut by_id = CatalogRecords::with_capacity(records.len());
                for record in records {
                    if let Some(previous) = by_id.insert(record.id.clone(), record) {
                        warn!(id = %previous.id, "duplicate capability id in catalog; keeping the last record");
                    }
                }
                let count = by_id.len();
                self.records = Arc::new(by_id);
                self.status = CatalogStatus::Ready;
                debug!(count, generation, "capability catalog loaded");
                CatalogUpdate::Loaded(count)
            }
            Err(error) => {
                warn!(%error, generation, "capability catalog fetch failed");
                self.clear_records();
                self.status = CatalogStatus::Failed {
                    message: error.to_string(),
                };
                CatalogUpdate::Failed(error)
            }
        }
    }

    /// Shared handle to the records. Empty unless [`Self::is_loaded`].
    pub fn records(&self) -> &Arc<CatalogRecords> {
        &self.records
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True only once records for the current credential are installed.
    pub fn is_loaded(&self) -> bool {
        self.status == CatalogStatus::Ready
    }

    fn clear_records(&mut self) {
        if !self.records.is_empty() {
            self.records = Arc::new(CatalogRecords::new());
        }
    }
}
