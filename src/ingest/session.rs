//! Ingestion session - keeps the current dataset and orders competing loads.
//!
//! Each ingestion attempt takes a ticket with a monotonically increasing
//! sequence number before decoding starts. When the attempt finishes, its
//! result is applied only if no later attempt has been started in the
//! meantime. A failed attempt never clears the dataset already loaded.

use crate::error::{MonitorError, MonitorResult};
use crate::ingest::ingest_file;
use crate::types::Dataset;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Handle for one ingestion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestTicket {
    sequence: u64,
}

impl IngestTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// A dataset that has been accepted by the session
#[derive(Debug, Clone, Serialize)]
pub struct LoadedDataset {
    pub sequence: u64,
    pub source: String,
    pub ingested_at: DateTime<Utc>,
    pub dataset: Dataset,
}

/// What happened to a completed ingestion attempt
#[derive(Debug)]
pub enum IngestOutcome {
    /// The dataset replaced the current one
    Applied(Arc<LoadedDataset>),
    /// A later attempt was started before this one finished; result discarded
    Superseded { sequence: u64, latest: u64 },
    /// Ingestion failed; the previous dataset (if any) is still current
    Failed {
        error: MonitorError,
        retained: Option<Arc<LoadedDataset>>,
    },
}

impl IngestOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, IngestOutcome::Applied(_))
    }
}

#[derive(Debug, Default)]
struct SessionState {
    latest_issued: u64,
    current: Option<Arc<LoadedDataset>>,
}

#[derive(Debug, Default)]
pub struct IngestSession {
    state: Mutex<SessionState>,
}

impl IngestSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // State is replaced wholesale, so a poisoned guard is still consistent
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new ingestion attempt. Any attempt still in flight becomes stale.
    pub fn begin(&self) -> IngestTicket {
        let mut state = self.lock();
        state.latest_issued += 1;
        IngestTicket {
            sequence: state.latest_issued,
        }
    }

    /// Hand the result of an attempt back to the session
    pub fn complete(
        &self,
        ticket: IngestTicket,
        source: impl Into<String>,
        result: MonitorResult<Dataset>,
    ) -> IngestOutcome {
        let mut state = self.lock();

        if ticket.sequence != state.latest_issued {
            warn!(
                sequence = ticket.sequence,
                latest = state.latest_issued,
                "discarding stale ingestion result"
            );
            return IngestOutcome::Superseded {
                sequence: ticket.sequence,
                latest: state.latest_issued,
            };
        }

        match result {
            Ok(dataset) => {
                let loaded = Arc::new(LoadedDataset {
                    sequence: ticket.sequence,
                    source: source.into(),
                    ingested_at: Utc::now(),
                    dataset,
                });
                info!(
                    sequence = loaded.sequence,
                    source = %loaded.source,
                    "dataset replaced"
                );
                state.current = Some(Arc::clone(&loaded));
                IngestOutcome::Applied(loaded)
            }
            Err(error) => {
                warn!(
                    sequence = ticket.sequence,
                    error = %error,
                    kept_previous = state.current.is_some(),
                    "ingestion failed"
                );
                IngestOutcome::Failed {
                    error,
                    retained: state.current.clone(),
                }
            }
        }
    }

    /// Begin, decode, and complete in one blocking call
    pub fn ingest_path<P: AsRef<Path>>(&self, path: P) -> IngestOutcome {
        let path = path.as_ref();
        let ticket = self.begin();
        let result = ingest_file(path);
        self.complete(ticket, path.display().to_string(), result)
    }

    pub fn current(&self) -> Option<Arc<LoadedDataset>> {
        self.lock().current.clone()
    }

    pub fn latest_sequence(&self) -> u64 {
        self.lock().latest_issued
    }
}
