use serde::{Deserialize, Serialize};

use super::domain::EvaluationRecord;

/// Opaque token identifying the state of the stored table.
///
/// Any append or rewrite produces a new version, so a bulk rewrite can check
/// that nothing landed between its read and its write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreVersion(pub u64);

/// Full table read together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub version: StoreVersion,
    pub records: Vec<EvaluationRecord>,
}

/// Storage abstraction shared by the flat-file and in-memory backends.
///
/// Appends are additive and safe to interleave. `replace_all` is the
/// administrative full-table rewrite and must reject a stale version.
pub trait RecordStore: Send + Sync {
    fn append(&self, record: &EvaluationRecord) -> Result<(), RecordStoreError>;
    fn snapshot(&self) -> Result<RecordSnapshot, RecordStoreError>;
    fn replace_all(
        &self,
        expected: StoreVersion,
        records: Vec<EvaluationRecord>,
    ) -> Result<StoreVersion, RecordStoreError>;

    fn read_all(&self) -> Result<Vec<EvaluationRecord>, RecordStoreError> {
        Ok(self.snapshot()?.records)
    }
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record store did not answer within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    /// A write was handed to the store but did not finish in time; it may
    /// still land.
    #[error("record store did not confirm the write within {timeout_ms} ms")]
    OutcomeUnknown { timeout_ms: u64 },
    #[error("records changed since they were read (expected version {expected:?}, found {actual:?})")]
    Stale {
        expected: StoreVersion,
        actual: StoreVersion,
    },
    #[error("stored row {row} is malformed: {reason}")]
    Malformed { row: usize, reason: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl RecordStoreError {
    /// Whether retrying the same operation later may succeed without
    /// duplicating a write.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RecordStoreError::Unavailable(_) | RecordStoreError::Timeout { .. }
        )
    }
}

impl From<std::io::Error> for RecordStoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}
