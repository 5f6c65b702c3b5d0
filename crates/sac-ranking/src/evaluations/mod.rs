//! Evaluation submission, storage, and administration.

pub mod admin;
pub mod csv_store;
pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use admin::{AdminError, AdminGate, DisabledAdminGate, SharedSecretGate};
pub use csv_store::{read_records, write_records, CsvRecordStore};
pub use domain::{EvaluationRecord, EvaluationSubmission, Month, RECORD_COLUMNS};
pub use memory::MemoryRecordStore;
pub use repository::{RecordSnapshot, RecordStore, RecordStoreError, StoreVersion};
pub use router::{evaluation_router, RouterSettings};
pub use service::{EvaluationService, EvaluationServiceError};
pub use validation::{validate_submission, ValidationError, MAX_YEAR, MIN_YEAR};
