use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use crate::evaluations::domain::{EvaluationRecord, EvaluationSubmission, Month};
use crate::evaluations::repository::{
    RecordSnapshot, RecordStore, RecordStoreError, StoreVersion,
};
use crate::evaluations::{
    evaluation_router, EvaluationService, MemoryRecordStore, RouterSettings, SharedSecretGate,
};
use crate::scoring::{BreakageStatus, MetricInput, Profile, ScoringConfig, ScoringEngine};

pub(super) const ADMIN_SECRET: &str = "s3cret-admin";

pub(super) fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn registered_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date")
}

/// Mixed supervisor metrics worth 67 points.
pub(super) fn mixed_metrics() -> MetricInput {
    MetricInput {
        departure_time: Some(at(7, 45)),
        first_visit_time: Some(at(9, 30)),
        fill_rate: Some(97.5),
        proximity: Some(96.2),
        inventory_variance: Some(1_500.0),
        archetype: Some("C".to_string()),
        shrink_rate: Some(0.07),
        breakage: Some(BreakageStatus::OnTarget),
        ..MetricInput::default()
    }
}

pub(super) fn submission() -> EvaluationSubmission {
    EvaluationSubmission {
        employee_name: "  Ana Torres ".to_string(),
        site: "CEDI Norte".to_string(),
        zone: "Bajio".to_string(),
        profile: Profile::MixedSupervisor,
        month: Month::March,
        year: 2025,
        metrics: mixed_metrics(),
    }
}

pub(super) fn record(name: &str, month: Month, score: f64) -> EvaluationRecord {
    EvaluationRecord {
        month,
        year: 2025,
        employee_name: name.to_string(),
        site: "CEDI Norte".to_string(),
        zone: "Bajio".to_string(),
        profile: Profile::MixedSupervisor,
        total_score: score,
        breakdown: "Departure:5 | FirstVisit:2".to_string(),
        registered_on: registered_on(),
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

pub(super) fn build_service() -> (
    EvaluationService<MemoryRecordStore>,
    Arc<MemoryRecordStore>,
) {
    let store = Arc::new(MemoryRecordStore::default());
    let service = EvaluationService::new(store.clone(), engine())
        .with_admin_gate(Arc::new(SharedSecretGate::new(ADMIN_SECRET)));
    (service, store)
}

pub(super) fn router_with_service<S: RecordStore + 'static>(
    service: EvaluationService<S>,
) -> axum::Router {
    evaluation_router(Arc::new(service), RouterSettings::default())
}

/// Store whose backend is offline.
pub(super) struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn append(&self, _record: &EvaluationRecord) -> Result<(), RecordStoreError> {
        Err(RecordStoreError::Unavailable("sheet offline".to_string()))
    }

    fn snapshot(&self) -> Result<RecordSnapshot, RecordStoreError> {
        Err(RecordStoreError::Unavailable("sheet offline".to_string()))
    }

    fn replace_all(
        &self,
        _expected: StoreVersion,
        _records: Vec<EvaluationRecord>,
    ) -> Result<StoreVersion, RecordStoreError> {
        Err(RecordStoreError::Unavailable("sheet offline".to_string()))
    }
}

/// In-memory store that answers only after a delay.
pub(super) struct SlowStore {
    delay: Duration,
    pub(super) inner: MemoryRecordStore,
}

impl SlowStore {
    pub(super) fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: MemoryRecordStore::default(),
        }
    }
}

impl RecordStore for SlowStore {
    fn append(&self, record: &EvaluationRecord) -> Result<(), RecordStoreError> {
        std::thread::sleep(self.delay);
        self.inner.append(record)
    }

    fn snapshot(&self) -> Result<RecordSnapshot, RecordStoreError> {
        std::thread::sleep(self.delay);
        self.inner.snapshot()
    }

    fn replace_all(
        &self,
        expected: StoreVersion,
        records: Vec<EvaluationRecord>,
    ) -> Result<StoreVersion, RecordStoreError> {
        std::thread::sleep(self.delay);
        self.inner.replace_all(expected, records)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

/// Unique scratch path for a CSV store test; the file itself is not created.
pub(super) fn scratch_csv(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let unique = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir()
        .join(format!("sac-ranking-{}-{unique}", std::process::id()))
        .join(format!("{name}.csv"))
}
