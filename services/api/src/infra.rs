use metrics_exporter_prometheus::PrometheusHandle;
use sac_ranking::config::{AppConfig, StorageBackend, StorageConfig};
use sac_ranking::evaluations::{
    CsvRecordStore, EvaluationRecord, EvaluationService, MemoryRecordStore, RecordSnapshot,
    RecordStore, RecordStoreError, SharedSecretGate, StoreVersion,
};
use sac_ranking::scoring::ScoringEngine;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Record store selected by `STORE_BACKEND`.
#[derive(Debug)]
pub(crate) enum ConfiguredStore {
    Memory(MemoryRecordStore),
    Csv(CsvRecordStore),
}

impl ConfiguredStore {
    pub(crate) fn open(config: &StorageConfig) -> Self {
        match config.backend {
            StorageBackend::Memory => Self::Memory(MemoryRecordStore::default()),
            StorageBackend::Csv => Self::Csv(CsvRecordStore::new(&config.path)),
        }
    }

    fn inner(&self) -> &dyn RecordStore {
        match self {
            Self::Memory(store) => store,
            Self::Csv(store) => store,
        }
    }
}

impl RecordStore for ConfiguredStore {
    fn append(&self, record: &EvaluationRecord) -> Result<(), RecordStoreError> {
        self.inner().append(record)
    }

    fn snapshot(&self) -> Result<RecordSnapshot, RecordStoreError> {
        self.inner().snapshot()
    }

    fn replace_all(
        &self,
        expected: StoreVersion,
        records: Vec<EvaluationRecord>,
    ) -> Result<StoreVersion, RecordStoreError> {
        self.inner().replace_all(expected, records)
    }
}

pub(crate) fn build_service(config: &AppConfig) -> EvaluationService<ConfiguredStore> {
    let store = ConfiguredStore::open(&config.storage);
    match &store {
        ConfiguredStore::Memory(_) => info!("using in-memory record store"),
        ConfiguredStore::Csv(csv) => info!(path = %csv.path().display(), "using csv record store"),
    }

    let service = EvaluationService::new(Arc::new(store), ScoringEngine::new(config.scoring.clone()));
    match &config.admin.secret {
        Some(secret) => service.with_admin_gate(Arc::new(SharedSecretGate::new(secret.clone()))),
        None => {
            warn!("ADMIN_SECRET is not set; administrative endpoints are disabled");
            service
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn open_honours_configured_backend() {
        let memory = ConfiguredStore::open(&StorageConfig {
            backend: StorageBackend::Memory,
            path: PathBuf::from("unused.csv"),
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(memory, ConfiguredStore::Memory(_)));
        assert!(memory.read_all().expect("empty read").is_empty());

        let csv = ConfiguredStore::open(&StorageConfig {
            backend: StorageBackend::Csv,
            path: PathBuf::from("data/ranking_sac.csv"),
            timeout: Duration::from_secs(1),
        });
        match csv {
            ConfiguredStore::Csv(store) => {
                assert_eq!(store.path(), PathBuf::from("data/ranking_sac.csv").as_path())
            }
            other => panic!("expected csv store, got {other:?}"),
        }
    }
}
