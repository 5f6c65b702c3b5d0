use std::sync::Mutex;

use super::domain::EvaluationRecord;
use super::repository::{RecordSnapshot, RecordStore, RecordStoreError, StoreVersion};

#[derive(Debug, Default)]
struct Table {
    version: u64,
    records: Vec<EvaluationRecord>,
}

/// Process-local store; the version is a write counter.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    table: Mutex<Table>,
}

impl MemoryRecordStore {
    pub fn with_records(records: Vec<EvaluationRecord>) -> Self {
        Self {
            table: Mutex::new(Table {
                version: 0,
                records,
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Table>, RecordStoreError> {
        self.table
            .lock()
            .map_err(|_| RecordStoreError::Unavailable("record table lock poisoned".to_string()))
    }
}

impl RecordStore for MemoryRecordStore {
    fn append(&self, record: &EvaluationRecord) -> Result<(), RecordStoreError> {
        let mut table = self.lock()?;
        table.records.push(record.clone());
        table.version += 1;
        Ok(())
    }

    fn snapshot(&self) -> Result<RecordSnapshot, RecordStoreError> {
        let table = self.lock()?;
        Ok(RecordSnapshot {
            version: StoreVersion(table.version),
            records: table.records.clone(),
        })
    }

    fn replace_all(
        &self,
        expected: StoreVersion,
        records: Vec<EvaluationRecord>,
    ) -> Result<StoreVersion, RecordStoreError> {
        let mut table = self.lock()?;
        let actual = StoreVersion(table.version);
        if actual != expected {
            return Err(RecordStoreError::Stale { expected, actual });
        }
        table.records = records;
        table.version += 1;
        Ok(StoreVersion(table.version))
    }
}
