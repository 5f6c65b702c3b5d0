use std::collections::hash_map::DefaultHasher;
use std::fs::{self, OpenOptions};
use std::hash::{Hash, Hasher};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{EvaluationRecord, Month};
use super::repository::{RecordSnapshot, RecordStore, RecordStoreError, StoreVersion};

/// Flat-file store keeping one evaluation per CSV row.
///
/// The version of the table is a fingerprint of the file contents, so an
/// append made by another process between an admin read and rewrite is
/// detected as well.
#[derive(Debug)]
pub struct CsvRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, RecordStoreError> {
        self.write_lock
            .lock()
            .map_err(|_| RecordStoreError::Unavailable("csv store lock poisoned".to_string()))
    }

    fn read_bytes(&self) -> Result<Vec<u8>, RecordStoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn ensure_parent(&self) -> Result<(), RecordStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl RecordStore for CsvRecordStore {
    fn append(&self, record: &EvaluationRecord) -> Result<(), RecordStoreError> {
        let _guard = self.guard()?;
        self.ensure_parent()?;

        let existing = self.read_bytes()?;
        let needs_header = existing.iter().all(u8::is_ascii_whitespace);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // Hand-edited files may end without a line terminator.
        if existing.last().is_some_and(|byte| *byte != b'\n') {
            file.write_all(b"\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(RecordRow::from(record))?;
        writer.flush()?;

        debug!(path = %self.path.display(), employee = %record.employee_name, "evaluation row appended");
        Ok(())
    }

    fn snapshot(&self) -> Result<RecordSnapshot, RecordStoreError> {
        let _guard = self.guard()?;
        let bytes = self.read_bytes()?;
        let records = read_records(&bytes[..])?;
        Ok(RecordSnapshot {
            version: fingerprint(&bytes),
            records,
        })
    }

    fn replace_all(
        &self,
        expected: StoreVersion,
        records: Vec<EvaluationRecord>,
    ) -> Result<StoreVersion, RecordStoreError> {
        let _guard = self.guard()?;

        let actual = fingerprint(&self.read_bytes()?);
        if actual != expected {
            return Err(RecordStoreError::Stale { expected, actual });
        }

        let mut buffer = Vec::new();
        write_records(&mut buffer, &records)?;

        self.ensure_parent()?;
        let staging = self.path.with_extension("csv.tmp");
        {
            let mut file = fs::File::create(&staging)?;
            file.write_all(&buffer)?;
            file.sync_all()?;
        }
        fs::rename(&staging, &self.path)?;

        info!(path = %self.path.display(), rows = records.len(), "record table rewritten");
        Ok(fingerprint(&buffer))
    }
}

/// Writes records with a header row in persisted column order.
pub fn write_records<W: Write>(writer: W, records: &[EvaluationRecord]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(super::domain::RECORD_COLUMNS)?;
    for record in records {
        csv_writer.serialize(RecordRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads records from CSV text, accepting the legacy Spanish headers.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<EvaluationRecord>, RecordStoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<RecordRow>().enumerate() {
        let row = row?;
        let record = row.into_record().map_err(|reason| RecordStoreError::Malformed {
            row: index + 1,
            reason,
        })?;
        records.push(record);
    }
    Ok(records)
}

fn fingerprint(bytes: &[u8]) -> StoreVersion {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    StoreVersion(hasher.finish())
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordRow {
    #[serde(rename = "Month", alias = "Mes")]
    month: String,
    #[serde(rename = "Year", alias = "Año")]
    year: i32,
    #[serde(rename = "EmployeeName", alias = "Nombre")]
    employee_name: String,
    #[serde(rename = "Site", alias = "CEDIS", default)]
    site: String,
    #[serde(rename = "Zone", alias = "Zona", default)]
    zone: String,
    #[serde(rename = "Profile", alias = "Perfil")]
    profile: String,
    #[serde(rename = "TotalScore", alias = "Puntaje Total")]
    total_score: f64,
    #[serde(rename = "BreakdownText", alias = "Desglose", default)]
    breakdown: String,
    #[serde(rename = "RegisteredDate", alias = "Fecha Reg")]
    registered_on: String,
}

impl From<&EvaluationRecord> for RecordRow {
    fn from(record: &EvaluationRecord) -> Self {
        Self {
            month: record.month.label().to_string(),
            year: record.year,
            employee_name: record.employee_name.clone(),
            site: record.site.clone(),
            zone: record.zone.clone(),
            profile: record.profile.label().to_string(),
            total_score: record.total_score,
            breakdown: record.breakdown.clone(),
            registered_on: record.registered_on.format("%Y-%m-%d").to_string(),
        }
    }
}

impl RecordRow {
    fn into_record(self) -> Result<EvaluationRecord, String> {
        let month = self.month.parse::<Month>()?;
        let profile = self.profile.parse().map_err(|err| format!("{err}"))?;
        let registered_on = NaiveDate::parse_from_str(&self.registered_on, "%Y-%m-%d")
            .map_err(|err| format!("invalid registered date '{}' ({err})", self.registered_on))?;
        if !self.total_score.is_finite() {
            return Err(format!("invalid total score {}", self.total_score));
        }

        Ok(EvaluationRecord {
            month,
            year: self.year,
            employee_name: self.employee_name,
            site: self.site,
            zone: self.zone,
            profile,
            total_score: self.total_score,
            breakdown: self.breakdown,
            registered_on,
        })
    }
}
