use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::admin::{AdminError, AdminGate, DisabledAdminGate};
use super::csv_store::write_records;
use super::domain::{EvaluationRecord, EvaluationSubmission, Month};
use super::repository::{RecordSnapshot, RecordStore, RecordStoreError, StoreVersion};
use super::validation::{validate_submission, ValidationError};
use crate::leaderboard::{
    self, available_years, filter_options, AnnualLeaderboard, FilterOptions, LeaderboardFilter,
    MonthlyLeaderboard,
};
use crate::scoring::{ScoreBreakdown, ScoringEngine, ScoringError};

/// Service composing validation, the scoring engine, and the record store.
pub struct EvaluationService<S> {
    store: Arc<S>,
    engine: Arc<ScoringEngine>,
    admin: Arc<dyn AdminGate>,
}

impl<S> EvaluationService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>, engine: ScoringEngine) -> Self {
        Self {
            store,
            engine: Arc::new(engine),
            admin: Arc::new(DisabledAdminGate),
        }
    }

    pub fn with_admin_gate(mut self, gate: Arc<dyn AdminGate>) -> Self {
        self.admin = gate;
        self
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Validate and score a submission without persisting it.
    pub fn preview(
        &self,
        submission: &EvaluationSubmission,
    ) -> Result<ScoreBreakdown, EvaluationServiceError> {
        validate_submission(submission, self.engine.config())?;
        let breakdown = self
            .engine
            .score(submission.profile, &submission.metrics)?;
        Ok(breakdown)
    }

    /// Score a submission and append the resulting record.
    pub fn submit(
        &self,
        submission: EvaluationSubmission,
        registered_on: NaiveDate,
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let breakdown = self.preview(&submission)?;

        let record = EvaluationRecord {
            month: submission.month,
            year: submission.year,
            employee_name: submission.employee_name.trim().to_string(),
            site: submission.site.trim().to_string(),
            zone: submission.zone.trim().to_string(),
            profile: submission.profile,
            total_score: breakdown.total,
            breakdown: breakdown.summary(),
            registered_on,
        };

        if let Err(err) = self.store.append(&record) {
            warn!(employee = %record.employee_name, error = %err, "evaluation not persisted");
            return Err(err.into());
        }

        info!(
            employee = %record.employee_name,
            profile = record.profile.label(),
            month = record.month.label(),
            year = record.year,
            total = record.total_score,
            "evaluation recorded"
        );
        Ok(record)
    }

    pub fn records(&self) -> Result<Vec<EvaluationRecord>, EvaluationServiceError> {
        Ok(self.store.read_all()?)
    }

    pub fn years(&self) -> Result<Vec<i32>, EvaluationServiceError> {
        Ok(available_years(&self.store.read_all()?))
    }

    pub fn filter_options(
        &self,
        filter: &LeaderboardFilter,
    ) -> Result<FilterOptions, EvaluationServiceError> {
        Ok(filter_options(&self.store.read_all()?, filter))
    }

    pub fn monthly_leaderboard(
        &self,
        filter: &LeaderboardFilter,
        month: Month,
    ) -> Result<MonthlyLeaderboard, EvaluationServiceError> {
        let records = self.store.read_all()?;
        Ok(leaderboard::monthly(&records, filter, month))
    }

    pub fn annual_leaderboard(
        &self,
        filter: &LeaderboardFilter,
    ) -> Result<AnnualLeaderboard, EvaluationServiceError> {
        let records = self.store.read_all()?;
        Ok(leaderboard::annual(&records, filter))
    }

    /// Full table read for the administrative editor.
    pub fn admin_snapshot(
        &self,
        credential: &str,
    ) -> Result<RecordSnapshot, EvaluationServiceError> {
        self.admin.authorize(credential)?;
        Ok(self.store.snapshot()?)
    }

    /// Full table replacement. Fails if the table changed since `expected`.
    pub fn admin_replace(
        &self,
        credential: &str,
        expected: StoreVersion,
        records: Vec<EvaluationRecord>,
    ) -> Result<StoreVersion, EvaluationServiceError> {
        self.admin.authorize(credential)?;
        let rows = records.len();
        match self.store.replace_all(expected, records) {
            Ok(version) => {
                info!(rows, "record table replaced by administrator");
                Ok(version)
            }
            Err(err) => {
                warn!(error = %err, "administrative rewrite rejected");
                Err(err.into())
            }
        }
    }

    /// Full table as CSV text in persisted column order.
    pub fn admin_export(&self, credential: &str) -> Result<String, EvaluationServiceError> {
        self.admin.authorize(credential)?;
        let records = self.store.read_all()?;
        let mut buffer = Vec::new();
        write_records(&mut buffer, &records).map_err(RecordStoreError::from)?;
        String::from_utf8(buffer).map_err(|err| {
            EvaluationServiceError::Store(RecordStoreError::Malformed {
                row: 0,
                reason: err.to_string(),
            })
        })
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Store(#[from] RecordStoreError),
    #[error(transparent)]
    Admin(#[from] AdminError),
}

impl EvaluationServiceError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_recoverable())
    }

    /// Message suitable for showing to the evaluator.
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(err) if err.is_recoverable() => format!(
                "the evaluation was not saved because the record store is unavailable ({err}); please retry"
            ),
            Self::Store(err @ RecordStoreError::OutcomeUnknown { .. }) => format!(
                "the save could not be confirmed ({err}); check the leaderboard before submitting again"
            ),
            other => other.to_string(),
        }
    }
}
