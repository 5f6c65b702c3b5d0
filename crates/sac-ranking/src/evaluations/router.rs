use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::admin::AdminError;
use super::domain::{EvaluationRecord, EvaluationSubmission, Month};
use super::repository::{RecordStore, RecordStoreError, StoreVersion};
use super::service::{EvaluationService, EvaluationServiceError};
use crate::leaderboard::LeaderboardFilter;
use crate::scoring::{ScoreBreakdown, ScoringEngine};

/// Header carrying the administrator credential.
pub const ADMIN_HEADER: &str = "x-admin-secret";

/// Tunables for the HTTP layer.
#[derive(Debug, Clone, Copy)]
pub struct RouterSettings {
    /// Upper bound on any single record store call.
    pub store_timeout: Duration,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Whether a store call only reads or may change the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreCall {
    Read,
    Write,
}

pub(crate) struct RouterState<S> {
    service: Arc<EvaluationService<S>>,
    settings: RouterSettings,
}

impl<S> Clone for RouterState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            settings: self.settings,
        }
    }
}

/// Router builder exposing submission, leaderboard, and admin endpoints.
pub fn evaluation_router<S>(service: Arc<EvaluationService<S>>, settings: RouterSettings) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(submit_handler::<S>))
        .route("/api/v1/evaluations/preview", post(preview_handler::<S>))
        .route("/api/v1/leaderboard/years", get(years_handler::<S>))
        .route("/api/v1/leaderboard/options", post(options_handler::<S>))
        .route("/api/v1/leaderboard/monthly", post(monthly_handler::<S>))
        .route("/api/v1/leaderboard/annual", post(annual_handler::<S>))
        .route(
            "/api/v1/admin/records",
            get(admin_snapshot_handler::<S>).put(admin_replace_handler::<S>),
        )
        .route("/api/v1/admin/export", get(admin_export_handler::<S>))
        .with_state(RouterState { service, settings })
}

#[derive(Debug, Serialize)]
pub(crate) struct PreviewResponse {
    pub(crate) breakdown: ScoreBreakdown,
    pub(crate) summary: String,
    pub(crate) max_total: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MonthlyRequest {
    #[serde(flatten)]
    pub(crate) filter: LeaderboardFilter,
    pub(crate) month: Month,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplaceRequest {
    pub(crate) expected_version: StoreVersion,
    pub(crate) records: Vec<EvaluationRecord>,
}

pub(crate) async fn submit_handler<S>(
    State(state): State<RouterState<S>>,
    Json(submission): Json<EvaluationSubmission>,
) -> Response
where
    S: RecordStore + 'static,
{
    let registered_on = Local::now().date_naive();
    match run_blocking(&state, StoreCall::Write, move |service| {
        service.submit(submission, registered_on)
    })
    .await
    {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn preview_handler<S>(
    State(state): State<RouterState<S>>,
    Json(submission): Json<EvaluationSubmission>,
) -> Response
where
    S: RecordStore + 'static,
{
    match state.service.preview(&submission) {
        Ok(breakdown) => {
            let summary = breakdown.summary();
            let max_total = ScoringEngine::max_total(breakdown.profile);
            (
                StatusCode::OK,
                Json(PreviewResponse {
                    breakdown,
                    summary,
                    max_total,
                }),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn years_handler<S>(State(state): State<RouterState<S>>) -> Response
where
    S: RecordStore + 'static,
{
    match run_blocking(&state, StoreCall::Read, |service| service.years()).await {
        Ok(years) => (StatusCode::OK, Json(json!({ "years": years }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn options_handler<S>(
    State(state): State<RouterState<S>>,
    Json(filter): Json<LeaderboardFilter>,
) -> Response
where
    S: RecordStore + 'static,
{
    match run_blocking(&state, StoreCall::Read, move |service| {
        service.filter_options(&filter)
    })
    .await
    {
        Ok(options) => (StatusCode::OK, Json(options)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn monthly_handler<S>(
    State(state): State<RouterState<S>>,
    Json(request): Json<MonthlyRequest>,
) -> Response
where
    S: RecordStore + 'static,
{
    let MonthlyRequest { filter, month } = request;
    match run_blocking(&state, StoreCall::Read, move |service| {
        service.monthly_leaderboard(&filter, month)
    })
    .await
    {
        Ok(board) => (StatusCode::OK, Json(board)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn annual_handler<S>(
    State(state): State<RouterState<S>>,
    Json(filter): Json<LeaderboardFilter>,
) -> Response
where
    S: RecordStore + 'static,
{
    match run_blocking(&state, StoreCall::Read, move |service| {
        service.annual_leaderboard(&filter)
    })
    .await
    {
        Ok(board) => (StatusCode::OK, Json(board)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_snapshot_handler<S>(
    State(state): State<RouterState<S>>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
{
    let credential = admin_credential(&headers);
    match run_blocking(&state, StoreCall::Read, move |service| {
        service.admin_snapshot(&credential)
    })
    .await
    {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_replace_handler<S>(
    State(state): State<RouterState<S>>,
    headers: HeaderMap,
    Json(request): Json<ReplaceRequest>,
) -> Response
where
    S: RecordStore + 'static,
{
    let credential = admin_credential(&headers);
    let ReplaceRequest {
        expected_version,
        records,
    } = request;
    match run_blocking(&state, StoreCall::Write, move |service| {
        service.admin_replace(&credential, expected_version, records)
    })
    .await
    {
        Ok(version) => (StatusCode::OK, Json(json!({ "version": version }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_export_handler<S>(
    State(state): State<RouterState<S>>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
{
    let credential = admin_credential(&headers);
    match run_blocking(&state, StoreCall::Read, move |service| {
        service.admin_export(&credential)
    })
    .await
    {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"ranking_sac_full.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

fn admin_credential(headers: &HeaderMap) -> String {
    headers
        .get(ADMIN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Runs a store-backed operation on the blocking pool under the configured timeout.
///
/// The blocking task is not cancelled when the timeout fires, so a late write
/// may still land. Writes therefore report an unknown outcome, never a failure.
async fn run_blocking<S, T, F>(
    state: &RouterState<S>,
    call: StoreCall,
    op: F,
) -> Result<T, EvaluationServiceError>
where
    S: RecordStore + 'static,
    T: Send + 'static,
    F: FnOnce(&EvaluationService<S>) -> Result<T, EvaluationServiceError> + Send + 'static,
{
    let service = Arc::clone(&state.service);
    let timeout = state.settings.store_timeout;
    let task = tokio::task::spawn_blocking(move || op(&service));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(RecordStoreError::Unavailable(join_error.to_string()).into()),
        Err(_) => {
            let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            let err = match call {
                StoreCall::Read => RecordStoreError::Timeout { timeout_ms },
                StoreCall::Write => {
                    warn!(timeout_ms, "store write still pending after timeout");
                    RecordStoreError::OutcomeUnknown { timeout_ms }
                }
            };
            Err(err.into())
        }
    }
}

pub(crate) fn error_response(err: EvaluationServiceError) -> Response {
    let status = match &err {
        EvaluationServiceError::Validation(_) | EvaluationServiceError::Scoring(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EvaluationServiceError::Admin(AdminError::Disabled) => StatusCode::FORBIDDEN,
        EvaluationServiceError::Admin(AdminError::Denied) => StatusCode::UNAUTHORIZED,
        EvaluationServiceError::Store(RecordStoreError::Stale { .. }) => StatusCode::CONFLICT,
        EvaluationServiceError::Store(RecordStoreError::OutcomeUnknown { .. }) => {
            StatusCode::GATEWAY_TIMEOUT
        }
        EvaluationServiceError::Store(store) if store.is_recoverable() => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        EvaluationServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": err.user_message(),
        "recoverable": err.is_recoverable(),
    });
    (status, Json(payload)).into_response()
}
