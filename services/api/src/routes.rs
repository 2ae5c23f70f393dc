use crate::infra::{deserialize_optional_date, AppState};
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use kaution_check::deposit::{self, intake, Assessment, AssessmentSummary, DepositInput};
use kaution_check::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct DepositCheckRequest {
    #[serde(flatten)]
    pub(crate) input: DepositInput,
    /// Pins the evaluation date; defaults to the server's local date.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DepositCheckResponse {
    pub(crate) today: NaiveDate,
    pub(crate) assessment: Assessment,
    pub(crate) summary: AssessmentSummary,
}

pub(crate) fn deposit_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/deposit/check", post(deposit_check_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn deposit_check_endpoint(
    payload: Result<Json<DepositCheckRequest>, JsonRejection>,
) -> Result<Json<DepositCheckResponse>, AppError> {
    let Json(DepositCheckRequest { input, today }) = payload?;

    intake::validate(&input)?;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let assessment = deposit::evaluate_on(&input, today);
    let summary = assessment.summary();

    info!(
        situation = input.situation.slug(),
        verdict = ?assessment.verdict,
        problems = assessment.problems.len(),
        "deposit check served"
    );

    Ok(Json(DepositCheckResponse {
        today,
        assessment,
        summary,
    }))
}
