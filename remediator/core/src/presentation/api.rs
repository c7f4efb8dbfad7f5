use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::application::pipeline::IncidentPipeline;
use crate::application::report::DailyReportService;
use crate::domain::alarm::AlarmEvent;

pub struct AppState {
    pub pipeline: Arc<IncidentPipeline>,
    pub reports: Arc<DailyReportService>,
}

pub fn app(pipeline: Arc<IncidentPipeline>, reports: Arc<DailyReportService>) -> Router {
    let state = Arc::new(AppState { pipeline, reports });

    Router::new()
        .route("/events", post(ingest_event))
        .route("/reports/daily", post(run_daily_report))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn ingest_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    match state.pipeline.handle(AlarmEvent::new(payload)).await {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}

#[derive(serde::Deserialize, Default)]
pub struct DailyReportRequest {
    #[serde(default)]
    pub date: Option<String>,
}

async fn run_daily_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DailyReportRequest>,
) -> impl IntoResponse {
    match state.reports.run(request.date).await {
        Ok(report) => (StatusCode::OK, Json(json!(report))),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}
