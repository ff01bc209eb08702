//! Saved diagnosis report handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::handlers::crop_plan::FarmFilter;
use crate::middleware::CurrentUser;
use crate::services::diagnosis::SaveReportInput;
use crate::services::DiagnosisService;
use crate::AppState;

pub async fn list_reports(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<FarmFilter>,
) -> impl IntoResponse {
    let service = DiagnosisService::new(state.db.clone());

    match service.get_reports(user.user_id, filter.farm_id).await {
        Ok(reports) => (StatusCode::OK, Json(serde_json::json!({ "reports": reports }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(report_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = DiagnosisService::new(state.db.clone());

    match service.get_report(user.user_id, report_id).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Save the outcome of a diagnosis the farmer accepted
pub async fn save_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<SaveReportInput>,
) -> impl IntoResponse {
    let service = DiagnosisService::new(state.db.clone());

    match service
        .save_report(user.user_id, input, &state.integrations.storage)
        .await
    {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(report_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = DiagnosisService::new(state.db.clone());

    match service.delete_report(user.user_id, report_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
