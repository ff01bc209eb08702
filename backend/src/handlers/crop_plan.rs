//! Saved crop plan handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::crop_plan::SaveCropPlanInput;
use crate::services::CropPlanService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FarmFilter {
    pub farm_id: Option<Uuid>,
}

/// List saved plans, optionally for one farm
pub async fn list_plans(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<FarmFilter>,
) -> impl IntoResponse {
    let service = CropPlanService::new(state.db.clone());

    match service.get_plans(user.user_id, filter.farm_id).await {
        Ok(plans) => (StatusCode::OK, Json(serde_json::json!({ "plans": plans }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_plan(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CropPlanService::new(state.db.clone());

    match service.get_plan(user.user_id, plan_id).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Save a generated plan against a farm
pub async fn save_plan(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<SaveCropPlanInput>,
) -> impl IntoResponse {
    let service = CropPlanService::new(state.db.clone());

    match service.save_plan(user.user_id, input).await {
        Ok(plan) => (StatusCode::CREATED, Json(plan)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_plan(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CropPlanService::new(state.db.clone());

    match service.delete_plan(user.user_id, plan_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
