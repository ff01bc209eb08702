//! Market price alert handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::{AlertStatus, MarketAlert};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::market_alert::CreateAlertInput;
use crate::services::price_alert::PriceCheckOutput;
use crate::services::MarketAlertService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    pub status: Option<AlertStatus>,
}

/// Newest alerts first, optionally filtered by status
pub async fn list_alerts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Vec<MarketAlert>>, AppError> {
    let service = MarketAlertService::new(state.db.clone());
    Ok(Json(service.get_alerts(user.user_id, query.status).await?))
}

pub async fn create_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateAlertInput>,
) -> Result<(StatusCode, Json<MarketAlert>), AppError> {
    let service = MarketAlertService::new(state.db.clone());
    let alert = service.create_alert(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn get_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> Result<Json<MarketAlert>, AppError> {
    let service = MarketAlertService::new(state.db.clone());
    Ok(Json(service.get_alert(user.user_id, alert_id).await?))
}

/// Mark a triggered alert as seen
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> Result<Json<MarketAlert>, AppError> {
    let service = MarketAlertService::new(state.db.clone());
    Ok(Json(service.acknowledge_alert(user.user_id, alert_id).await?))
}

/// Withdraw an alert that has not fired
pub async fn cancel_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> Result<Json<MarketAlert>, AppError> {
    let service = MarketAlertService::new(state.db.clone());
    Ok(Json(service.cancel_alert(user.user_id, alert_id).await?))
}

pub async fn delete_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = MarketAlertService::new(state.db.clone());
    service.delete_alert(user.user_id, alert_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check the caller's active alerts against current prices right away
pub async fn check_alerts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PriceCheckOutput>, AppError> {
    let checker = state.price_alert_checker();
    Ok(Json(checker.check_for_user(user.user_id).await?))
}
