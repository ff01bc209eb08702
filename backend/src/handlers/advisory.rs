//! Advisory flow handlers
//!
//! Thin wrappers that resolve owned data (farm, profile) and hand the
//! request to [`AdvisoryService`].

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared::{
    AgriBotReply, AgriBotRequest, CropRecommendationOutput, CropRecommendationRequest,
    DiagnosisOutput, DiagnosisRequest, FertilizerRecommendation, FertilizerRequest,
    NavigationRequest, NavigationTarget, PestForecast, PestForecastRequest, SellAdvice,
    SellAdviceRequest, Supplier, VarietyRecommendationRequest, VoiceFieldRequest,
    VoiceFieldValue, WaterManagementPlan, WaterManagementRequest, YearLongPlan,
    YearLongPlannerRequest, YearLongVarietyPlan, YearLongVarietyPlanRequest,
};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::{AdvisoryService, FarmService, ProfileService};
use crate::AppState;

fn advisory(state: &AppState) -> AdvisoryService {
    AdvisoryService::new(state.integrations.clone())
}

pub async fn recommend_crops(
    State(state): State<AppState>,
    Json(request): Json<CropRecommendationRequest>,
) -> Result<Json<CropRecommendationOutput>, AppError> {
    Ok(Json(advisory(&state).recommend_crops(request).await?))
}

/// Crop recommendation that looks at current mandi prices first
pub async fn recommend_crops_with_market(
    State(state): State<AppState>,
    Json(request): Json<CropRecommendationRequest>,
) -> Result<Json<CropRecommendationOutput>, AppError> {
    Ok(Json(advisory(&state).recommend_crops_with_market(request).await?))
}

pub async fn recommend_varieties(
    State(state): State<AppState>,
    Json(request): Json<VarietyRecommendationRequest>,
) -> Result<Json<CropRecommendationOutput>, AppError> {
    Ok(Json(advisory(&state).recommend_varieties(request).await?))
}

/// Diagnose a plant problem on one of the caller's farms
pub async fn diagnose(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<DiagnosisRequest>,
) -> Result<Json<DiagnosisOutput>, AppError> {
    let farm = FarmService::new(state.db.clone())
        .get_farm(user.user_id, request.farm_id)
        .await?;
    Ok(Json(advisory(&state).diagnose(&farm, request).await?))
}

pub async fn recommend_fertilizer(
    State(state): State<AppState>,
    Json(request): Json<FertilizerRequest>,
) -> Result<Json<FertilizerRecommendation>, AppError> {
    Ok(Json(advisory(&state).recommend_fertilizer(request).await?))
}

pub async fn plan_water(
    State(state): State<AppState>,
    Json(request): Json<WaterManagementRequest>,
) -> Result<Json<WaterManagementPlan>, AppError> {
    Ok(Json(advisory(&state).plan_water(request).await?))
}

pub async fn forecast_pests(
    State(state): State<AppState>,
    Json(request): Json<PestForecastRequest>,
) -> Result<Json<PestForecast>, AppError> {
    Ok(Json(advisory(&state).forecast_pests(request).await?))
}

/// Sell advice for the caller, using their profile location by default
pub async fn sell_advice(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<SellAdviceRequest>,
) -> Result<Json<SellAdvice>, AppError> {
    let profile = ProfileService::new(state.db.clone())
        .get_profile(user.user_id)
        .await?;
    Ok(Json(advisory(&state).sell_advice(&profile, request).await?))
}

pub async fn plan_year(
    State(state): State<AppState>,
    Json(request): Json<YearLongPlannerRequest>,
) -> Result<Json<YearLongPlan>, AppError> {
    Ok(Json(advisory(&state).plan_year(request).await?))
}

pub async fn plan_year_varieties(
    State(state): State<AppState>,
    Json(request): Json<YearLongVarietyPlanRequest>,
) -> Result<Json<YearLongVarietyPlan>, AppError> {
    Ok(Json(advisory(&state).plan_year_varieties(request).await?))
}

pub async fn agri_bot(
    State(state): State<AppState>,
    Json(request): Json<AgriBotRequest>,
) -> Result<Json<AgriBotReply>, AppError> {
    Ok(Json(advisory(&state).agri_bot(request).await?))
}

/// Always answers with a route
pub async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigationRequest>,
) -> Json<NavigationTarget> {
    Json(advisory(&state).navigate(request).await)
}

pub async fn extract_voice_field(
    State(state): State<AppState>,
    Json(request): Json<VoiceFieldRequest>,
) -> Result<Json<VoiceFieldValue>, AppError> {
    Ok(Json(advisory(&state).extract_voice_field(request).await?))
}

#[derive(Debug, Deserialize)]
pub struct SupplierQuery {
    pub location: String,
}

pub async fn find_suppliers(
    State(state): State<AppState>,
    Query(query): Query<SupplierQuery>,
) -> Result<Json<Vec<Supplier>>, AppError> {
    Ok(Json(advisory(&state).find_suppliers(&query.location).await?))
}
