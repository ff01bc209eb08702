//! Profile handlers

use axum::{extract::State, Json};
use shared::Profile;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::profile::UpdateProfileInput;
use crate::services::ProfileService;
use crate::AppState;

/// Get the caller's profile
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Profile>, AppError> {
    let service = ProfileService::new(state.db.clone());
    Ok(Json(service.get_profile(user.user_id).await?))
}

/// Update the caller's profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<UpdateProfileInput>,
) -> Result<Json<Profile>, AppError> {
    let service = ProfileService::new(state.db.clone());
    let profile = service
        .update_profile(user.user_id, input, &state.integrations.storage)
        .await?;
    Ok(Json(profile))
}
