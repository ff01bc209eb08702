//! Community forum handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::{CommunityComment, CommunityPost, LikeState, PostThread};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::community::{CreateCommentInput, CreatePostInput, PostListQuery};
use crate::services::CommunityService;
use crate::AppState;

/// Newest posts first
pub async fn list_posts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PostListQuery>,
) -> Result<Json<Vec<CommunityPost>>, AppError> {
    let service = CommunityService::new(state.db.clone());
    Ok(Json(service.get_posts(user.user_id, query).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreatePostInput>,
) -> Result<(StatusCode, Json<CommunityPost>), AppError> {
    let service = CommunityService::new(state.db.clone());
    let post = service
        .create_post(user.user_id, input, &state.integrations.storage)
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// A post with its comments
pub async fn get_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<PostThread>, AppError> {
    let service = CommunityService::new(state.db.clone());
    Ok(Json(service.get_thread(user.user_id, post_id).await?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = CommunityService::new(state.db.clone());
    service.delete_post(user.user_id, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Like the post, or remove the caller's like
pub async fn toggle_like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<LikeState>, AppError> {
    let service = CommunityService::new(state.db.clone());
    Ok(Json(service.toggle_like(user.user_id, post_id).await?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<Uuid>,
    Json(input): Json<CreateCommentInput>,
) -> Result<(StatusCode, Json<CommunityComment>), AppError> {
    let service = CommunityService::new(state.db.clone());
    let comment = service.add_comment(user.user_id, post_id, input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
