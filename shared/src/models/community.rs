//! Community forum models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CommunityPost {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Author name and avatar as they were when the post was written
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub likes_count: i32,
    pub comments_count: i32,
    /// Whether the requesting user has liked the post
    #[cfg_attr(feature = "sqlx", sqlx(default))]
    #[serde(default)]
    pub liked_by_me: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CommunityComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post with its comment thread, oldest comment first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostThread {
    #[serde(flatten)]
    pub post: CommunityPost,
    pub comments: Vec<CommunityComment>,
}

/// Result of toggling a like
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub likes_count: i32,
}
