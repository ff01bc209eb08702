//! Community forum service: posts, likes and comments

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::{MediaFolder, MediaStorage};
use shared::{CommunityComment, CommunityPost, LikeState, PostThread};

/// Longest post or comment body accepted
pub const MAX_CONTENT_CHARS: usize = 5000;

const PAGE_SIZE_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct CommunityService {
    db: PgPool,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostInput {
    pub content: String,
    /// Optional image as a data URI
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentInput {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Author name and avatar copied onto posts and comments
#[derive(Debug, sqlx::FromRow)]
struct Author {
    name: String,
    avatar_url: Option<String>,
}

fn check_content(content: &str) -> AppResult<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_field(
            "content",
            "Content cannot be empty",
            "संदेश खाली नहीं हो सकता",
        ));
    }
    if trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::invalid_field(
            "content",
            "Content is too long",
            "संदेश बहुत लंबा है",
        ));
    }
    Ok(trimmed)
}

impl CommunityService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn author(&self, user_id: Uuid) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT name, avatar_url FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// Create a post, uploading its image first if there is one
    pub async fn create_post(
        &self,
        user_id: Uuid,
        input: CreatePostInput,
        storage: &MediaStorage,
    ) -> AppResult<CommunityPost> {
        let content = check_content(&input.content)?;
        let author = self.author(user_id).await?;

        let image_url = match input.image.as_deref().filter(|i| !i.is_empty()) {
            Some(image) => Some(storage.save_data_uri(MediaFolder::Community, image).await?),
            None => None,
        };

        let post = sqlx::query_as::<_, CommunityPost>(
            r#"
            INSERT INTO community_posts (user_id, user_name, user_avatar, content, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, user_name, user_avatar, content, image_url,
                      likes_count, comments_count, created_at
            "#,
        )
        .bind(user_id)
        .bind(&author.name)
        .bind(&author.avatar_url)
        .bind(content)
        .bind(&image_url)
        .fetch_one(&self.db)
        .await?;

        Ok(post)
    }

    /// Get posts, newest first, flagged with whether the viewer liked them
    pub async fn get_posts(&self, viewer_id: Uuid, query: PostListQuery) -> AppResult<Vec<CommunityPost>> {
        let limit = query.limit.unwrap_or(20).clamp(1, PAGE_SIZE_LIMIT);
        let offset = query.offset.unwrap_or(0).max(0);

        let posts = sqlx::query_as::<_, CommunityPost>(
            r#"
            SELECT p.id, p.user_id, p.user_name, p.user_avatar, p.content, p.image_url,
                   p.likes_count, p.comments_count, p.created_at,
                   EXISTS (SELECT 1 FROM post_likes l WHERE l.post_id = p.id AND l.user_id = $1)
                       AS liked_by_me
            FROM community_posts p
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(viewer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(posts)
    }

    /// Get a post with its comments, oldest comment first
    pub async fn get_thread(&self, viewer_id: Uuid, post_id: Uuid) -> AppResult<PostThread> {
        let post = sqlx::query_as::<_, CommunityPost>(
            r#"
            SELECT p.id, p.user_id, p.user_name, p.user_avatar, p.content, p.image_url,
                   p.likes_count, p.comments_count, p.created_at,
                   EXISTS (SELECT 1 FROM post_likes l WHERE l.post_id = p.id AND l.user_id = $2)
                       AS liked_by_me
            FROM community_posts p
            WHERE p.id = $1
            "#,
        )
        .bind(post_id)
        .bind(viewer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        let comments = sqlx::query_as::<_, CommunityComment>(
            r#"
            SELECT id, post_id, user_id, user_name, user_avatar, content, created_at
            FROM community_comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PostThread { post, comments })
    }

    /// Like or unlike a post. The liker set and the counter change together.
    pub async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> AppResult<LikeState> {
        let mut tx = self.db.begin().await?;

        // Lock the post row so concurrent toggles serialise
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM community_posts WHERE id = $1 FOR UPDATE")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        let (liked, delta) = if removed {
            (false, -1)
        } else {
            sqlx::query("INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            (true, 1)
        };

        let likes_count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE community_posts
            SET likes_count = GREATEST(likes_count + $2, 0)
            WHERE id = $1
            RETURNING likes_count
            "#,
        )
        .bind(post_id)
        .bind(delta)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LikeState { liked, likes_count })
    }

    /// Add a comment and bump the post's comment counter
    pub async fn add_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        input: CreateCommentInput,
    ) -> AppResult<CommunityComment> {
        let content = check_content(&input.content)?;
        let author = self.author(user_id).await?;

        let mut tx = self.db.begin().await?;

        let updated = sqlx::query(
            "UPDATE community_posts SET comments_count = comments_count + 1 WHERE id = $1",
        )
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Post".to_string()));
        }

        let comment = sqlx::query_as::<_, CommunityComment>(
            r#"
            INSERT INTO community_comments (post_id, user_id, user_name, user_avatar, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, post_id, user_id, user_name, user_avatar, content, created_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(&author.name)
        .bind(&author.avatar_url)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(comment)
    }

    /// Delete one of the caller's own posts
    pub async fn delete_post(&self, user_id: Uuid, post_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM community_posts WHERE id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Post".to_string()));
        }

        Ok(())
    }
}
