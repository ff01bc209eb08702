//! Farmer profile service

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::{MediaFolder, MediaStorage};
use shared::{validate_name, Language, Profile};

#[derive(Clone)]
pub struct ProfileService {
    db: PgPool,
}

/// Input for updating a profile
#[derive(Debug, Deserialize)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub language: Option<Language>,
    /// Either an existing URL or a new image as a data URI
    pub avatar: Option<String>,
}

impl ProfileService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get the caller's profile
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>(
            "SELECT name, location, language, avatar_url, phone FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile".to_string()))
    }

    /// Update the caller's profile, storing a new avatar if one was uploaded
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
        storage: &MediaStorage,
    ) -> AppResult<Profile> {
        let existing = self.get_profile(user_id).await?;

        if let Some(ref name) = input.name {
            validate_name(name).map_err(|msg| {
                AppError::invalid_field("name", msg, "नाम मान्य नहीं है")
            })?;
        }

        let avatar_url = match input.avatar {
            Some(avatar) if avatar.starts_with("data:") => {
                Some(storage.save_data_uri(MediaFolder::Avatars, &avatar).await?)
            }
            Some(avatar) if !avatar.trim().is_empty() => Some(avatar),
            _ => existing.avatar_url,
        };

        let name = input.name.map(|n| n.trim().to_string()).unwrap_or(existing.name);
        let location = input
            .location
            .map(|l| l.trim().to_string())
            .unwrap_or(existing.location);
        let language = input.language.unwrap_or(existing.language);

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE users
            SET name = $1, location = $2, language = $3, avatar_url = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING name, location, language, avatar_url, phone
            "#,
        )
        .bind(&name)
        .bind(&location)
        .bind(language)
        .bind(&avatar_url)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(profile)
    }
}
