//! Farm management service

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{validate_farm_size, validate_name, Farm, SizeUnit};

const FARM_COLUMNS: &str = "id, user_id, name, location, size, size_unit, main_crop, soil_type, \
                            irrigation, last_crop, created_at, updated_at";

/// Farm service for managing a farmer's land
#[derive(Clone)]
pub struct FarmService {
    db: PgPool,
}

/// Input for creating a farm
#[derive(Debug, Deserialize)]
pub struct CreateFarmInput {
    pub name: String,
    pub location: String,
    pub size: Decimal,
    pub size_unit: SizeUnit,
    pub main_crop: String,
    pub soil_type: Option<String>,
    pub irrigation: Option<String>,
    pub last_crop: Option<String>,
}

/// Input for updating a farm
#[derive(Debug, Deserialize)]
pub struct UpdateFarmInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub size: Option<Decimal>,
    pub size_unit: Option<SizeUnit>,
    pub main_crop: Option<String>,
    pub soil_type: Option<String>,
    pub irrigation: Option<String>,
    pub last_crop: Option<String>,
}

fn check_name(name: &str) -> AppResult<()> {
    validate_name(name)
        .map_err(|msg| AppError::invalid_field("name", msg, "खेत का नाम मान्य नहीं है"))
}

fn check_location(location: &str) -> AppResult<()> {
    if location.trim().is_empty() {
        return Err(AppError::invalid_field(
            "location",
            "Location cannot be empty",
            "स्थान आवश्यक है",
        ));
    }
    Ok(())
}

fn check_size(size: Decimal) -> AppResult<()> {
    validate_farm_size(size)
        .map_err(|msg| AppError::invalid_field("size", msg, "खेत का आकार मान्य नहीं है"))
}

fn check_main_crop(crop: &str) -> AppResult<()> {
    if crop.trim().is_empty() {
        return Err(AppError::invalid_field(
            "main_crop",
            "Main crop cannot be empty",
            "मुख्य फसल आवश्यक है",
        ));
    }
    Ok(())
}

impl FarmService {
    /// Create a new FarmService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all farms of a user
    pub async fn get_farms(&self, user_id: Uuid) -> AppResult<Vec<Farm>> {
        let farms = sqlx::query_as::<_, Farm>(&format!(
            "SELECT {} FROM farms WHERE user_id = $1 ORDER BY created_at ASC",
            FARM_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(farms)
    }

    /// Get a farm by ID
    pub async fn get_farm(&self, user_id: Uuid, farm_id: Uuid) -> AppResult<Farm> {
        sqlx::query_as::<_, Farm>(&format!(
            "SELECT {} FROM farms WHERE id = $1 AND user_id = $2",
            FARM_COLUMNS
        ))
        .bind(farm_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Farm".to_string()))
    }

    /// Create a new farm
    pub async fn create_farm(&self, user_id: Uuid, input: CreateFarmInput) -> AppResult<Farm> {
        check_name(&input.name)?;
        check_location(&input.location)?;
        check_size(input.size)?;
        check_main_crop(&input.main_crop)?;

        let farm = sqlx::query_as::<_, Farm>(&format!(
            r#"
            INSERT INTO farms (user_id, name, location, size, size_unit, main_crop,
                               soil_type, irrigation, last_crop)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            FARM_COLUMNS
        ))
        .bind(user_id)
        .bind(input.name.trim())
        .bind(input.location.trim())
        .bind(input.size)
        .bind(input.size_unit)
        .bind(input.main_crop.trim())
        .bind(&input.soil_type)
        .bind(&input.irrigation)
        .bind(&input.last_crop)
        .fetch_one(&self.db)
        .await?;

        tracing::debug!("Created farm {} for user {}", farm.id, user_id);

        Ok(farm)
    }

    /// Update a farm
    pub async fn update_farm(
        &self,
        user_id: Uuid,
        farm_id: Uuid,
        input: UpdateFarmInput,
    ) -> AppResult<Farm> {
        let existing = self.get_farm(user_id, farm_id).await?;

        if let Some(ref name) = input.name {
            check_name(name)?;
        }
        if let Some(ref location) = input.location {
            check_location(location)?;
        }
        if let Some(size) = input.size {
            check_size(size)?;
        }
        if let Some(ref crop) = input.main_crop {
            check_main_crop(crop)?;
        }

        let name = input.name.unwrap_or(existing.name);
        let location = input.location.unwrap_or(existing.location);
        let size = input.size.unwrap_or(existing.size);
        let size_unit = input.size_unit.unwrap_or(existing.size_unit);
        let main_crop = input.main_crop.unwrap_or(existing.main_crop);
        let soil_type = input.soil_type.or(existing.soil_type);
        let irrigation = input.irrigation.or(existing.irrigation);
        let last_crop = input.last_crop.or(existing.last_crop);

        let farm = sqlx::query_as::<_, Farm>(&format!(
            r#"
            UPDATE farms
            SET name = $1, location = $2, size = $3, size_unit = $4, main_crop = $5,
                soil_type = $6, irrigation = $7, last_crop = $8, updated_at = NOW()
            WHERE id = $9 AND user_id = $10
            RETURNING {}
            "#,
            FARM_COLUMNS
        ))
        .bind(name.trim())
        .bind(location.trim())
        .bind(size)
        .bind(size_unit)
        .bind(main_crop.trim())
        .bind(&soil_type)
        .bind(&irrigation)
        .bind(&last_crop)
        .bind(farm_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(farm)
    }

    /// Delete a farm
    pub async fn delete_farm(&self, user_id: Uuid, farm_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM farms WHERE id = $1 AND user_id = $2")
            .bind(farm_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Farm".to_string()));
        }

        Ok(())
    }
}
