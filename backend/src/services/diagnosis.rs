//! Saved diagnosis reports

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::{MediaFolder, MediaStorage};
use shared::{DiagnosisReport, Treatment, VendorRecommendation};

const REPORT_COLUMNS: &str = "id, user_id, farm_id, crop, image_url, symptoms, selected_disease, \
                              ai_confidence, selected_treatment, vendor_recommendations, created_at";

#[derive(Clone)]
pub struct DiagnosisService {
    db: PgPool,
}

/// The diagnosis the farmer picked from a result, to keep for later
#[derive(Debug, Deserialize)]
pub struct SaveReportInput {
    pub farm_id: Uuid,
    /// Data URI of the photo that was diagnosed, or an already stored URL
    pub image: Option<String>,
    pub symptoms: Option<String>,
    pub selected_disease: String,
    pub ai_confidence: Decimal,
    pub selected_treatment: Treatment,
    #[serde(default)]
    pub vendor_recommendations: Vec<VendorRecommendation>,
}

#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    id: Uuid,
    user_id: Uuid,
    farm_id: Uuid,
    crop: String,
    image_url: Option<String>,
    symptoms: Option<String>,
    selected_disease: String,
    ai_confidence: Decimal,
    selected_treatment: Json<Treatment>,
    vendor_recommendations: Json<Vec<VendorRecommendation>>,
    created_at: DateTime<Utc>,
}

impl From<ReportRow> for DiagnosisReport {
    fn from(row: ReportRow) -> Self {
        DiagnosisReport {
            id: row.id,
            user_id: row.user_id,
            farm_id: row.farm_id,
            crop: row.crop,
            image_url: row.image_url,
            symptoms: row.symptoms,
            selected_disease: row.selected_disease,
            ai_confidence: row.ai_confidence,
            selected_treatment: row.selected_treatment.0,
            vendor_recommendations: row.vendor_recommendations.0,
            created_at: row.created_at,
        }
    }
}

impl DiagnosisService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Save a report. The crop is taken from the farm it was diagnosed on.
    pub async fn save_report(
        &self,
        user_id: Uuid,
        input: SaveReportInput,
        storage: &MediaStorage,
    ) -> AppResult<DiagnosisReport> {
        if input.selected_disease.trim().is_empty() {
            return Err(AppError::invalid_field(
                "selected_disease",
                "A diagnosis must be selected",
                "कृपया एक निदान चुनें",
            ));
        }

        let crop = sqlx::query_scalar::<_, String>(
            "SELECT main_crop FROM farms WHERE id = $1 AND user_id = $2",
        )
        .bind(input.farm_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Farm".to_string()))?;

        let image_url = match input.image.filter(|i| !i.is_empty()) {
            Some(image) if image.starts_with("data:") => {
                Some(storage.save_data_uri(MediaFolder::Diagnosis, &image).await?)
            }
            other => other,
        };

        let confidence = input
            .ai_confidence
            .clamp(Decimal::ZERO, Decimal::from(100));

        let row = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            INSERT INTO diagnosis_reports (user_id, farm_id, crop, image_url, symptoms,
                                           selected_disease, ai_confidence, selected_treatment,
                                           vendor_recommendations)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(user_id)
        .bind(input.farm_id)
        .bind(&crop)
        .bind(&image_url)
        .bind(&input.symptoms)
        .bind(input.selected_disease.trim())
        .bind(confidence)
        .bind(Json(&input.selected_treatment))
        .bind(Json(&input.vendor_recommendations))
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get reports, newest first, optionally for one farm
    pub async fn get_reports(&self, user_id: Uuid, farm_id: Option<Uuid>) -> AppResult<Vec<DiagnosisReport>> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            SELECT {}
            FROM diagnosis_reports
            WHERE user_id = $1 AND ($2::uuid IS NULL OR farm_id = $2)
            ORDER BY created_at DESC
            "#,
            REPORT_COLUMNS
        ))
        .bind(user_id)
        .bind(farm_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(DiagnosisReport::from).collect())
    }

    /// Get a report by ID
    pub async fn get_report(&self, user_id: Uuid, report_id: Uuid) -> AppResult<DiagnosisReport> {
        sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {} FROM diagnosis_reports WHERE id = $1 AND user_id = $2",
            REPORT_COLUMNS
        ))
        .bind(report_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .map(DiagnosisReport::from)
        .ok_or_else(|| AppError::NotFound("Diagnosis report".to_string()))
    }

    /// Delete a report
    pub async fn delete_report(&self, user_id: Uuid, report_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM diagnosis_reports WHERE id = $1 AND user_id = $2")
            .bind(report_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Diagnosis report".to_string()));
        }

        Ok(())
    }
}
