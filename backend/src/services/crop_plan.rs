//! Saved crop plan service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    ActionPlan, CropPlan, EstimatedCosts, FertilizerRecommendation, ProfitSummary,
    WaterManagementPlan,
};

const PLAN_COLUMNS: &str = "id, user_id, farm_id, crop_name, plan, fertilizer_plan, water_plan, \
                            profit_summary, created_at, updated_at";

#[derive(Clone)]
pub struct CropPlanService {
    db: PgPool,
}

/// Per size unit estimates a profit summary can be derived from
#[derive(Debug, Clone, Deserialize)]
pub struct PlanEstimates {
    pub estimated_costs: EstimatedCosts,
    /// kg per size unit
    pub estimated_yield: Decimal,
    /// Rs per kg
    pub estimated_selling_price: Decimal,
}

/// Input for saving a plan
#[derive(Debug, Deserialize)]
pub struct SaveCropPlanInput {
    /// Absent for manual entries not tied to a farm
    pub farm_id: Option<Uuid>,
    pub crop_name: String,
    pub plan: Option<ActionPlan>,
    pub fertilizer_plan: Option<FertilizerRecommendation>,
    pub water_plan: Option<WaterManagementPlan>,
    pub profit_summary: Option<ProfitSummary>,
    pub estimates: Option<PlanEstimates>,
}

#[derive(Debug, sqlx::FromRow)]
struct CropPlanRow {
    id: Uuid,
    user_id: Uuid,
    farm_id: Option<Uuid>,
    crop_name: String,
    plan: Option<Json<ActionPlan>>,
    fertilizer_plan: Option<Json<FertilizerRecommendation>>,
    water_plan: Option<Json<WaterManagementPlan>>,
    profit_summary: Option<Json<ProfitSummary>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CropPlanRow> for CropPlan {
    fn from(row: CropPlanRow) -> Self {
        CropPlan {
            id: row.id,
            user_id: row.user_id,
            farm_id: row.farm_id,
            crop_name: row.crop_name,
            plan: row.plan.map(|j| j.0),
            fertilizer_plan: row.fertilizer_plan.map(|j| j.0),
            water_plan: row.water_plan.map(|j| j.0),
            profit_summary: row.profit_summary.map(|j| j.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Profit summary to store: the one given, else derived from estimates and
/// scaled to the farm area when the plan belongs to a farm
pub fn resolve_profit(
    given: Option<ProfitSummary>,
    estimates: Option<&PlanEstimates>,
    farm_area: Option<Decimal>,
) -> Option<ProfitSummary> {
    given.or_else(|| {
        estimates.map(|e| {
            let per_unit = ProfitSummary::from_estimates(
                &e.estimated_costs,
                e.estimated_yield,
                e.estimated_selling_price,
            );
            match farm_area {
                Some(area) => per_unit.for_area(area),
                None => per_unit,
            }
        })
    })
}

impl CropPlanService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Save a plan
    pub async fn save_plan(&self, user_id: Uuid, input: SaveCropPlanInput) -> AppResult<CropPlan> {
        if input.crop_name.trim().is_empty() {
            return Err(AppError::invalid_field(
                "crop_name",
                "Crop name cannot be empty",
                "फसल का नाम आवश्यक है",
            ));
        }
        if let Some(ref estimates) = input.estimates {
            if estimates.estimated_costs.has_negative() {
                return Err(AppError::invalid_field(
                    "estimates",
                    "Cost estimates cannot be negative",
                    "लागत का अनुमान ऋणात्मक नहीं हो सकता",
                ));
            }
        }

        let farm_area = match input.farm_id {
            Some(farm_id) => Some(
                sqlx::query_scalar::<_, Decimal>(
                    "SELECT size FROM farms WHERE id = $1 AND user_id = $2",
                )
                .bind(farm_id)
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Farm".to_string()))?,
            ),
            None => None,
        };

        let profit_summary = resolve_profit(input.profit_summary, input.estimates.as_ref(), farm_area);

        let row = sqlx::query_as::<_, CropPlanRow>(&format!(
            r#"
            INSERT INTO crop_plans (user_id, farm_id, crop_name, plan, fertilizer_plan,
                                    water_plan, profit_summary)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PLAN_COLUMNS
        ))
        .bind(user_id)
        .bind(input.farm_id)
        .bind(input.crop_name.trim())
        .bind(input.plan.map(Json))
        .bind(input.fertilizer_plan.map(Json))
        .bind(input.water_plan.map(Json))
        .bind(profit_summary.map(Json))
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get the user's plans, newest first
    pub async fn get_plans(&self, user_id: Uuid, farm_id: Option<Uuid>) -> AppResult<Vec<CropPlan>> {
        let rows = sqlx::query_as::<_, CropPlanRow>(&format!(
            r#"
            SELECT {}
            FROM crop_plans
            WHERE user_id = $1 AND ($2::uuid IS NULL OR farm_id = $2)
            ORDER BY created_at DESC
            "#,
            PLAN_COLUMNS
        ))
        .bind(user_id)
        .bind(farm_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CropPlan::from).collect())
    }

    /// Get a plan by ID
    pub async fn get_plan(&self, user_id: Uuid, plan_id: Uuid) -> AppResult<CropPlan> {
        sqlx::query_as::<_, CropPlanRow>(&format!(
            "SELECT {} FROM crop_plans WHERE id = $1 AND user_id = $2",
            PLAN_COLUMNS
        ))
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .map(CropPlan::from)
        .ok_or_else(|| AppError::NotFound("Crop plan".to_string()))
    }

    /// Delete a plan
    pub async fn delete_plan(&self, user_id: Uuid, plan_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM crop_plans WHERE id = $1 AND user_id = $2")
            .bind(plan_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Crop plan".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimates() -> PlanEstimates {
        let c = Decimal::from(2000);
        PlanEstimates {
            estimated_costs: EstimatedCosts {
                seed: c,
                fertilizer: c,
                pesticide: c,
                labor: c,
                irrigation: c,
            },
            estimated_yield: Decimal::from(1000),
            estimated_selling_price: Decimal::from(30),
        }
    }

    #[test]
    fn test_given_summary_wins() {
        let given = ProfitSummary {
            total_revenue: Decimal::from(1),
            total_cost: Decimal::from(1),
            net_profit: Decimal::ZERO,
        };
        assert_eq!(resolve_profit(Some(given), Some(&estimates()), None), Some(given));
    }

    #[test]
    fn test_summary_derived_and_scaled_by_area() {
        let per_unit = resolve_profit(None, Some(&estimates()), None).unwrap();
        assert_eq!(per_unit.net_profit, Decimal::from(20000));

        let farm = resolve_profit(None, Some(&estimates()), Some(Decimal::new(25, 1))).unwrap();
        assert_eq!(farm.total_revenue, Decimal::from(75000));
        assert_eq!(farm.net_profit, Decimal::from(50000));
    }

    #[test]
    fn test_no_data_no_summary() {
        assert_eq!(resolve_profit(None, None, Some(Decimal::ONE)), None);
    }
}
