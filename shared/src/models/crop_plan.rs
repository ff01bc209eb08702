//! Saved crop plans

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::finance::ProfitSummary;
use crate::models::{ActionPlan, FertilizerRecommendation, WaterManagementPlan};

/// A crop plan the farmer saved from a recommendation or entered manually
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Absent for plans not tied to a registered farm
    pub farm_id: Option<Uuid>,
    pub crop_name: String,
    pub plan: Option<ActionPlan>,
    pub fertilizer_plan: Option<FertilizerRecommendation>,
    pub water_plan: Option<WaterManagementPlan>,
    pub profit_summary: Option<ProfitSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
