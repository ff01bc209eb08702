//! Soil nutrition, fertilizer and irrigation planning models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::FarmDetails;
use crate::types::Language;

/// Values read off a government Soil Health Card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoilHealthCard {
    pub ph: Decimal,
    /// Percent, e.g. 0.5 for 0.5%
    pub organic_carbon: Decimal,
    /// Available N, kg/ha
    pub nitrogen: Decimal,
    /// Available P, kg/ha
    pub phosphorus: Decimal,
    /// Available K, kg/ha
    pub potassium: Decimal,
}

/// One fertilizer application in a schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationItem {
    /// e.g. "Basal Dose (at Sowing)"
    pub application_stage: String,
    pub fertilizer_name: String,
    /// Per acre, e.g. "50 kg"
    pub quantity: String,
    pub application_method: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FertilizerPlan {
    #[serde(default)]
    pub inorganic: Vec<ApplicationItem>,
    #[serde(default)]
    pub organic: Vec<ApplicationItem>,
}

/// Recommended nutrient dose in kg/acre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NpkRecommendation {
    pub n: Decimal,
    pub p: Decimal,
    pub k: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FertilizerRequest {
    pub soil_health_card: SoilHealthCard,
    pub crop_name: String,
    pub location: String,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertilizerRecommendation {
    pub npk_recommendation: NpkRecommendation,
    pub fertilizer_plan: FertilizerPlan,
    #[serde(default)]
    pub recommended_brands: Vec<String>,
    pub subsidy_info: String,
    pub notes: String,
}

impl FertilizerRecommendation {
    pub fn check_shape(&self) -> Result<(), String> {
        let npk = &self.npk_recommendation;
        if [npk.n, npk.p, npk.k].iter().any(|v| *v < Decimal::ZERO) {
            return Err("NPK dose cannot be negative".to_string());
        }
        if self.fertilizer_plan.inorganic.is_empty() && self.fertilizer_plan.organic.is_empty() {
            return Err("fertilizer plan has no applications".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterManagementRequest {
    pub farm: FarmDetails,
    pub crop_name: String,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrrigationStep {
    pub growth_stage: String,
    /// e.g. "Every 8-10 days"
    pub frequency: String,
    /// Water depth or quantity, in farmer-friendly terms
    pub duration: String,
}

/// Irrigation advice for one water source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourcePlan {
    pub source: String,
    pub advice: String,
    pub schedule: Vec<IrrigationStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterManagementPlan {
    pub water_plan: Vec<SourcePlan>,
}

impl WaterManagementPlan {
    pub fn check_shape(&self) -> Result<(), String> {
        if self.water_plan.is_empty() {
            return Err("water plan is empty".to_string());
        }
        Ok(())
    }
}
