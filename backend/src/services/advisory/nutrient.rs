//! Fertilizer and irrigation planning flows

use shared::{
    validate_soil_health_card, FertilizerRecommendation, FertilizerRequest, WaterManagementPlan,
    WaterManagementRequest,
};

use super::{advisor_request, prompts, AdvisoryService, FlowOutput};
use crate::error::{AppError, AppResult};

impl FlowOutput for FertilizerRecommendation {
    fn check(&mut self) -> Result<(), String> {
        self.check_shape()
    }
}

impl FlowOutput for WaterManagementPlan {
    fn check(&mut self) -> Result<(), String> {
        self.check_shape()
    }
}

impl AdvisoryService {
    /// NPK dose and application plan from a soil health card
    pub async fn recommend_fertilizer(
        &self,
        request: FertilizerRequest,
    ) -> AppResult<FertilizerRecommendation> {
        validate_soil_health_card(&request.soil_health_card).map_err(|msg| {
            AppError::invalid_field("soil_health_card", msg, "मृदा स्वास्थ्य कार्ड के मान मान्य नहीं हैं")
        })?;
        if request.crop_name.trim().is_empty() {
            return Err(AppError::invalid_field(
                "crop_name",
                "Crop name cannot be empty",
                "फसल का नाम आवश्यक है",
            ));
        }

        let prompt = prompts::fertilizer(&request, request.language.unwrap_or_default());
        self.runner()?
            .run("fertilizer_recommendation", advisor_request(prompt))
            .await
    }

    /// Irrigation schedule per water source
    pub async fn plan_water(&self, request: WaterManagementRequest) -> AppResult<WaterManagementPlan> {
        let prompt = prompts::water_management(
            &request.farm,
            &request.crop_name,
            request.language.unwrap_or_default(),
        );
        self.runner()?
            .run("water_management", advisor_request(prompt))
            .await
    }
}
