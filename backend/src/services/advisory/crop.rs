//! Crop, variety and year-long planning flows

use std::collections::HashSet;

use shared::{
    CandidateCrops, CropRecommendationOutput, CropRecommendationRequest, MandiPrice, Region,
    VarietyRecommendationRequest, YearLongPlan, YearLongPlannerRequest, YearLongVarietyPlan,
    YearLongVarietyPlanRequest,
};

use super::{advisor_request, prompts, AdvisoryService, FlowOutput};
use crate::error::{AppError, AppResult};

/// Crops priced in the second pass of the market-aware recommendation
const MAX_CANDIDATES: usize = 5;

impl FlowOutput for CropRecommendationOutput {
    fn check(&mut self) -> Result<(), String> {
        self.check_shape()?;
        self.normalize();
        Ok(())
    }
}

impl FlowOutput for CandidateCrops {
    fn check(&mut self) -> Result<(), String> {
        let mut seen = HashSet::new();
        self.candidates = self
            .candidates
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && seen.insert(c.to_lowercase()))
            .take(MAX_CANDIDATES)
            .collect();
        if self.candidates.is_empty() {
            return Err("no candidate crops".to_string());
        }
        Ok(())
    }
}

impl FlowOutput for YearLongPlan {
    fn check(&mut self) -> Result<(), String> {
        self.check_shape()?;
        self.normalize();
        Ok(())
    }
}

impl FlowOutput for YearLongVarietyPlan {
    fn check(&mut self) -> Result<(), String> {
        if self.seasonal_plans.is_empty() {
            return Err("no seasonal plans".to_string());
        }
        Ok(())
    }
}

impl AdvisoryService {
    /// Crops suited to a farm's soil, water and season
    pub async fn recommend_crops(
        &self,
        request: CropRecommendationRequest,
    ) -> AppResult<CropRecommendationOutput> {
        let prompt = prompts::crop_recommendation(&request.farm, request.language.unwrap_or_default());
        self.runner()?
            .run("crop_recommendation", advisor_request(prompt))
            .await
    }

    /// Two passes: shortlist crops, price each at nearby mandis, then recommend
    /// with those prices in view
    pub async fn recommend_crops_with_market(
        &self,
        request: CropRecommendationRequest,
    ) -> AppResult<CropRecommendationOutput> {
        let runner = self.runner()?;
        let shortlist: CandidateCrops = runner
            .run("candidate_crops", advisor_request(prompts::candidate_crops(&request.farm)))
            .await?;

        let region = Region::parse(&request.farm.location, "Unknown", "Unknown");
        let mut priced = Vec::with_capacity(shortlist.candidates.len());
        for crop in shortlist.candidates {
            let prices = self.live_prices(&region, &crop).await;
            priced.push((crop, prices));
        }

        let prompt = prompts::market_aware_recommendation(
            &request.farm,
            &priced,
            request.language.unwrap_or_default(),
        );
        runner
            .run("market_aware_crop_recommendation", advisor_request(prompt))
            .await
    }

    /// Varieties of one crop for a farm
    pub async fn recommend_varieties(
        &self,
        request: VarietyRecommendationRequest,
    ) -> AppResult<CropRecommendationOutput> {
        if request.crop_name.trim().is_empty() {
            return Err(AppError::invalid_field(
                "crop_name",
                "Crop name cannot be empty",
                "फसल का नाम आवश्यक है",
            ));
        }
        let prompt = prompts::variety_recommendation(
            &request.farm,
            request.crop_name.trim(),
            request.language.unwrap_or_default(),
        );
        self.runner()?
            .run("variety_recommendation", advisor_request(prompt))
            .await
    }

    /// Kharif, rabi and zaid options for a full year
    pub async fn plan_year(&self, request: YearLongPlannerRequest) -> AppResult<YearLongPlan> {
        if request.land_area <= rust_decimal::Decimal::ZERO {
            return Err(AppError::invalid_field(
                "land_area",
                "Land area must be greater than zero",
                "भूमि क्षेत्र शून्य से अधिक होना चाहिए",
            ));
        }
        let prompt = prompts::year_long_plan(&request, request.language.unwrap_or_default());
        self.runner()?
            .run("year_long_planner", advisor_request(prompt))
            .await
    }

    /// Detailed plans for the crop cycle the farmer picked
    pub async fn plan_year_varieties(
        &self,
        request: YearLongVarietyPlanRequest,
    ) -> AppResult<YearLongVarietyPlan> {
        if request.crop_cycle.is_empty() {
            return Err(AppError::invalid_field(
                "crop_cycle",
                "Choose at least one crop for the year",
                "वर्ष के लिए कम से कम एक फसल चुनें",
            ));
        }
        let prompt = prompts::year_long_variety_plan(
            &request.farm,
            &request.crop_cycle,
            request.language.unwrap_or_default(),
        );
        let plan: YearLongVarietyPlan = self
            .runner()?
            .run("year_long_variety_plan", advisor_request(prompt))
            .await?;
        plan.check_covers(&request.crop_cycle)
            .map_err(|e| AppError::AiOutput(format!("year_long_variety_plan: {}", e)))?;
        Ok(plan)
    }

    /// Real prices only; placeholder data and failures yield an empty list
    pub(super) async fn live_prices(&self, region: &Region, crop: &str) -> Vec<MandiPrice> {
        match self
            .integrations
            .prices
            .mandi_prices(&region.state, &region.district, crop)
            .await
        {
            Ok(prices) if prices.is_live() => prices.records,
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!("Price lookup for {} in {} failed: {}", crop, region, e);
                Vec::new()
            }
        }
    }
}
