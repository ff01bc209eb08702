//! Sell advice and supplier search

use serde::Deserialize;

use shared::{
    best_mandi, BestMandi, DailyForecast, HarvestStatus, MandiPrice, NewsItem, Profile, Region,
    SellAdvice, SellAdviceRequest, SellRecommendation, Supplier,
};

use super::{advisor_request, prompts, AdvisoryService, FlowOutput};
use crate::error::{AppError, AppResult};

/// The part of the sell advice the model writes
#[derive(Debug, Clone, Deserialize)]
pub struct SellAdviceDraft {
    pub recommendation: SellRecommendation,
    pub reasoning: String,
    pub predicted_price: String,
    #[serde(default)]
    pub best_mandi: Option<BestMandi>,
}

impl FlowOutput for SellAdviceDraft {
    fn check(&mut self) -> Result<(), String> {
        if self.reasoning.trim().is_empty() {
            return Err("sell advice has no reasoning".to_string());
        }
        Ok(())
    }
}

/// Combine the model's advice with the data it was given. Unharvested crops
/// are always told to wait; a sale points at the best paying mandi.
pub fn assemble_advice(
    draft: SellAdviceDraft,
    harvest_status: HarvestStatus,
    mandi_prices: Vec<MandiPrice>,
    weather: Vec<DailyForecast>,
    news: Vec<NewsItem>,
) -> SellAdvice {
    let recommendation = match harvest_status {
        HarvestStatus::NotHarvested => SellRecommendation::Wait,
        HarvestStatus::Harvested => draft.recommendation,
    };

    let best = match recommendation {
        SellRecommendation::Sell => best_mandi(&mandi_prices).map(BestMandi::from).or(draft.best_mandi),
        _ => None,
    };

    SellAdvice {
        recommendation,
        reasoning: draft.reasoning,
        predicted_price: draft.predicted_price,
        best_mandi: best,
        mandi_prices,
        weather,
        news,
    }
}

impl AdvisoryService {
    /// Sell, wait or hold advice from current prices, weather and news
    pub async fn sell_advice(&self, profile: &Profile, request: SellAdviceRequest) -> AppResult<SellAdvice> {
        if request.crop.trim().is_empty() {
            return Err(AppError::invalid_field("crop", "Crop cannot be empty", "फसल का नाम आवश्यक है"));
        }
        if request.quantity <= rust_decimal::Decimal::ZERO {
            return Err(AppError::invalid_field(
                "quantity",
                "Quantity must be greater than zero",
                "मात्रा शून्य से अधिक होनी चाहिए",
            ));
        }

        let runner = self.runner()?;
        let location = request
            .location
            .clone()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| profile.location.clone());
        let region = Region::parse(&location, "Unknown", "Unknown");

        let prices = self.live_prices(&region, &request.crop).await;
        let weather = self.integrations.weather.forecast(&location).await;
        let news = self.integrations.news.headlines(&request.crop).await;

        let language = request.language.unwrap_or(profile.language);
        let prompt = prompts::sell_advice(profile, &request, &location, &prices, &weather, &news, language);
        let draft: SellAdviceDraft = runner.run("market_advisor", advisor_request(prompt)).await?;

        Ok(assemble_advice(draft, request.harvest_status, prices, weather, news))
    }

    /// Agri-input shops near a location
    pub async fn find_suppliers(&self, location: &str) -> AppResult<Vec<Supplier>> {
        if location.trim().is_empty() {
            return Err(AppError::invalid_field("location", "Location cannot be empty", "स्थान आवश्यक है"));
        }
        Ok(self.integrations.suppliers.nearby_suppliers(location.trim()).await)
    }
}
