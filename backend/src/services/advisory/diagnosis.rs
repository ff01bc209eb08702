//! Disease diagnosis and pest forecast flows

use shared::{
    parse_image_data_uri, DiagnosisOutput, DiagnosisRequest, Farm, PestForecast,
    PestForecastRequest, Region, VendorRecommendation,
};

use super::{advisor_request, prompts, AdvisoryService, FlowOutput};
use crate::error::{AppError, AppResult};
use crate::external::InlineImage;

impl FlowOutput for DiagnosisOutput {
    fn check(&mut self) -> Result<(), String> {
        self.check_shape()
    }
}

impl FlowOutput for PestForecast {}

impl AdvisoryService {
    /// Diagnose a sick crop from symptoms and/or a photo. Vendor suggestions
    /// come from a places search around the farm, never from the model.
    pub async fn diagnose(&self, farm: &Farm, request: DiagnosisRequest) -> AppResult<DiagnosisOutput> {
        let symptoms = request
            .symptoms
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let image = match request.photo_data_uri.as_deref().filter(|u| !u.is_empty()) {
            Some(uri) => {
                let (mime, data) = parse_image_data_uri(uri).map_err(|msg| {
                    AppError::invalid_field("photo_data_uri", msg, "चित्र का प्रारूप मान्य नहीं है")
                })?;
                Some(InlineImage {
                    mime_type: mime.to_string(),
                    data: data.to_string(),
                })
            }
            None => None,
        };

        if symptoms.is_none() && image.is_none() {
            return Err(AppError::invalid_field(
                "symptoms",
                "Describe the symptoms or attach a photo",
                "लक्षण बताएं या फोटो लगाएं",
            ));
        }

        let prompt = prompts::disease_diagnosis(
            &farm.main_crop,
            &farm.location,
            symptoms,
            image.is_some(),
            request.language.unwrap_or_default(),
        );
        let mut model_request = advisor_request(prompt);
        model_request.image = image;

        let runner = self.runner()?;
        let mut output: DiagnosisOutput = runner.run("plant_disease_diagnosis", model_request).await?;

        let vendors: Vec<VendorRecommendation> = self
            .integrations
            .suppliers
            .nearby_suppliers(&farm.location)
            .await
            .into_iter()
            .map(VendorRecommendation::from)
            .collect();
        output.finalize(&vendors);

        Ok(output)
    }

    /// Likely pest and disease pressure given the coming weather and news
    pub async fn forecast_pests(&self, request: PestForecastRequest) -> AppResult<PestForecast> {
        let runner = self.runner()?;
        let region = Region::parse(&request.farm.location, "", "");

        let forecast = self.integrations.weather.forecast(&request.farm.location).await;
        let query = format!("{} pest disease {}", request.crop_name, region.district);
        let news = self.integrations.news.headlines(query.trim()).await;

        let prompt = prompts::pest_forecast(
            &request.farm,
            &request.crop_name,
            &forecast,
            &news,
            request.language.unwrap_or_default(),
        );
        runner.run("pest_and_disease_forecast", advisor_request(prompt)).await
    }
}
