use shared::{Language, PopulatedScheme, Scheme, SchemeDetails, SchemeMatches, SchemeSearchRequest};

use super::{advisor_request, prompts, AdvisoryService, FlowOutput};
use crate::error::{AppError, AppResult};

impl FlowOutput for SchemeMatches {}

impl FlowOutput for SchemeDetails {
    fn check(&mut self) -> Result<(), String> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err("scheme details need a title and description".to_string());
        }
        Ok(())
    }
}

impl AdvisoryService {
    /// Rank catalog schemes against a free-text question. Ids the model
    /// invents are dropped.
    pub async fn search_schemes(
        &self,
        request: SchemeSearchRequest,
        catalog: &[Scheme],
    ) -> AppResult<SchemeMatches> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(AppError::invalid_field("query", "Search query cannot be empty", "खोज प्रश्न आवश्यक है"));
        }
        if catalog.is_empty() {
            return Ok(SchemeMatches { relevant_scheme_ids: Vec::new() });
        }

        let runner = self.runner()?;
        let mut matches: SchemeMatches = runner
            .run("scheme_search", advisor_request(prompts::scheme_search(query, catalog)))
            .await?;

        let known: Vec<&str> = catalog.iter().map(|s| s.id.as_str()).collect();
        matches.retain_known(&known);
        Ok(matches)
    }

    /// Generate readable details for a catalog entry
    pub async fn scheme_details(&self, scheme: Scheme, language: Option<Language>) -> AppResult<PopulatedScheme> {
        let runner = self.runner()?;
        let prompt = prompts::scheme_details(&scheme, language.unwrap_or_default());
        let details: SchemeDetails = runner.run("scheme_details", advisor_request(prompt)).await?;
        Ok(PopulatedScheme { scheme, details })
    }
}
