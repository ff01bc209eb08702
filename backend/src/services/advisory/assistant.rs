//! Chat assistant and voice helpers

use shared::{
    AgriBotReply, AgriBotRequest, Language, NavigationRequest, NavigationTarget,
    VoiceFieldRequest, VoiceFieldValue,
};

use super::{advisor_request, prompts, AdvisoryService, FlowOutput};
use crate::error::{AppError, AppResult};
use crate::external::ModelRequest;

impl FlowOutput for NavigationTarget {}

impl FlowOutput for VoiceFieldValue {
    fn check(&mut self) -> Result<(), String> {
        self.processed_value = self.processed_value.trim().to_string();
        Ok(())
    }
}

impl AdvisoryService {
    /// Free-text farming assistant with conversation history
    pub async fn agri_bot(&self, request: AgriBotRequest) -> AppResult<AgriBotReply> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(AppError::invalid_field("query", "Question cannot be empty", "प्रश्न आवश्यक है"));
        }

        let model = self.integrations.model()?;
        let language = request.language.unwrap_or_default();
        let reply = model
            .generate(ModelRequest {
                system: Some(prompts::agri_bot_system(language)),
                history: prompts::agri_bot_turns(&request.chat_history),
                prompt: query.to_string(),
                image: None,
                json_output: false,
            })
            .await?;

        let response = reply.trim().to_string();
        if response.is_empty() {
            return Err(AppError::AiOutput("agri_bot: empty reply".to_string()));
        }
        Ok(AgriBotReply { response })
    }

    /// Map a spoken command to an app route. Never fails: anything the model
    /// gets wrong lands on the default route.
    pub async fn navigate(&self, request: NavigationRequest) -> NavigationTarget {
        let input = request.voice_input.trim();
        if input.is_empty() {
            return NavigationTarget::fallback();
        }

        let language = request.language.unwrap_or(Language::En);
        let result = match self.runner() {
            Ok(runner) => {
                let prompt = prompts::navigation(input, &request.current_path, language);
                runner.run::<NavigationTarget>("navigation", advisor_request(prompt)).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(target) => target.sanitized(),
            Err(e) => {
                tracing::warn!("Voice navigation fell back to default route: {}", e);
                NavigationTarget::fallback()
            }
        }
    }

    /// Pull one form value out of a spoken sentence
    pub async fn extract_voice_field(&self, request: VoiceFieldRequest) -> AppResult<VoiceFieldValue> {
        let input = request.voice_input.trim();
        if input.is_empty() {
            return Err(AppError::invalid_field("voice_input", "Voice input cannot be empty", "आवाज़ इनपुट आवश्यक है"));
        }
        let field = request.field_to_populate.trim();
        if field.is_empty() {
            return Err(AppError::invalid_field(
                "field_to_populate",
                "Field name cannot be empty",
                "फ़ील्ड का नाम आवश्यक है",
            ));
        }

        let runner = self.runner()?;
        runner
            .run("voice_field", advisor_request(prompts::voice_field(input, field)))
            .await
    }
}

