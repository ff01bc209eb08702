//! Advisory flows
//!
//! A flow renders a prompt from typed input, asks the language model for a
//! JSON answer and checks the answer against its output type before it is
//! handed back. Data the model should reason over (prices, weather, news,
//! nearby suppliers) is fetched up front and written into the prompt.

mod assistant;
mod crop;
mod diagnosis;
mod market;
mod nutrient;
pub mod prompts;
mod scheme;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};
use crate::external::{Integrations, LanguageModel, ModelRequest};

/// Output of a flow that can be checked, and tidied, once parsed
pub trait FlowOutput: DeserializeOwned {
    fn check(&mut self) -> Result<(), String> {
        Ok(())
    }
}

/// Runs prompts against the configured model
#[derive(Clone)]
pub struct FlowRunner {
    model: Arc<dyn LanguageModel>,
}

impl FlowRunner {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Run a JSON flow and validate its output
    pub async fn run<T: FlowOutput>(&self, flow: &str, request: ModelRequest) -> AppResult<T> {
        tracing::debug!("Running flow {}", flow);
        let raw = self.model.generate(request).await?;

        let mut output: T = serde_json::from_str(strip_code_fences(&raw)).map_err(|e| {
            tracing::warn!("Flow {} returned unparseable output: {}", flow, e);
            AppError::AiOutput(format!("{}: {}", flow, e))
        })?;

        output
            .check()
            .map_err(|e| AppError::AiOutput(format!("{}: {}", flow, e)))?;

        Ok(output)
    }
}

/// JSON request carrying the shared advisor persona
fn advisor_request(prompt: String) -> ModelRequest {
    ModelRequest {
        system: Some(prompts::ADVISOR_SYSTEM.to_string()),
        ..ModelRequest::json(prompt)
    }
}

/// Remove a surrounding ``` or ```json fence if the model added one
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Entry point for every advisory flow
#[derive(Clone)]
pub struct AdvisoryService {
    integrations: Integrations,
}

impl AdvisoryService {
    pub fn new(integrations: Integrations) -> Self {
        Self { integrations }
    }

    /// Runner over the configured model; fails when none is configured
    fn runner(&self) -> AppResult<FlowRunner> {
        Ok(FlowRunner::new(self.integrations.model()?))
    }
}
