//! Twilio WhatsApp messaging

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::TwilioConfig;
use crate::error::{AppError, AppResult};

const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Outbound message channel for farmer notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_whatsapp(&self, to: &str, body: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

impl TwilioClient {
    pub fn new(client: Client, config: &TwilioConfig) -> Self {
        Self {
            client,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Credentials and sender number all present
    pub fn is_configured(&self) -> bool {
        [&self.account_sid, &self.auth_token, &self.from_number]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}

/// Address a number on the WhatsApp channel
pub fn whatsapp_address(number: &str) -> String {
    if number.starts_with(WHATSAPP_PREFIX) {
        number.to_string()
    } else {
        format!("{}{}", WHATSAPP_PREFIX, number)
    }
}

#[async_trait]
impl Notifier for TwilioClient {
    async fn send_whatsapp(&self, to: &str, body: &str) -> AppResult<()> {
        if !self.is_configured() {
            tracing::info!("Twilio not configured, mock sending to {}: {}", to, body);
            return Ok(());
        }

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let from = whatsapp_address(&self.from_number);
        let to_address = whatsapp_address(to);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", from.as_str()), ("To", to_address.as_str()), ("Body", body)])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Twilio request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Twilio API error: {} - {}",
                status, body
            )));
        }

        let message: MessageResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse Twilio response: {}", e))
        })?;

        tracing::info!("WhatsApp message {} sent to {}", message.sid, to);
        Ok(())
    }
}
