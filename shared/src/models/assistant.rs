//! Conversational assistant, voice navigation and voice form-filling models

use serde::{Deserialize, Serialize};

use crate::types::Language;

/// Routes the voice navigator may send a farmer to
pub const NAVIGATION_ROUTES: [&str; 8] = [
    "/my-farms",
    "/crop-planner",
    "/disease-diagnosis",
    "/market-insights",
    "/schemes",
    "/community",
    "/notifications",
    "/profile-setup",
];

/// Where unrecognised commands land
pub const DEFAULT_ROUTE: &str = "/my-farms";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgriBotRequest {
    pub query: String,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgriBotReply {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub voice_input: String,
    pub current_path: String,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationTarget {
    pub navigation_path: String,
}

impl NavigationTarget {
    /// Replace anything outside the route list with the default route
    pub fn sanitized(self) -> Self {
        let path = self.navigation_path.trim();
        if NAVIGATION_ROUTES.contains(&path) {
            Self {
                navigation_path: path.to_string(),
            }
        } else {
            Self::fallback()
        }
    }

    pub fn fallback() -> Self {
        Self {
            navigation_path: DEFAULT_ROUTE.to_string(),
        }
    }
}

/// Pull a single form value out of a spoken sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceFieldRequest {
    pub voice_input: String,
    /// Name of the form field to fill, e.g. "farm size"
    pub field_to_populate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceFieldValue {
    /// Empty when the input does not mention the field
    #[serde(default)]
    pub processed_value: String,
}
