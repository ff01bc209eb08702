//! Farmer profile models

use serde::{Deserialize, Serialize};

use crate::types::Language;

/// Display name given to accounts that have not completed profile setup
pub const DEFAULT_PROFILE_NAME: &str = "New Farmer";

/// Placeholder avatar used until the farmer uploads one
pub const DEFAULT_AVATAR_URL: &str = "https://placehold.co/100x100.png";

/// A farmer's profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profile {
    pub name: String,
    /// Free-form "District, State" location
    pub location: String,
    pub language: Language,
    pub avatar_url: Option<String>,
    /// Phone number in international format, used for WhatsApp alerts
    pub phone: Option<String>,
}

impl Profile {
    /// Profile created for a freshly registered account
    pub fn new_default(phone: Option<String>) -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            location: String::new(),
            language: Language::En,
            avatar_url: Some(DEFAULT_AVATAR_URL.to_string()),
            phone,
        }
    }

    /// Whether the farmer still has to fill in name and location
    pub fn needs_setup(&self) -> bool {
        self.name == DEFAULT_PROFILE_NAME || self.location.trim().is_empty()
    }
}
