//! Free-form location parsing
//!
//! Profiles and farms store locations as "District, State" strings. Market
//! lookups need the two parts separately.

use serde::{Deserialize, Serialize};

/// District and state derived from a location string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub district: String,
    pub state: String,
}

impl Region {
    /// Split a location on commas, taking the first part as the district and
    /// the second as the state. Missing or blank parts fall back to the
    /// supplied defaults.
    pub fn parse(location: &str, default_district: &str, default_state: &str) -> Self {
        let mut parts = location.split(',').map(str::trim);
        let district = parts
            .next()
            .filter(|p| !p.is_empty())
            .unwrap_or(default_district);
        let state = parts
            .next()
            .filter(|p| !p.is_empty())
            .unwrap_or(default_state);

        Self {
            district: district.to_string(),
            state: state.to_string(),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.district, self.state)
    }
}
