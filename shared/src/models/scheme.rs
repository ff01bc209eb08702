//! Government scheme catalog models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Language;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "scheme_category"))]
pub enum SchemeCategory {
    Central,
    State,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemeContact {
    pub department: String,
    pub phone: String,
    pub email: String,
}

/// Catalog entry for a scheme. Human readable details are generated on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scheme {
    /// Stable slug, e.g. "pm-kisan"
    pub id: String,
    pub category: SchemeCategory,
    /// "All India" for central schemes
    pub state: String,
    pub last_updated: NaiveDate,
    pub contact: SchemeContact,
    pub website: String,
}

/// Generated, language-specific details of a scheme
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemeDetails {
    pub title: String,
    pub description: String,
    pub benefits: String,
    pub eligibility: String,
    pub how_to_apply: String,
    /// Comma separated
    pub required_documents: String,
}

impl SchemeDetails {
    pub fn documents(&self) -> Vec<&str> {
        self.required_documents
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .collect()
    }
}

/// A catalog entry together with its generated details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulatedScheme {
    #[serde(flatten)]
    pub scheme: Scheme,
    #[serde(flatten)]
    pub details: SchemeDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeSearchRequest {
    pub query: String,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemeMatches {
    /// Most relevant first
    pub relevant_scheme_ids: Vec<String>,
}

impl SchemeMatches {
    /// Drop ids outside the catalog and duplicates, keeping the model's order
    pub fn retain_known(&mut self, known: &[&str]) {
        let mut seen = std::collections::HashSet::new();
        self.relevant_scheme_ids
            .retain(|id| known.contains(&id.as_str()) && seen.insert(id.clone()));
    }
}
