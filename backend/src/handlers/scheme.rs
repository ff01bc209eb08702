//! Government scheme handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use shared::{Language, PopulatedScheme, Scheme, SchemeMatches, SchemeSearchRequest};

use crate::error::AppError;
use crate::services::scheme::SchemeFilter;
use crate::services::{AdvisoryService, SchemeService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<Language>,
}

/// Catalog entries, optionally filtered by category and state
pub async fn list_schemes(
    State(state): State<AppState>,
    Query(filter): Query<SchemeFilter>,
) -> Result<Json<Vec<Scheme>>, AppError> {
    let service = SchemeService::new(state.db.clone());
    Ok(Json(service.get_schemes(&filter).await?))
}

/// A catalog entry with generated details in the requested language
pub async fn get_scheme(
    State(state): State<AppState>,
    Path(scheme_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<PopulatedScheme>, AppError> {
    let scheme = SchemeService::new(state.db.clone()).get_scheme(&scheme_id).await?;
    let advisory = AdvisoryService::new(state.integrations.clone());
    Ok(Json(advisory.scheme_details(scheme, query.language).await?))
}

/// Find schemes answering a free-text question
pub async fn search_schemes(
    State(state): State<AppState>,
    Json(request): Json<SchemeSearchRequest>,
) -> Result<Json<SchemeMatches>, AppError> {
    let catalog = SchemeService::new(state.db.clone())
        .get_schemes(&SchemeFilter::default())
        .await?;
    let advisory = AdvisoryService::new(state.integrations.clone());
    Ok(Json(advisory.search_schemes(request, &catalog).await?))
}
