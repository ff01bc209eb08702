//! Government scheme catalog

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::{Scheme, SchemeCategory, SchemeContact};

#[derive(Clone)]
pub struct SchemeService {
    db: PgPool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SchemeFilter {
    pub category: Option<SchemeCategory>,
    /// Matches the state exactly; central schemes are always included
    pub state: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct SchemeRow {
    id: String,
    category: SchemeCategory,
    state: String,
    last_updated: NaiveDate,
    contact: Json<SchemeContact>,
    website: String,
}

impl From<SchemeRow> for Scheme {
    fn from(row: SchemeRow) -> Self {
        Scheme {
            id: row.id,
            category: row.category,
            state: row.state,
            last_updated: row.last_updated,
            contact: row.contact.0,
            website: row.website,
        }
    }
}

impl SchemeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get catalog entries
    pub async fn get_schemes(&self, filter: &SchemeFilter) -> AppResult<Vec<Scheme>> {
        let rows = sqlx::query_as::<_, SchemeRow>(
            r#"
            SELECT id, category, state, last_updated, contact, website
            FROM schemes
            WHERE ($1::scheme_category IS NULL OR category = $1)
              AND ($2::text IS NULL OR category = 'Central' OR LOWER(state) = LOWER($2))
            ORDER BY category, id
            "#,
        )
        .bind(filter.category)
        .bind(&filter.state)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Scheme::from).collect())
    }

    /// Get a scheme by ID
    pub async fn get_scheme(&self, scheme_id: &str) -> AppResult<Scheme> {
        sqlx::query_as::<_, SchemeRow>(
            "SELECT id, category, state, last_updated, contact, website FROM schemes WHERE id = $1",
        )
        .bind(scheme_id)
        .fetch_optional(&self.db)
        .await?
        .map(Scheme::from)
        .ok_or_else(|| AppError::NotFound("Scheme".to_string()))
    }
}
