//! Market alert management: farmers' price thresholds per crop

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{validate_price_threshold, AlertStatus, MarketAlert};

const ALERT_COLUMNS: &str =
    "id, user_id, crop, price_threshold, status, created_at, triggered_at, triggered_price";

/// Market alert service
#[derive(Clone)]
pub struct MarketAlertService {
    db: PgPool,
}

/// Input for creating an alert
#[derive(Debug, Deserialize)]
pub struct CreateAlertInput {
    pub crop: String,
    pub price_threshold: Decimal,
}

impl MarketAlertService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an active alert
    pub async fn create_alert(&self, user_id: Uuid, input: CreateAlertInput) -> AppResult<MarketAlert> {
        let crop = input.crop.trim();
        if crop.is_empty() {
            return Err(AppError::invalid_field(
                "crop",
                "Crop cannot be empty",
                "फसल का नाम आवश्यक है",
            ));
        }
        validate_price_threshold(input.price_threshold).map_err(|msg| {
            AppError::invalid_field("price_threshold", msg, "लक्ष्य मूल्य शून्य से अधिक होना चाहिए")
        })?;

        let alert = sqlx::query_as::<_, MarketAlert>(&format!(
            r#"
            INSERT INTO market_alerts (user_id, crop, price_threshold, status)
            VALUES ($1, $2, $3, 'active')
            RETURNING {}
            "#,
            ALERT_COLUMNS
        ))
        .bind(user_id)
        .bind(crop)
        .bind(input.price_threshold)
        .fetch_one(&self.db)
        .await?;

        Ok(alert)
    }

    /// Get alerts, newest first, optionally filtered by status
    pub async fn get_alerts(
        &self,
        user_id: Uuid,
        status: Option<AlertStatus>,
    ) -> AppResult<Vec<MarketAlert>> {
        let alerts = sqlx::query_as::<_, MarketAlert>(&format!(
            r#"
            SELECT {}
            FROM market_alerts
            WHERE user_id = $1 AND ($2::alert_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            ALERT_COLUMNS
        ))
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.db)
        .await?;

        Ok(alerts)
    }

    /// Get an alert by ID
    pub async fn get_alert(&self, user_id: Uuid, alert_id: Uuid) -> AppResult<MarketAlert> {
        sqlx::query_as::<_, MarketAlert>(&format!(
            "SELECT {} FROM market_alerts WHERE id = $1 AND user_id = $2",
            ALERT_COLUMNS
        ))
        .bind(alert_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Market alert".to_string()))
    }

    /// Mark a triggered alert as seen
    pub async fn acknowledge_alert(&self, user_id: Uuid, alert_id: Uuid) -> AppResult<MarketAlert> {
        self.transition(user_id, alert_id, AlertStatus::Acknowledged).await
    }

    /// Withdraw an alert that has not fired
    pub async fn cancel_alert(&self, user_id: Uuid, alert_id: Uuid) -> AppResult<MarketAlert> {
        self.transition(user_id, alert_id, AlertStatus::Cancelled).await
    }

    /// Delete an alert in any state
    pub async fn delete_alert(&self, user_id: Uuid, alert_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM market_alerts WHERE id = $1 AND user_id = $2")
            .bind(alert_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Market alert".to_string()));
        }

        Ok(())
    }

    async fn transition(
        &self,
        user_id: Uuid,
        alert_id: Uuid,
        next: AlertStatus,
    ) -> AppResult<MarketAlert> {
        let current = self.get_alert(user_id, alert_id).await?;
        current.status.transition(next)?;

        // Only applies while the status is still the one read above
        sqlx::query_as::<_, MarketAlert>(&format!(
            r#"
            UPDATE market_alerts
            SET status = $3
            WHERE id = $1 AND user_id = $2 AND status = $4
            RETURNING {}
            "#,
            ALERT_COLUMNS
        ))
        .bind(alert_id)
        .bind(user_id)
        .bind(next)
        .bind(current.status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            AppError::InvalidStateTransition(format!(
                "alert {} changed state while being updated to {}",
                alert_id, next
            ))
        })
    }
}
