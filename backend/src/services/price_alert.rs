//! Price alert evaluation
//!
//! Compares active alerts against live mandi prices. A crossed threshold moves
//! the alert to `triggered` exactly once; the WhatsApp notification that
//! follows is best effort and never affects the other alerts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::{MarketPriceSource, Notifier};
use shared::{highest_price, AlertStatus, MarketAlert, Region};

/// Fallback region when the profile location is blank
pub const DEFAULT_DISTRICT: &str = "pune";
pub const DEFAULT_STATE: &str = "maharashtra";

/// Owner of a set of alerts, with what is needed to price and notify
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertSubscriber {
    pub user_id: Uuid,
    pub location: String,
    pub phone: Option<String>,
}

/// Result of checking one user's alerts
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PriceCheckOutput {
    /// Alerts moved to `triggered` by this run
    pub triggered_alerts: Vec<Uuid>,
}

/// Persistence the checker needs
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn users_with_active_alerts(&self) -> AppResult<Vec<Uuid>>;

    async fn subscriber(&self, user_id: Uuid) -> AppResult<Option<AlertSubscriber>>;

    async fn active_alerts_for(&self, user_id: Uuid) -> AppResult<Vec<MarketAlert>>;

    /// Move an alert from `active` to `triggered`. Returns false when the
    /// alert was no longer active, i.e. another run got there first.
    async fn mark_triggered(&self, alert_id: Uuid, price: Decimal, at: DateTime<Utc>)
        -> AppResult<bool>;
}

/// PostgreSQL-backed alert store
#[derive(Clone)]
pub struct PgAlertStore {
    db: PgPool,
}

impl PgAlertStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn users_with_active_alerts(&self) -> AppResult<Vec<Uuid>> {
        let users = sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT user_id FROM market_alerts WHERE status = 'active'",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    async fn subscriber(&self, user_id: Uuid) -> AppResult<Option<AlertSubscriber>> {
        let subscriber = sqlx::query_as::<_, AlertSubscriber>(
            "SELECT id AS user_id, location, phone FROM users WHERE id = $1 AND is_active = true",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(subscriber)
    }

    async fn active_alerts_for(&self, user_id: Uuid) -> AppResult<Vec<MarketAlert>> {
        let alerts = sqlx::query_as::<_, MarketAlert>(
            r#"
            SELECT id, user_id, crop, price_threshold, status, created_at,
                   triggered_at, triggered_price
            FROM market_alerts
            WHERE user_id = $1 AND status = 'active'
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(alerts)
    }

    async fn mark_triggered(
        &self,
        alert_id: Uuid,
        price: Decimal,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE market_alerts
            SET status = 'triggered', triggered_at = $2, triggered_price = $3
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(alert_id)
        .bind(at)
        .bind(price)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Evaluates alerts against market prices and notifies their owners
#[derive(Clone)]
pub struct PriceAlertChecker {
    store: Arc<dyn AlertStore>,
    prices: Arc<dyn MarketPriceSource>,
    notifier: Arc<dyn Notifier>,
}

impl PriceAlertChecker {
    pub fn new(
        store: Arc<dyn AlertStore>,
        prices: Arc<dyn MarketPriceSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            prices,
            notifier,
        }
    }

    /// Check every active alert of one user
    pub async fn check_for_user(&self, user_id: Uuid) -> AppResult<PriceCheckOutput> {
        let subscriber = self
            .store
            .subscriber(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;
        let alerts = self.store.active_alerts_for(user_id).await?;

        Ok(self.evaluate(&subscriber, &alerts).await)
    }

    /// Evaluate the given alerts one at a time. Alerts that are not active are
    /// skipped; a failure on one alert is logged and the next one is checked.
    pub async fn evaluate(
        &self,
        subscriber: &AlertSubscriber,
        alerts: &[MarketAlert],
    ) -> PriceCheckOutput {
        let region = Region::parse(&subscriber.location, DEFAULT_DISTRICT, DEFAULT_STATE);
        let mut output = PriceCheckOutput::default();

        for alert in alerts.iter().filter(|a| a.status == AlertStatus::Active) {
            match self.evaluate_alert(subscriber, &region, alert).await {
                Ok(true) => output.triggered_alerts.push(alert.id),
                Ok(false) => {}
                Err(e) => {
                    tracing::error!("Price check for alert {} failed: {}", alert.id, e);
                }
            }
        }

        output
    }

    /// Returns whether this call triggered the alert
    async fn evaluate_alert(
        &self,
        subscriber: &AlertSubscriber,
        region: &Region,
        alert: &MarketAlert,
    ) -> AppResult<bool> {
        let prices = self
            .prices
            .mandi_prices(&region.state, &region.district, &alert.crop)
            .await?;

        if !prices.is_live() {
            tracing::debug!(
                "Skipping alert {}: no live prices for {} in {}",
                alert.id,
                alert.crop,
                region
            );
            return Ok(false);
        }

        let highest = highest_price(&prices.records);
        if !alert.is_exceeded_by(highest) {
            return Ok(false);
        }

        if !self.store.mark_triggered(alert.id, highest, Utc::now()).await? {
            tracing::debug!("Alert {} was already triggered elsewhere", alert.id);
            return Ok(false);
        }

        tracing::info!(
            "Alert {} triggered: {} at Rs {} (threshold Rs {})",
            alert.id,
            alert.crop,
            highest,
            alert.price_threshold
        );

        match subscriber.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(phone) => {
                let message = alert_message(&alert.crop, highest, alert.price_threshold, &region.district);
                if let Err(e) = self.notifier.send_whatsapp(phone, &message).await {
                    tracing::error!("Failed to send WhatsApp notification for alert {}: {}", alert.id, e);
                }
            }
            None => {
                tracing::warn!("User {} has no phone number, alert {} not sent", subscriber.user_id, alert.id);
            }
        }

        Ok(true)
    }

    /// Check alerts of every user that has any; returns the number triggered
    pub async fn check_all(&self) -> AppResult<usize> {
        let users = self.store.users_with_active_alerts().await?;
        let mut triggered = 0;

        for user_id in users {
            match self.check_for_user(user_id).await {
                Ok(output) => triggered += output.triggered_alerts.len(),
                Err(e) => tracing::error!("Price check for user {} failed: {}", user_id, e),
            }
        }

        Ok(triggered)
    }

    /// Run `check_all` on a fixed interval until the task is aborted
    pub fn spawn_poller(self, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match self.check_all().await {
                    Ok(0) => tracing::debug!("Price alert sweep finished, nothing triggered"),
                    Ok(n) => tracing::info!("Price alert sweep triggered {} alert(s)", n),
                    Err(e) => tracing::error!("Price alert sweep failed: {}", e),
                }
            }
        })
    }
}

/// WhatsApp text sent when an alert fires
pub fn alert_message(crop: &str, highest: Decimal, threshold: Decimal, district: &str) -> String {
    format!(
        "📈 Krishak Mitra Price Alert 📈\n\n\
         *{}* is now selling at *₹{}* per quintal around {}, above your target of ₹{}.\n\n\
         Open Market Insights for the full picture.",
        crop,
        highest.normalize(),
        district,
        threshold.normalize()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_message_contents() {
        let text = alert_message("Onion", Decimal::new(250000, 2), Decimal::from(2400), "Nashik");
        assert!(text.contains("*Onion*"));
        assert!(text.contains("*₹2500* per quintal"));
        assert!(text.contains("around Nashik"));
        assert!(text.contains("target of ₹2400"));
    }
}
