//! Market price alert models and status transitions

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle of a price alert
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "alert_status", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Waiting for the market to cross the threshold
    Active,
    /// Threshold crossed; set only by the price checker
    Triggered,
    /// Withdrawn by the farmer before it fired
    Cancelled,
    /// Farmer has seen the triggered alert
    Acknowledged,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move alert from {from} to {to}")]
pub struct AlertTransitionError {
    pub from: AlertStatus,
    pub to: AlertStatus,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Triggered => "triggered",
            AlertStatus::Cancelled => "cancelled",
            AlertStatus::Acknowledged => "acknowledged",
        }
    }

    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (AlertStatus::Active, AlertStatus::Triggered)
                | (AlertStatus::Active, AlertStatus::Cancelled)
                | (AlertStatus::Triggered, AlertStatus::Acknowledged)
        )
    }

    pub fn transition(self, next: AlertStatus) -> Result<AlertStatus, AlertTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AlertTransitionError { from: self, to: next })
        }
    }

    /// Cancelled and acknowledged alerts never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertStatus::Cancelled | AlertStatus::Acknowledged)
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AlertStatus::Active),
            "triggered" => Ok(AlertStatus::Triggered),
            "cancelled" => Ok(AlertStatus::Cancelled),
            "acknowledged" => Ok(AlertStatus::Acknowledged),
            other => Err(format!("unknown alert status: {}", other)),
        }
    }
}

/// A farmer's price threshold for a crop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MarketAlert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub crop: String,
    /// Rs per quintal
    pub price_threshold: Decimal,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub triggered_at: Option<DateTime<Utc>>,
    pub triggered_price: Option<Decimal>,
}

impl MarketAlert {
    /// A price fires the alert only when strictly above the threshold
    pub fn is_exceeded_by(&self, price: Decimal) -> bool {
        price > self.price_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [AlertStatus; 4] = [
        AlertStatus::Active,
        AlertStatus::Triggered,
        AlertStatus::Cancelled,
        AlertStatus::Acknowledged,
    ];

    #[test]
    fn test_allowed_transitions() {
        assert!(AlertStatus::Active.can_transition_to(AlertStatus::Triggered));
        assert!(AlertStatus::Active.can_transition_to(AlertStatus::Cancelled));
        assert!(AlertStatus::Triggered.can_transition_to(AlertStatus::Acknowledged));
    }

    #[test]
    fn test_triggered_cannot_trigger_again() {
        let err = AlertStatus::Triggered
            .transition(AlertStatus::Triggered)
            .unwrap_err();
        assert_eq!(err.from, AlertStatus::Triggered);
        assert_eq!(err.to_string(), "cannot move alert from triggered to triggered");
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(!from.can_transition_to(to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_status_parses_from_wire_name() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<AlertStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let alert = MarketAlert {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            crop: "Wheat".into(),
            price_threshold: Decimal::from(2000),
            status: AlertStatus::Active,
            created_at: Utc::now(),
            triggered_at: None,
            triggered_price: None,
        };
        assert!(!alert.is_exceeded_by(Decimal::from(2000)));
        assert!(alert.is_exceeded_by(Decimal::new(200001, 2)));
    }
}
