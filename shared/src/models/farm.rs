//! Farm models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::SizeUnit;

/// A farm owned by a farmer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Farm {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub location: String,
    pub size: Decimal,
    pub size_unit: SizeUnit,
    pub main_crop: String,
    pub soil_type: Option<String>,
    /// Comma separated irrigation sources, e.g. "Borewell, Canal"
    pub irrigation: Option<String>,
    pub last_crop: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The subset of farm data the advisory flows reason about
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmDetails {
    pub size: Decimal,
    pub size_unit: SizeUnit,
    pub location: String,
    pub soil_type: Option<String>,
    pub irrigation: Option<String>,
    /// Month the farmer intends to plant in
    pub planting_month: Option<String>,
    /// Previous crop, for rotation advice
    pub last_crop: Option<String>,
}

impl Farm {
    pub fn details(&self, planting_month: Option<String>) -> FarmDetails {
        FarmDetails {
            size: self.size,
            size_unit: self.size_unit,
            location: self.location.clone(),
            soil_type: self.soil_type.clone(),
            irrigation: self.irrigation.clone(),
            planting_month,
            last_crop: self.last_crop.clone(),
        }
    }

    /// Irrigation sources as a list
    pub fn irrigation_sources(&self) -> Vec<String> {
        split_sources(self.irrigation.as_deref())
    }
}

impl FarmDetails {
    pub fn irrigation_sources(&self) -> Vec<String> {
        split_sources(self.irrigation.as_deref())
    }
}

fn split_sources(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
