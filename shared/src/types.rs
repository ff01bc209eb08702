//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported interface and advisory languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "language_code", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    /// Name used when instructing the model which language to answer in
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "hi" | "hindi" => Ok(Language::Hi),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// Unit a farm's land area is recorded in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "size_unit", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    #[default]
    Acres,
    Hectares,
}

impl SizeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeUnit::Acres => "acres",
            SizeUnit::Hectares => "hectares",
        }
    }

    /// Convert an area in this unit to acres (1 ha = 2.47105 acres)
    pub fn to_acres(&self, area: Decimal) -> Decimal {
        match self {
            SizeUnit::Acres => area,
            SizeUnit::Hectares => area * Decimal::new(247105, 5),
        }
    }
}

impl std::fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Indian cropping seasons
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// Monsoon crops, June to October
    #[serde(alias = "Kharif")]
    Kharif,
    /// Winter crops, November to March
    #[serde(alias = "Rabi")]
    Rabi,
    /// Summer crops, April and May
    #[serde(alias = "Zaid")]
    Zaid,
}

impl Season {
    /// Season in which sowing for the given month (1-12) falls
    pub fn for_month(month: u32) -> Option<Season> {
        match month {
            6..=10 => Some(Season::Kharif),
            11 | 12 | 1..=3 => Some(Season::Rabi),
            4 | 5 => Some(Season::Zaid),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Zaid => "Zaid",
        }
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kharif" => Ok(Season::Kharif),
            "rabi" => Ok(Season::Rabi),
            "zaid" => Ok(Season::Zaid),
            other => Err(format!("unknown season: {}", other)),
        }
    }
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for a 1-based month number
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS.get(month.checked_sub(1)? as usize).copied()
}

/// 1-based month number for an English month name or its three-letter prefix
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().to_ascii_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.to_ascii_lowercase().starts_with(&name) || name.starts_with(&m[..3].to_ascii_lowercase()))
        .map(|i| i as u32 + 1)
}
