//! Market data models: mandi prices, weather, news, suppliers and sell advice

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Language;

/// Modal price reported by a mandi, in Rs per quintal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MandiPrice {
    pub market: String,
    pub price: Decimal,
}

/// Where a set of prices came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceOrigin {
    Live,
    /// Placeholder data returned when no market data credentials are configured
    Mock,
}

/// A batch of mandi prices for one crop and region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketPrices {
    pub records: Vec<MandiPrice>,
    pub origin: PriceOrigin,
}

impl MarketPrices {
    pub fn live(records: Vec<MandiPrice>) -> Self {
        Self {
            records,
            origin: PriceOrigin::Live,
        }
    }

    pub fn mock(records: Vec<MandiPrice>) -> Self {
        Self {
            records,
            origin: PriceOrigin::Mock,
        }
    }

    pub fn is_live(&self) -> bool {
        self.origin == PriceOrigin::Live
    }
}

/// Highest observed price, starting from zero so an empty batch yields zero
pub fn highest_price(prices: &[MandiPrice]) -> Decimal {
    prices
        .iter()
        .map(|p| p.price)
        .fold(Decimal::ZERO, |highest, p| highest.max(p))
}

/// The mandi offering the highest price, first one wins on ties
pub fn best_mandi(prices: &[MandiPrice]) -> Option<&MandiPrice> {
    prices.iter().fold(None, |best: Option<&MandiPrice>, p| match best {
        Some(b) if b.price >= p.price => Some(b),
        _ => Some(p),
    })
}

/// One day of the short-range forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    /// "Today", "Tomorrow", "Day after tomorrow"
    pub day: String,
    /// Maximum temperature in Celsius, rounded
    pub temp: i32,
    pub condition: String,
    /// Maximum precipitation probability, percent
    pub rain_probability: i32,
    /// Mean relative humidity, percent, rounded
    pub humidity: i32,
}

/// Human readable text for a WMO weather interpretation code
pub fn weather_code_description(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Days in the forecast where rain is at least `min_probability` percent likely
pub fn rainy_days(forecast: &[DailyForecast], min_probability: i32) -> Vec<&DailyForecast> {
    forecast
        .iter()
        .filter(|d| d.rain_probability >= min_probability)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub link: String,
}

/// An agricultural supply store (Krishi Seva Kendra, seed or fertilizer shop)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuantityUnit {
    Kg,
    Quintal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HarvestStatus {
    Harvested,
    #[serde(rename = "Not Harvested")]
    NotHarvested,
}

impl HarvestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HarvestStatus::Harvested => "Harvested",
            HarvestStatus::NotHarvested => "Not Harvested",
        }
    }
}

/// What a farmer wants to sell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellAdviceRequest {
    pub crop: String,
    pub quantity: Decimal,
    pub unit: QuantityUnit,
    pub harvest_status: HarvestStatus,
    /// Days the produce can still be stored before spoiling
    pub storage_days_left: u32,
    /// Overrides the profile location when present
    pub location: Option<String>,
    pub language: Option<Language>,
}

impl SellAdviceRequest {
    pub fn quantity_in_quintals(&self) -> Decimal {
        match self.unit {
            QuantityUnit::Kg => self.quantity / Decimal::from(100),
            QuantityUnit::Quintal => self.quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SellRecommendation {
    Sell,
    Wait,
    Hold,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BestMandi {
    pub name: String,
    pub price: Decimal,
}

impl From<&MandiPrice> for BestMandi {
    fn from(p: &MandiPrice) -> Self {
        Self {
            name: p.market.clone(),
            price: p.price,
        }
    }
}

/// Sell, wait or hold advice with the market data it was based on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellAdvice {
    pub recommendation: SellRecommendation,
    pub reasoning: String,
    /// Expected near-term price range, e.g. "Rs 2,100 - Rs 2,300 per quintal"
    pub predicted_price: String,
    #[serde(default)]
    pub best_mandi: Option<BestMandi>,
    #[serde(default)]
    pub mandi_prices: Vec<MandiPrice>,
    #[serde(default)]
    pub weather: Vec<DailyForecast>,
    #[serde(default)]
    pub news: Vec<NewsItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn price(market: &str, p: i64) -> MandiPrice {
        MandiPrice {
            market: market.into(),
            price: Decimal::from(p),
        }
    }

    #[test]
    fn test_highest_price_of_empty_is_zero() {
        assert_eq!(highest_price(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_best_mandi_prefers_first_on_tie() {
        let prices = vec![price("Lasalgaon", 2100), price("Pimpalgaon", 2300), price("Nashik", 2300)];
        assert_eq!(best_mandi(&prices).unwrap().market, "Pimpalgaon");
        assert!(best_mandi(&[]).is_none());
    }

    #[test]
    fn test_weather_code_description() {
        assert_eq!(weather_code_description(0), "Clear sky");
        assert_eq!(weather_code_description(65), "Heavy rain");
        assert_eq!(weather_code_description(42), "Unknown");
    }

    #[test]
    fn test_rainy_days_threshold_inclusive() {
        let day = |label: &str, rain: i32| DailyForecast {
            day: label.into(),
            temp: 30,
            condition: "Cloudy".into(),
            rain_probability: rain,
            humidity: 70,
        };
        let forecast = vec![day("Today", 10), day("Tomorrow", 70), day("Day after tomorrow", 85)];
        let days: Vec<_> = rainy_days(&forecast, 70).iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, vec!["Tomorrow", "Day after tomorrow"]);
    }

    #[test]
    fn test_harvest_status_wire_names() {
        let parsed: HarvestStatus = serde_json::from_str("\"Not Harvested\"").unwrap();
        assert_eq!(parsed, HarvestStatus::NotHarvested);
        assert_eq!(serde_json::to_string(&HarvestStatus::Harvested).unwrap(), "\"Harvested\"");
    }

    #[test]
    fn test_quantity_in_quintals() {
        let req = SellAdviceRequest {
            crop: "Tomato".into(),
            quantity: Decimal::from(250),
            unit: QuantityUnit::Kg,
            harvest_status: HarvestStatus::Harvested,
            storage_days_left: 3,
            location: None,
            language: None,
        };
        assert_eq!(req.quantity_in_quintals(), Decimal::new(25, 1));
    }

    proptest! {
        #[test]
        fn prop_highest_price_bounds_every_record(values in prop::collection::vec(0i64..100_000, 0..20)) {
            let prices: Vec<MandiPrice> = values.iter().map(|v| price("m", *v)).collect();
            let highest = highest_price(&prices);
            prop_assert!(prices.iter().all(|p| p.price <= highest));
            prop_assert!(highest >= Decimal::ZERO);
            if let Some(best) = best_mandi(&prices) {
                prop_assert_eq!(best.price, highest);
            }
        }
    }
}
