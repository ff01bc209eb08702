//! WebAssembly module for the Krishak Mitra platform
//!
//! Provides client-side computation for:
//! - Crop plan profit estimates
//! - Season and weather labels
//! - Form validation before anything is sent to the server

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::finance::{rank_by_profit, total_net_profit, ProfitSummary};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Profit per size unit from an `EstimatedCosts` JSON object, yield (kg) and
/// price (Rs/kg). Returns a `ProfitSummary` JSON object.
#[wasm_bindgen]
pub fn estimate_profit(costs_json: &str, yield_kg: f64, price_per_kg: f64) -> Result<String, JsValue> {
    let costs: EstimatedCosts = serde_json::from_str(costs_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid costs JSON: {}", e)))?;

    let summary = ProfitSummary::from_estimates(&costs, to_decimal(yield_kg), to_decimal(price_per_kg));
    serde_json::to_string(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Net profit over the whole farm for a per size unit summary
#[wasm_bindgen]
pub fn farm_net_profit(summary_json: &str, area: f64) -> Result<f64, JsValue> {
    let summary: ProfitSummary = serde_json::from_str(summary_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid profit JSON: {}", e)))?;
    Ok(to_f64(total_net_profit(&summary, to_decimal(area))))
}

/// Indices of a JSON array of `ProfitSummary` objects, most profitable first
#[wasm_bindgen]
pub fn rank_plans(summaries_json: &str) -> Result<Vec<u32>, JsValue> {
    let summaries: Vec<ProfitSummary> = serde_json::from_str(summaries_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid profit JSON: {}", e)))?;
    Ok(rank_by_profit(&summaries).into_iter().map(|i| i as u32).collect())
}

/// Season sowing in the given month (1-12) falls in
#[wasm_bindgen]
pub fn season_for_month(month: u32) -> Option<String> {
    Season::for_month(month).map(|s| s.label().to_string())
}

/// Season for today's date in the browser
#[wasm_bindgen]
pub fn current_season() -> Option<String> {
    let month = js_sys::Date::new_0().get_month() + 1;
    season_for_month(month)
}

/// Human readable text for a WMO weather code
#[wasm_bindgen]
pub fn describe_weather_code(code: i32) -> String {
    weather_code_description(code).to_string()
}

/// Validation message for a phone number, or None when it is acceptable
#[wasm_bindgen]
pub fn check_phone(phone: &str) -> Option<String> {
    validate_phone(phone).err().map(str::to_string)
}

/// Validation message for a farm size, or None when it is acceptable
#[wasm_bindgen]
pub fn check_farm_size(size: f64) -> Option<String> {
    validate_farm_size(to_decimal(size)).err().map(str::to_string)
}

/// Validation message for a soil health card JSON object
#[wasm_bindgen]
pub fn check_soil_health_card(card_json: &str) -> Option<String> {
    match serde_json::from_str::<SoilHealthCard>(card_json) {
        Ok(card) => validate_soil_health_card(&card).err().map(str::to_string),
        Err(e) => {
            web_sys::console::warn_1(&JsValue::from_str(&format!("Unreadable soil health card: {}", e)));
            Some("Invalid soil health card".to_string())
        }
    }
}

/// Whether an alert with this threshold would fire at any of the prices
#[wasm_bindgen]
pub fn would_trigger_alert(threshold: f64, prices: &[f64]) -> bool {
    let records: Vec<MandiPrice> = prices
        .iter()
        .map(|p| MandiPrice {
            market: String::new(),
            price: to_decimal(*p),
        })
        .collect();
    highest_price(&records) > to_decimal(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_for_month() {
        assert_eq!(season_for_month(7).as_deref(), Some("Kharif"));
        assert_eq!(season_for_month(12).as_deref(), Some("Rabi"));
        assert_eq!(season_for_month(4).as_deref(), Some("Zaid"));
        assert_eq!(season_for_month(13), None);
    }

    #[test]
    fn test_farm_net_profit_scales_by_area() {
        let summary = r#"{"total_revenue":"36000","total_cost":"12000","net_profit":"24000"}"#;
        let total = farm_net_profit(summary, 2.5).unwrap();
        assert!((total - 60000.0).abs() < 0.001);
    }

    #[test]
    fn test_rank_plans_orders_by_net_profit() {
        let summaries = r#"[
            {"total_revenue":"100","total_cost":"90","net_profit":"10"},
            {"total_revenue":"500","total_cost":"100","net_profit":"400"}
        ]"#;
        assert_eq!(rank_plans(summaries).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_would_trigger_alert_is_strict() {
        assert!(would_trigger_alert(2000.0, &[1800.0, 2000.5]));
        assert!(!would_trigger_alert(2000.0, &[2000.0]));
        assert!(!would_trigger_alert(1.0, &[]));
    }

    #[test]
    fn test_describe_weather_code() {
        assert_eq!(describe_weather_code(63), "Moderate rain");
        assert_eq!(describe_weather_code(1234), "Unknown");
    }

    #[test]
    fn test_check_farm_size() {
        assert!(check_farm_size(2.0).is_none());
        assert!(check_farm_size(0.0).is_some());
    }
}
