//! Advisory flow tests
//!
//! Flows run against a scripted language model and in-memory adapters, so
//! these cover the pre-fetching and post-processing around each model call.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use krishak_mitra_backend::error::{AppError, AppResult};
use krishak_mitra_backend::external::{
    Integrations, LanguageModel, MarketPriceSource, MediaStorage, ModelRequest, NewsSource, Notifier,
    SupplierSource, WeatherSource,
};
use krishak_mitra_backend::services::AdvisoryService;
use shared::{
    AgriBotRequest, ChatMessage, ChatRole, CropCycleChoice, CropRecommendationRequest, DailyForecast,
    DiagnosisRequest, Farm, FarmDetails, FertilizerRequest, HarvestStatus, Language, MandiPrice,
    MarketPrices, NavigationRequest, NewsItem, PestForecastRequest, Profile, QuantityUnit, Scheme,
    SchemeCategory, SchemeContact, SchemeSearchRequest, Season, SellAdviceRequest, SellRecommendation,
    SizeUnit, SoilHealthCard, Supplier, ThreatKind, VoiceFieldRequest, WaterManagementRequest,
    YearLongFarm, YearLongPlannerRequest, YearLongVarietyPlanRequest, DEFAULT_ROUTE,
};

// ============================================================================
// Fakes
// ============================================================================

/// Replies with queued answers in order and keeps every request it saw
#[derive(Default)]
struct ScriptedModel {
    replies: Mutex<VecDeque<AppResult<String>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    fn replying(replies: Vec<AppResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, request: ModelRequest) -> AppResult<String> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::ExternalService("no scripted reply left".to_string())))
    }
}

struct StaticPrices(MarketPrices);

#[async_trait]
impl MarketPriceSource for StaticPrices {
    async fn mandi_prices(&self, _state: &str, _district: &str, _commodity: &str) -> AppResult<MarketPrices> {
        Ok(self.0.clone())
    }
}

struct StaticWeather;

#[async_trait]
impl WeatherSource for StaticWeather {
    async fn forecast(&self, _location: &str) -> Vec<DailyForecast> {
        vec![DailyForecast {
            day: "Today".to_string(),
            temp: 31,
            condition: "Partly cloudy".to_string(),
            rain_probability: 20,
            humidity: 64,
        }]
    }
}

struct StaticNews;

#[async_trait]
impl NewsSource for StaticNews {
    async fn headlines(&self, query: &str) -> Vec<NewsItem> {
        vec![NewsItem {
            title: format!("{} arrivals steady", query),
            summary: "Arrivals at major mandis were steady this week.".to_string(),
            link: "https://example.org/news/1".to_string(),
        }]
    }
}

struct StaticSuppliers;

#[async_trait]
impl SupplierSource for StaticSuppliers {
    async fn nearby_suppliers(&self, location: &str) -> Vec<Supplier> {
        vec![Supplier {
            name: "Shree Krishi Seva Kendra".to_string(),
            address: format!("Market Yard, {}", location),
            phone: Some("+912532000000".to_string()),
        }]
    }
}

struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn send_whatsapp(&self, _to: &str, _body: &str) -> AppResult<()> {
        Ok(())
    }
}

fn integrations(model: Option<Arc<ScriptedModel>>, prices: MarketPrices) -> Integrations {
    Integrations {
        llm: model.map(|m| m as Arc<dyn LanguageModel>),
        prices: Arc::new(StaticPrices(prices)),
        weather: Arc::new(StaticWeather),
        news: Arc::new(StaticNews),
        suppliers: Arc::new(StaticSuppliers),
        notifier: Arc::new(SilentNotifier),
        storage: MediaStorage::with_root(
            std::env::temp_dir().join("km-advisory-tests"),
            "http://localhost:3000/media".to_string(),
        ),
    }
}

fn nashik_prices() -> MarketPrices {
    MarketPrices::live(vec![
        MandiPrice {
            market: "Lasalgaon".to_string(),
            price: Decimal::from(2350),
        },
        MandiPrice {
            market: "Pimpalgaon".to_string(),
            price: Decimal::from(2480),
        },
    ])
}

// ============================================================================
// Helpers
// ============================================================================

fn farm_details() -> FarmDetails {
    FarmDetails {
        size: Decimal::from(3),
        size_unit: SizeUnit::Acres,
        location: "Nashik, Maharashtra".to_string(),
        soil_type: Some("Black cotton".to_string()),
        irrigation: Some("Borewell".to_string()),
        planting_month: Some("June".to_string()),
        last_crop: Some("Wheat".to_string()),
    }
}

fn recommendation_json(name: &str, best: bool, yield_kg: i64) -> serde_json::Value {
    let window = json!({
        "date_range": "June 15 - June 30",
        "risk_level": "Low",
        "is_pmfby_eligible": true,
        "description": "Sow after the first good monsoon rain"
    });
    json!({
        "crop_name": name,
        "is_best_fit": best,
        "description": "Short duration kharif crop",
        "reason": "Suits black soil",
        "sowing_month": "June",
        "estimated_duration": "100 days",
        "market_suitability": "Good demand",
        "crop_overview": {
            "best_season": "Kharif",
            "harvest_duration": "95-105 days",
            "recommended_land_type": "Well drained",
            "seed_rate": "30 kg/acre",
            "irrigation_needs": "Moderate",
            "estimated_water_usage": "~450 mm",
            "seed_treatment": "Rhizobium culture"
        },
        "sowing_windows": [window.clone(), window.clone(), window],
        "pmfby_reminder": "Enroll before the cut-off date",
        "plan": {
            "land_preparation": ["Deep ploughing"],
            "seed_selection": ["Certified seed"],
            "irrigation_schedule": "At flowering",
            "spraying_schedule": "As needed",
            "timeline": [{ "week": "1", "activity": "Sowing" }]
        },
        "estimated_costs": {
            "seed": 2000, "fertilizer": 3000, "pesticide": 1000, "labor": 5000, "irrigation": 1000
        },
        "estimated_yield": yield_kg,
        "estimated_selling_price": 45
    })
}

fn profile() -> Profile {
    Profile {
        name: "Sunita Pawar".to_string(),
        location: "Nashik, Maharashtra".to_string(),
        language: Language::Hi,
        avatar_url: None,
        phone: Some("+919812345678".to_string()),
    }
}

fn sell_request(status: HarvestStatus) -> SellAdviceRequest {
    SellAdviceRequest {
        crop: "Onion".to_string(),
        quantity: Decimal::from(40),
        unit: QuantityUnit::Quintal,
        harvest_status: status,
        storage_days_left: 20,
        location: None,
        language: None,
    }
}

fn sell_reply(recommendation: &str) -> AppResult<String> {
    Ok(json!({
        "recommendation": recommendation,
        "reasoning": "Arrivals are falling and prices are firm",
        "predicted_price": "Rs 2,400 - Rs 2,550 per quintal"
    })
    .to_string())
}

fn scheme(id: &str) -> Scheme {
    Scheme {
        id: id.to_string(),
        category: SchemeCategory::Central,
        state: "All India".to_string(),
        last_updated: Utc::now().date_naive(),
        contact: SchemeContact {
            department: "Ministry of Agriculture".to_string(),
            phone: "155261".to_string(),
            email: "help@example.gov.in".to_string(),
        },
        website: format!("https://{}.example.gov.in", id),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[tokio::test]
async fn test_flows_fail_without_configured_model() {
    let service = AdvisoryService::new(integrations(None, nashik_prices()));

    let err = service
        .recommend_crops(CropRecommendationRequest {
            farm: farm_details(),
            language: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AiUnavailable));
}

#[tokio::test]
async fn test_crop_recommendation_parses_fenced_json_and_picks_one_best_fit() {
    let reply = format!(
        "```json\n{}\n```",
        json!({ "recommendations": [
            recommendation_json("Soybean", false, 800),
            recommendation_json("Tur", false, 600),
        ]})
    );
    let model = ScriptedModel::replying(vec![Ok(reply)]);
    let service = AdvisoryService::new(integrations(Some(model.clone()), nashik_prices()));

    let output = service
        .recommend_crops(CropRecommendationRequest {
            farm: farm_details(),
            language: Some(Language::Hi),
        })
        .await
        .unwrap();

    let best: Vec<_> = output.recommendations.iter().filter(|r| r.is_best_fit).collect();
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].crop_name, "Soybean");

    let requests = model.requests.lock().unwrap();
    assert!(requests[0].json_output);
    assert!(requests[0].system.is_some());
}

#[tokio::test]
async fn test_malformed_model_output_is_an_ai_output_error() {
    let model = ScriptedModel::replying(vec![Ok("Here are some crops: soybean, tur".to_string())]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));

    let err = service
        .recommend_crops(CropRecommendationRequest {
            farm: farm_details(),
            language: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AiOutput(ref msg) if msg.starts_with("crop_recommendation")));
}

#[tokio::test]
async fn test_market_aware_recommendation_prices_each_candidate() {
    let model = ScriptedModel::replying(vec![
        Ok(json!({ "candidates": ["Onion", " onion ", "Soybean"] }).to_string()),
        Ok(json!({ "recommendations": [
            recommendation_json("Onion", true, 9000),
            recommendation_json("Soybean", true, 800),
        ]})
        .to_string()),
    ]);
    let service = AdvisoryService::new(integrations(Some(model.clone()), nashik_prices()));

    let output = service
        .recommend_crops_with_market(CropRecommendationRequest {
            farm: farm_details(),
            language: None,
        })
        .await
        .unwrap();

    assert_eq!(output.recommendations.iter().filter(|r| r.is_best_fit).count(), 1);
    assert!(output.recommendations[0].is_best_fit);

    let requests = model.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].prompt.contains("Pimpalgaon"));
}

#[tokio::test]
async fn test_diagnosis_replaces_vendors_and_clamps_confidence() {
    let reply = json!({ "diagnosis": [
        {
            "disease_name": "Purple blotch",
            "confidence": 140,
            "description": "Fungal leaf disease",
            "treatment": { "organic": [], "inorganic": [], "schedule": [] },
            "vendor_recommendations": [{ "name": "Invented Agro", "address": "Nowhere" }]
        },
        {
            "disease_name": "Thrips damage",
            "confidence": 35,
            "description": "Silvery streaks on leaves",
            "treatment": { "organic": [], "inorganic": [], "schedule": [] }
        }
    ]});
    let model = ScriptedModel::replying(vec![Ok(reply.to_string())]);
    let service = AdvisoryService::new(integrations(Some(model.clone()), nashik_prices()));

    let farm = Farm {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: "River plot".to_string(),
        location: "Nashik, Maharashtra".to_string(),
        size: Decimal::from(2),
        size_unit: SizeUnit::Acres,
        main_crop: "Onion".to_string(),
        soil_type: None,
        irrigation: None,
        last_crop: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let output = service
        .diagnose(
            &farm,
            DiagnosisRequest {
                farm_id: farm.id,
                symptoms: Some("Purple lesions on leaves".to_string()),
                photo_data_uri: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
                language: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(output.diagnosis[0].confidence, Decimal::from(100));
    for d in &output.diagnosis {
        assert_eq!(d.vendor_recommendations.len(), 1);
        assert_eq!(d.vendor_recommendations[0].name, "Shree Krishi Seva Kendra");
    }

    let requests = model.requests.lock().unwrap();
    let image = requests[0].image.as_ref().unwrap();
    assert_eq!(image.mime_type, "image/png");
}

#[tokio::test]
async fn test_diagnosis_needs_symptoms_or_photo() {
    let model = ScriptedModel::replying(vec![]);
    let service = AdvisoryService::new(integrations(Some(model.clone()), nashik_prices()));
    let farm = Farm {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: "River plot".to_string(),
        location: "Nashik, Maharashtra".to_string(),
        size: Decimal::from(2),
        size_unit: SizeUnit::Acres,
        main_crop: "Onion".to_string(),
        soil_type: None,
        irrigation: None,
        last_crop: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let err = service
        .diagnose(
            &farm,
            DiagnosisRequest {
                farm_id: farm.id,
                symptoms: Some("   ".to_string()),
                photo_data_uri: None,
                language: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
    assert_eq!(model.request_count(), 0);
}

#[tokio::test]
async fn test_sell_advice_copies_market_data_and_names_best_mandi() {
    let model = ScriptedModel::replying(vec![sell_reply("sell")]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));

    let advice = service
        .sell_advice(&profile(), sell_request(HarvestStatus::Harvested))
        .await
        .unwrap();

    assert_eq!(advice.recommendation, SellRecommendation::Sell);
    let best = advice.best_mandi.unwrap();
    assert_eq!(best.name, "Pimpalgaon");
    assert_eq!(best.price, Decimal::from(2480));
    assert_eq!(advice.mandi_prices, nashik_prices().records);
    assert_eq!(advice.weather.len(), 1);
    assert_eq!(advice.news[0].title, "Onion arrivals steady");
}

#[tokio::test]
async fn test_unharvested_crop_is_told_to_wait() {
    let model = ScriptedModel::replying(vec![sell_reply("sell")]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));

    let advice = service
        .sell_advice(&profile(), sell_request(HarvestStatus::NotHarvested))
        .await
        .unwrap();

    assert_eq!(advice.recommendation, SellRecommendation::Wait);
    assert!(advice.best_mandi.is_none());
}

#[tokio::test]
async fn test_sell_advice_leaves_out_placeholder_prices() {
    let model = ScriptedModel::replying(vec![sell_reply("hold")]);
    let service = AdvisoryService::new(integrations(
        Some(model),
        MarketPrices::mock(vec![MandiPrice {
            market: "Mock Market 1, Nashik".to_string(),
            price: Decimal::from(2150),
        }]),
    ));

    let advice = service
        .sell_advice(&profile(), sell_request(HarvestStatus::Harvested))
        .await
        .unwrap();

    assert_eq!(advice.recommendation, SellRecommendation::Hold);
    assert!(advice.mandi_prices.is_empty());
}

#[tokio::test]
async fn test_scheme_search_keeps_only_catalog_ids() {
    let model = ScriptedModel::replying(vec![Ok(json!({
        "relevant_scheme_ids": ["pmfby", "crop-bonus-2024", "pm-kisan", "pmfby"]
    })
    .to_string())]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));

    let catalog = vec![scheme("pm-kisan"), scheme("pmfby"), scheme("kcc")];
    let matches = service
        .search_schemes(
            SchemeSearchRequest {
                query: "My crop was destroyed by hail".to_string(),
                language: None,
            },
            &catalog,
        )
        .await
        .unwrap();

    assert_eq!(matches.relevant_scheme_ids, vec!["pmfby", "pm-kisan"]);
}

#[tokio::test]
async fn test_scheme_details_keep_catalog_entry() {
    let model = ScriptedModel::replying(vec![Ok(json!({
        "title": "Pradhan Mantri Fasal Bima Yojana",
        "description": "Crop insurance",
        "benefits": "Cover against crop loss",
        "eligibility": "All farmers",
        "how_to_apply": "Through banks or the portal",
        "required_documents": "Aadhaar card, Land records"
    })
    .to_string())]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));

    let populated = service.scheme_details(scheme("pmfby"), Some(Language::En)).await.unwrap();
    assert_eq!(populated.scheme.id, "pmfby");
    assert_eq!(populated.details.documents(), vec!["Aadhaar card", "Land records"]);
}

#[tokio::test]
async fn test_navigation_falls_back_on_unknown_route_and_errors() {
    let model = ScriptedModel::replying(vec![
        Ok(json!({ "navigation_path": "/schemes" }).to_string()),
        Ok(json!({ "navigation_path": "/admin/users" }).to_string()),
        Err(AppError::ExternalService("timeout".to_string())),
    ]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));
    let request = |input: &str| NavigationRequest {
        voice_input: input.to_string(),
        current_path: "/my-farms".to_string(),
        language: Some(Language::Hi),
    };

    assert_eq!(service.navigate(request("sarkari yojana dikhao")).await.navigation_path, "/schemes");
    assert_eq!(service.navigate(request("open admin")).await.navigation_path, DEFAULT_ROUTE);
    assert_eq!(service.navigate(request("market")).await.navigation_path, DEFAULT_ROUTE);
}

#[tokio::test]
async fn test_navigation_without_model_uses_default_route() {
    let service = AdvisoryService::new(integrations(None, nashik_prices()));
    let target = service
        .navigate(NavigationRequest {
            voice_input: "go to community".to_string(),
            current_path: "/profile-setup".to_string(),
            language: None,
        })
        .await;
    assert_eq!(target.navigation_path, DEFAULT_ROUTE);
}

#[tokio::test]
async fn test_agri_bot_sends_plain_text_request_with_history() {
    let model = ScriptedModel::replying(vec![Ok("  Spray neem oil in the evening.  ".to_string())]);
    let service = AdvisoryService::new(integrations(Some(model.clone()), nashik_prices()));

    let reply = service
        .agri_bot(AgriBotRequest {
            query: "How do I control aphids?".to_string(),
            chat_history: vec![
                ChatMessage {
                    role: ChatRole::User,
                    content: "I grow mustard".to_string(),
                },
                ChatMessage {
                    role: ChatRole::Model,
                    content: "  ".to_string(),
                },
            ],
            language: None,
        })
        .await
        .unwrap();

    assert_eq!(reply.response, "Spray neem oil in the evening.");
    let requests = model.requests.lock().unwrap();
    assert!(!requests[0].json_output);
    assert_eq!(requests[0].history.len(), 1);
    assert_eq!(requests[0].prompt, "How do I control aphids?");
}

#[tokio::test]
async fn test_voice_field_rejects_empty_input_before_calling_model() {
    let model = ScriptedModel::replying(vec![]);
    let service = AdvisoryService::new(integrations(Some(model.clone()), nashik_prices()));

    let err = service
        .extract_voice_field(VoiceFieldRequest {
            voice_input: " ".to_string(),
            field_to_populate: "farm size".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
    assert_eq!(model.request_count(), 0);
}

#[tokio::test]
async fn test_voice_field_value_is_trimmed() {
    let model = ScriptedModel::replying(vec![Ok(json!({ "processed_value": " 5 " }).to_string())]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));

    let value = service
        .extract_voice_field(VoiceFieldRequest {
            voice_input: "my farm is five acres".to_string(),
            field_to_populate: "farm size".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(value.processed_value, "5");
}

#[tokio::test]
async fn test_find_suppliers_does_not_call_model() {
    let model = ScriptedModel::replying(vec![]);
    let service = AdvisoryService::new(integrations(Some(model.clone()), nashik_prices()));

    let suppliers = service.find_suppliers("Nashik").await.unwrap();
    assert_eq!(suppliers[0].address, "Market Yard, Nashik");
    assert_eq!(model.request_count(), 0);
}

#[tokio::test]
async fn test_negative_npk_dose_is_an_ai_output_error() {
    let model = ScriptedModel::replying(vec![Ok(json!({
        "npk_recommendation": { "n": 48, "p": -12, "k": 16 },
        "fertilizer_plan": {
            "inorganic": [{
                "application_stage": "Basal Dose (at Sowing)",
                "fertilizer_name": "DAP",
                "quantity": "50 kg",
                "application_method": "Band placement"
            }],
            "organic": []
        },
        "recommended_brands": ["IFFCO"],
        "subsidy_info": "Subsidy through the nutrient based subsidy scheme",
        "notes": ""
    })
    .to_string())]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));

    let err = service
        .recommend_fertilizer(FertilizerRequest {
            soil_health_card: SoilHealthCard {
                ph: Decimal::new(72, 1),
                organic_carbon: Decimal::new(5, 1),
                nitrogen: Decimal::from(210),
                phosphorus: Decimal::from(18),
                potassium: Decimal::from(260),
            },
            crop_name: "Onion".to_string(),
            location: "Nashik, Maharashtra".to_string(),
            language: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AiOutput(ref msg) if msg.starts_with("fertilizer_recommendation")));
}

#[tokio::test]
async fn test_empty_water_plan_is_an_ai_output_error() {
    let model = ScriptedModel::replying(vec![Ok(json!({ "water_plan": [] }).to_string())]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));

    let err = service
        .plan_water(WaterManagementRequest {
            farm: farm_details(),
            crop_name: "Onion".to_string(),
            language: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AiOutput(ref msg) if msg.starts_with("water_management")));
}

#[tokio::test]
async fn test_pest_forecast_prompt_carries_weather_and_news() {
    let model = ScriptedModel::replying(vec![Ok(json!({ "threats": [{
        "name": "Thrips",
        "type": "Pest",
        "symptoms": "Silvery patches on leaves",
        "preventative_measures": { "organic": ["Blue sticky traps"], "chemical": ["Fipronil 5% SC"] }
    }]})
    .to_string())]);
    let service = AdvisoryService::new(integrations(Some(model.clone()), nashik_prices()));

    let forecast = service
        .forecast_pests(PestForecastRequest {
            farm: farm_details(),
            crop_name: "Onion".to_string(),
            language: None,
        })
        .await
        .unwrap();
    assert_eq!(forecast.threats[0].kind, ThreatKind::Pest);

    let requests = model.requests.lock().unwrap();
    let prompt = &requests[0].prompt;
    assert!(prompt.contains("Partly cloudy, 31°C, rain chance 20%, humidity 64%"));
    assert!(prompt.contains("Onion pest disease Nashik arrivals steady"));
    assert!(prompt.contains("Arrivals at major mandis were steady this week."));
}

fn cycle_option(name: &str, best: bool, yield_kg: i64) -> serde_json::Value {
    json!({
        "crop_name": name,
        "duration": "110 days",
        "reason": "Fits the season",
        "is_best_fit": best,
        "estimated_costs": {
            "seed": 2000, "fertilizer": 3000, "pesticide": 1000, "labor": 5000, "irrigation": 1000
        },
        "estimated_yield": yield_kg,
        "estimated_selling_price": 40
    })
}

#[tokio::test]
async fn test_year_plan_has_one_best_fit_per_season() {
    let model = ScriptedModel::replying(vec![Ok(json!({
        "kharif": [cycle_option("Soybean", false, 800), cycle_option("Cotton", false, 1200)],
        "rabi": [cycle_option("Wheat", true, 1500), cycle_option("Gram", true, 700)],
        "zaid": []
    })
    .to_string())]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));

    let plan = service
        .plan_year(YearLongPlannerRequest {
            location: "Nashik, Maharashtra".to_string(),
            start_month: "June".to_string(),
            land_area: Decimal::from(3),
            land_area_unit: SizeUnit::Acres,
            soil_type: "Black cotton".to_string(),
            irrigation: vec!["Borewell".to_string()],
            preferred_crops: vec![],
            language: None,
        })
        .await
        .unwrap();

    let best = |season: Season| -> Vec<String> {
        plan.season(season)
            .iter()
            .filter(|c| c.is_best_fit)
            .map(|c| c.crop_name.clone())
            .collect()
    };
    assert_eq!(best(Season::Kharif), vec!["Cotton"]);
    assert_eq!(best(Season::Rabi), vec!["Wheat"]);
    assert!(plan.zaid.is_empty());
}

#[tokio::test]
async fn test_year_plan_rejects_empty_land_without_model_call() {
    let model = ScriptedModel::replying(vec![]);
    let service = AdvisoryService::new(integrations(Some(model.clone()), nashik_prices()));

    let err = service
        .plan_year(YearLongPlannerRequest {
            location: "Nashik, Maharashtra".to_string(),
            start_month: "June".to_string(),
            land_area: Decimal::ZERO,
            land_area_unit: SizeUnit::Acres,
            soil_type: "Black cotton".to_string(),
            irrigation: vec![],
            preferred_crops: vec![],
            language: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
    assert_eq!(model.request_count(), 0);
}

#[tokio::test]
async fn test_variety_plan_must_cover_every_chosen_season() {
    let model = ScriptedModel::replying(vec![Ok(json!({ "seasonal_plans": [{
        "season": "Kharif",
        "crop_name": "Soybean",
        "variety": "JS 335",
        "monthly_timeline": [{ "month": "June", "activity": "Sowing" }],
        "fertilizer_plan": { "inorganic": [], "organic": [] }
    }]})
    .to_string())]);
    let service = AdvisoryService::new(integrations(Some(model), nashik_prices()));

    let err = service
        .plan_year_varieties(YearLongVarietyPlanRequest {
            farm: YearLongFarm {
                location: "Nashik, Maharashtra".to_string(),
                land_area: Decimal::from(3),
                land_area_unit: SizeUnit::Acres,
                soil_type: "Black cotton".to_string(),
                irrigation: vec!["Borewell".to_string()],
            },
            crop_cycle: vec![
                CropCycleChoice {
                    season: Season::Kharif,
                    crop_name: "Soybean".to_string(),
                    variety: "JS 335".to_string(),
                },
                CropCycleChoice {
                    season: Season::Rabi,
                    crop_name: "Wheat".to_string(),
                    variety: "HD 2967".to_string(),
                },
            ],
            language: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AiOutput(ref msg) if msg.contains("missing plan for Rabi")));
}
