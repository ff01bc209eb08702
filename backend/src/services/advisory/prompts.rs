//! Prompt templates for the advisory flows
//!
//! Every JSON flow ends with the exact shape the answer must take; field names
//! match the serde names of the output types.

use shared::{
    ChatMessage, CropCycleChoice, DailyForecast, FarmDetails, FertilizerRequest, Language,
    MandiPrice, NewsItem, Profile, Scheme, SellAdviceRequest, YearLongFarm,
    YearLongPlannerRequest, NAVIGATION_ROUTES,
};

pub const ADVISOR_SYSTEM: &str = "You are Krishak Mitra, an agronomist and market advisor for \
small and marginal farmers in India. Give practical, locally available, affordable advice. \
Answer with JSON only, no prose around it.";

const RECOMMENDATION_SHAPE: &str = r#"{"recommendations": [{
  "crop_name": string, "is_best_fit": bool, "description": string, "reason": string,
  "sowing_month": string, "estimated_duration": string, "market_suitability": string,
  "crop_overview": {"best_season": string, "harvest_duration": string, "recommended_land_type": string,
    "seed_rate": string, "irrigation_needs": string, "estimated_water_usage": string, "seed_treatment": string},
  "sowing_windows": [{"date_range": string, "risk_level": "Low"|"Medium"|"High", "is_pmfby_eligible": bool, "description": string}],
  "pmfby_reminder": string,
  "plan": {"land_preparation": [string], "seed_selection": [string], "irrigation_schedule": string,
    "spraying_schedule": string, "timeline": [{"week": string, "activity": string}]},
  "estimated_costs": {"seed": number, "fertilizer": number, "pesticide": number, "labor": number, "irrigation": number},
  "estimated_yield": number, "estimated_selling_price": number
}]}"#;

const APPLICATION_SHAPE: &str = r#"{"application_stage": string, "fertilizer_name": string, "quantity": string, "application_method": string}"#;

fn language_rule(language: Language) -> String {
    format!(
        "Write every text value in {}. Keep JSON keys and enum values exactly as shown.",
        language.display_name()
    )
}

fn farm_block(farm: &FarmDetails) -> String {
    let mut lines = vec![
        format!("- Location: {}", farm.location),
        format!("- Size: {} {}", farm.size, farm.size_unit),
    ];
    if let Some(ref soil) = farm.soil_type {
        lines.push(format!("- Soil type: {}", soil));
    }
    let sources = farm.irrigation_sources();
    if !sources.is_empty() {
        lines.push(format!("- Irrigation: {}", sources.join(", ")));
    }
    if let Some(ref month) = farm.planting_month {
        lines.push(format!("- Planned sowing month: {}", month));
    }
    if let Some(ref last) = farm.last_crop {
        lines.push(format!("- Previous crop: {}", last));
    }
    lines.join("\n")
}

fn price_lines(prices: &[MandiPrice]) -> String {
    if prices.is_empty() {
        return "No mandi prices are available.".to_string();
    }
    prices
        .iter()
        .map(|p| format!("- {}: Rs {} per quintal", p.market, p.price))
        .collect::<Vec<_>>()
        .join("\n")
}

fn weather_lines(forecast: &[DailyForecast]) -> String {
    forecast
        .iter()
        .map(|d| {
            format!(
                "- {}: {}, {}°C, rain chance {}%, humidity {}%",
                d.day, d.condition, d.temp, d.rain_probability, d.humidity
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn news_lines(news: &[NewsItem]) -> String {
    if news.is_empty() {
        return "No recent news.".to_string();
    }
    news.iter()
        .map(|n| format!("- {}: {}", n.title, n.summary))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Crop planning
// ============================================================================

pub fn crop_recommendation(farm: &FarmDetails, language: Language) -> String {
    format!(
        "Recommend up to 4 crops for this farm.\n{farm}\n\n\
         For each crop give exactly 3 sowing windows with their weather risk and whether sowing \
         in that window keeps the crop eligible for PMFBY crop insurance, a field action plan, and \
         per {unit} estimates of input costs (Rs), yield (kg) and selling price (Rs/kg). \
         Mark the single most suitable crop with is_best_fit. {lang}\n\nRespond as:\n{shape}",
        farm = farm_block(farm),
        unit = farm.size_unit.as_str(),
        lang = language_rule(language),
        shape = RECOMMENDATION_SHAPE,
    )
}

pub fn candidate_crops(farm: &FarmDetails) -> String {
    format!(
        "List 3 to 5 crops that agronomically suit this farm and season.\n{}\n\n\
         Respond as: {{\"candidates\": [string]}} using common English crop names.",
        farm_block(farm)
    )
}

pub fn market_aware_recommendation(
    farm: &FarmDetails,
    prices: &[(String, Vec<MandiPrice>)],
    language: Language,
) -> String {
    let market = prices
        .iter()
        .map(|(crop, p)| format!("{}:\n{}", crop, price_lines(p)))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Recommend crops for this farm, weighing both agronomy and current local demand.\n{farm}\n\n\
         Current mandi prices for the shortlisted crops:\n{market}\n\n\
         Base estimated_selling_price on these prices (convert Rs per quintal to Rs per kg) when \
         available. Give exactly 3 sowing windows per crop and mark at most one crop as is_best_fit, \
         the one with the best mix of suitability and profit. {lang}\n\nRespond as:\n{shape}",
        farm = farm_block(farm),
        market = market,
        lang = language_rule(language),
        shape = RECOMMENDATION_SHAPE,
    )
}

pub fn variety_recommendation(farm: &FarmDetails, crop: &str, language: Language) -> String {
    format!(
        "Recommend up to 4 varieties of {crop} for this farm. Use the variety name as crop_name.\n\
         {farm}\n\nGive exactly 3 sowing windows per variety, an action plan and per {unit} \
         estimates. Mark the single best variety with is_best_fit. {lang}\n\nRespond as:\n{shape}",
        crop = crop,
        farm = farm_block(farm),
        unit = farm.size_unit.as_str(),
        lang = language_rule(language),
        shape = RECOMMENDATION_SHAPE,
    )
}

pub fn year_long_plan(request: &YearLongPlannerRequest, language: Language) -> String {
    let preferred = if request.preferred_crops.is_empty() {
        "none".to_string()
    } else {
        request.preferred_crops.join(", ")
    };
    format!(
        "Plan a full year of cropping starting in {start} for a {area} {unit} farm in {location}.\n\
         - Soil: {soil}\n- Irrigation: {irrigation}\n- Farmer's preferred crops: {preferred}\n\n\
         Give 2 or 3 options for each of the Kharif, Rabi and Zaid seasons that follow each other \
         sensibly, with per {unit} cost, yield (kg) and price (Rs/kg) estimates. Mark one option per \
         season as is_best_fit. Leave a season empty if nothing can be grown. {lang}\n\nRespond as:\n\
         {{\"kharif\": [C], \"rabi\": [C], \"zaid\": [C]}} where C is {{\"crop_name\": string, \
         \"variety\": string, \"duration\": string, \"reason\": string, \"is_best_fit\": bool, \
         \"estimated_costs\": {{\"seed\": number, \"fertilizer\": number, \"pesticide\": number, \
         \"labor\": number, \"irrigation\": number}}, \"estimated_yield\": number, \
         \"estimated_selling_price\": number}}",
        start = request.start_month,
        area = request.land_area,
        unit = request.land_area_unit.as_str(),
        location = request.location,
        soil = request.soil_type,
        irrigation = request.irrigation.join(", "),
        preferred = preferred,
        lang = language_rule(language),
    )
}

pub fn year_long_variety_plan(farm: &YearLongFarm, cycle: &[CropCycleChoice], language: Language) -> String {
    let choices = cycle
        .iter()
        .map(|c| format!("- {}: {} ({})", c.season.label(), c.crop_name, c.variety))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Write a detailed seasonal plan for each crop the farmer chose.\n\
         Farm: {area} {unit} in {location}, {soil} soil, irrigation: {irrigation}.\n\
         Chosen cycle:\n{choices}\n\n\
         For every entry give a month by month activity timeline and an organic plus inorganic \
         fertilizer schedule. {lang}\n\nRespond as:\n\
         {{\"seasonal_plans\": [{{\"season\": \"kharif\"|\"rabi\"|\"zaid\", \"crop_name\": string, \
         \"variety\": string, \"monthly_timeline\": [{{\"month\": string, \"activity\": string}}], \
         \"fertilizer_plan\": {{\"inorganic\": [A], \"organic\": [A]}}}}]}} where A is {app}",
        area = farm.land_area,
        unit = farm.land_area_unit.as_str(),
        location = farm.location,
        soil = farm.soil_type,
        irrigation = farm.irrigation.join(", "),
        choices = choices,
        lang = language_rule(language),
        app = APPLICATION_SHAPE,
    )
}

// ============================================================================
// Crop health
// ============================================================================

pub fn disease_diagnosis(
    crop: &str,
    location: &str,
    symptoms: Option<&str>,
    has_photo: bool,
    language: Language,
) -> String {
    let observed = match (symptoms, has_photo) {
        (Some(s), true) => format!("The farmer describes: \"{}\". A photo of the plant is attached.", s),
        (Some(s), false) => format!("The farmer describes: \"{}\".", s),
        (None, _) => "A photo of the affected plant is attached.".to_string(),
    };
    format!(
        "Diagnose the problem with a {crop} crop in {location}. {observed}\n\n\
         List the most likely diseases or pests, most likely first, with a confidence from 0 to 100, \
         the symptoms to confirm it and organic and inorganic treatments with safety warnings and a \
         weekly schedule. {lang}\n\nRespond as:\n\
         {{\"diagnosis\": [{{\"disease_name\": string, \"confidence\": number, \"description\": string, \
         \"symptoms\": [string], \"treatment\": {{\"organic\": [T], \"inorganic\": [T], \
         \"schedule\": [{{\"week\": string, \"activity\": string}}]}}}}]}} where T is \
         {{\"solution_name\": string, \"application_method\": string, \"safety_warning\": string}}",
        crop = crop,
        location = location,
        observed = observed,
        lang = language_rule(language),
    )
}

pub fn pest_forecast(
    farm: &FarmDetails,
    crop: &str,
    forecast: &[DailyForecast],
    news: &[NewsItem],
    language: Language,
) -> String {
    format!(
        "Forecast the pest and disease threats for {crop} on this farm over the coming weeks.\n\
         {farm}\n\nWeather for the next 3 days:\n{weather}\n\nRecent news:\n{news}\n\n\
         Consider how the humidity, rain and temperature favour particular pests and diseases. \
         Give organic and chemical preventive measures for each. {lang}\n\nRespond as:\n\
         {{\"threats\": [{{\"name\": string, \"type\": \"Pest\"|\"Disease\", \"symptoms\": string, \
         \"preventative_measures\": {{\"organic\": [string], \"chemical\": [string]}}}}]}}",
        crop = crop,
        farm = farm_block(farm),
        weather = weather_lines(forecast),
        news = news_lines(news),
        lang = language_rule(language),
    )
}

pub fn fertilizer(request: &FertilizerRequest, language: Language) -> String {
    let card = &request.soil_health_card;
    format!(
        "Prepare a fertilizer recommendation for {crop} in {location} from this soil health card:\n\
         - pH: {ph}\n- Organic carbon: {oc}%\n- Nitrogen: {n} kg/ha\n- Phosphorus: {p} kg/ha\n\
         - Potassium: {k} kg/ha\n\n\
         Give the NPK dose in kg/ha, a staged inorganic and organic application plan, commonly \
         available brands and any government subsidy the farmer can claim. {lang}\n\nRespond as:\n\
         {{\"npk_recommendation\": {{\"n\": number, \"p\": number, \"k\": number}}, \
         \"fertilizer_plan\": {{\"inorganic\": [A], \"organic\": [A]}}, \"recommended_brands\": [string], \
         \"subsidy_info\": string, \"notes\": string}} where A is {app}",
        crop = request.crop_name,
        location = request.location,
        ph = card.ph,
        oc = card.organic_carbon,
        n = card.nitrogen,
        p = card.phosphorus,
        k = card.potassium,
        lang = language_rule(language),
        app = APPLICATION_SHAPE,
    )
}

pub fn water_management(farm: &FarmDetails, crop: &str, language: Language) -> String {
    format!(
        "Plan irrigation for {crop} on this farm.\n{farm}\n\n\
         Give one plan per irrigation source the farm has (or one general plan if none is listed), \
         with a schedule per growth stage. {lang}\n\nRespond as:\n\
         {{\"water_plan\": [{{\"source\": string, \"advice\": string, \"schedule\": \
         [{{\"growth_stage\": string, \"frequency\": string, \"duration\": string}}]}}]}}",
        crop = crop,
        farm = farm_block(farm),
        lang = language_rule(language),
    )
}

// ============================================================================
// Market
// ============================================================================

pub fn sell_advice(
    profile: &Profile,
    request: &SellAdviceRequest,
    location: &str,
    prices: &[MandiPrice],
    forecast: &[DailyForecast],
    news: &[NewsItem],
    language: Language,
) -> String {
    format!(
        "Advise {name} from {location} whether to sell their {crop} now, wait or hold.\n\
         - Quantity: {qty} {unit}\n- Harvest status: {status}\n\
         - The produce keeps for {days} more days\n\n\
         Mandi prices:\n{prices}\n\nWeather for the next 3 days:\n{weather}\n\nNews:\n{news}\n\n\
         A crop that is not harvested must get \"wait\". Heavy rain ahead can block transport to \
         the mandi. If no prices are available say so and lean towards waiting. Give a conservative \
         near-term price prediction. When recommending a sale, name the mandi with the highest \
         price. {lang}\n\nRespond as:\n\
         {{\"recommendation\": \"sell\"|\"wait\"|\"hold\", \"reasoning\": string, \
         \"predicted_price\": string, \"best_mandi\": {{\"name\": string, \"price\": number}} | null}}",
        name = profile.name,
        location = location,
        crop = request.crop,
        qty = request.quantity,
        unit = match request.unit {
            shared::QuantityUnit::Kg => "kg",
            shared::QuantityUnit::Quintal => "quintal",
        },
        status = request.harvest_status.label(),
        days = request.storage_days_left,
        prices = price_lines(prices),
        weather = weather_lines(forecast),
        news = news_lines(news),
        lang = language_rule(language),
    )
}

// ============================================================================
// Schemes
// ============================================================================

pub fn scheme_search(query: &str, catalog: &[Scheme]) -> String {
    let entries = catalog
        .iter()
        .map(|s| format!("- {} ({:?}, {}): {}", s.id, s.category, s.state, s.website))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "A farmer asks: \"{query}\"\n\nGovernment schemes in the catalog:\n{entries}\n\n\
         Return the ids of the schemes that answer the question, most relevant first. Use only ids \
         from the catalog; return an empty list if none apply.\n\n\
         Respond as: {{\"relevant_scheme_ids\": [string]}}",
        query = query,
        entries = entries,
    )
}

pub fn scheme_details(scheme: &Scheme, language: Language) -> String {
    format!(
        "Explain the Indian government scheme \"{id}\" to a farmer. Official website: {site}. \
         Administered by: {dept}.\n\nSummarise what it is, its benefits, who is eligible, how to \
         apply and the documents needed. {lang}\n\nRespond as:\n\
         {{\"title\": string, \"description\": string, \"benefits\": string, \"eligibility\": string, \
         \"how_to_apply\": string, \"required_documents\": string (comma separated)}}",
        id = scheme.id,
        site = scheme.website,
        dept = scheme.contact.department,
        lang = language_rule(language),
    )
}

// ============================================================================
// Assistant
// ============================================================================

pub fn agri_bot_system(language: Language) -> String {
    format!(
        "You are Krishak Mitra, a friendly farming assistant for Indian farmers. Answer questions on \
         crops, soil, pests, weather, markets and government schemes briefly and practically. \
         Mention PMFBY crop insurance when a question involves crop loss. Politely decline \
         questions unrelated to farming. Reply in plain text in {}.",
        language.display_name()
    )
}

pub fn agri_bot_turns(history: &[ChatMessage]) -> Vec<ChatMessage> {
    history
        .iter()
        .filter(|m| !m.content.trim().is_empty())
        .cloned()
        .collect()
}

pub fn navigation(voice_input: &str, current_path: &str, language: Language) -> String {
    format!(
        "A farmer using the app said (in {lang}): \"{input}\". They are on {current}.\n\
         Pick the page they want from: {routes}.\n\
         /my-farms lists farms, /crop-planner recommends crops, /disease-diagnosis checks sick \
         plants, /market-insights gives prices and sell advice, /schemes covers government schemes, \
         /community is the farmer forum, /notifications shows alerts, /profile-setup edits the profile.\n\n\
         Respond as: {{\"navigation_path\": string}}",
        lang = language.display_name(),
        input = voice_input,
        current = current_path,
        routes = NAVIGATION_ROUTES.join(", "),
    )
}

pub fn voice_field(voice_input: &str, field: &str) -> String {
    format!(
        "Extract the value for the form field \"{field}\" from this spoken input: \"{input}\".\n\
         Return just the value, normalised (numbers as digits, names capitalised). Return an empty \
         string if the input does not contain it.\n\nRespond as: {{\"processed_value\": string}}",
        field = field,
        input = voice_input,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::SizeUnit;

    fn farm() -> FarmDetails {
        FarmDetails {
            size: Decimal::from(3),
            size_unit: SizeUnit::Acres,
            location: "Nashik, Maharashtra".into(),
            soil_type: Some("Black".into()),
            irrigation: Some("Borewell, Drip".into()),
            planting_month: Some("July".into()),
            last_crop: None,
        }
    }

    #[test]
    fn test_crop_prompt_mentions_farm_and_language() {
        let prompt = crop_recommendation(&farm(), Language::Hi);
        assert!(prompt.contains("Nashik, Maharashtra"));
        assert!(prompt.contains("Borewell, Drip"));
        assert!(prompt.contains("Planned sowing month: July"));
        assert!(prompt.contains("in Hindi"));
        assert!(!prompt.contains("Previous crop"));
    }

    #[test]
    fn test_price_lines_handle_empty() {
        assert_eq!(price_lines(&[]), "No mandi prices are available.");
        let lines = price_lines(&[MandiPrice {
            market: "Lasalgaon".into(),
            price: Decimal::from(2400),
        }]);
        assert_eq!(lines, "- Lasalgaon: Rs 2400 per quintal");
    }

    #[test]
    fn test_navigation_lists_every_route() {
        let prompt = navigation("mandi ka bhav dikhao", "/my-farms", Language::Hi);
        for route in NAVIGATION_ROUTES {
            assert!(prompt.contains(route));
        }
    }
}
