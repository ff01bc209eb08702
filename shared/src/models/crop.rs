//! Crop and variety recommendation models, including year-long planning

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::finance::ProfitSummary;
use crate::models::{FarmDetails, FertilizerPlan};
use crate::types::{Language, Season, SizeUnit};

/// Number of sowing windows every recommendation carries
pub const SOWING_WINDOW_COUNT: usize = 3;

/// Upper bound on recommendations returned per request
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Input costs per size unit, in Rs
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EstimatedCosts {
    pub seed: Decimal,
    pub fertilizer: Decimal,
    pub pesticide: Decimal,
    pub labor: Decimal,
    pub irrigation: Decimal,
}

impl EstimatedCosts {
    pub fn total(&self) -> Decimal {
        self.seed + self.fertilizer + self.pesticide + self.labor + self.irrigation
    }

    pub fn has_negative(&self) -> bool {
        [self.seed, self.fertilizer, self.pesticide, self.labor, self.irrigation]
            .iter()
            .any(|c| c.is_sign_negative() && !c.is_zero())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropOverview {
    pub best_season: String,
    pub harvest_duration: String,
    pub recommended_land_type: String,
    pub seed_rate: String,
    pub irrigation_needs: String,
    pub estimated_water_usage: String,
    pub seed_treatment: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SowingWindow {
    /// e.g. "July 15 - July 25"
    pub date_range: String,
    pub risk_level: RiskLevel,
    /// Whether sowing in this window is typically covered by PMFBY insurance
    pub is_pmfby_eligible: bool,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub week: String,
    pub activity: String,
}

/// Field-level plan for growing a crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionPlan {
    pub land_preparation: Vec<String>,
    pub seed_selection: Vec<String>,
    pub irrigation_schedule: String,
    pub spraying_schedule: String,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropRecommendation {
    pub crop_name: String,
    #[serde(default)]
    pub is_best_fit: bool,
    pub description: String,
    pub reason: String,
    pub sowing_month: String,
    pub estimated_duration: String,
    pub market_suitability: String,
    pub crop_overview: CropOverview,
    pub sowing_windows: Vec<SowingWindow>,
    pub pmfby_reminder: String,
    pub plan: ActionPlan,
    pub estimated_costs: EstimatedCosts,
    /// kg per size unit
    pub estimated_yield: Decimal,
    /// Rs per kg
    pub estimated_selling_price: Decimal,
}

impl CropRecommendation {
    /// Profit per size unit implied by the estimates
    pub fn profit(&self) -> ProfitSummary {
        ProfitSummary::from_estimates(
            &self.estimated_costs,
            self.estimated_yield,
            self.estimated_selling_price,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropRecommendationRequest {
    pub farm: FarmDetails,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarietyRecommendationRequest {
    pub farm: FarmDetails,
    pub crop_name: String,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropRecommendationOutput {
    pub recommendations: Vec<CropRecommendation>,
}

impl CropRecommendationOutput {
    /// Reject structurally unusable model output
    pub fn check_shape(&self) -> Result<(), String> {
        if self.recommendations.is_empty() {
            return Err("no recommendations returned".to_string());
        }
        for rec in &self.recommendations {
            if rec.crop_name.trim().is_empty() {
                return Err("recommendation without a crop name".to_string());
            }
            if rec.sowing_windows.len() != SOWING_WINDOW_COUNT {
                return Err(format!(
                    "{} has {} sowing windows, expected {}",
                    rec.crop_name,
                    rec.sowing_windows.len(),
                    SOWING_WINDOW_COUNT
                ));
            }
            if rec.estimated_costs.has_negative()
                || rec.estimated_yield.is_sign_negative() && !rec.estimated_yield.is_zero()
            {
                return Err(format!("{} has negative estimates", rec.crop_name));
            }
        }
        Ok(())
    }

    /// Keep at most [`MAX_RECOMMENDATIONS`] and exactly one best fit.
    ///
    /// The first recommendation the model flagged wins; when none is flagged
    /// the most profitable one is promoted.
    pub fn normalize(&mut self) {
        self.recommendations.truncate(MAX_RECOMMENDATIONS);
        let chosen = self
            .recommendations
            .iter()
            .position(|r| r.is_best_fit)
            .or_else(|| most_profitable(self.recommendations.iter().map(|r| r.profit().net_profit)));
        for (i, rec) in self.recommendations.iter_mut().enumerate() {
            rec.is_best_fit = Some(i) == chosen;
        }
    }

    pub fn best_fit(&self) -> Option<&CropRecommendation> {
        self.recommendations.iter().find(|r| r.is_best_fit)
    }
}

/// First stage of the market-aware recommendation: crops worth pricing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateCrops {
    pub candidates: Vec<String>,
}

// ============================================================================
// Year-long planning
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearLongPlannerRequest {
    /// e.g. "Pune, Maharashtra"
    pub location: String,
    /// Month the cycle starts, e.g. "July"
    pub start_month: String,
    pub land_area: Decimal,
    pub land_area_unit: SizeUnit,
    pub soil_type: String,
    pub irrigation: Vec<String>,
    #[serde(default)]
    pub preferred_crops: Vec<String>,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropCycleRecommendation {
    pub crop_name: String,
    #[serde(default)]
    pub variety: Option<String>,
    pub duration: String,
    pub reason: String,
    #[serde(default)]
    pub is_best_fit: bool,
    #[serde(default)]
    pub estimated_costs: Option<EstimatedCosts>,
    #[serde(default)]
    pub estimated_yield: Option<Decimal>,
    #[serde(default)]
    pub estimated_selling_price: Option<Decimal>,
}

impl CropCycleRecommendation {
    /// Profit per size unit, when the model supplied all estimates
    pub fn profit(&self) -> Option<ProfitSummary> {
        Some(ProfitSummary::from_estimates(
            self.estimated_costs.as_ref()?,
            self.estimated_yield?,
            self.estimated_selling_price?,
        ))
    }
}

/// Two or three crop options for each season of the year
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct YearLongPlan {
    #[serde(default)]
    pub kharif: Vec<CropCycleRecommendation>,
    #[serde(default)]
    pub rabi: Vec<CropCycleRecommendation>,
    #[serde(default)]
    pub zaid: Vec<CropCycleRecommendation>,
}

impl YearLongPlan {
    pub fn season(&self, season: Season) -> &[CropCycleRecommendation] {
        match season {
            Season::Kharif => &self.kharif,
            Season::Rabi => &self.rabi,
            Season::Zaid => &self.zaid,
        }
    }

    pub fn check_shape(&self) -> Result<(), String> {
        if self.kharif.is_empty() && self.rabi.is_empty() && self.zaid.is_empty() {
            return Err("plan has no crops for any season".to_string());
        }
        Ok(())
    }

    /// Every non-empty season ends up with exactly one best fit
    pub fn normalize(&mut self) {
        for options in [&mut self.kharif, &mut self.rabi, &mut self.zaid] {
            let chosen = options.iter().position(|c| c.is_best_fit).or_else(|| {
                most_profitable(options.iter().map(|c| {
                    c.profit()
                        .map(|p| p.net_profit)
                        .unwrap_or(Decimal::MIN)
                }))
            });
            for (i, option) in options.iter_mut().enumerate() {
                option.is_best_fit = Some(i) == chosen;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearLongFarm {
    pub location: String,
    pub land_area: Decimal,
    pub land_area_unit: SizeUnit,
    pub soil_type: String,
    pub irrigation: Vec<String>,
}

/// A crop and variety the farmer picked for one season
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropCycleChoice {
    pub season: Season,
    pub crop_name: String,
    pub variety: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearLongVarietyPlanRequest {
    pub farm: YearLongFarm,
    pub crop_cycle: Vec<CropCycleChoice>,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyActivity {
    pub month: String,
    pub activity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonalPlan {
    pub season: Season,
    pub crop_name: String,
    pub variety: String,
    pub monthly_timeline: Vec<MonthlyActivity>,
    pub fertilizer_plan: FertilizerPlan,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearLongVarietyPlan {
    pub seasonal_plans: Vec<SeasonalPlan>,
}

impl YearLongVarietyPlan {
    /// Each chosen season must come back with a plan
    pub fn check_covers(&self, cycle: &[CropCycleChoice]) -> Result<(), String> {
        for choice in cycle {
            if !self.seasonal_plans.iter().any(|p| p.season == choice.season) {
                return Err(format!("missing plan for {}", choice.season.label()));
            }
        }
        Ok(())
    }
}

fn most_profitable(profits: impl Iterator<Item = Decimal>) -> Option<usize> {
    profits
        .enumerate()
        .fold(None, |best: Option<(usize, Decimal)>, (i, p)| match best {
            Some((_, b)) if b >= p => best,
            _ => Some((i, p)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommendation(name: &str, yield_kg: i64, price: i64) -> CropRecommendation {
        let window = SowingWindow {
            date_range: "June 15 - June 30".into(),
            risk_level: RiskLevel::Low,
            is_pmfby_eligible: true,
            description: "Early monsoon".into(),
        };
        CropRecommendation {
            crop_name: name.into(),
            is_best_fit: false,
            description: String::new(),
            reason: String::new(),
            sowing_month: "June".into(),
            estimated_duration: "110 days".into(),
            market_suitability: String::new(),
            crop_overview: CropOverview {
                best_season: "Kharif".into(),
                harvest_duration: "100-120 days".into(),
                recommended_land_type: "Black soil".into(),
                seed_rate: "30 kg/acre".into(),
                irrigation_needs: "Moderate".into(),
                estimated_water_usage: "~450 mm".into(),
                seed_treatment: "Rhizobium".into(),
            },
            sowing_windows: vec![window.clone(), window.clone(), window],
            pmfby_reminder: String::new(),
            plan: ActionPlan {
                land_preparation: vec![],
                seed_selection: vec![],
                irrigation_schedule: String::new(),
                spraying_schedule: String::new(),
                timeline: vec![],
            },
            estimated_costs: EstimatedCosts {
                seed: Decimal::from(2000),
                fertilizer: Decimal::from(3000),
                pesticide: Decimal::from(1000),
                labor: Decimal::from(5000),
                irrigation: Decimal::from(1000),
            },
            estimated_yield: Decimal::from(yield_kg),
            estimated_selling_price: Decimal::from(price),
        }
    }

    #[test]
    fn test_check_shape_requires_three_windows() {
        let mut output = CropRecommendationOutput {
            recommendations: vec![recommendation("Soybean", 800, 45)],
        };
        assert!(output.check_shape().is_ok());
        output.recommendations[0].sowing_windows.pop();
        let err = output.check_shape().unwrap_err();
        assert!(err.contains("2 sowing windows"));
    }

    #[test]
    fn test_check_shape_rejects_empty() {
        let output = CropRecommendationOutput { recommendations: vec![] };
        assert!(output.check_shape().is_err());
    }

    #[test]
    fn test_normalize_promotes_most_profitable() {
        let mut output = CropRecommendationOutput {
            recommendations: vec![
                recommendation("Soybean", 800, 45),
                recommendation("Cotton", 700, 70),
                recommendation("Maize", 2000, 20),
            ],
        };
        output.normalize();
        assert_eq!(output.best_fit().unwrap().crop_name, "Cotton");
        assert_eq!(output.recommendations.iter().filter(|r| r.is_best_fit).count(), 1);
    }

    #[test]
    fn test_normalize_keeps_single_model_choice_and_truncates() {
        let mut recs: Vec<_> = (0..6).map(|i| recommendation(&format!("c{}", i), 100, 10)).collect();
        recs[1].is_best_fit = true;
        recs[3].is_best_fit = true;
        let mut output = CropRecommendationOutput { recommendations: recs };
        output.normalize();
        assert_eq!(output.recommendations.len(), MAX_RECOMMENDATIONS);
        assert_eq!(output.best_fit().unwrap().crop_name, "c1");
        assert!(!output.recommendations[3].is_best_fit);
    }

    #[test]
    fn test_year_plan_best_fit_per_season() {
        let option = |name: &str, y: Option<i64>| CropCycleRecommendation {
            crop_name: name.into(),
            variety: None,
            duration: "4 months".into(),
            reason: String::new(),
            is_best_fit: false,
            estimated_costs: y.map(|_| EstimatedCosts::default()),
            estimated_yield: y.map(Decimal::from),
            estimated_selling_price: y.map(|_| Decimal::from(10)),
        };
        let mut plan = YearLongPlan {
            kharif: vec![option("Rice", None), option("Soybean", Some(900))],
            rabi: vec![option("Wheat", None)],
            zaid: vec![],
        };
        plan.normalize();
        assert!(plan.kharif[1].is_best_fit);
        assert!(!plan.kharif[0].is_best_fit);
        assert!(plan.rabi[0].is_best_fit);
        assert!(plan.season(Season::Zaid).is_empty());
    }

    #[test]
    fn test_variety_plan_must_cover_cycle() {
        let cycle = vec![CropCycleChoice {
            season: Season::Rabi,
            crop_name: "Wheat".into(),
            variety: "HD-2967".into(),
        }];
        let plan = YearLongVarietyPlan { seasonal_plans: vec![] };
        assert_eq!(plan.check_covers(&cycle).unwrap_err(), "missing plan for Rabi");
    }

    #[test]
    fn test_season_accepts_capitalised_names() {
        let choice: CropCycleChoice =
            serde_json::from_str(r#"{"season":"Kharif","crop_name":"Rice","variety":"IR64"}"#).unwrap();
        assert_eq!(choice.season, Season::Kharif);
    }
}
