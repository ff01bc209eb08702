//! Plant disease diagnosis, saved reports and pest forecasts

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{FarmDetails, Supplier};
use crate::types::Language;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentOption {
    pub solution_name: String,
    pub application_method: String,
    pub safety_warning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleStep {
    pub week: String,
    pub activity: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    #[serde(default)]
    pub organic: Vec<TreatmentOption>,
    #[serde(default)]
    pub inorganic: Vec<TreatmentOption>,
    #[serde(default)]
    pub schedule: Vec<ScheduleStep>,
}

/// A store where remedies can be bought
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorRecommendation {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

impl From<Supplier> for VendorRecommendation {
    fn from(s: Supplier) -> Self {
        Self {
            name: s.name,
            address: s.address,
            phone: s.phone.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisRequest {
    pub farm_id: Uuid,
    pub symptoms: Option<String>,
    /// "data:<mime>;base64,<payload>"
    pub photo_data_uri: Option<String>,
    pub language: Option<Language>,
}

/// One candidate disease
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseDiagnosis {
    pub disease_name: String,
    /// 0-100
    pub confidence: Decimal,
    pub description: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub treatment: Treatment,
    #[serde(default)]
    pub vendor_recommendations: Vec<VendorRecommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisOutput {
    pub diagnosis: Vec<DiseaseDiagnosis>,
}

impl DiagnosisOutput {
    pub fn check_shape(&self) -> Result<(), String> {
        if self.diagnosis.is_empty() {
            return Err("no diagnosis returned".to_string());
        }
        Ok(())
    }

    /// Clamp confidences into 0-100, order most likely first and attach the
    /// real vendor list in place of anything the model produced
    pub fn finalize(&mut self, vendors: &[VendorRecommendation]) {
        let hundred = Decimal::from(100);
        for d in &mut self.diagnosis {
            d.confidence = d.confidence.clamp(Decimal::ZERO, hundred);
            d.vendor_recommendations = vendors.to_vec();
        }
        self.diagnosis
            .sort_by(|a, b| b.confidence.cmp(&a.confidence));
    }
}

/// A diagnosis the farmer chose to keep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub farm_id: Uuid,
    pub crop: String,
    pub image_url: Option<String>,
    pub symptoms: Option<String>,
    pub selected_disease: String,
    pub ai_confidence: Decimal,
    pub selected_treatment: Treatment,
    pub vendor_recommendations: Vec<VendorRecommendation>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Pest and disease forecast
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PestForecastRequest {
    pub farm: FarmDetails,
    pub crop_name: String,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ThreatKind {
    Pest,
    Disease,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PreventativeMeasures {
    #[serde(default)]
    pub organic: Vec<String>,
    #[serde(default)]
    pub chemical: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Threat {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ThreatKind,
    pub symptoms: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub preventative_measures: PreventativeMeasures,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PestForecast {
    pub threats: Vec<Threat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnosis(name: &str, confidence: i64) -> DiseaseDiagnosis {
        DiseaseDiagnosis {
            disease_name: name.into(),
            confidence: Decimal::from(confidence),
            description: String::new(),
            symptoms: vec![],
            treatment: Treatment::default(),
            vendor_recommendations: vec![VendorRecommendation {
                name: "Invented Agro".into(),
                address: "Nowhere".into(),
                phone: String::new(),
            }],
        }
    }

    #[test]
    fn test_finalize_clamps_sorts_and_replaces_vendors() {
        let mut output = DiagnosisOutput {
            diagnosis: vec![diagnosis("Leaf spot", 40), diagnosis("Blight", 130), diagnosis("Rust", -5)],
        };
        let vendors = vec![VendorRecommendation::from(Supplier {
            name: "Kisan Seva Kendra".into(),
            address: "Market Yard, Nashik".into(),
            phone: None,
        })];
        output.finalize(&vendors);

        let names: Vec<_> = output.diagnosis.iter().map(|d| d.disease_name.as_str()).collect();
        assert_eq!(names, vec!["Blight", "Leaf spot", "Rust"]);
        assert_eq!(output.diagnosis[0].confidence, Decimal::from(100));
        assert_eq!(output.diagnosis[2].confidence, Decimal::ZERO);
        assert!(output.diagnosis.iter().all(|d| d.vendor_recommendations == vendors));
    }

    #[test]
    fn test_threat_type_field_name() {
        let threat: Threat = serde_json::from_str(
            r#"{"name":"Aphids","type":"Pest","symptoms":"Curling leaves","preventative_measures":{"organic":["Neem oil 5ml/L"]}}"#,
        )
        .unwrap();
        assert_eq!(threat.kind, ThreatKind::Pest);
        assert!(threat.preventative_measures.chemical.is_empty());
    }
}
