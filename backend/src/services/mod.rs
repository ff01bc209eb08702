//! Business logic services for the Krishak Mitra platform

pub mod advisory;
pub mod auth;
pub mod community;
pub mod crop_plan;
pub mod diagnosis;
pub mod farm;
pub mod market_alert;
pub mod price_alert;
pub mod profile;
pub mod scheme;

pub use advisory::AdvisoryService;
pub use auth::AuthService;
pub use community::CommunityService;
pub use crop_plan::CropPlanService;
pub use diagnosis::DiagnosisService;
pub use farm::FarmService;
pub use market_alert::MarketAlertService;
pub use price_alert::{PgAlertStore, PriceAlertChecker};
pub use profile::ProfileService;
pub use scheme::SchemeService;
