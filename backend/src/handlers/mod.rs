//! HTTP request handlers

pub mod advisory;
pub mod auth;
pub mod community;
pub mod crop_plan;
pub mod diagnosis;
pub mod farm;
pub mod health;
pub mod market_alert;
pub mod profile;
pub mod scheme;

pub use auth::*;
pub use health::*;
