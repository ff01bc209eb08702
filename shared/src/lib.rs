//! Shared types and models for the Krishak Mitra farmer advisory platform
//!
//! This crate contains types shared between the backend, the browser client
//! (via WASM), and the advisory flows.

pub mod finance;
pub mod location;
pub mod models;
pub mod types;
pub mod validation;

pub use finance::*;
pub use location::*;
pub use models::*;
pub use types::*;
pub use validation::*;
