//! Domain models for the Krishak Mitra platform

mod alert;
mod assistant;
mod community;
mod crop;
mod crop_plan;
mod diagnosis;
mod farm;
mod market;
mod nutrient;
mod profile;
mod scheme;

pub use alert::*;
pub use assistant::*;
pub use community::*;
pub use crop::*;
pub use crop_plan::*;
pub use diagnosis::*;
pub use farm::*;
pub use market::*;
pub use nutrient::*;
pub use profile::*;
pub use scheme::*;
