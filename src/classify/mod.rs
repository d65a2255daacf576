//! Tier Classifier
//!
//! Turns a normalized farm input into the discrete tiers that key the
//! recommendation catalog, plus the soil and climate profiles shown to the
//! farmer.
//!
//! - `tiers.rs` - farm size / soil / rainfall / investment tiers and `classify`
//! - `texture.rs` - USDA texture triangle classification and drainage
//! - `profiles.rs` - SoilProfile and ClimateProfile construction

pub mod tiers;
pub mod texture;
pub mod profiles;

pub use tiers::{
    classify, classify_with_notes, FarmSizeTier, InvestmentCapacity, RainfallTier, SoilTier, Tier,
};
pub use texture::{Drainage, TextureFractions, UsdaTextureClass};
pub use profiles::{build_climate_profile, build_soil_profile, ClimateProfile, SoilProfile};
