//! Agroforestry Planner
//!
//! Turns a handful of site observations (location, soil chemistry, climate,
//! land area, capital available) into a multi-layer agroforestry and cropping
//! plan with an economic and sustainability forecast.
//!
//! Pipeline, leaf-first:
//! - `input`: normalize raw attributes into a typed `FarmInput`
//! - `classify/`: farm size, soil and rainfall tiers; soil/climate profiles
//! - `catalog/`: tier-keyed species bundles and the selector
//! - `economics`: investment, income, ROI and payback
//! - `sustainability`: soil, water, carbon and resilience indicators
//! - `plan`: assemble everything into an `AgroforestryPlan`
//! - `planner`: the end-to-end run, including provider fetches
//! - `providers/`: soil and climate data sources with retry/timeout

pub mod error;
pub mod config;
pub mod utils;
pub mod input;
pub mod classify;
pub mod catalog;
pub mod economics;
pub mod sustainability;
pub mod plan;
pub mod providers;
pub mod planner;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use error::{Degradation, PlanError, PlanResult};
pub use config::PlannerConfig;
pub use input::{normalize, FarmInput, RawFarmInput};
pub use classify::{classify, InvestmentCapacity, Tier};
pub use catalog::{Catalog, RecommendedSystem};
pub use economics::{EconomicProjection, PaybackPeriod};
pub use sustainability::SustainabilityMetrics;
pub use plan::AgroforestryPlan;
pub use planner::Planner;

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
