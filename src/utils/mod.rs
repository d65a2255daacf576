//! Utility modules shared across the pipeline
//!
//! - Ratings: five-point categorical scale and rating means
//! - Geo: great-circle distance

pub mod ratings;
pub mod geo;

pub use ratings::{mean_rating, Rating};
pub use geo::haversine_km;
