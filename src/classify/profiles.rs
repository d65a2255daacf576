//! Soil and climate profiles derived from a farm's observations.

use serde::{Deserialize, Serialize};

use super::texture::{Drainage, TextureFractions, UsdaTextureClass};
use super::tiers::RainfallTier;
use crate::input::{ClimateObservation, SoilObservation};

/// Soil chemistry plus derived texture and drainage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub ph: Option<f64>,
    pub organic_carbon: Option<f64>,
    pub nitrogen: Option<f64>,
    pub cec: Option<f64>,
    pub sand_pct: Option<f64>,
    pub silt_pct: Option<f64>,
    pub clay_pct: Option<f64>,

    /// USDA texture class name, or "Unknown"
    pub texture_class: String,

    pub drainage: Drainage,

    /// Plain-language summary of what the soil needs
    pub recommendation: String,
}

/// Rainfall band plus a short suitability note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateProfile {
    pub avg_rainfall_mm: Option<f64>,
    pub avg_temperature_c: Option<f64>,
    pub solar_radiation: Option<f64>,
    pub rainfall_band: RainfallTier,
    pub suitability_note: String,
}

/// pH below this is treated as acidic
const ACIDIC_PH: f64 = 5.5;

/// pH above this is treated as alkaline
const ALKALINE_PH: f64 = 8.0;

/// Organic carbon (%) below this is considered depleted
const LOW_ORGANIC_CARBON: f64 = 0.5;

pub fn build_soil_profile(soil: &SoilObservation) -> SoilProfile {
    let texture = TextureFractions::from_observation(soil).map(|f| UsdaTextureClass::classify(&f));

    let mut advice: Vec<String> = Vec::new();
    match texture {
        Some(class) => advice.push(format!("{} soil. {}.", class.display_name(), class.advice())),
        None => advice.push("Texture not measured; a simple jar test will tell sand, silt and clay apart.".to_string()),
    }

    if let Some(ph) = soil.ph {
        if ph < ACIDIC_PH {
            advice.push(format!("pH {:.1} is acidic; apply agricultural lime before planting.", ph));
        } else if ph > ALKALINE_PH {
            advice.push(format!("pH {:.1} is alkaline; gypsum and compost will help.", ph));
        } else {
            advice.push(format!("pH {:.1} suits most trees and crops.", ph));
        }
    }

    if let Some(oc) = soil.organic_carbon {
        if oc < LOW_ORGANIC_CARBON {
            advice.push(format!("Organic carbon {:.2}% is low; build it with green manure and mulch.", oc));
        }
    }

    SoilProfile {
        ph: soil.ph,
        organic_carbon: soil.organic_carbon,
        nitrogen: soil.nitrogen,
        cec: soil.cec,
        sand_pct: soil.sand_pct,
        silt_pct: soil.silt_pct,
        clay_pct: soil.clay_pct,
        texture_class: texture.map(|c| c.display_name()).unwrap_or("Unknown").to_string(),
        drainage: texture.map(|c| c.drainage()).unwrap_or(Drainage::Moderate),
        recommendation: advice.join(" "),
    }
}

pub fn build_climate_profile(climate: &ClimateObservation, band: RainfallTier) -> ClimateProfile {
    let mut note = match band {
        RainfallTier::Low => {
            "Dry conditions; favour drought-tolerant trees and pulses, and harvest rainwater in farm ponds.".to_string()
        }
        RainfallTier::Moderate => {
            "Moderate rainfall supports a mixed tree-crop system with protective irrigation in the dry season.".to_string()
        }
        RainfallTier::High => {
            "High rainfall suits dense multi-strata systems; plan drainage and guard against fungal disease.".to_string()
        }
    };

    if let Some(temp) = climate.avg_temperature_c {
        if temp > 30.0 {
            note.push_str(" High temperatures make canopy shade valuable for understory crops.");
        } else if temp < 15.0 {
            note.push_str(" Cool temperatures slow tree establishment; choose hardy species.");
        }
    }

    ClimateProfile {
        avg_rainfall_mm: climate.avg_rainfall_mm,
        avg_temperature_c: climate.avg_temperature_c,
        solar_radiation: climate.solar_radiation,
        rainfall_band: band,
        suitability_note: note,
    }
}
