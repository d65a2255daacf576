//! Tier Classification
//!
//! Maps continuous farm observations onto the small discrete tiers used as
//! the catalog key. Every valid `FarmInput` maps to exactly one `Tier`:
//! missing soil or rainfall data falls back to `Loamy` / `Moderate` and is
//! reported as a degradation rather than an error.

use serde::{Deserialize, Serialize};

use super::texture::TextureFractions;
use crate::error::Degradation;
use crate::input::FarmInput;

/// Farm size tiers (acres)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarmSizeTier {
    /// Under 2 acres
    Small,

    /// 2 to 5 acres, both bounds inclusive
    Medium,

    /// Over 5 acres
    Large,
}

impl FarmSizeTier {
    pub const MEDIUM_LOWER_ACRES: f64 = 2.0;
    pub const MEDIUM_UPPER_ACRES: f64 = 5.0;

    pub fn from_acres(acres: f64) -> Self {
        if acres < Self::MEDIUM_LOWER_ACRES {
            FarmSizeTier::Small
        } else if acres <= Self::MEDIUM_UPPER_ACRES {
            FarmSizeTier::Medium
        } else {
            FarmSizeTier::Large
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FarmSizeTier::Small => "Small (under 2 acres)",
            FarmSizeTier::Medium => "Medium (2-5 acres)",
            FarmSizeTier::Large => "Large (over 5 acres)",
        }
    }

    pub fn all() -> &'static [FarmSizeTier] {
        &[FarmSizeTier::Small, FarmSizeTier::Medium, FarmSizeTier::Large]
    }
}

/// Soil tiers used for the catalog key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilTier {
    Sandy,
    Loamy,
    Clay,
    Silty,
}

impl SoilTier {
    /// Minimum share (percent of the rescaled total) for a fraction to dominate
    const SAND_DOMINANT_PCT: f64 = 50.0;
    const SILT_DOMINANT_PCT: f64 = 50.0;
    const CLAY_DOMINANT_PCT: f64 = 40.0;

    /// Parse an explicit soil type label ("sandy", "Loam", "clay", ...)
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "sandy" | "sand" => Some(SoilTier::Sandy),
            "loamy" | "loam" => Some(SoilTier::Loamy),
            "clay" | "clayey" => Some(SoilTier::Clay),
            "silty" | "silt" => Some(SoilTier::Silty),
            _ => None,
        }
    }

    /// Derive the tier from the dominant texture fraction.
    ///
    /// A fraction is a candidate only when it reaches its dominance share
    /// (sand 50%, silt 50%, clay 40%); the largest candidate wins, with ties
    /// resolved clay > silty > sandy. A balanced mix with no dominant
    /// fraction is loamy.
    pub fn from_fractions(fractions: &TextureFractions) -> Self {
        // Ordered by tie-break priority: earlier entries win on equal shares
        let candidates = [
            (SoilTier::Clay, fractions.clay, Self::CLAY_DOMINANT_PCT),
            (SoilTier::Silty, fractions.silt, Self::SILT_DOMINANT_PCT),
            (SoilTier::Sandy, fractions.sand, Self::SAND_DOMINANT_PCT),
        ];

        let mut dominant: Option<(SoilTier, f64)> = None;
        for (tier, share, threshold) in candidates {
            if share < threshold {
                continue;
            }
            match dominant {
                Some((_, best)) if share <= best => {}
                _ => dominant = Some((tier, share)),
            }
        }

        dominant.map(|(tier, _)| tier).unwrap_or(SoilTier::Loamy)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SoilTier::Sandy => "Sandy",
            SoilTier::Loamy => "Loamy",
            SoilTier::Clay => "Clay",
            SoilTier::Silty => "Silty",
        }
    }

    pub fn all() -> &'static [SoilTier] {
        &[SoilTier::Sandy, SoilTier::Loamy, SoilTier::Clay, SoilTier::Silty]
    }
}

/// Annual rainfall bands (mm)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainfallTier {
    /// Under 500 mm
    Low,

    /// 500 to 1000 mm, both bounds inclusive
    Moderate,

    /// Over 1000 mm
    High,
}

impl RainfallTier {
    pub const MODERATE_LOWER_MM: f64 = 500.0;
    pub const MODERATE_UPPER_MM: f64 = 1000.0;

    pub fn from_rainfall_mm(mm: f64) -> Self {
        if mm < Self::MODERATE_LOWER_MM {
            RainfallTier::Low
        } else if mm <= Self::MODERATE_UPPER_MM {
            RainfallTier::Moderate
        } else {
            RainfallTier::High
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RainfallTier::Low => "Low (under 500 mm)",
            RainfallTier::Moderate => "Moderate (500-1000 mm)",
            RainfallTier::High => "High (over 1000 mm)",
        }
    }

    pub fn all() -> &'static [RainfallTier] {
        &[RainfallTier::Low, RainfallTier::Moderate, RainfallTier::High]
    }
}

/// Capital the farmer can commit up front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentCapacity {
    Low,
    #[default]
    Medium,
    High,
}

impl InvestmentCapacity {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(InvestmentCapacity::Low),
            "medium" | "moderate" => Some(InvestmentCapacity::Medium),
            "high" => Some(InvestmentCapacity::High),
            _ => None,
        }
    }

    /// Budget band shown to the farmer (INR)
    pub fn budget_label(&self) -> &'static str {
        match self {
            InvestmentCapacity::Low => "0-50,000",
            InvestmentCapacity::Medium => "50,000-1,00,000",
            InvestmentCapacity::High => "1,00,000+",
        }
    }
}

/// Catalog key: one farm size, soil and rainfall tier per farm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tier {
    pub farm_size: FarmSizeTier,
    pub soil: SoilTier,
    pub rainfall: RainfallTier,
}

impl Tier {
    pub fn new(farm_size: FarmSizeTier, soil: SoilTier, rainfall: RainfallTier) -> Self {
        Self { farm_size, soil, rainfall }
    }

    /// Every tier combination (3 × 4 × 3)
    pub fn all() -> Vec<Tier> {
        let mut tiers = Vec::with_capacity(36);
        for &farm_size in FarmSizeTier::all() {
            for &soil in SoilTier::all() {
                for &rainfall in RainfallTier::all() {
                    tiers.push(Tier::new(farm_size, soil, rainfall));
                }
            }
        }
        tiers
    }
}

/// Classify a farm. Total over valid inputs; degradations are discarded.
pub fn classify(input: &FarmInput) -> Tier {
    classify_with_notes(input).0
}

/// Classify a farm, reporting every default that had to be substituted.
pub fn classify_with_notes(input: &FarmInput) -> (Tier, Vec<Degradation>) {
    let mut notes = Vec::new();

    let farm_size = FarmSizeTier::from_acres(input.land_area_acres);

    let soil = match input.soil_tier {
        Some(explicit) => explicit,
        None => match TextureFractions::from_observation(&input.soil) {
            Some(fractions) => SoilTier::from_fractions(&fractions),
            None => {
                notes.push(Degradation::new("soil_texture", "soil texture unknown; assumed loamy"));
                SoilTier::Loamy
            }
        },
    };

    let rainfall = match input.climate.avg_rainfall_mm {
        Some(mm) => RainfallTier::from_rainfall_mm(mm),
        None => {
            notes.push(Degradation::new("avg_rainfall_mm", "rainfall unknown; assumed moderate"));
            RainfallTier::Moderate
        }
    };

    (Tier::new(farm_size, soil, rainfall), notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FarmInput;

    fn fractions(sand: f64, silt: f64, clay: f64) -> TextureFractions {
        TextureFractions::new(sand, silt, clay).unwrap()
    }

    #[test]
    fn test_farm_size_boundaries() {
        assert_eq!(FarmSizeTier::from_acres(1.999), FarmSizeTier::Small);
        assert_eq!(FarmSizeTier::from_acres(2.0), FarmSizeTier::Medium);
        assert_eq!(FarmSizeTier::from_acres(5.0), FarmSizeTier::Medium);
        assert_eq!(FarmSizeTier::from_acres(5.001), FarmSizeTier::Large);
        assert_eq!(FarmSizeTier::from_acres(0.01), FarmSizeTier::Small);
    }

    #[test]
    fn test_rainfall_boundaries() {
        assert_eq!(RainfallTier::from_rainfall_mm(499.9), RainfallTier::Low);
        assert_eq!(RainfallTier::from_rainfall_mm(500.0), RainfallTier::Moderate);
        assert_eq!(RainfallTier::from_rainfall_mm(1000.0), RainfallTier::Moderate);
        assert_eq!(RainfallTier::from_rainfall_mm(1000.1), RainfallTier::High);
        assert_eq!(RainfallTier::from_rainfall_mm(0.0), RainfallTier::Low);
    }

    #[test]
    fn test_dominant_fraction() {
        assert_eq!(SoilTier::from_fractions(&fractions(80.0, 10.0, 10.0)), SoilTier::Sandy);
        assert_eq!(SoilTier::from_fractions(&fractions(10.0, 70.0, 20.0)), SoilTier::Silty);
        assert_eq!(SoilTier::from_fractions(&fractions(20.0, 30.0, 50.0)), SoilTier::Clay);
        // Balanced mix
        assert_eq!(SoilTier::from_fractions(&fractions(40.0, 40.0, 20.0)), SoilTier::Loamy);
    }

    #[test]
    fn test_tie_break_prefers_heavier_soil() {
        // Sand and silt tied above threshold -> silty
        assert_eq!(SoilTier::from_fractions(&fractions(50.0, 50.0, 0.0)), SoilTier::Silty);
        // Silt and clay tied -> clay
        assert_eq!(SoilTier::from_fractions(&fractions(0.0, 50.0, 50.0)), SoilTier::Clay);
        // Sand and clay tied -> clay
        assert_eq!(SoilTier::from_fractions(&fractions(50.0, 0.0, 50.0)), SoilTier::Clay);
    }

    #[test]
    fn test_explicit_soil_tier_wins() {
        let input = FarmInput::at(12.0, 77.0, 3.0)
            .with_texture(80.0, 10.0, 10.0)
            .with_soil_tier(SoilTier::Clay)
            .with_rainfall(700.0);
        assert_eq!(classify(&input).soil, SoilTier::Clay);
    }

    #[test]
    fn test_missing_data_falls_back() {
        let input = FarmInput::at(12.0, 77.0, 1.0);
        let (tier, notes) = classify_with_notes(&input);
        assert_eq!(tier, Tier::new(FarmSizeTier::Small, SoilTier::Loamy, RainfallTier::Moderate));
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().any(|n| n.message == "soil texture unknown; assumed loamy"));
    }

    #[test]
    fn test_classification_is_total() {
        let areas = [0.001, 1.0, 1.999, 2.0, 3.3, 5.0, 5.001, 40.0, 10_000.0];
        let rains = [None, Some(0.0), Some(499.9), Some(500.0), Some(1000.0), Some(4000.0)];
        let textures = [
            None,
            Some((0.0, 0.0, 0.0)),
            Some((100.0, 0.0, 0.0)),
            Some((33.3, 33.3, 33.4)),
            Some((10.0, 10.0, 10.0)),
            Some((200.0, 50.0, 50.0)),
        ];

        for &acres in &areas {
            for rain in rains {
                for texture in textures {
                    let mut input = FarmInput::at(0.0, 0.0, acres);
                    if let Some((sand, silt, clay)) = texture {
                        input = input.with_texture(sand, silt, clay);
                    }
                    input.climate.avg_rainfall_mm = rain;
                    let tier = classify(&input);
                    assert!(Tier::all().contains(&tier));
                }
            }
        }
    }

    #[test]
    fn test_all_tiers() {
        let tiers = Tier::all();
        assert_eq!(tiers.len(), 36);
    }
}
