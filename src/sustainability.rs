//! Sustainability Scorer
//!
//! Pure function of tier and land area. Percentage ranges come from fixed
//! tables keyed by soil and rainfall tier; ratings combine on the five-point
//! scale in `utils::ratings`.

use serde::{Deserialize, Serialize};

use crate::classify::{FarmSizeTier, RainfallTier, SoilTier, Tier};
use crate::utils::{mean_rating, Rating};

/// Inclusive percentage range, e.g. 15-25%
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRange {
    pub min_pct: f64,
    pub max_pct: f64,
}

impl PercentRange {
    const fn new(min_pct: f64, max_pct: f64) -> Self {
        Self { min_pct, max_pct }
    }

    pub fn label(&self) -> String {
        format!("{}-{}%", self.min_pct, self.max_pct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonEstimate {
    pub tonnes_co2_per_year: f64,
    pub tonnes_co2_per_acre_year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityMetrics {
    /// Expected rise in soil organic matter over five years
    pub soil_health_increase: PercentRange,
    /// Irrigation saved relative to open-field cropping
    pub water_savings: PercentRange,
    pub carbon_sequestration_potential: CarbonEstimate,
    pub biodiversity_score: Rating,
    pub climate_resilience: Rating,
}

// Degraded soils respond most to tree litter and root biomass
fn soil_health_increase(soil: SoilTier) -> PercentRange {
    match soil {
        SoilTier::Sandy => PercentRange::new(20.0, 30.0),
        SoilTier::Loamy => PercentRange::new(15.0, 25.0),
        SoilTier::Silty => PercentRange::new(15.0, 25.0),
        SoilTier::Clay => PercentRange::new(10.0, 20.0),
    }
}

fn water_savings(rainfall: RainfallTier) -> PercentRange {
    match rainfall {
        RainfallTier::Low => PercentRange::new(25.0, 35.0),
        RainfallTier::Moderate => PercentRange::new(20.0, 30.0),
        RainfallTier::High => PercentRange::new(10.0, 20.0),
    }
}

/// Tonnes CO2 per acre per year; larger farms carry denser timber blocks
fn carbon_rate(size: FarmSizeTier) -> f64 {
    match size {
        FarmSizeTier::Small => 2.5,
        FarmSizeTier::Medium => 3.0,
        FarmSizeTier::Large => 3.5,
    }
}

fn biodiversity(size: FarmSizeTier) -> Rating {
    match size {
        FarmSizeTier::Small => Rating::Moderate,
        FarmSizeTier::Medium => Rating::High,
        FarmSizeTier::Large => Rating::VeryHigh,
    }
}

fn soil_buffer(soil: SoilTier) -> Rating {
    match soil {
        SoilTier::Loamy => Rating::High,
        SoilTier::Silty | SoilTier::Clay => Rating::Moderate,
        SoilTier::Sandy => Rating::Low,
    }
}

fn water_security(rainfall: RainfallTier) -> Rating {
    match rainfall {
        RainfallTier::Low => Rating::Low,
        RainfallTier::Moderate => Rating::High,
        // Waterlogging risk offsets the reliable supply
        RainfallTier::High => Rating::Moderate,
    }
}

pub fn score(tier: Tier, land_area_acres: f64) -> SustainabilityMetrics {
    let rate = carbon_rate(tier.farm_size);
    let biodiversity_score = biodiversity(tier.farm_size);

    let components = [biodiversity_score, soil_buffer(tier.soil), water_security(tier.rainfall)];
    let climate_resilience = mean_rating(&components)
        .map(|(_, rating)| rating)
        .unwrap_or(Rating::Moderate);

    let metrics = SustainabilityMetrics {
        soil_health_increase: soil_health_increase(tier.soil),
        water_savings: water_savings(tier.rainfall),
        carbon_sequestration_potential: CarbonEstimate {
            tonnes_co2_per_year: land_area_acres * rate,
            tonnes_co2_per_acre_year: rate,
        },
        biodiversity_score,
        climate_resilience,
    };

    tracing::debug!(?tier, resilience = ?metrics.climate_resilience, "Sustainability scored");
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_medium_loamy_moderate() {
        let tier = Tier::new(FarmSizeTier::Medium, SoilTier::Loamy, RainfallTier::Moderate);
        let m = score(tier, 2.5);
        assert_eq!(m.soil_health_increase.label(), "15-25%");
        assert_eq!(m.water_savings.label(), "20-30%");
        assert_relative_eq!(m.carbon_sequestration_potential.tonnes_co2_per_year, 7.5);
        assert_eq!(m.biodiversity_score, Rating::High);
        assert_eq!(m.climate_resilience, Rating::High);
    }

    #[test]
    fn test_dry_sandy_small_farm_is_least_resilient() {
        let tier = Tier::new(FarmSizeTier::Small, SoilTier::Sandy, RainfallTier::Low);
        let m = score(tier, 1.0);
        // (3 + 2 + 2) / 3 = 2.33
        assert_eq!(m.climate_resilience, Rating::Low);
        assert_eq!(m.water_savings.label(), "25-35%");
    }

    #[test]
    fn test_bounded_and_deterministic_over_all_tiers() {
        for tier in Tier::all() {
            let a = score(tier, 3.0);
            let b = score(tier, 3.0);
            assert_eq!(a, b);
            for range in [a.soil_health_increase, a.water_savings] {
                assert!(range.min_pct >= 0.0 && range.max_pct <= 100.0);
                assert!(range.min_pct <= range.max_pct);
            }
            assert!(a.carbon_sequestration_potential.tonnes_co2_per_year > 0.0);
        }
    }
}
