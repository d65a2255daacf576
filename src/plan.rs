//! Plan Assembler
//!
//! Composes the stage outputs into one `AgroforestryPlan`. Guidance text comes
//! from fixed templates keyed by soil and rainfall tier; nothing here changes
//! a number computed upstream.

use serde::{Deserialize, Serialize};

use crate::catalog::{LayoutTemplate, Plantable, RecommendedSystem};
use crate::classify::{ClimateProfile, InvestmentCapacity, RainfallTier, SoilProfile, SoilTier, Tier};
use crate::economics::{EconomicProjection, PaybackPeriod};
use crate::error::Degradation;
use crate::sustainability::SustainabilityMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Nearest reference region, or "Unmapped location"
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub pattern: String,
    pub description: String,
    pub tree_spacing: String,
    pub crop_spacing: String,
}

/// A complete recommendation for one farm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgroforestryPlan {
    pub farm_location: FarmLocation,
    pub land_area_acres: f64,
    pub investment_capacity: InvestmentCapacity,
    /// Budget band shown to the farmer, e.g. "50,000-1,00,000"
    pub budget_range: String,
    pub tier: Tier,
    pub soil_profile: SoilProfile,
    pub climate_profile: ClimateProfile,
    pub system: RecommendedSystem,
    pub layout: LayoutPlan,
    pub economics: EconomicProjection,
    pub sustainability: SustainabilityMetrics,
    pub soil_improvement_tips: Vec<String>,
    pub next_steps: Vec<String>,
    /// Defaults substituted during the run
    pub degradations: Vec<Degradation>,
}

/// Everything the assembler needs, already computed
#[derive(Debug, Clone)]
pub struct PlanParts {
    pub location: FarmLocation,
    pub land_area_acres: f64,
    pub investment_capacity: InvestmentCapacity,
    pub tier: Tier,
    pub soil_profile: SoilProfile,
    pub climate_profile: ClimateProfile,
    pub system: RecommendedSystem,
    pub layout: LayoutTemplate,
    pub economics: EconomicProjection,
    pub sustainability: SustainabilityMetrics,
    pub degradations: Vec<Degradation>,
}

fn spacing_summary<'a>(items: impl Iterator<Item = &'a dyn Plantable>) -> String {
    items
        .map(|p| format!("{}: {}", p.name(), p.spacing()))
        .collect::<Vec<_>>()
        .join("; ")
}

fn layout_plan(template: &LayoutTemplate, system: &RecommendedSystem) -> LayoutPlan {
    LayoutPlan {
        pattern: template.pattern.clone(),
        description: template.description.clone(),
        tree_spacing: spacing_summary(system.canopy_trees.iter().map(|s| s.as_plantable())),
        crop_spacing: spacing_summary(
            system
                .combinations
                .iter()
                .map(|c| &c.main_crop as &dyn Plantable),
        ),
    }
}

fn soil_tier_tips(soil: SoilTier) -> &'static [&'static str] {
    match soil {
        SoilTier::Sandy => &[
            "Mulch heavily around young trees to hold moisture",
            "Add farmyard manure or compost every season to build water holding capacity",
            "Grow green manure crops such as sunhemp before the main crop",
        ],
        SoilTier::Loamy => &[
            "Maintain organic matter with crop residue incorporation",
            "Rotate cereals with pulses to keep nitrogen balanced",
        ],
        SoilTier::Clay => &[
            "Plant on raised beds or ridges to avoid waterlogging",
            "Work in organic matter to improve structure and drainage",
            "Avoid tillage when the soil is wet",
        ],
        SoilTier::Silty => &[
            "Keep the surface covered to prevent crusting and erosion",
            "Use contour bunds on slopes",
        ],
    }
}

fn soil_improvement_tips(tier: Tier, soil: &SoilProfile) -> Vec<String> {
    let mut tips: Vec<String> = soil_tier_tips(tier.soil).iter().map(|t| t.to_string()).collect();

    if let Some(ph) = soil.ph {
        if ph < 5.5 {
            tips.push("Apply agricultural lime to raise pH before planting trees".to_string());
        } else if ph > 8.0 {
            tips.push("Apply gypsum and organic matter to reduce alkalinity".to_string());
        }
    }
    if soil.organic_carbon.is_some_and(|oc| oc < 0.5) {
        tips.push("Prune nitrogen-fixing understory trees regularly and use the loppings as mulch".to_string());
    }

    tips
}

fn rainfall_step(rainfall: RainfallTier) -> &'static str {
    match rainfall {
        RainfallTier::Low => "Dig farm ponds or trenches to harvest monsoon runoff before planting",
        RainfallTier::Moderate => "Arrange protective irrigation for tree saplings through the first dry season",
        RainfallTier::High => "Lay out drainage channels along tree rows before the monsoon",
    }
}

fn next_steps(parts: &PlanParts) -> Vec<String> {
    let mut steps = vec![
        "Get a soil test from the nearest Krishi Vigyan Kendra to confirm nutrient levels".to_string(),
        rainfall_step(parts.tier.rainfall).to_string(),
    ];

    if let Some(first) = parts.system.canopy_trees.first() {
        steps.push(format!(
            "Source certified {} saplings from a government nursery",
            first.name().to_lowercase()
        ));
    }
    if let Some(combination) = parts.system.combinations.first() {
        steps.push(format!(
            "Plan the first season around {} ({})",
            combination.name(),
            combination.layout.to_lowercase()
        ));
    }

    steps.push("Check eligibility for the Sub-Mission on Agroforestry and other planting subsidies".to_string());

    if let PaybackPeriod::NotComputable = parts.economics.payback_period {
        steps.push("Review crop choices with an extension officer: the plan shows no marketable income".to_string());
    }

    steps.push("Keep a record of costs and yields to compare against these projections".to_string());
    steps
}

pub fn assemble(parts: PlanParts) -> AgroforestryPlan {
    let layout = layout_plan(&parts.layout, &parts.system);
    let soil_improvement_tips = soil_improvement_tips(parts.tier, &parts.soil_profile);
    let next_steps = next_steps(&parts);

    AgroforestryPlan {
        farm_location: parts.location,
        land_area_acres: parts.land_area_acres,
        investment_capacity: parts.investment_capacity,
        budget_range: parts.investment_capacity.budget_label().to_string(),
        tier: parts.tier,
        soil_profile: parts.soil_profile,
        climate_profile: parts.climate_profile,
        system: parts.system,
        layout,
        economics: parts.economics,
        sustainability: parts.sustainability,
        soil_improvement_tips,
        next_steps,
        degradations: parts.degradations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{select, Catalog};
    use crate::classify::{build_climate_profile, build_soil_profile, classify};
    use crate::config::EconomicsConfig;
    use crate::input::FarmInput;
    use crate::{economics, sustainability};

    fn parts_for(input: &FarmInput) -> PlanParts {
        let catalog = Catalog::builtin();
        let tier = classify(input);
        let system = select(&catalog, tier);
        PlanParts {
            location: FarmLocation {
                latitude: input.latitude,
                longitude: input.longitude,
                region: "Test".to_string(),
            },
            land_area_acres: input.land_area_acres,
            investment_capacity: input.investment_capacity,
            tier,
            soil_profile: build_soil_profile(&input.soil),
            climate_profile: build_climate_profile(&input.climate, tier.rainfall),
            economics: economics::project(input, &system, &EconomicsConfig::default()),
            sustainability: sustainability::score(tier, input.land_area_acres),
            layout: catalog.bundle(tier).layout.clone(),
            system,
            degradations: Vec::new(),
        }
    }

    #[test]
    fn test_layout_spacing_from_species() {
        let input = FarmInput::at(15.8, 75.0, 2.5).with_texture(40.0, 40.0, 20.0).with_rainfall(800.0);
        let plan = assemble(parts_for(&input));
        assert_eq!(plan.layout.pattern, "Multi-strata alley cropping");
        assert_eq!(plan.layout.tree_spacing, "Tamarind Trees: 12m x 12m; Jackfruit Trees: 10m x 10m");
        assert_eq!(plan.layout.crop_spacing, "Sorghum: 45cm x 15cm; Mustard: 30cm rows");
        assert_eq!(plan.budget_range, "50,000-1,00,000");
    }

    #[test]
    fn test_guidance_keyed_by_tiers() {
        let dry_sandy = FarmInput::at(26.2, 73.0, 1.0).with_soil_tier(SoilTier::Sandy).with_rainfall(300.0);
        let plan = assemble(parts_for(&dry_sandy));
        assert!(plan.next_steps[1].contains("farm ponds"));
        assert!(plan.soil_improvement_tips[0].contains("Mulch"));

        let wet_clay = FarmInput::at(10.0, 76.3, 1.0).with_soil_tier(SoilTier::Clay).with_rainfall(3000.0);
        let plan = assemble(parts_for(&wet_clay));
        assert!(plan.next_steps[1].contains("drainage"));
        assert!(plan.soil_improvement_tips[0].contains("raised beds"));
    }

    #[test]
    fn test_acidic_soil_adds_lime_tip() {
        let mut input = FarmInput::at(10.0, 76.3, 1.0).with_texture(55.0, 15.0, 30.0).with_rainfall(3000.0);
        input.soil.ph = Some(5.0);
        let plan = assemble(parts_for(&input));
        assert!(plan.soil_improvement_tips.iter().any(|t| t.contains("lime")));
    }

    #[test]
    fn test_zero_income_adds_review_step() {
        let input = FarmInput::at(15.8, 75.0, 2.5).with_rainfall(800.0);
        let mut parts = parts_for(&input);
        parts.economics.payback_period = PaybackPeriod::NotComputable;
        let plan = assemble(parts);
        assert!(plan.next_steps.iter().any(|s| s.contains("no marketable income")));
    }
}
