//! Economic Projector
//!
//! Annual figures for a mature system, in INR.
//!
//! Land allocation:
//! - `tree_share` of the farm goes to canopy trees, split equally between the
//!   canopy species; understory trees are service trees and earn nothing
//! - the remainder is cropped; each seasonal combination uses the whole
//!   cropped area, split `main_crop_share` / `intercrop_share`
//! - ground crops are cover crops and earn nothing
//!
//! Each species income is rounded to whole rupees before it is bucketed, and
//! `expected_income` is summed from those rounded buckets, so
//! `expected_income == sum(crop_income) + sum(tree_income)` holds exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::species::{Crop, Tree};
use crate::catalog::RecommendedSystem;
use crate::config::EconomicsConfig;
use crate::input::FarmInput;

/// Months until income repays the investment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaybackPeriod {
    Months(u32),
    /// Expected income is zero
    NotComputable,
}

impl PaybackPeriod {
    pub fn months(&self) -> Option<u32> {
        match self {
            PaybackPeriod::Months(m) => Some(*m),
            PaybackPeriod::NotComputable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicProjection {
    pub estimated_investment: f64,
    pub expected_income: f64,
    /// (income - investment) / investment
    pub roi_fraction: f64,
    pub payback_period: PaybackPeriod,
    pub crop_income: BTreeMap<String, f64>,
    pub tree_income: BTreeMap<String, f64>,
}

impl EconomicProjection {
    pub fn roi_percent(&self) -> f64 {
        self.roi_fraction * 100.0
    }
}

pub fn estimate_investment(input: &FarmInput, config: &EconomicsConfig) -> f64 {
    let capacity = input.investment_capacity;
    let raw = input.land_area_acres * config.rate_per_acre(capacity);
    config.band(capacity).clamp(raw)
}

fn tree_income(tree: &Tree, acres: f64) -> Option<f64> {
    let yield_kg = tree.yield_kg_per_tree?;
    let price = tree.market_price_per_kg?;
    Some((tree.trees_per_acre() * acres * yield_kg * price).round())
}

fn crop_income(crop: &Crop, acres: f64) -> Option<f64> {
    let yield_kg = crop.yield_kg_per_acre?;
    let price = crop.market_price_per_kg?;
    Some((acres * yield_kg * price).round())
}

fn add(bucket: &mut BTreeMap<String, f64>, name: &str, amount: f64) {
    *bucket.entry(name.to_string()).or_insert(0.0) += amount;
}

pub fn project(input: &FarmInput, system: &RecommendedSystem, config: &EconomicsConfig) -> EconomicProjection {
    let acres = input.land_area_acres;
    let estimated_investment = estimate_investment(input, config);

    let mut trees = BTreeMap::new();
    if !system.canopy_trees.is_empty() {
        let per_species = acres * config.tree_share / system.canopy_trees.len() as f64;
        for tree in system.canopy_trees.iter().filter_map(|s| s.as_tree()) {
            if let Some(amount) = tree_income(tree, per_species) {
                add(&mut trees, &tree.name, amount);
            }
        }
    }

    let cropped = acres * (1.0 - config.tree_share);
    let mut crops = BTreeMap::new();
    for combination in &system.combinations {
        if let Some(amount) = crop_income(&combination.main_crop, cropped * config.main_crop_share) {
            add(&mut crops, &combination.main_crop.name, amount);
        }
        if let Some(amount) = crop_income(&combination.intercrop, cropped * config.intercrop_share) {
            add(&mut crops, &combination.intercrop.name, amount);
        }
    }

    let expected_income = crops.values().sum::<f64>() + trees.values().sum::<f64>();
    let roi_fraction = (expected_income - estimated_investment) / estimated_investment;

    let payback_period = if expected_income > 0.0 {
        let months = libm::floor(12.0 * estimated_investment / expected_income);
        PaybackPeriod::Months(months.min(u32::MAX as f64) as u32)
    } else {
        PaybackPeriod::NotComputable
    };

    tracing::debug!(
        estimated_investment,
        expected_income,
        roi_fraction,
        "Economic projection computed"
    );

    EconomicProjection {
        estimated_investment,
        expected_income,
        roi_fraction,
        payback_period,
        crop_income: crops,
        tree_income: trees,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{select, Catalog};
    use crate::classify::{classify, InvestmentCapacity};
    use approx::assert_relative_eq;

    fn medium_farm() -> FarmInput {
        FarmInput::at(15.8221, 75.0302, 2.5)
            .with_investment(InvestmentCapacity::Medium)
            .with_texture(40.0, 40.0, 20.0)
            .with_rainfall(800.0)
    }

    fn project_for(input: &FarmInput) -> EconomicProjection {
        let catalog = Catalog::builtin();
        let system = select(&catalog, classify(input));
        project(input, &system, &EconomicsConfig::default())
    }

    #[test]
    fn test_medium_farm_projection() {
        let projection = project_for(&medium_farm());

        assert_eq!(projection.estimated_investment, 75_000.0);
        assert_eq!(projection.crop_income["Sorghum"], 33_600.0);
        assert_eq!(projection.crop_income["Pigeon Pea"], 25_200.0);
        assert_eq!(projection.crop_income["Mustard"], 33_000.0);
        assert_eq!(projection.crop_income["Lentil"], 20_800.0);
        assert_eq!(projection.tree_income["Jackfruit Trees"], 40_469.0);
        assert_eq!(projection.payback_period, PaybackPeriod::Months(4));
    }

    #[test]
    fn test_income_identity() {
        for acres in [0.5, 2.5, 12.0] {
            let mut input = medium_farm();
            input.land_area_acres = acres;
            let p = project_for(&input);

            let parts: f64 = p.crop_income.values().sum::<f64>() + p.tree_income.values().sum::<f64>();
            assert_eq!(p.expected_income, parts);
            assert_relative_eq!(
                p.roi_fraction,
                (p.expected_income - p.estimated_investment) / p.estimated_investment,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_investment_held_in_band() {
        let config = EconomicsConfig::default();
        let tiny = FarmInput::at(10.0, 76.0, 0.1).with_investment(InvestmentCapacity::Low);
        assert_eq!(estimate_investment(&tiny, &config), 5_000.0);

        let big_low = FarmInput::at(10.0, 76.0, 40.0).with_investment(InvestmentCapacity::Low);
        assert_eq!(estimate_investment(&big_low, &config), 50_000.0);

        let big_high = FarmInput::at(10.0, 76.0, 40.0).with_investment(InvestmentCapacity::High);
        assert_eq!(estimate_investment(&big_high, &config), 1_800_000.0);
    }

    #[test]
    fn test_timber_tree_has_no_annual_income() {
        let input = FarmInput::at(26.2389, 73.0243, 10.0).with_rainfall(300.0);
        let p = project_for(&input);
        assert!(!p.tree_income.contains_key("Teak Trees"));
        assert!(p.tree_income.contains_key("Neem Trees"));
    }

    #[test]
    fn test_zero_income_payback_not_computable() {
        let input = medium_farm();
        let mut system = select(&Catalog::builtin(), classify(&input));
        system.combinations.clear();
        system.canopy_trees.clear();

        let p = project(&input, &system, &EconomicsConfig::default());
        assert_eq!(p.expected_income, 0.0);
        assert_eq!(p.payback_period, PaybackPeriod::NotComputable);
        assert_eq!(p.payback_period.months(), None);
        assert_relative_eq!(p.roi_fraction, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_payback_serializes_tagged() {
        let json = serde_json::to_value(PaybackPeriod::Months(4)).unwrap();
        assert_eq!(json, serde_json::json!({"months": 4}));
        let json = serde_json::to_value(PaybackPeriod::NotComputable).unwrap();
        assert_eq!(json, serde_json::json!("not_computable"));
    }
}
