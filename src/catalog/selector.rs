//! Recommendation Selector
//!
//! Looks up the bundle for a classified farm and lays it out as the
//! multi-layer planting system. Everything is cloned out of the catalog, so a
//! caller may edit its system freely.

use serde::{Deserialize, Serialize};

use super::species::{CropCombination, Layer, Species};
use super::Catalog;
use crate::classify::Tier;

/// Species grouped by layer, in catalog order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedSystem {
    pub canopy_trees: Vec<Species>,
    pub understory_trees: Vec<Species>,
    pub shrubs: Vec<Species>,
    pub herbs: Vec<Species>,
    pub ground_crops: Vec<Species>,
    pub main_crops: Vec<Species>,
    pub intercrops: Vec<Species>,
    pub combinations: Vec<CropCombination>,
}

impl RecommendedSystem {
    /// Canopy then understory trees
    pub fn trees(&self) -> impl Iterator<Item = &Species> {
        self.canopy_trees.iter().chain(self.understory_trees.iter())
    }

    /// All species from the top of the canopy to the ground
    pub fn all_species(&self) -> impl Iterator<Item = &Species> {
        self.canopy_trees
            .iter()
            .chain(&self.understory_trees)
            .chain(&self.shrubs)
            .chain(&self.herbs)
            .chain(&self.ground_crops)
            .chain(&self.main_crops)
            .chain(&self.intercrops)
    }

    pub fn layer(&self, layer: Layer) -> &[Species] {
        match layer {
            Layer::CanopyTree => &self.canopy_trees,
            Layer::UnderstoryTree => &self.understory_trees,
            Layer::Shrub => &self.shrubs,
            Layer::Herb => &self.herbs,
            Layer::GroundCrop => &self.ground_crops,
            Layer::MainCrop => &self.main_crops,
            Layer::Intercrop => &self.intercrops,
        }
    }

    /// Number of distinct layers with at least one species
    pub fn layer_count(&self) -> usize {
        [
            Layer::CanopyTree,
            Layer::UnderstoryTree,
            Layer::Shrub,
            Layer::Herb,
            Layer::GroundCrop,
            Layer::MainCrop,
            Layer::Intercrop,
        ]
        .iter()
        .filter(|&&l| !self.layer(l).is_empty())
        .count()
    }
}

pub fn select(catalog: &Catalog, tier: Tier) -> RecommendedSystem {
    let bundle = catalog.bundle(tier);

    // The shrub layer mixes true shrubs with herbs (spices, medicinals)
    let (herbs, shrubs): (Vec<Species>, Vec<Species>) = bundle
        .shrubs
        .iter()
        .cloned()
        .partition(|s| s.layer() == Layer::Herb);

    let main_crops = bundle
        .combinations
        .iter()
        .map(|c| Species::MainCrop(c.main_crop.clone()))
        .collect();
    let intercrops = bundle
        .combinations
        .iter()
        .map(|c| Species::Intercrop(c.intercrop.clone()))
        .collect();

    RecommendedSystem {
        canopy_trees: bundle.canopy.clone(),
        understory_trees: bundle.understory.clone(),
        shrubs,
        herbs,
        ground_crops: bundle.ground.clone(),
        main_crops,
        intercrops,
        combinations: bundle.combinations.clone(),
    }
}
