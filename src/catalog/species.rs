//! Species records
//!
//! Trees, crops, shrubs and herbs share a name, a spacing and a benefit but
//! differ in what else they carry: only trees mature over years, only trees
//! and field crops have a modelled yield. Each layer is a variant of
//! `Species`, and the shared fields are reached through `Plantable`.

use serde::{Deserialize, Serialize};

/// Square metres per acre
pub const SQ_M_PER_ACRE: f64 = 4046.86;

/// Vertical stratum of the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    CanopyTree,
    UnderstoryTree,
    Shrub,
    GroundCrop,
    MainCrop,
    Intercrop,
    Herb,
}

impl Layer {
    pub fn display_name(&self) -> &'static str {
        match self {
            Layer::CanopyTree => "Canopy Trees",
            Layer::UnderstoryTree => "Understory Trees",
            Layer::Shrub => "Shrubs",
            Layer::GroundCrop => "Ground Crops",
            Layer::MainCrop => "Main Crops",
            Layer::Intercrop => "Intercrops",
            Layer::Herb => "Herbs",
        }
    }
}

/// Common capability for rendering any plant in a plan
pub trait Plantable {
    fn name(&self) -> &str;

    /// Human-readable spacing, e.g. "10m x 10m" or "Row planting"
    fn spacing(&self) -> String;

    fn benefit(&self) -> &str;
}

/// A tree on a square grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub name: String,
    pub spacing_m: f64,
    #[serde(default)]
    pub maturity_years: Option<u32>,
    /// Annual yield per mature tree
    #[serde(default)]
    pub yield_kg_per_tree: Option<f64>,
    #[serde(default)]
    pub market_price_per_kg: Option<f64>,
    pub benefit: String,
}

impl Tree {
    /// Full-stand density on the square grid
    pub fn trees_per_acre(&self) -> f64 {
        if self.spacing_m <= 0.0 {
            return 0.0;
        }
        SQ_M_PER_ACRE / (self.spacing_m * self.spacing_m)
    }
}

/// A field crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub name: String,
    pub spacing: String,
    #[serde(default)]
    pub yield_kg_per_acre: Option<f64>,
    #[serde(default)]
    pub market_price_per_kg: Option<f64>,
    pub benefit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shrub {
    pub name: String,
    pub spacing: String,
    pub benefit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Herb {
    pub name: String,
    pub spacing: String,
    pub benefit: String,
}

impl Plantable for Tree {
    fn name(&self) -> &str {
        &self.name
    }

    fn spacing(&self) -> String {
        format!("{}m x {}m", self.spacing_m, self.spacing_m)
    }

    fn benefit(&self) -> &str {
        &self.benefit
    }
}

impl Plantable for Crop {
    fn name(&self) -> &str {
        &self.name
    }

    fn spacing(&self) -> String {
        self.spacing.clone()
    }

    fn benefit(&self) -> &str {
        &self.benefit
    }
}

impl Plantable for Shrub {
    fn name(&self) -> &str {
        &self.name
    }

    fn spacing(&self) -> String {
        self.spacing.clone()
    }

    fn benefit(&self) -> &str {
        &self.benefit
    }
}

impl Plantable for Herb {
    fn name(&self) -> &str {
        &self.name
    }

    fn spacing(&self) -> String {
        self.spacing.clone()
    }

    fn benefit(&self) -> &str {
        &self.benefit
    }
}

/// One catalog entry, tagged by layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum Species {
    CanopyTree(Tree),
    UnderstoryTree(Tree),
    Shrub(Shrub),
    GroundCrop(Crop),
    MainCrop(Crop),
    Intercrop(Crop),
    Herb(Herb),
}

impl Species {
    pub fn layer(&self) -> Layer {
        match self {
            Species::CanopyTree(_) => Layer::CanopyTree,
            Species::UnderstoryTree(_) => Layer::UnderstoryTree,
            Species::Shrub(_) => Layer::Shrub,
            Species::GroundCrop(_) => Layer::GroundCrop,
            Species::MainCrop(_) => Layer::MainCrop,
            Species::Intercrop(_) => Layer::Intercrop,
            Species::Herb(_) => Layer::Herb,
        }
    }

    pub fn as_plantable(&self) -> &dyn Plantable {
        match self {
            Species::CanopyTree(t) | Species::UnderstoryTree(t) => t,
            Species::GroundCrop(c) | Species::MainCrop(c) | Species::Intercrop(c) => c,
            Species::Shrub(s) => s,
            Species::Herb(h) => h,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Species::CanopyTree(t) | Species::UnderstoryTree(t) => Some(t),
            _ => None,
        }
    }

    pub fn maturity_years(&self) -> Option<u32> {
        self.as_tree().and_then(|t| t.maturity_years)
    }
}

impl Plantable for Species {
    fn name(&self) -> &str {
        self.as_plantable().name()
    }

    fn spacing(&self) -> String {
        self.as_plantable().spacing()
    }

    fn benefit(&self) -> &str {
        self.as_plantable().benefit()
    }
}

/// Growing season of a crop combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Monsoon season, sown June-July
    Kharif,
    /// Winter season, sown October-November
    Rabi,
}

/// A main crop grown together with an intercrop in one season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropCombination {
    pub main_crop: Crop,
    pub intercrop: Crop,
    pub layout: String,
    pub season: Season,
    pub benefits: String,
}

impl CropCombination {
    /// Display name, e.g. "Maize + Cowpea"
    pub fn name(&self) -> String {
        format!("{} + {}", self.main_crop.name, self.intercrop.name)
    }
}
