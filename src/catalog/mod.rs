//! Recommendation Catalog
//!
//! Static knowledge base of planting bundles. The catalog is keyed by the
//! full `Tier` triple, but every soil and rainfall variant of a farm size
//! currently points at the same bundle: soil and rainfall tiers do not yet
//! refine species selection.
//!
//! Built once at startup (`Catalog::builtin()` or `Catalog::load(path)`),
//! shared behind an `Arc`, never mutated afterwards.

pub mod species;
pub mod builtin;
pub mod selector;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::classify::{FarmSizeTier, Tier};
use species::{CropCombination, Species};

pub use selector::{select, RecommendedSystem};
pub use species::{Crop, Herb, Layer, Plantable, Season, Shrub, Tree};

/// Field layout suggested with a bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTemplate {
    pub pattern: String,
    pub description: String,
}

/// The four-layer planting bundle plus seasonal crop combinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub canopy: Vec<Species>,
    pub understory: Vec<Species>,
    /// Shrub layer; spices and medicinals here are typed as herbs
    pub shrubs: Vec<Species>,
    pub ground: Vec<Species>,
    pub combinations: Vec<CropCombination>,
    pub layout: LayoutTemplate,
}

/// On-disk catalog format: one bundle per farm size, all three required
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub small: Bundle,
    pub medium: Bundle,
    pub large: Bundle,
}

/// Read-only tier → bundle mapping
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: FxHashMap<Tier, Arc<Bundle>>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self::from_file(builtin::catalog_file())
    }

    /// Load a catalog from a JSON file in `CatalogFile` format
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;

        let file: CatalogFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse catalog JSON: {:?}", path))?;

        for (size, bundle) in [("small", &file.small), ("medium", &file.medium), ("large", &file.large)] {
            if bundle.canopy.is_empty() {
                anyhow::bail!("Catalog bundle '{}' has no canopy trees", size);
            }
            if bundle.combinations.is_empty() {
                anyhow::bail!("Catalog bundle '{}' has no crop combinations", size);
            }
        }

        Ok(Self::from_file(file))
    }

    /// Every tier gets an entry, so lookups are total
    pub fn from_file(file: CatalogFile) -> Self {
        let small = Arc::new(file.small);
        let medium = Arc::new(file.medium);
        let large = Arc::new(file.large);

        let mut entries = FxHashMap::default();
        for tier in Tier::all() {
            let bundle = match tier.farm_size {
                FarmSizeTier::Small => Arc::clone(&small),
                FarmSizeTier::Medium => Arc::clone(&medium),
                FarmSizeTier::Large => Arc::clone(&large),
            };
            entries.insert(tier, bundle);
        }

        Self { entries }
    }

    /// Bundle for a tier
    pub fn bundle(&self, tier: Tier) -> &Bundle {
        // from_file inserts all of Tier::all()
        &self.entries[&tier]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
