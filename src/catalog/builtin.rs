//! Built-in recommendation bundles
//!
//! One bundle per farm size. Yields are annual figures for a mature stand;
//! market prices are INR per kg proxies used only for income projection.

use super::species::{Crop, CropCombination, Herb, Season, Shrub, Species, Tree};
use super::{Bundle, CatalogFile, LayoutTemplate};

fn tree(name: &str, spacing_m: f64, maturity: Option<u32>, yield_kg: Option<f64>, price: Option<f64>, benefit: &str) -> Tree {
    Tree {
        name: name.to_string(),
        spacing_m,
        maturity_years: maturity,
        yield_kg_per_tree: yield_kg,
        market_price_per_kg: price,
        benefit: benefit.to_string(),
    }
}

fn crop(name: &str, spacing: &str, yield_kg: Option<f64>, price: Option<f64>, benefit: &str) -> Crop {
    Crop {
        name: name.to_string(),
        spacing: spacing.to_string(),
        yield_kg_per_acre: yield_kg,
        market_price_per_kg: price,
        benefit: benefit.to_string(),
    }
}

fn shrub(name: &str, spacing: &str, benefit: &str) -> Species {
    Species::Shrub(Shrub {
        name: name.to_string(),
        spacing: spacing.to_string(),
        benefit: benefit.to_string(),
    })
}

fn herb(name: &str, spacing: &str, benefit: &str) -> Species {
    Species::Herb(Herb {
        name: name.to_string(),
        spacing: spacing.to_string(),
        benefit: benefit.to_string(),
    })
}

fn combination(main_crop: Crop, intercrop: Crop, layout: &str, season: Season, benefits: &str) -> CropCombination {
    CropCombination {
        main_crop,
        intercrop,
        layout: layout.to_string(),
        season,
        benefits: benefits.to_string(),
    }
}

pub fn catalog_file() -> CatalogFile {
    CatalogFile {
        small: small_farm(),
        medium: medium_farm(),
        large: large_farm(),
    }
}

fn small_farm() -> Bundle {
    Bundle {
        canopy: vec![
            Species::CanopyTree(tree("Mango Trees", 10.0, Some(5), Some(150.0), Some(40.0),
                "Fruit production, shade, income diversification")),
            Species::CanopyTree(tree("Guava Trees", 8.0, Some(3), Some(60.0), Some(30.0),
                "Fruit production, early returns")),
        ],
        understory: vec![
            Species::UnderstoryTree(tree("Leucaena", 2.0, Some(2), None, None,
                "Nitrogen fixation, fodder, biomass")),
            Species::UnderstoryTree(tree("Gliricidia", 3.0, Some(2), None, None,
                "Nitrogen fixation, live fencing, fodder")),
        ],
        shrubs: vec![
            herb("Turmeric", "Interplant with trees", "High value spice, shade tolerant"),
            herb("Ginger", "Interplant with trees", "High value spice, moisture retention"),
        ],
        ground: vec![
            Species::GroundCrop(crop("Black Gram", "Row planting", None, None,
                "Nitrogen fixation, short duration")),
            Species::GroundCrop(crop("Pigeon Pea", "Between tree rows", None, None,
                "Protein source, drought tolerant")),
        ],
        combinations: vec![
            combination(
                crop("Maize", "60cm x 20cm", Some(1800.0), Some(22.0), "Staple cereal, good ground cover"),
                crop("Cowpea", "Alternate rows", Some(400.0), Some(60.0), "Protein source, nitrogen fixation"),
                "Alternate rows",
                Season::Kharif,
                "Complementary growth, nitrogen fixation, diversified income",
            ),
            combination(
                crop("Wheat", "22cm rows", Some(1600.0), Some(24.0), "Winter staple"),
                crop("Chickpea", "Strips of 4 rows", Some(500.0), Some(55.0), "Pulse, nitrogen fixation"),
                "Strip intercropping",
                Season::Rabi,
                "Different root zones, nitrogen fixation, cool season combination",
            ),
        ],
        layout: LayoutTemplate {
            pattern: "Boundary planting with alley crops".to_string(),
            description: "Fruit trees along the farm boundary with nitrogen-fixing hedgerows; seasonal crops in the open alleys".to_string(),
        },
    }
}

fn medium_farm() -> Bundle {
    Bundle {
        canopy: vec![
            Species::CanopyTree(tree("Tamarind Trees", 12.0, Some(8), Some(150.0), Some(50.0),
                "Fruit production, long-term investment")),
            Species::CanopyTree(tree("Jackfruit Trees", 10.0, Some(6), Some(200.0), Some(20.0),
                "High value fruit, climate resilience")),
        ],
        understory: vec![
            Species::UnderstoryTree(tree("Acacia nilotica", 3.0, Some(4), None, None,
                "Nitrogen fixation, gum production")),
            Species::UnderstoryTree(tree("Casuarina", 4.0, Some(4), None, None,
                "Windbreak, timber, nitrogen fixation")),
        ],
        shrubs: vec![
            shrub("Coffee", "Shaded areas under trees", "High value cash crop, shade requirement"),
            shrub("Pepper", "Supported on tree trunks", "Climbing vine, high value spice"),
        ],
        ground: vec![
            Species::GroundCrop(crop("Maize", "Row planting", None, None,
                "Staple food crop, good ground cover")),
            Species::GroundCrop(crop("Cowpea", "Interrow planting", None, None,
                "Protein source, nitrogen fixation")),
        ],
        combinations: vec![
            combination(
                crop("Sorghum", "45cm x 15cm", Some(1000.0), Some(28.0), "Drought tolerant grain and fodder"),
                crop("Pigeon Pea", "Every third row", Some(450.0), Some(70.0), "Protein, deep roots"),
                "Row intercropping",
                Season::Kharif,
                "Drought tolerance, complementary height, protein + carbohydrate",
            ),
            combination(
                crop("Mustard", "30cm rows", Some(500.0), Some(55.0), "Oilseed"),
                crop("Lentil", "Mixed with mustard", Some(400.0), Some(65.0), "Pulse, nitrogen fixation"),
                "Mixed intercropping",
                Season::Rabi,
                "Oilseed + pulse combination, different nutrient requirements",
            ),
        ],
        layout: LayoutTemplate {
            pattern: "Multi-strata alley cropping".to_string(),
            description: "Canopy trees in widely spaced rows with nitrogen-fixing understory between them; shade crops beneath and field crops in the alleys".to_string(),
        },
    }
}

fn large_farm() -> Bundle {
    Bundle {
        canopy: vec![
            // Timber value is realised at felling, not as annual income
            Species::CanopyTree(tree("Teak Trees", 8.0, Some(20), None, None,
                "High value timber, long-term investment")),
            Species::CanopyTree(tree("Neem Trees", 10.0, Some(5), Some(30.0), Some(25.0),
                "Timber, medicinal, pest control")),
        ],
        understory: vec![
            Species::UnderstoryTree(tree("Albizia", 4.0, Some(5), None, None,
                "Nitrogen fixation, timber, shade")),
            Species::UnderstoryTree(tree("Sesbania", 2.0, Some(1), None, None,
                "Green manure, fodder, nitrogen fixation")),
        ],
        shrubs: vec![
            herb("Medicinal Plants", "Dedicated plots", "Diverse income, traditional medicine"),
            herb("Aromatic Herbs", "Border plantings", "Essential oils, pest repellent"),
        ],
        ground: vec![
            Species::GroundCrop(crop("Sorghum", "Row planting", None, None,
                "Drought tolerant, fodder and grain")),
            Species::GroundCrop(crop("Groundnut", "Interrow planting", None, None,
                "Oilseed crop, nitrogen fixation")),
        ],
        combinations: vec![
            combination(
                crop("Cotton", "90cm x 60cm", Some(600.0), Some(65.0), "Fibre cash crop"),
                crop("Soybean", "Strips between cotton", Some(700.0), Some(45.0), "Protein, nitrogen fixation"),
                "Strip intercropping",
                Season::Kharif,
                "Fiber + protein, pest management, mechanization compatible",
            ),
            combination(
                crop("Barley", "22cm rows", Some(1200.0), Some(20.0), "Hardy winter cereal"),
                crop("Field Pea", "Alternate rows", Some(600.0), Some(40.0), "Pulse, early harvest"),
                "Alternate row",
                Season::Rabi,
                "Cereal + pulse, early harvest, soil improvement",
            ),
        ],
        layout: LayoutTemplate {
            pattern: "Block plantation with windbreak belts".to_string(),
            description: "Timber blocks bordered by windbreak rows of understory trees; wide alleys for mechanised intercropping".to_string(),
        },
    }
}
