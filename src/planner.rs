//! Recommendation Pipeline
//!
//! `Planner` owns the read-only catalog, the configuration and the data
//! providers. A run is:
//!
//! 1. normalize the raw attributes (fails fast, before any provider call)
//! 2. fetch soil/climate observations the farmer did not supply. A failed
//!    fetch aborts the run only when texture or rainfall is still unknown;
//!    otherwise it is recorded as a degradation.
//! 3. classify → select → {economics ∥ sustainability} → assemble
//!
//! Step 3 is pure: the same resolved input always gives the same plan.

use std::sync::Arc;

use anyhow::Result;
use rayon::prelude::*;

use crate::catalog::{select, Catalog};
use crate::classify::{build_climate_profile, build_soil_profile, classify_with_notes};
use crate::config::PlannerConfig;
use crate::economics;
use crate::error::{Degradation, PlanResult};
use crate::input::{normalize, FarmInput, NormalizedInput, RawFarmInput};
use crate::plan::{assemble, AgroforestryPlan, FarmLocation, PlanParts};
use crate::providers::reference_sites::region_name;
use crate::providers::{fetch_with_retry, ClimateDataProvider, ReferenceSites, SoilDataProvider};
use crate::sustainability;

#[derive(Clone)]
pub struct Planner {
    config: Arc<PlannerConfig>,
    catalog: Arc<Catalog>,
    soil_provider: Arc<dyn SoilDataProvider>,
    climate_provider: Arc<dyn ClimateDataProvider>,
}

impl Planner {
    /// Planner backed by the reference-site providers
    pub fn new(config: PlannerConfig, catalog: Catalog) -> Self {
        let sites = Arc::new(ReferenceSites::new(config.provider.reference_radius_km));
        Self::with_providers(config, catalog, sites.clone(), sites)
    }

    pub fn with_providers(
        config: PlannerConfig,
        catalog: Catalog,
        soil_provider: Arc<dyn SoilDataProvider>,
        climate_provider: Arc<dyn ClimateDataProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            soil_provider,
            climate_provider,
        }
    }

    /// Load the catalog named by `config.catalog_path`, or use the built-in one
    pub fn from_config(config: PlannerConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                tracing::info!("Loading catalog from {:?}", path);
                Catalog::load(path)?
            }
            None => Catalog::builtin(),
        };
        Ok(Self::new(config, catalog))
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Full run from raw, possibly string-typed attributes
    pub async fn generate_plan(&self, raw: &RawFarmInput) -> PlanResult<AgroforestryPlan> {
        let NormalizedInput { mut input, mut degradations } = normalize(raw)?;
        degradations.extend(self.resolve_observations(&mut input).await?);
        Ok(self.plan_resolved(&input, degradations))
    }

    /// Full run from an already-typed input
    pub async fn generate_plan_for(&self, mut input: FarmInput) -> PlanResult<AgroforestryPlan> {
        input.validate()?;
        let degradations = self.resolve_observations(&mut input).await?;
        Ok(self.plan_resolved(&input, degradations))
    }

    /// Fill missing observations from the providers. Soil and climate are
    /// fetched concurrently; a complete observation is never re-fetched.
    ///
    /// Only texture (unless a soil type was given) and rainfall drive the
    /// tier. A provider failure while either is unknown is fatal; any other
    /// failure leaves the optional fields empty and returns a degradation.
    pub async fn resolve_observations(&self, input: &mut FarmInput) -> PlanResult<Vec<Degradation>> {
        let (latitude, longitude) = (input.latitude, input.longitude);
        let policy = &self.config.provider;
        let need_soil = !input.soil.is_complete();
        let need_climate = !input.climate.is_complete();
        let texture_required = input.soil_tier.is_none() && !input.soil.has_texture();
        let rainfall_required = input.climate.avg_rainfall_mm.is_none();

        let soil = async {
            if !need_soil {
                return Ok(None);
            }
            fetch_with_retry("soil", policy, || self.soil_provider.soil_at(latitude, longitude))
                .await
                .map(Some)
        };
        let climate = async {
            if !need_climate {
                return Ok(None);
            }
            fetch_with_retry("climate", policy, || self.climate_provider.climate_at(latitude, longitude))
                .await
                .map(Some)
        };

        let (soil, climate) = tokio::join!(soil, climate);
        let mut notes = Vec::new();

        match soil {
            Ok(Some(observed)) => input.soil.fill_missing_from(&observed),
            Ok(None) => {}
            Err(err) if !texture_required => {
                notes.push(Degradation::new("soil", format!("{}; soil chemistry left unknown", err)));
            }
            Err(err) => return Err(err),
        }
        match climate {
            Ok(Some(observed)) => input.climate.fill_missing_from(&observed),
            Ok(None) => {}
            Err(err) if !rainfall_required => {
                notes.push(Degradation::new("climate", format!("{}; temperature and radiation left unknown", err)));
            }
            Err(err) => return Err(err),
        }
        Ok(notes)
    }

    /// Pure pipeline over a resolved input
    pub fn plan_for(&self, input: &FarmInput) -> PlanResult<AgroforestryPlan> {
        input.validate()?;
        Ok(self.plan_resolved(input, Vec::new()))
    }

    /// Plan many resolved farms in parallel; each entry fails independently
    pub fn plan_batch(&self, inputs: &[FarmInput]) -> Vec<PlanResult<AgroforestryPlan>> {
        tracing::info!("Planning batch of {} farms", inputs.len());

        let plans: Vec<PlanResult<AgroforestryPlan>> = inputs
            .par_iter()
            .map(|input| self.plan_for(input))
            .collect();

        let failed = plans.iter().filter(|p| p.is_err()).count();
        tracing::info!("Batch complete: {} planned, {} rejected", plans.len() - failed, failed);
        plans
    }

    /// Pure pipeline over a validated input, carrying degradations already
    /// recorded upstream
    pub(crate) fn plan_resolved(&self, input: &FarmInput, mut degradations: Vec<Degradation>) -> AgroforestryPlan {
        let (tier, notes) = classify_with_notes(input);
        degradations.extend(notes);
        tracing::debug!(?tier, "Farm classified");
        for note in &degradations {
            tracing::warn!(field = %note.field, "{}", note.message);
        }

        let system = select(&self.catalog, tier);
        tracing::debug!(layers = system.layer_count(), "System selected");

        let (economics, sustainability) = rayon::join(
            || economics::project(input, &system, &self.config.economics),
            || sustainability::score(tier, input.land_area_acres),
        );

        let location = FarmLocation {
            latitude: input.latitude,
            longitude: input.longitude,
            region: region_name(input.latitude, input.longitude, self.config.provider.reference_radius_km),
        };

        assemble(PlanParts {
            location,
            land_area_acres: input.land_area_acres,
            investment_capacity: input.investment_capacity,
            tier,
            soil_profile: build_soil_profile(&input.soil),
            climate_profile: build_climate_profile(&input.climate, tier.rainfall),
            layout: self.catalog.bundle(tier).layout.clone(),
            system,
            economics,
            sustainability,
            degradations,
        })
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default(), Catalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{FarmSizeTier, RainfallTier, SoilTier};
    use crate::error::PlanError;

    #[test]
    fn test_plan_for_is_deterministic() {
        let planner = Planner::default();
        let input = FarmInput::at(15.8221, 75.0302, 2.5).with_texture(40.0, 40.0, 20.0).with_rainfall(800.0);
        assert_eq!(planner.plan_for(&input).unwrap(), planner.plan_for(&input).unwrap());
    }

    #[test]
    fn test_missing_texture_is_annotated() {
        let planner = Planner::default();
        let plan = planner.plan_for(&FarmInput::at(15.8221, 75.0302, 2.5).with_rainfall(800.0)).unwrap();
        assert_eq!(plan.tier.soil, SoilTier::Loamy);
        assert_eq!(plan.soil_profile.texture_class, "Unknown");
        assert!(plan.degradations.iter().any(|d| d.field == "soil_texture"));
    }

    #[test]
    fn test_plan_batch_rejects_invalid_entries_only() {
        let planner = Planner::default();
        let inputs = vec![
            FarmInput::at(15.8, 75.0, 1.0).with_rainfall(450.0),
            FarmInput::at(95.0, 75.0, 1.0),
            FarmInput::at(30.9, 75.8, 12.0).with_rainfall(700.0),
        ];
        let plans = planner.plan_batch(&inputs);
        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].as_ref().unwrap().tier.farm_size, FarmSizeTier::Small);
        assert!(matches!(plans[1], Err(PlanError::Validation { field: "latitude", .. })));
        assert_eq!(plans[2].as_ref().unwrap().tier.rainfall, RainfallTier::Moderate);
    }

    #[tokio::test]
    async fn test_reference_sites_fill_gaps() {
        let planner = Planner::default();
        let plan = planner
            .generate_plan_for(FarmInput::at(26.30, 73.05, 8.0))
            .await
            .unwrap();

        // Jodhpur sands, arid
        assert_eq!(plan.tier.soil, SoilTier::Sandy);
        assert_eq!(plan.tier.rainfall, RainfallTier::Low);
        assert!(plan.farm_location.region.starts_with("Jodhpur"));
        assert!(plan.degradations.is_empty());
    }

    #[tokio::test]
    async fn test_unmapped_location_without_data_fails() {
        let planner = Planner::default();
        let err = planner
            .generate_plan_for(FarmInput::at(51.5, -0.12, 3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::DataUnavailable { .. }));
    }

    #[test]
    fn test_plan_for_validates() {
        let planner = Planner::default();
        let err = planner.plan_for(&FarmInput::at(95.0, 75.0, 2.0).with_rainfall(800.0)).unwrap_err();
        assert!(matches!(err, PlanError::Validation { field: "latitude", .. }));
    }

    #[tokio::test]
    async fn test_unmapped_location_with_texture_and_rainfall_degrades() {
        // Nagpur lies outside every reference radius
        let planner = Planner::default();
        let plan = planner
            .generate_plan_for(FarmInput::at(21.1458, 79.0882, 2.5).with_texture(40.0, 40.0, 20.0).with_rainfall(800.0))
            .await
            .unwrap();

        assert_eq!(plan.tier.soil, SoilTier::Loamy);
        assert_eq!(plan.tier.rainfall, RainfallTier::Moderate);
        assert!(plan.degradations.iter().any(|d| d.field == "soil"));
        assert!(plan.degradations.iter().any(|d| d.field == "climate"));
        assert_eq!(plan.soil_profile.ph, None);
    }

    #[tokio::test]
    async fn test_two_texture_fractions_use_remainder_not_reference_site() {
        let planner = Planner::default();
        let mut farm = FarmInput::at(15.8221, 75.0302, 2.5).with_rainfall(800.0);
        farm.soil.sand_pct = Some(60.0);
        farm.soil.silt_pct = Some(30.0);

        let offline = planner.plan_for(&farm).unwrap();
        let plan = planner.generate_plan_for(farm).await.unwrap();

        // Dharwad clay is not mixed in: clay is the 10% remainder
        assert_eq!(plan.tier.soil, SoilTier::Sandy);
        assert_eq!(plan.tier, offline.tier);
        assert_eq!(plan.soil_profile.clay_pct, None);
        assert!(plan.soil_profile.ph.is_some());
    }
}
