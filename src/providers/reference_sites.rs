//! Reference-site providers
//!
//! Answers soil and climate queries from a fixed table of agro-climatic
//! research sites across India. A query is served by the nearest site within
//! the configured radius; farther away there is no coverage.

use async_trait::async_trait;

use super::{ClimateDataProvider, FetchError, SoilDataProvider};
use crate::input::{ClimateObservation, SoilObservation};
use crate::utils::haversine_km;

/// Region name used when no reference site is close enough
pub const UNMAPPED_REGION: &str = "Unmapped location";

/// Typical topsoil (0-15cm) and long-term climate at one site
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSite {
    /// Display name, e.g. "Dharwad, Karnataka"
    pub name: &'static str,
    pub agro_climatic_zone: &'static str,
    pub latitude: f64,
    pub longitude: f64,

    // Soil
    pub soil_ph: f64,
    /// Organic carbon (%)
    pub organic_carbon: f64,
    /// Available nitrogen (kg/ha)
    pub nitrogen: f64,
    /// Cation exchange capacity (cmol/kg)
    pub cec: f64,
    pub sand_pct: f64,
    pub silt_pct: f64,
    pub clay_pct: f64,

    // Climate
    pub annual_rainfall_mm: f64,
    pub mean_temperature_c: f64,
    /// Mean daily solar radiation (MJ/m²/day)
    pub solar_radiation: f64,
}

impl ReferenceSite {
    pub fn region(&self) -> String {
        format!("{} ({})", self.name, self.agro_climatic_zone)
    }

    pub fn soil(&self) -> SoilObservation {
        SoilObservation {
            ph: Some(self.soil_ph),
            organic_carbon: Some(self.organic_carbon),
            nitrogen: Some(self.nitrogen),
            cec: Some(self.cec),
            sand_pct: Some(self.sand_pct),
            silt_pct: Some(self.silt_pct),
            clay_pct: Some(self.clay_pct),
        }
    }

    pub fn climate(&self) -> ClimateObservation {
        ClimateObservation {
            avg_rainfall_mm: Some(self.annual_rainfall_mm),
            avg_temperature_c: Some(self.mean_temperature_c),
            solar_radiation: Some(self.solar_radiation),
        }
    }

    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_km(self.latitude, self.longitude, latitude, longitude)
    }
}

// ============================================================================
// Reference Sites
// ============================================================================

/// Black cotton soils of the northern transition zone
pub const DHARWAD: ReferenceSite = ReferenceSite {
    name: "Dharwad, Karnataka",
    agro_climatic_zone: "Northern Transition Zone",
    latitude: 15.4589,
    longitude: 75.0078,
    soil_ph: 7.4,
    organic_carbon: 0.52,
    nitrogen: 210.0,
    cec: 38.0,
    sand_pct: 28.0,
    silt_pct: 27.0,
    clay_pct: 45.0,
    annual_rainfall_mm: 800.0,
    mean_temperature_c: 24.5,
    solar_radiation: 19.8,
};

/// Red sandy loams of the eastern dry zone
pub const BENGALURU: ReferenceSite = ReferenceSite {
    name: "Bengaluru, Karnataka",
    agro_climatic_zone: "Eastern Dry Zone",
    latitude: 12.9716,
    longitude: 77.5946,
    soil_ph: 6.2,
    organic_carbon: 0.48,
    nitrogen: 230.0,
    cec: 12.0,
    sand_pct: 62.0,
    silt_pct: 13.0,
    clay_pct: 25.0,
    annual_rainfall_mm: 970.0,
    mean_temperature_c: 24.0,
    solar_radiation: 19.5,
};

/// Desert sands of the Thar margin
pub const JODHPUR: ReferenceSite = ReferenceSite {
    name: "Jodhpur, Rajasthan",
    agro_climatic_zone: "Arid Western Plain",
    latitude: 26.2389,
    longitude: 73.0243,
    soil_ph: 8.3,
    organic_carbon: 0.18,
    nitrogen: 120.0,
    cec: 6.0,
    sand_pct: 85.0,
    silt_pct: 7.0,
    clay_pct: 8.0,
    annual_rainfall_mm: 360.0,
    mean_temperature_c: 27.5,
    solar_radiation: 21.5,
};

/// Acidic laterites of the humid west coast
pub const KOCHI: ReferenceSite = ReferenceSite {
    name: "Kochi, Kerala",
    agro_climatic_zone: "Humid West Coast",
    latitude: 9.9312,
    longitude: 76.2673,
    soil_ph: 5.2,
    organic_carbon: 1.2,
    nitrogen: 280.0,
    cec: 9.0,
    sand_pct: 55.0,
    silt_pct: 15.0,
    clay_pct: 30.0,
    annual_rainfall_mm: 3000.0,
    mean_temperature_c: 27.8,
    solar_radiation: 17.5,
};

/// Alluvial silt loams of the Punjab plains
pub const LUDHIANA: ReferenceSite = ReferenceSite {
    name: "Ludhiana, Punjab",
    agro_climatic_zone: "Trans-Gangetic Plain",
    latitude: 30.9010,
    longitude: 75.8573,
    soil_ph: 7.8,
    organic_carbon: 0.45,
    nitrogen: 190.0,
    cec: 14.0,
    sand_pct: 30.0,
    silt_pct: 55.0,
    clay_pct: 15.0,
    annual_rainfall_mm: 700.0,
    mean_temperature_c: 24.2,
    solar_radiation: 18.5,
};

/// Get all reference sites
pub fn reference_sites() -> &'static [ReferenceSite] {
    &[DHARWAD, BENGALURU, JODHPUR, KOCHI, LUDHIANA]
}

/// Nearest site within `radius_km`, with its distance
pub fn nearest_site(latitude: f64, longitude: f64, radius_km: f64) -> Option<(&'static ReferenceSite, f64)> {
    reference_sites()
        .iter()
        .map(|site| (site, site.distance_km(latitude, longitude)))
        .filter(|(_, d)| *d <= radius_km)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Region label for a plan
pub fn region_name(latitude: f64, longitude: f64, radius_km: f64) -> String {
    nearest_site(latitude, longitude, radius_km)
        .map(|(site, _)| site.region())
        .unwrap_or_else(|| UNMAPPED_REGION.to_string())
}

/// Soil and climate provider backed by the reference-site table
#[derive(Debug, Clone)]
pub struct ReferenceSites {
    radius_km: f64,
}

impl ReferenceSites {
    pub fn new(radius_km: f64) -> Self {
        Self { radius_km }
    }

    fn lookup(&self, latitude: f64, longitude: f64) -> Result<&'static ReferenceSite, FetchError> {
        match nearest_site(latitude, longitude, self.radius_km) {
            Some((site, distance)) => {
                tracing::debug!(site = site.name, distance_km = distance, "Reference site matched");
                Ok(site)
            }
            None => Err(FetchError::NoCoverage(format!(
                "no reference site within {}km of ({:.4}, {:.4})",
                self.radius_km, latitude, longitude
            ))),
        }
    }
}

#[async_trait]
impl SoilDataProvider for ReferenceSites {
    async fn soil_at(&self, latitude: f64, longitude: f64) -> Result<SoilObservation, FetchError> {
        self.lookup(latitude, longitude).map(ReferenceSite::soil)
    }
}

#[async_trait]
impl ClimateDataProvider for ReferenceSites {
    async fn climate_at(&self, latitude: f64, longitude: f64) -> Result<ClimateObservation, FetchError> {
        self.lookup(latitude, longitude).map(ReferenceSite::climate)
    }
}
