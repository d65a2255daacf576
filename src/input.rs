//! Input Normalizer
//!
//! Farm attributes arrive from forms and JSON bodies where numbers are often
//! strings. `normalize` turns a `RawFarmInput` into a typed `FarmInput`:
//! latitude, longitude and land area are required and rejected if absent or
//! malformed; every other field is optional and dropped with a degradation
//! note when unusable.

use serde::{Deserialize, Serialize};

use crate::classify::{InvestmentCapacity, SoilTier};
use crate::error::{Degradation, PlanError, PlanResult};

/// A raw attribute value: a JSON number or a string that should hold one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
}

impl RawField {
    fn parse(&self) -> Result<f64, String> {
        let value = match self {
            RawField::Number(n) => *n,
            RawField::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", s))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("{} is not a finite number", value))
        }
    }
}

impl From<f64> for RawField {
    fn from(value: f64) -> Self {
        RawField::Number(value)
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        RawField::Text(value.to_string())
    }
}

/// Farm attributes as submitted, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFarmInput {
    pub latitude: Option<RawField>,
    pub longitude: Option<RawField>,
    #[serde(alias = "land_area")]
    pub land_area_acres: Option<RawField>,
    pub investment_capacity: Option<String>,

    /// Explicit soil type, overriding texture-derived classification
    #[serde(alias = "soil_type")]
    pub soil_tier: Option<String>,

    #[serde(alias = "ph")]
    pub soil_ph: Option<RawField>,
    pub organic_carbon: Option<RawField>,
    pub nitrogen: Option<RawField>,
    pub cec: Option<RawField>,
    #[serde(alias = "sand")]
    pub sand_pct: Option<RawField>,
    #[serde(alias = "silt")]
    pub silt_pct: Option<RawField>,
    #[serde(alias = "clay")]
    pub clay_pct: Option<RawField>,

    #[serde(alias = "rainfall_mm")]
    pub avg_rainfall_mm: Option<RawField>,
    #[serde(alias = "temperature_c")]
    pub avg_temperature_c: Option<RawField>,
    pub solar_radiation: Option<RawField>,
}

/// Topsoil measurements; any field may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilObservation {
    pub ph: Option<f64>,
    pub organic_carbon: Option<f64>,
    pub nitrogen: Option<f64>,
    pub cec: Option<f64>,
    pub sand_pct: Option<f64>,
    pub silt_pct: Option<f64>,
    pub clay_pct: Option<f64>,
}

impl SoilObservation {
    pub fn is_complete(&self) -> bool {
        [
            self.ph,
            self.organic_carbon,
            self.nitrogen,
            self.cec,
            self.sand_pct,
            self.silt_pct,
            self.clay_pct,
        ]
        .iter()
        .all(Option::is_some)
    }

    /// Two of sand/silt/clay are enough to place the soil on the texture
    /// triangle; the third is the remainder to 100%.
    pub fn has_texture(&self) -> bool {
        [self.sand_pct, self.silt_pct, self.clay_pct]
            .iter()
            .filter(|v| v.is_some())
            .count()
            >= 2
    }

    /// Fill gaps from another observation; values already present win.
    ///
    /// Texture moves as one unit: a usable texture is never mixed with
    /// another sample's fractions, and an unusable one is replaced whole.
    pub fn fill_missing_from(&mut self, other: &SoilObservation) {
        self.ph = self.ph.or(other.ph);
        self.organic_carbon = self.organic_carbon.or(other.organic_carbon);
        self.nitrogen = self.nitrogen.or(other.nitrogen);
        self.cec = self.cec.or(other.cec);
        if !self.has_texture() && other.has_texture() {
            self.sand_pct = other.sand_pct;
            self.silt_pct = other.silt_pct;
            self.clay_pct = other.clay_pct;
        }
    }
}

/// Long-run climate averages; any field may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateObservation {
    pub avg_rainfall_mm: Option<f64>,
    pub avg_temperature_c: Option<f64>,
    pub solar_radiation: Option<f64>,
}

impl ClimateObservation {
    pub fn is_complete(&self) -> bool {
        self.avg_rainfall_mm.is_some() && self.avg_temperature_c.is_some() && self.solar_radiation.is_some()
    }

    pub fn fill_missing_from(&mut self, other: &ClimateObservation) {
        self.avg_rainfall_mm = self.avg_rainfall_mm.or(other.avg_rainfall_mm);
        self.avg_temperature_c = self.avg_temperature_c.or(other.avg_temperature_c);
        self.solar_radiation = self.solar_radiation.or(other.solar_radiation);
    }
}

/// Validated farm input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmInput {
    pub latitude: f64,
    pub longitude: f64,
    pub land_area_acres: f64,
    pub investment_capacity: InvestmentCapacity,
    pub soil_tier: Option<SoilTier>,
    pub soil: SoilObservation,
    pub climate: ClimateObservation,
}

impl FarmInput {
    /// Farm at a location with no soil or climate observations yet
    pub fn at(latitude: f64, longitude: f64, land_area_acres: f64) -> Self {
        Self {
            latitude,
            longitude,
            land_area_acres,
            investment_capacity: InvestmentCapacity::default(),
            soil_tier: None,
            soil: SoilObservation::default(),
            climate: ClimateObservation::default(),
        }
    }

    pub fn with_investment(mut self, capacity: InvestmentCapacity) -> Self {
        self.investment_capacity = capacity;
        self
    }

    pub fn with_texture(mut self, sand: f64, silt: f64, clay: f64) -> Self {
        self.soil.sand_pct = Some(sand);
        self.soil.silt_pct = Some(silt);
        self.soil.clay_pct = Some(clay);
        self
    }

    pub fn with_soil_tier(mut self, tier: SoilTier) -> Self {
        self.soil_tier = Some(tier);
        self
    }

    pub fn with_rainfall(mut self, mm: f64) -> Self {
        self.climate.avg_rainfall_mm = Some(mm);
        self
    }

    /// Check the invariants a directly-constructed input must satisfy
    pub fn validate(&self) -> PlanResult<()> {
        check_latitude(self.latitude)?;
        check_longitude(self.longitude)?;
        check_land_area(self.land_area_acres)?;
        check_non_negative("sand_pct", self.soil.sand_pct)?;
        check_non_negative("silt_pct", self.soil.silt_pct)?;
        check_non_negative("clay_pct", self.soil.clay_pct)?;
        check_non_negative("avg_rainfall_mm", self.climate.avg_rainfall_mm)?;
        Ok(())
    }
}

/// Normalizer output: the typed input plus any defaults that were substituted
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    pub input: FarmInput,
    pub degradations: Vec<Degradation>,
}

pub fn normalize(raw: &RawFarmInput) -> PlanResult<NormalizedInput> {
    let latitude = required_number("latitude", raw.latitude.as_ref())?;
    check_latitude(latitude)?;
    let longitude = required_number("longitude", raw.longitude.as_ref())?;
    check_longitude(longitude)?;
    let land_area_acres = required_number("land_area_acres", raw.land_area_acres.as_ref())?;
    check_land_area(land_area_acres)?;

    let mut notes = Vec::new();

    let investment_capacity = match raw.investment_capacity.as_deref() {
        None => {
            notes.push(Degradation::new("investment_capacity", "investment capacity not given; assumed medium"));
            InvestmentCapacity::Medium
        }
        Some(label) => InvestmentCapacity::parse(label).unwrap_or_else(|| {
            notes.push(Degradation::new(
                "investment_capacity",
                format!("unknown investment capacity '{}'; assumed medium", label),
            ));
            InvestmentCapacity::Medium
        }),
    };

    let soil_tier = raw.soil_tier.as_deref().and_then(|label| {
        let parsed = SoilTier::parse(label);
        if parsed.is_none() {
            notes.push(Degradation::new(
                "soil_tier",
                format!("unknown soil type '{}'; derived from texture instead", label),
            ));
        }
        parsed
    });

    let soil = SoilObservation {
        ph: optional_number("soil_ph", raw.soil_ph.as_ref(), &mut notes),
        organic_carbon: optional_number("organic_carbon", raw.organic_carbon.as_ref(), &mut notes),
        nitrogen: optional_number("nitrogen", raw.nitrogen.as_ref(), &mut notes),
        cec: optional_number("cec", raw.cec.as_ref(), &mut notes),
        sand_pct: optional_fraction("sand_pct", raw.sand_pct.as_ref(), &mut notes),
        silt_pct: optional_fraction("silt_pct", raw.silt_pct.as_ref(), &mut notes),
        clay_pct: optional_fraction("clay_pct", raw.clay_pct.as_ref(), &mut notes),
    };

    let climate = ClimateObservation {
        avg_rainfall_mm: optional_fraction("avg_rainfall_mm", raw.avg_rainfall_mm.as_ref(), &mut notes),
        avg_temperature_c: optional_number("avg_temperature_c", raw.avg_temperature_c.as_ref(), &mut notes),
        solar_radiation: optional_number("solar_radiation", raw.solar_radiation.as_ref(), &mut notes),
    };

    Ok(NormalizedInput {
        input: FarmInput {
            latitude,
            longitude,
            land_area_acres,
            investment_capacity,
            soil_tier,
            soil,
            climate,
        },
        degradations: notes,
    })
}

fn required_number(field: &'static str, value: Option<&RawField>) -> PlanResult<f64> {
    value
        .ok_or_else(|| PlanError::validation(field, "missing"))?
        .parse()
        .map_err(|reason| PlanError::validation(field, reason))
}

fn optional_number(field: &str, value: Option<&RawField>, notes: &mut Vec<Degradation>) -> Option<f64> {
    match value?.parse() {
        Ok(v) => Some(v),
        Err(reason) => {
            notes.push(Degradation::new(field, format!("{}; ignored", reason)));
            None
        }
    }
}

/// Optional value that must also be non-negative
fn optional_fraction(field: &str, value: Option<&RawField>, notes: &mut Vec<Degradation>) -> Option<f64> {
    let v = optional_number(field, value, notes)?;
    if v < 0.0 {
        notes.push(Degradation::new(field, format!("negative value {} ignored", v)));
        return None;
    }
    Some(v)
}

fn check_latitude(latitude: f64) -> PlanResult<()> {
    if latitude.is_finite() && (-90.0..=90.0).contains(&latitude) {
        Ok(())
    } else {
        Err(PlanError::validation("latitude", format!("{} is outside [-90, 90]", latitude)))
    }
}

fn check_longitude(longitude: f64) -> PlanResult<()> {
    if longitude.is_finite() && (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(PlanError::validation("longitude", format!("{} is outside [-180, 180]", longitude)))
    }
}

fn check_land_area(acres: f64) -> PlanResult<()> {
    if acres.is_finite() && acres > 0.0 {
        Ok(())
    } else {
        Err(PlanError::validation("land_area_acres", format!("{} must be greater than zero", acres)))
    }
}

fn check_non_negative(field: &'static str, value: Option<f64>) -> PlanResult<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(PlanError::validation(field, format!("{} must be a non-negative number", v)))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_farm() -> RawFarmInput {
        RawFarmInput {
            latitude: Some("15.8221".into()),
            longitude: Some(75.0302.into()),
            land_area_acres: Some(" 2.5 ".into()),
            investment_capacity: Some("Medium".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parses_string_numbers() {
        let normalized = normalize(&raw_farm()).unwrap();
        assert_eq!(normalized.input.latitude, 15.8221);
        assert_eq!(normalized.input.land_area_acres, 2.5);
        assert_eq!(normalized.input.investment_capacity, InvestmentCapacity::Medium);
        assert!(normalized.degradations.is_empty());
    }

    #[test]
    fn test_missing_longitude_is_rejected() {
        let raw = RawFarmInput { longitude: None, ..raw_farm() };
        let err = normalize(&raw).unwrap_err();
        assert_eq!(err, PlanError::validation("longitude", "missing"));
    }

    #[test]
    fn test_non_numeric_required_fields() {
        let raw = RawFarmInput { latitude: Some("north".into()), ..raw_farm() };
        assert!(matches!(normalize(&raw), Err(PlanError::Validation { field: "latitude", .. })));

        let raw = RawFarmInput { land_area_acres: Some("0".into()), ..raw_farm() };
        assert!(matches!(normalize(&raw), Err(PlanError::Validation { field: "land_area_acres", .. })));

        let raw = RawFarmInput { longitude: Some(190.0.into()), ..raw_farm() };
        assert!(matches!(normalize(&raw), Err(PlanError::Validation { field: "longitude", .. })));
    }

    #[test]
    fn test_investment_capacity_defaults_to_medium() {
        let raw = RawFarmInput { investment_capacity: None, ..raw_farm() };
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized.input.investment_capacity, InvestmentCapacity::Medium);
        assert_eq!(normalized.degradations.len(), 1);
        assert_eq!(normalized.degradations[0].field, "investment_capacity");
    }

    #[test]
    fn test_bad_optional_fields_degrade() {
        let raw = RawFarmInput {
            soil_ph: Some("acidic".into()),
            sand_pct: Some((-10.0).into()),
            clay_pct: Some("20".into()),
            ..raw_farm()
        };
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized.input.soil.ph, None);
        assert_eq!(normalized.input.soil.sand_pct, None);
        assert_eq!(normalized.input.soil.clay_pct, Some(20.0));
        assert_eq!(normalized.degradations.len(), 2);
    }

    #[test]
    fn test_deserialize_with_aliases() {
        let raw: RawFarmInput = serde_json::from_str(
            r#"{"latitude": 12.97, "longitude": "77.59", "land_area": 5, "sand": 60, "soil_type": "sandy"}"#,
        )
        .unwrap();
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized.input.land_area_acres, 5.0);
        assert_eq!(normalized.input.soil.sand_pct, Some(60.0));
        assert_eq!(normalized.input.soil_tier, Some(SoilTier::Sandy));
    }

    #[test]
    fn test_fill_missing_keeps_observed_values() {
        let mut soil = SoilObservation { ph: Some(6.0), ..Default::default() };
        let provider = SoilObservation { ph: Some(7.5), cec: Some(12.0), ..Default::default() };
        soil.fill_missing_from(&provider);
        assert_eq!(soil.ph, Some(6.0));
        assert_eq!(soil.cec, Some(12.0));
        assert!(!soil.is_complete());
    }

    #[test]
    fn test_partial_texture_is_not_mixed_with_provider() {
        let provider = SoilObservation {
            sand_pct: Some(30.0),
            silt_pct: Some(25.0),
            clay_pct: Some(45.0),
            ..Default::default()
        };

        // Two fractions given: the clay remainder stays with the farmer's sample
        let mut soil = SoilObservation { sand_pct: Some(60.0), silt_pct: Some(30.0), ..Default::default() };
        soil.fill_missing_from(&provider);
        assert_eq!(soil.clay_pct, None);
        assert_eq!(soil.sand_pct, Some(60.0));

        // A lone fraction cannot be classified, so the provider's texture replaces it
        let mut soil = SoilObservation { sand_pct: Some(60.0), ..Default::default() };
        soil.fill_missing_from(&provider);
        assert_eq!((soil.sand_pct, soil.silt_pct, soil.clay_pct), (Some(30.0), Some(25.0), Some(45.0)));
    }

    #[test]
    fn test_validate_rejects_negative_texture() {
        let farm = FarmInput::at(15.8, 75.0, 2.0).with_texture(-5.0, 60.0, 45.0);
        assert!(matches!(farm.validate(), Err(PlanError::Validation { field: "sand_pct", .. })));

        let farm = FarmInput::at(15.8, 75.0, 2.0).with_rainfall(f64::NAN);
        assert!(matches!(farm.validate(), Err(PlanError::Validation { field: "avg_rainfall_mm", .. })));

        assert!(FarmInput::at(15.8, 75.0, 2.0).with_texture(40.0, 40.0, 20.0).validate().is_ok());
    }

    #[test]
    fn test_unknown_soil_type_degrades_to_texture() {
        let raw = RawFarmInput { soil_tier: Some("volcanic".to_string()), ..raw_farm() };
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized.input.soil_tier, None);
        assert_eq!(normalized.degradations.len(), 1);
        assert_eq!(normalized.degradations[0].field, "soil_tier");
        assert!(normalized.degradations[0].message.contains("volcanic"));
    }
}
