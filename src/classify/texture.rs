//! USDA Soil Texture Classification
//!
//! Polygon-based texture classification on the USDA texture triangle, using
//! ray casting on transformed coordinates where x = 0.5 * clay + silt, y = clay.
//! Field observations rarely sum to exactly 100%, so fractions are rescaled
//! before the triangle is consulted.

use serde::{Deserialize, Serialize};

use crate::input::SoilObservation;

/// Sand/silt/clay shares rescaled to sum to 100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureFractions {
    pub sand: f64,
    pub silt: f64,
    pub clay: f64,
}

impl TextureFractions {
    /// Rescale raw percentages. None if any value is negative or non-finite,
    /// or if the total is zero.
    pub fn new(sand: f64, silt: f64, clay: f64) -> Option<Self> {
        let parts = [sand, silt, clay];
        if parts.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return None;
        }
        let total: f64 = parts.iter().sum();
        if total <= 0.0 {
            return None;
        }
        Some(Self {
            sand: sand * 100.0 / total,
            silt: silt * 100.0 / total,
            clay: clay * 100.0 / total,
        })
    }

    /// Build from a (possibly partial) soil observation. With exactly one
    /// fraction missing, it is taken as the remainder to 100%.
    pub fn from_observation(soil: &SoilObservation) -> Option<Self> {
        match (soil.sand_pct, soil.silt_pct, soil.clay_pct) {
            (Some(sand), Some(silt), Some(clay)) => Self::new(sand, silt, clay),
            (Some(sand), None, Some(clay)) => Self::new(sand, (100.0 - sand - clay).max(0.0), clay),
            (None, Some(silt), Some(clay)) => Self::new((100.0 - silt - clay).max(0.0), silt, clay),
            (Some(sand), Some(silt), None) => Self::new(sand, silt, (100.0 - sand - silt).max(0.0)),
            _ => None,
        }
    }

    /// Position on the texture triangle
    fn to_cartesian(self) -> (f64, f64) {
        (0.5 * self.clay + self.silt, self.clay)
    }
}

/// The 12 USDA texture classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsdaTextureClass {
    Sand,
    LoamySand,
    SandyLoam,
    Loam,
    SiltLoam,
    Silt,
    SandyClayLoam,
    ClayLoam,
    SiltyClayLoam,
    SandyClay,
    SiltyClay,
    Clay,
}

/// Qualitative drainage class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drainage {
    Poor,
    Moderate,
    Good,
}

/// Triangle vertex in transformed coordinates
#[derive(Clone, Copy, Debug)]
struct Vertex {
    x: f64,
    y: f64,
}

/// Vertex from clay and silt percentages (sand is the remainder)
const fn tv(clay: f64, silt: f64) -> Vertex {
    Vertex { x: 0.5 * clay + silt, y: clay }
}

// Source: USDA texture triangle (ggsoiltexture polygon set)
static SAND: &[Vertex] = &[tv(10.0, 0.0), tv(0.0, 0.0), tv(0.0, 15.0)];
static LOAMY_SAND: &[Vertex] = &[tv(15.0, 0.0), tv(10.0, 0.0), tv(0.0, 15.0), tv(0.0, 30.0)];
static SANDY_LOAM: &[Vertex] = &[
    tv(20.0, 0.0), tv(15.0, 0.0), tv(0.0, 30.0), tv(0.0, 50.0),
    tv(5.0, 50.0), tv(5.0, 42.5), tv(20.0, 27.5),
];
static LOAM: &[Vertex] = &[
    tv(27.5, 27.5), tv(20.0, 27.5), tv(5.0, 42.5), tv(5.0, 50.0), tv(27.5, 50.0),
];
static SILT_LOAM: &[Vertex] = &[
    tv(27.5, 50.0), tv(0.0, 50.0), tv(0.0, 80.0), tv(12.5, 80.0), tv(12.5, 87.5), tv(27.5, 72.5),
];
static SILT: &[Vertex] = &[tv(12.5, 80.0), tv(0.0, 80.0), tv(0.0, 100.0), tv(12.5, 87.5)];
static SANDY_CLAY_LOAM: &[Vertex] = &[
    tv(35.0, 0.0), tv(20.0, 0.0), tv(20.0, 27.5), tv(27.5, 27.5), tv(35.0, 20.0),
];
static CLAY_LOAM: &[Vertex] = &[tv(40.0, 15.0), tv(27.5, 27.5), tv(27.5, 52.5), tv(40.0, 40.0)];
static SILTY_CLAY_LOAM: &[Vertex] = &[tv(40.0, 40.0), tv(27.5, 52.5), tv(27.5, 72.5), tv(40.0, 60.0)];
static SANDY_CLAY: &[Vertex] = &[tv(55.0, 0.0), tv(35.0, 0.0), tv(35.0, 20.0)];
static SILTY_CLAY: &[Vertex] = &[tv(60.0, 40.0), tv(40.0, 40.0), tv(40.0, 60.0)];
static CLAY: &[Vertex] = &[
    tv(100.0, 0.0), tv(55.0, 0.0), tv(40.0, 15.0), tv(40.0, 40.0), tv(60.0, 40.0),
];

/// Checked first to last
static POLYGONS: &[(UsdaTextureClass, &[Vertex])] = &[
    (UsdaTextureClass::Sand, SAND),
    (UsdaTextureClass::LoamySand, LOAMY_SAND),
    (UsdaTextureClass::SandyLoam, SANDY_LOAM),
    (UsdaTextureClass::Loam, LOAM),
    (UsdaTextureClass::SiltLoam, SILT_LOAM),
    (UsdaTextureClass::Silt, SILT),
    (UsdaTextureClass::SandyClayLoam, SANDY_CLAY_LOAM),
    (UsdaTextureClass::ClayLoam, CLAY_LOAM),
    (UsdaTextureClass::SiltyClayLoam, SILTY_CLAY_LOAM),
    (UsdaTextureClass::SandyClay, SANDY_CLAY),
    (UsdaTextureClass::SiltyClay, SILTY_CLAY),
    (UsdaTextureClass::Clay, CLAY),
];

impl UsdaTextureClass {
    /// Classify rescaled fractions on the texture triangle
    pub fn classify(fractions: &TextureFractions) -> Self {
        let (x, y) = fractions.to_cartesian();

        POLYGONS
            .iter()
            .find(|(_, vertices)| point_in_polygon(x, y, vertices))
            .map(|(class, _)| *class)
            .unwrap_or_else(|| Self::boundary_fallback(fractions))
    }

    /// Points exactly on a polygon edge can miss every ray-casting test;
    /// fall back to the dominant component.
    fn boundary_fallback(f: &TextureFractions) -> Self {
        if f.clay > 40.0 {
            UsdaTextureClass::Clay
        } else if f.sand > 85.0 {
            UsdaTextureClass::Sand
        } else if f.sand > 70.0 {
            UsdaTextureClass::LoamySand
        } else if f.silt > 80.0 {
            UsdaTextureClass::Silt
        } else if f.silt > 70.0 {
            UsdaTextureClass::SiltLoam
        } else {
            UsdaTextureClass::Loam
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UsdaTextureClass::Sand => "Sand",
            UsdaTextureClass::LoamySand => "Loamy Sand",
            UsdaTextureClass::SandyLoam => "Sandy Loam",
            UsdaTextureClass::Loam => "Loam",
            UsdaTextureClass::SiltLoam => "Silt Loam",
            UsdaTextureClass::Silt => "Silt",
            UsdaTextureClass::SandyClayLoam => "Sandy Clay Loam",
            UsdaTextureClass::ClayLoam => "Clay Loam",
            UsdaTextureClass::SiltyClayLoam => "Silty Clay Loam",
            UsdaTextureClass::SandyClay => "Sandy Clay",
            UsdaTextureClass::SiltyClay => "Silty Clay",
            UsdaTextureClass::Clay => "Clay",
        }
    }

    pub fn drainage(&self) -> Drainage {
        match self {
            UsdaTextureClass::Sand
            | UsdaTextureClass::LoamySand
            | UsdaTextureClass::SandyLoam
            | UsdaTextureClass::Loam => Drainage::Good,
            UsdaTextureClass::SiltLoam
            | UsdaTextureClass::SandyClayLoam
            | UsdaTextureClass::ClayLoam
            | UsdaTextureClass::SiltyClayLoam => Drainage::Moderate,
            UsdaTextureClass::Silt
            | UsdaTextureClass::SandyClay
            | UsdaTextureClass::SiltyClay
            | UsdaTextureClass::Clay => Drainage::Poor,
        }
    }

    /// Field advice for the texture
    pub fn advice(&self) -> &'static str {
        match self {
            UsdaTextureClass::Sand | UsdaTextureClass::LoamySand => {
                "Light soil; nutrients leach quickly, so mulch heavily and apply compost before each season"
            }
            UsdaTextureClass::SandyLoam | UsdaTextureClass::Loam => {
                "Well-balanced soil; suits most trees and field crops"
            }
            UsdaTextureClass::SiltLoam | UsdaTextureClass::Silt => {
                "Fertile but compacts and crusts when wet; keep ground covered and avoid working it wet"
            }
            UsdaTextureClass::SandyClayLoam | UsdaTextureClass::ClayLoam | UsdaTextureClass::SiltyClayLoam => {
                "Heavy but fertile; raised beds and organic matter improve drainage"
            }
            UsdaTextureClass::SandyClay | UsdaTextureClass::SiltyClay | UsdaTextureClass::Clay => {
                "Prone to waterlogging; plant trees on mounds and dig drainage channels between rows"
            }
        }
    }
}

/// Ray casting point-in-polygon test
fn point_in_polygon(x: f64, y: f64, vertices: &[Vertex]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if ((vi.y > y) != (vj.y > y)) && (x < (vj.x - vi.x) * (y - vi.y) / (vj.y - vi.y) + vi.x) {
            inside = !inside;
        }
        j = i;
    }
    inside
}
