//! Planner Configuration
//!
//! Every field has a default, so an empty JSON object is a valid config file.
//! Loaded once at start-up:
//!
//! - `PLANNER_CONFIG` - path to a JSON config file
//! - `PROVIDER_TIMEOUT_MS` - overrides `provider.timeout_ms`
//! - `PROVIDER_RETRIES` - overrides `provider.max_attempts`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::classify::InvestmentCapacity;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub provider: ProviderConfig,
    pub economics: EconomicsConfig,

    /// Catalog JSON; the built-in catalog is used when absent
    pub catalog_path: Option<PathBuf>,
}

/// Provider fetch policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Per-attempt deadline
    pub timeout_ms: u64,
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Reference-site providers answer only within this distance
    pub reference_radius_km: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            max_attempts: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 2000,
            reference_radius_km: 250.0,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay before retry number `retry` (1-based), doubling up to the cap
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry.saturating_sub(1));
        let ms = std::cmp::min(self.initial_backoff_ms.saturating_mul(factor), self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

/// Investment band for one capacity tier, in INR
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    /// Open-ended when absent
    pub max: Option<f64>,
}

impl Band {
    pub fn clamp(&self, value: f64) -> f64 {
        let lower = value.max(self.min);
        match self.max {
            Some(max) => lower.min(max),
            None => lower,
        }
    }
}

/// Investment rates and land allocation used by the economic projector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    pub low_rate_per_acre: f64,
    pub medium_rate_per_acre: f64,
    pub high_rate_per_acre: f64,

    pub low_band: Band,
    pub medium_band: Band,
    pub high_band: Band,

    /// Fraction of land under canopy trees; the rest is cropped
    pub tree_share: f64,
    /// Split of the cropped area between main crop and intercrop
    pub main_crop_share: f64,
    pub intercrop_share: f64,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            low_rate_per_acre: 15_000.0,
            medium_rate_per_acre: 30_000.0,
            high_rate_per_acre: 45_000.0,
            // Low starts above zero so ROI is always defined
            low_band: Band { min: 5_000.0, max: Some(50_000.0) },
            medium_band: Band { min: 50_000.0, max: Some(100_000.0) },
            high_band: Band { min: 100_000.0, max: None },
            tree_share: 0.2,
            main_crop_share: 0.6,
            intercrop_share: 0.4,
        }
    }
}

impl EconomicsConfig {
    pub fn rate_per_acre(&self, capacity: InvestmentCapacity) -> f64 {
        match capacity {
            InvestmentCapacity::Low => self.low_rate_per_acre,
            InvestmentCapacity::Medium => self.medium_rate_per_acre,
            InvestmentCapacity::High => self.high_rate_per_acre,
        }
    }

    pub fn band(&self, capacity: InvestmentCapacity) -> Band {
        match capacity {
            InvestmentCapacity::Low => self.low_band,
            InvestmentCapacity::Medium => self.medium_band,
            InvestmentCapacity::High => self.high_band,
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, band) in [("low", self.low_band), ("medium", self.medium_band), ("high", self.high_band)] {
            if !(band.min > 0.0) {
                anyhow::bail!("Investment band '{}' must start above zero", name);
            }
            if let Some(max) = band.max {
                if max < band.min {
                    anyhow::bail!("Investment band '{}' has max {} below min {}", name, max, band.min);
                }
            }
        }
        for (name, share) in [
            ("tree_share", self.tree_share),
            ("main_crop_share", self.main_crop_share),
            ("intercrop_share", self.intercrop_share),
        ] {
            if !(0.0..=1.0).contains(&share) {
                anyhow::bail!("{} must be within [0, 1], got {}", name, share);
            }
        }
        if self.main_crop_share + self.intercrop_share > 1.0 + 1e-9 {
            anyhow::bail!("main_crop_share + intercrop_share exceeds the cropped area");
        }
        Ok(())
    }
}

impl PlannerConfig {
    /// Load configuration from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: PlannerConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        config.economics.validate()?;
        Ok(config)
    }

    /// Defaults, then `PLANNER_CONFIG`, then individual overrides
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`PlannerConfig::from_env`], reading variables through `var`
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match var("PLANNER_CONFIG") {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(value) = var("PROVIDER_TIMEOUT_MS") {
            config.provider.timeout_ms = value
                .parse()
                .with_context(|| format!("PROVIDER_TIMEOUT_MS is not an integer: {}", value))?;
        }
        if let Some(value) = var("PROVIDER_RETRIES") {
            config.provider.max_attempts = value
                .parse()
                .with_context(|| format!("PROVIDER_RETRIES is not an integer: {}", value))?;
        }
        if config.provider.max_attempts == 0 {
            anyhow::bail!("provider.max_attempts must be at least 1");
        }

        Ok(config)
    }
}
