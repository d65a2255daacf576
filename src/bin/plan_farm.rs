//! Plan a single farm from a JSON file
//!
//! Reads raw farm attributes (the same body `/api/plans` accepts) and prints
//! the plan as pretty JSON on stdout. A readable summary is logged to stderr.
//!
//! Usage: cargo run --bin plan_farm -- farm.json

use agroforestry_planner::catalog::{Layer, Plantable};
use agroforestry_planner::{AgroforestryPlan, PaybackPeriod, Planner, PlannerConfig, RawFarmInput};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LAYERS: [Layer; 7] = [
    Layer::CanopyTree,
    Layer::UnderstoryTree,
    Layer::Shrub,
    Layer::Herb,
    Layer::GroundCrop,
    Layer::MainCrop,
    Layer::Intercrop,
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agroforestry_planner=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = std::env::args()
        .nth(1)
        .context("Usage: plan_farm <farm.json>")?;

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read farm file: {}", path))?;
    let raw: RawFarmInput = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse farm JSON: {}", path))?;

    let planner = Planner::from_config(PlannerConfig::from_env()?)?;
    let plan = match planner.generate_plan(&raw).await {
        Ok(plan) => plan,
        Err(err) if err.is_validation() => anyhow::bail!("Fix {} and retry: {}", path, err),
        Err(err) => return Err(err).with_context(|| format!("Could not plan farm from {}", path)),
    };

    log_summary(&plan);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn log_summary(plan: &AgroforestryPlan) {
    tracing::info!(
        "Planned {:.1} acres at {}",
        plan.land_area_acres,
        plan.farm_location.region
    );
    tracing::info!(
        "  Tier: {} / {} soil / {} rainfall",
        plan.tier.farm_size.display_name(),
        plan.tier.soil.display_name(),
        plan.tier.rainfall.display_name()
    );

    tracing::info!("  {} species:", plan.system.all_species().count());
    for layer in LAYERS {
        let species = plan.system.layer(layer);
        if species.is_empty() {
            continue;
        }
        let names: Vec<&str> = species.iter().map(|s| s.name()).collect();
        tracing::info!("    {}: {}", layer.display_name(), names.join(", "));
    }
    if let Some(years) = plan.system.trees().filter_map(|s| s.maturity_years()).max() {
        tracing::info!("  All trees bearing within {} years", years);
    }

    let economics = &plan.economics;
    tracing::info!(
        "  Investment {:.0} INR, expected income {:.0} INR, ROI {:.1}%",
        economics.estimated_investment,
        economics.expected_income,
        economics.roi_percent()
    );
    match economics.payback_period {
        PaybackPeriod::Months(m) => tracing::info!("  Payback in {} months", m),
        PaybackPeriod::NotComputable => tracing::warn!("  Payback not computable: no expected income"),
    }

    let metrics = &plan.sustainability;
    tracing::info!(
        "  Soil health +{}, water savings {}, biodiversity {}, resilience {}",
        metrics.soil_health_increase.label(),
        metrics.water_savings.label(),
        metrics.biodiversity_score.display_name(),
        metrics.climate_resilience.display_name()
    );
}
