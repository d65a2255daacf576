// Axum API Server Module
//
// Purpose: REST API over the planning pipeline
// Plans are cached by normalized input; the pipeline is deterministic, so a
// cached plan is identical to a recomputed one within the TTL.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::input::{normalize, NormalizedInput, RawFarmInput};
use crate::planner::Planner;

/// Largest batch accepted by `/api/plans/batch`
pub const MAX_BATCH_SIZE: usize = 100;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<Planner>,
    pub cache: Cache<String, serde_json::Value>,
}

impl AppState {
    pub async fn new(config: PlannerConfig) -> anyhow::Result<Self> {
        tracing::info!("Initializing planner...");
        let planner = Planner::from_config(config)?;
        tracing::info!("Catalog ready ({} tiers)", planner.catalog().len());
        Ok(Self::with_planner(planner))
    }

    pub fn with_planner(planner: Planner) -> Self {
        tracing::info!("Initializing Moka cache...");
        let cache = Cache::builder()
            .max_capacity(10_000) // 10K entries
            .time_to_live(Duration::from_secs(300)) // 5 min TTL
            .build();

        Self {
            planner: Arc::new(planner),
            cache,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Planning endpoints
        // IMPORTANT: batch route is registered separately from the single-plan route
        .route("/api/plans", post(create_plan))
        .route("/api/plans/batch", post(create_plans_batch))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "catalog_tiers": state.planner.catalog().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Cache key: canonical JSON of the normalized input and its degradations
fn cache_key(normalized: &NormalizedInput) -> Result<String, AppError> {
    serde_json::to_string(&(&normalized.input, &normalized.degradations))
        .map(|json| format!("plan:{}", json))
        .map_err(|e| AppError::Internal(format!("Cache key error: {}", e)))
}

/// Normalize, resolve and plan one farm, going through the cache
async fn plan_one(state: &AppState, raw: &RawFarmInput) -> Result<serde_json::Value, AppError> {
    let normalized = normalize(raw)?;
    let key = cache_key(&normalized)?;

    if let Some(cached) = state.cache.get(&key).await {
        tracing::debug!("Plan cache hit");
        return Ok(cached);
    }

    let NormalizedInput { mut input, mut degradations } = normalized;
    degradations.extend(state.planner.resolve_observations(&mut input).await?);

    // CPU-bound work: run in blocking thread pool
    let planner = state.planner.clone();
    let plan = tokio::task::spawn_blocking(move || planner.plan_resolved(&input, degradations))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    let value = serde_json::to_value(&plan)
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;
    state.cache.insert(key, value.clone()).await;
    Ok(value)
}

async fn create_plan(
    State(state): State<AppState>,
    Json(payload): Json<RawFarmInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let start = std::time::Instant::now();
    let plan = plan_one(&state, &payload).await?;
    tracing::info!("Plan generated in {:?}", start.elapsed());
    Ok(Json(plan))
}

#[derive(Debug, Deserialize)]
struct BatchPlanRequest {
    farms: Vec<RawFarmInput>,
}

/// Plan several farms concurrently; one failing farm does not fail the batch
async fn create_plans_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchPlanRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if req.farms.len() > MAX_BATCH_SIZE {
        return Err(AppError::BadRequest(format!(
            "Batch of {} farms exceeds the limit of {}",
            req.farms.len(),
            MAX_BATCH_SIZE
        )));
    }

    let start = std::time::Instant::now();
    tracing::info!("Batch planning for {} farms", req.farms.len());

    // Provider fetches overlap; results keep request order
    let outcomes = futures::future::join_all(req.farms.iter().map(|raw| plan_one(&state, raw))).await;

    let mut results = Vec::with_capacity(outcomes.len());
    let mut planned = 0usize;
    for outcome in outcomes {
        match outcome {
            Ok(plan) => {
                planned += 1;
                results.push(serde_json::json!({ "plan": plan }));
            }
            Err(e) => results.push(e.to_json()),
        }
    }

    tracing::info!(
        "Batch complete: {}/{} planned in {:?}",
        planned,
        req.farms.len(),
        start.elapsed()
    );

    Ok(Json(serde_json::json!({
        "total_count": req.farms.len(),
        "planned_count": planned,
        "results": results,
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    Plan(PlanError),
    BadRequest(String),
    Internal(String),
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        AppError::Plan(err)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Plan(PlanError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Plan(PlanError::DataUnavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            AppError::Plan(PlanError::Validation { field, .. }) => serde_json::json!({
                "error": self.message(),
                "field": field,
            }),
            _ => serde_json::json!({ "error": self.message() }),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Plan(err) => err.to_string(),
            AppError::BadRequest(msg) | AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if let AppError::Internal(msg) = &self {
            tracing::error!("Internal error: {}", msg);
        }
        (self.status(), Json(self.to_json())).into_response()
    }
}
