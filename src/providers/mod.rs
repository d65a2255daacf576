//! Soil and climate data providers
//!
//! Providers sit outside the pure pipeline. A planning run asks them only for
//! observations the farmer did not supply, and every call goes through
//! [`fetch_with_retry`]: each attempt is bounded by the configured timeout,
//! transient failures are retried with exponential backoff, and whatever is
//! left after the last attempt becomes `PlanError::DataUnavailable`.

pub mod reference_sites;

use std::future::Future;

use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::error::{PlanError, PlanResult};
use crate::input::{ClimateObservation, SoilObservation};

pub use reference_sites::{nearest_site, ReferenceSite, ReferenceSites};

/// Failure reported by a single provider attempt
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// Worth retrying (network hiccup, rate limit, 5xx)
    #[error("transient failure: {0}")]
    Transient(String),

    /// The provider has no data for this location; retrying will not help
    #[error("no coverage: {0}")]
    NoCoverage(String),
}

#[async_trait]
pub trait SoilDataProvider: Send + Sync {
    async fn soil_at(&self, latitude: f64, longitude: f64) -> Result<SoilObservation, FetchError>;
}

#[async_trait]
pub trait ClimateDataProvider: Send + Sync {
    async fn climate_at(&self, latitude: f64, longitude: f64) -> Result<ClimateObservation, FetchError>;
}

/// Run `attempt` until it succeeds, fails permanently, or attempts run out
pub async fn fetch_with_retry<T, F, Fut>(
    provider: &'static str,
    policy: &ProviderConfig,
    mut attempt: F,
) -> PlanResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;

        let reason = match tokio::time::timeout(policy.timeout(), attempt()).await {
            Ok(Ok(value)) => {
                tracing::debug!(provider, attempts, "Provider fetch succeeded");
                return Ok(value);
            }
            Ok(Err(FetchError::NoCoverage(reason))) => {
                return Err(PlanError::data_unavailable(provider, reason));
            }
            Ok(Err(FetchError::Transient(reason))) => reason,
            Err(_) => format!("timed out after {}ms", policy.timeout_ms),
        };

        if attempts >= max_attempts {
            tracing::error!(provider, attempts, reason = %reason, "Provider fetch exhausted retries");
            return Err(PlanError::data_unavailable(
                provider,
                format!("{} (after {} attempts)", reason, attempts),
            ));
        }

        let backoff = policy.backoff(attempts);
        tracing::warn!(
            provider,
            attempts,
            backoff_ms = backoff.as_millis() as u64,
            reason = %reason,
            "Provider fetch failed, retrying"
        );
        tokio::time::sleep(backoff).await;
    }
}
