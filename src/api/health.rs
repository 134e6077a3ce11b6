use crate::error::ApiResult;
use crate::models::HealthStatus;
use crate::network::{ApiClient, RequestOptions};

/// Result of probing both liveness endpoints
#[derive(Debug)]
pub struct Diagnostics {
    pub base_url: String,
    pub health: ApiResult<HealthStatus>,
    pub actuator: ApiResult<HealthStatus>,
}

impl Diagnostics {
    /// True when either probe answered.
    pub fn reachable(&self) -> bool {
        self.health.is_ok() || self.actuator.is_ok()
    }
}

impl ApiClient {
    /// `GET /health`
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.request("/health", RequestOptions::get(), None).await
    }

    /// `GET /actuator/health`, served beside the API prefix rather than under it
    pub async fn actuator_health(&self) -> ApiResult<HealthStatus> {
        let url = format!("{}/actuator/health", self.origin());
        let prepared = self.prepare_url(&url, &RequestOptions::get(), None)?;
        self.execute(&prepared, self.retry_policy()).await
    }

    /// Probe both endpoints once each, never failing.
    pub async fn diagnose(&self) -> Diagnostics {
        let policy = self.retry_policy().with_attempts(1);
        let actuator = match self.prepare_url(
            &format!("{}/actuator/health", self.origin()),
            &RequestOptions::get(),
            None,
        ) {
            Ok(prepared) => self.execute(&prepared, policy).await,
            Err(e) => Err(e),
        };
        let health = match self.prepare("/health", &RequestOptions::get(), None) {
            Ok(prepared) => self.execute(&prepared, policy).await,
            Err(e) => Err(e),
        };

        tracing::info!(
            base_url = %self.base_url(),
            health_ok = health.is_ok(),
            actuator_ok = actuator.is_ok(),
            "Diagnostics complete"
        );

        Diagnostics {
            base_url: self.base_url().to_string(),
            health,
            actuator,
        }
    }
}
