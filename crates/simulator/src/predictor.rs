//! Risk prediction service boundary.
//!
//! The engine only needs something that maps a profile to a [`RiskAssessment`].
//! [`HttpRiskPredictor`] talks to the deployed service; tests and demos plug in
//! their own implementations.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    errors::PredictionError,
    models::{HealthProfile, RiskAssessment},
};

/// Maps a health profile to a risk assessment.
///
/// Implementations must be pure in the profile: the engine may call them any
/// number of times, concurrently, and ignores results it no longer needs.
#[async_trait]
pub trait RiskPredictor: Send + Sync {
    async fn predict(&self, profile: &HealthProfile) -> Result<RiskAssessment, PredictionError>;
}

/// Error body returned by the risk service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Client for the risk service's `POST /predict` endpoint.
#[derive(Debug, Clone)]
pub struct HttpRiskPredictor {
    client: Client,
    base_url: String,
}

impl HttpRiskPredictor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks that the service is up.
    pub async fn check_health(&self) -> Result<(), PredictionError> {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => Err(PredictionError::Unreachable(format!(
                "Health check returned status {}",
                resp.status()
            ))),
            Err(e) => Err(PredictionError::Unreachable(e.to_string())),
        }
    }
}

#[async_trait]
impl RiskPredictor for HttpRiskPredictor {
    async fn predict(&self, profile: &HealthProfile) -> Result<RiskAssessment, PredictionError> {
        let url = format!("{}/predict", self.base_url);
        let resp = self.client.post(&url).json(profile).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PredictionError::Rejected {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        let body = resp.bytes().await?;
        let assessment: RiskAssessment = serde_json::from_slice(&body)
            .map_err(|e| PredictionError::Malformed(e.to_string()))?;
        debug!(
            diabetes = assessment.diabetes_risk,
            heart = assessment.heart_disease_risk,
            "Risk service responded"
        );
        Ok(assessment)
    }
}

/// Pull the human-readable `detail` out of an error body, falling back to the
/// raw text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
