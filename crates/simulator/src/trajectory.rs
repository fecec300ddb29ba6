//! Weight-loss trajectory sampling.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    batch::score_all,
    config::TrajectoryConfig,
    errors::PredictionError,
    models::HealthProfile,
    mutator,
    predictor::RiskPredictor,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub weight_loss_kg: u32,
    pub diabetes_risk: f64,
    pub heart_risk: f64,
}

/// Samples projected risk across a fixed weight-loss grid, all other fields at
/// baseline.
#[derive(Debug, Clone)]
pub struct TrajectorySampler {
    grid: Vec<u32>,
}

impl TrajectorySampler {
    pub fn new(config: &TrajectoryConfig) -> Self {
        Self {
            grid: config.grid(),
        }
    }

    pub fn grid(&self) -> &[u32] {
        &self.grid
    }

    /// Score the whole grid concurrently. Points come back in grid order; a
    /// single failed request fails the sample.
    pub async fn sample(
        &self,
        predictor: &dyn RiskPredictor,
        baseline: &HealthProfile,
    ) -> Result<Vec<TrajectoryPoint>, PredictionError> {
        let candidates: Vec<_> = self
            .grid
            .iter()
            .map(|&kg| mutator::with_weight_loss(baseline, kg))
            .collect();

        let assessments = score_all(predictor, &candidates).await?;

        let points: Vec<_> = self
            .grid
            .iter()
            .zip(assessments)
            .map(|(&weight_loss_kg, a)| TrajectoryPoint {
                weight_loss_kg,
                diabetes_risk: a.diabetes_risk,
                heart_risk: a.heart_disease_risk,
            })
            .collect();

        info!(points = points.len(), "Sampled weight-loss trajectory");
        Ok(points)
    }
}

impl Default for TrajectorySampler {
    fn default() -> Self {
        Self::new(&TrajectoryConfig::default())
    }
}
