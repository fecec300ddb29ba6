//! A simulator session: one baseline, one predictor, and the latest results.

use std::sync::Arc;

use tracing::{Instrument, Span, error, info_span};
use uuid::Uuid;

use crate::{
    config::SimulatorConfig,
    errors::SimError,
    live::LiveRecalculation,
    models::{HealthProfile, RiskAssessment},
    predictor::RiskPredictor,
    search::{OptimalCandidate, SearchSpace, find_optimal},
    trajectory::{TrajectoryPoint, TrajectorySampler},
};

/// Owns everything scoped to one run of the simulator.
///
/// Trajectory and optimal results are replaced wholesale on success and left
/// as they were when a run fails.
pub struct SimulatorSession {
    id: Uuid,
    baseline: Arc<HealthProfile>,
    baseline_assessment: Option<RiskAssessment>,
    predictor: Arc<dyn RiskPredictor>,
    config: SimulatorConfig,
    span: Span,
    trajectory: Option<Vec<TrajectoryPoint>>,
    optimal: Option<OptimalCandidate>,
}

impl SimulatorSession {
    pub fn new(
        baseline: HealthProfile,
        baseline_assessment: Option<RiskAssessment>,
        predictor: Arc<dyn RiskPredictor>,
        config: SimulatorConfig,
    ) -> Self {
        let id = Uuid::new_v4();
        let span = info_span!("simulation", session_id = %id);
        Self {
            id,
            baseline: Arc::new(baseline),
            baseline_assessment,
            predictor,
            config,
            span,
            trajectory: None,
            optimal: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn baseline(&self) -> &HealthProfile {
        &self.baseline
    }

    pub fn baseline_assessment(&self) -> Option<&RiskAssessment> {
        self.baseline_assessment.as_ref()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Start the live controller with an initial recomputation scheduled.
    pub fn live(&self) -> LiveRecalculation {
        let _entered = self.span.enter();
        let mut live = LiveRecalculation::new(
            self.baseline.clone(),
            self.baseline_assessment.as_ref(),
            self.predictor.clone(),
            &self.config.live,
        );
        live.refresh();
        live
    }

    pub fn search_space(&self) -> SearchSpace {
        SearchSpace::for_baseline(&self.baseline, &self.config.search)
    }

    pub async fn sample_trajectory(&mut self) -> Result<&[TrajectoryPoint], SimError> {
        let sampler = TrajectorySampler::new(&self.config.trajectory);
        let points = sampler
            .sample(self.predictor.as_ref(), &self.baseline)
            .instrument(self.span.clone())
            .await
            .inspect_err(|e| {
                let _entered = self.span.enter();
                error!("Trajectory sampling failed: {e}");
            })?;
        Ok(self.trajectory.insert(points))
    }

    /// Search for the lowest-risk plan. `None` only when the configured
    /// search space is empty.
    pub async fn find_optimal_plan(&mut self) -> Result<Option<OptimalCandidate>, SimError> {
        let space = self.search_space();
        let best = find_optimal(self.predictor.as_ref(), &self.baseline, &space)
            .instrument(self.span.clone())
            .await
            .inspect_err(|e| {
                let _entered = self.span.enter();
                error!("Optimal plan search failed: {e}");
            })?;
        if best.is_some() {
            self.optimal = best;
        }
        Ok(best)
    }

    pub fn trajectory(&self) -> Option<&[TrajectoryPoint]> {
        self.trajectory.as_deref()
    }

    pub fn optimal(&self) -> Option<&OptimalCandidate> {
        self.optimal.as_ref()
    }
}
