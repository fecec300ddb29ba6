//! Fan-out / fan-in scoring of a batch of candidate profiles.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::{
    errors::PredictionError,
    models::{CandidateProfile, RiskAssessment},
    predictor::RiskPredictor,
};

/// Score every candidate concurrently and wait for all of them to settle.
///
/// Results keep the input order. If any request fails the whole batch fails
/// with the first failure in input order; there is no partial result.
pub async fn score_all(
    predictor: &dyn RiskPredictor,
    candidates: &[CandidateProfile],
) -> Result<Vec<RiskAssessment>, PredictionError> {
    debug!(requests = candidates.len(), "Issuing scoring batch");

    let settled = join_all(candidates.iter().map(|c| predictor.predict(c))).await;

    let failures = settled.iter().filter(|r| r.is_err()).count();
    if failures > 0 {
        warn!(
            failures,
            requests = candidates.len(),
            "Scoring batch failed"
        );
    }

    settled.into_iter().collect()
}
