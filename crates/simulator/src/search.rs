//! Exhaustive search for the lowest-risk plan over a discrete candidate grid.
//!
//! The candidate sets are built once from the baseline and configuration.
//! Enumeration order is smoking, exercise, diet, weight, alcohol (outermost
//! first), and ties on total risk keep the earliest candidate.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    adjustments::{DietTier, PlanChoice},
    batch::score_all,
    config::SearchConfig,
    errors::PredictionError,
    models::HealthProfile,
    mutator,
    predictor::RiskPredictor,
};

/// Declared candidate values for each dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSpace {
    pub smoking: Vec<bool>,
    pub exercise: Vec<bool>,
    pub diet: Vec<DietTier>,
    pub weight_loss_kg: Vec<u32>,
    pub alcohol_per_week: Vec<u32>,
}

impl SearchSpace {
    pub fn for_baseline(baseline: &HealthProfile, config: &SearchConfig) -> Self {
        // Never recommend starting to smoke or stopping exercise.
        let smoking = vec![false];
        let exercise = if baseline.exercises() {
            vec![true]
        } else {
            vec![false, true]
        };

        let current = baseline.alcohol_drinks();
        let alcohol_per_week = if current <= config.low_alcohol_threshold {
            vec![current]
        } else {
            let mut values = vec![current];
            values.extend(
                config
                    .alcohol_reductions
                    .iter()
                    .map(|r| current.saturating_sub(*r)),
            );
            values.push(0);
            dedup_in_order(values)
        };

        Self {
            smoking,
            exercise,
            diet: DietTier::ALL.to_vec(),
            weight_loss_kg: config.weight_grid.clone(),
            alcohol_per_week,
        }
    }

    pub fn len(&self) -> usize {
        self.smoking.len()
            * self.exercise.len()
            * self.diet.len()
            * self.weight_loss_kg.len()
            * self.alcohol_per_week.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lazily enumerate every combination in search order.
    pub fn candidates(&self) -> impl Iterator<Item = PlanChoice> + '_ {
        self.smoking.iter().flat_map(move |&smoking| {
            self.exercise.iter().flat_map(move |&exercise| {
                self.diet.iter().flat_map(move |&diet| {
                    self.weight_loss_kg.iter().flat_map(move |&weight_loss_kg| {
                        self.alcohol_per_week
                            .iter()
                            .map(move |&alcohol_per_week| PlanChoice {
                                weight_loss_kg,
                                exercise,
                                smoking,
                                diet,
                                alcohol_per_week,
                            })
                    })
                })
            })
        })
    }
}

fn dedup_in_order(values: Vec<u32>) -> Vec<u32> {
    let mut out = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

/// A fully specified plan and its projected risks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalCandidate {
    pub plan: PlanChoice,
    pub diabetes_risk: f64,
    pub heart_risk: f64,
    pub total_risk: f64,
}

/// Keep `best` unless `next` is strictly lower. Earlier candidates win ties.
pub fn keep_lower(best: Option<OptimalCandidate>, next: OptimalCandidate) -> Option<OptimalCandidate> {
    match best {
        Some(current) if next.total_risk < current.total_risk => Some(next),
        Some(current) => Some(current),
        None => Some(next),
    }
}

/// Score the full search space and return the minimum-total-risk plan.
///
/// Returns `Ok(None)` only for an empty search space. Any failed request fails
/// the search.
pub async fn find_optimal(
    predictor: &dyn RiskPredictor,
    baseline: &HealthProfile,
    space: &SearchSpace,
) -> Result<Option<OptimalCandidate>, PredictionError> {
    let plans: Vec<PlanChoice> = space.candidates().collect();
    let profiles: Vec<_> = plans.iter().map(|p| mutator::apply(baseline, p)).collect();

    let assessments = score_all(predictor, &profiles).await?;

    let best = plans
        .into_iter()
        .zip(assessments)
        .map(|(plan, a)| OptimalCandidate {
            plan,
            diabetes_risk: a.diabetes_risk,
            heart_risk: a.heart_disease_risk,
            total_risk: a.total_risk(),
        })
        .fold(None, keep_lower);

    if let Some(best) = &best {
        info!(
            candidates = space.len(),
            total_risk = best.total_risk,
            weight_loss_kg = best.plan.weight_loss_kg,
            exercise = best.plan.exercise,
            diet = best.plan.diet.as_str(),
            alcohol_per_week = best.plan.alcohol_per_week,
            "Optimal plan found"
        );
    }
    Ok(best)
}
