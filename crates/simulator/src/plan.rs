//! Human-oriented summary of a simulated plan against the baseline.

use serde::Serialize;

use crate::{
    adjustments::{AdjustmentState, DietTier, PlanChoice},
    models::{HealthProfile, MIN_WEIGHT_KG, RiskAssessment},
    tiers::{RiskTier, improved},
};

/// One change a plan asks of the user, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanChange {
    LoseWeight { kg: u32, from_kg: f64, to_kg: f64 },
    StartExercising,
    QuitSmoking,
    StartSmoking,
    ImproveDiet,
    OptimalDiet,
    ReduceAlcohol { from: u32, to: u32 },
}

impl std::fmt::Display for PlanChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanChange::LoseWeight { kg, from_kg, to_kg } => {
                write!(f, "Lose {kg} kg ({from_kg} kg to {to_kg} kg)")
            }
            PlanChange::StartExercising => f.write_str("Start exercising regularly"),
            PlanChange::QuitSmoking => f.write_str("Quit smoking"),
            PlanChange::StartSmoking => f.write_str("Start smoking (increases risk)"),
            PlanChange::ImproveDiet => {
                f.write_str("Improve diet: more fruit and vegetables, less fried food")
            }
            PlanChange::OptimalDiet => f.write_str("Switch to the optimal diet targets"),
            PlanChange::ReduceAlcohol { from, to } => {
                write!(f, "Reduce alcohol from {from} to {to} drinks/week")
            }
        }
    }
}

/// Compares a plan with the defaults derived from the baseline.
#[derive(Debug, Clone)]
pub struct PlanSummary<'a> {
    baseline: &'a HealthProfile,
    plan: PlanChoice,
}

impl<'a> PlanSummary<'a> {
    pub fn new(baseline: &'a HealthProfile, plan: PlanChoice) -> Self {
        Self { baseline, plan }
    }

    pub fn of_state(baseline: &'a HealthProfile, state: &AdjustmentState) -> Self {
        Self::new(baseline, state.choice())
    }

    /// True when the plan asks for nothing different from today.
    pub fn is_unchanged(&self) -> bool {
        self.plan == AdjustmentState::for_baseline(self.baseline).choice()
    }

    pub fn changes(&self) -> Vec<PlanChange> {
        let baseline = self.baseline;
        let plan = &self.plan;
        let mut changes = Vec::new();

        if plan.weight_loss_kg > 0 {
            changes.push(PlanChange::LoseWeight {
                kg: plan.weight_loss_kg,
                from_kg: baseline.weight,
                to_kg: (baseline.weight - f64::from(plan.weight_loss_kg)).max(MIN_WEIGHT_KG),
            });
        }
        if plan.exercise && !baseline.exercises() {
            changes.push(PlanChange::StartExercising);
        }
        if plan.smoking != baseline.smokes() {
            changes.push(if plan.smoking {
                PlanChange::StartSmoking
            } else {
                PlanChange::QuitSmoking
            });
        }
        match plan.diet {
            DietTier::Current => {}
            DietTier::Improved => changes.push(PlanChange::ImproveDiet),
            DietTier::Optimal => changes.push(PlanChange::OptimalDiet),
        }
        let current_alcohol = baseline.alcohol_drinks();
        if plan.alcohol_per_week < current_alcohol {
            changes.push(PlanChange::ReduceAlcohol {
                from: current_alcohol,
                to: plan.alcohol_per_week,
            });
        }
        changes
    }
}

/// Before/after view of two assessments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskComparison {
    pub diabetes_delta: f64,
    pub heart_delta: f64,
    /// Tier of the worse of the two risks, before and after.
    pub overall_from: RiskTier,
    pub overall_to: RiskTier,
}

impl RiskComparison {
    pub fn between(before: &RiskAssessment, after: &RiskAssessment) -> Self {
        Self {
            diabetes_delta: round_tenth(after.diabetes_risk - before.diabetes_risk),
            heart_delta: round_tenth(after.heart_disease_risk - before.heart_disease_risk),
            overall_from: overall_tier(before),
            overall_to: overall_tier(after),
        }
    }

    pub fn overall_improved(&self) -> bool {
        improved(self.overall_from, self.overall_to)
    }
}

fn overall_tier(assessment: &RiskAssessment) -> RiskTier {
    RiskTier::of(assessment.diabetes_risk.max(assessment.heart_disease_risk))
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
