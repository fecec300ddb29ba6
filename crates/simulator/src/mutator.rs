//! Turns a baseline profile plus simulated adjustments into a candidate profile.

use crate::{
    adjustments::{DietTier, PlanChoice},
    models::{CandidateProfile, HealthProfile, MAX_PRODUCE_SERVINGS, MIN_WEIGHT_KG},
};

const IMPROVED_FRUIT_DELTA: f64 = 20.0;
const IMPROVED_VEGETABLE_DELTA: f64 = 15.0;
const IMPROVED_FRIED_DELTA: f64 = 10.0;

const OPTIMAL_FRUIT: f64 = 60.0;
const OPTIMAL_VEGETABLES: f64 = 60.0;
const OPTIMAL_FRIED: f64 = 5.0;

/// Apply every dimension of `plan` to `baseline`.
pub fn apply(baseline: &HealthProfile, plan: &PlanChoice) -> CandidateProfile {
    let mut profile = baseline.clone();
    profile.weight = reduced_weight(baseline.weight, plan.weight_loss_kg);
    profile.exercise = plan.exercise.into();
    profile.smoking_history = plan.smoking.into();
    profile.alcohol_consumption = f64::from(plan.alcohol_per_week);
    apply_diet(&mut profile, baseline, plan.diet);
    CandidateProfile::new(profile)
}

/// Vary only the weight; every other field stays at baseline.
pub fn with_weight_loss(baseline: &HealthProfile, weight_loss_kg: u32) -> CandidateProfile {
    let mut profile = baseline.clone();
    profile.weight = reduced_weight(baseline.weight, weight_loss_kg);
    CandidateProfile::new(profile)
}

fn reduced_weight(weight: f64, loss_kg: u32) -> f64 {
    (weight - f64::from(loss_kg)).max(MIN_WEIGHT_KG)
}

fn apply_diet(profile: &mut HealthProfile, baseline: &HealthProfile, diet: DietTier) {
    match diet {
        DietTier::Current => {}
        DietTier::Improved => {
            profile.fruit_consumption =
                (baseline.fruit_consumption + IMPROVED_FRUIT_DELTA).min(MAX_PRODUCE_SERVINGS);
            profile.green_vegetables_consumption = (baseline.green_vegetables_consumption
                + IMPROVED_VEGETABLE_DELTA)
                .min(MAX_PRODUCE_SERVINGS);
            profile.fried_potato_consumption =
                (baseline.fried_potato_consumption - IMPROVED_FRIED_DELTA).max(0.0);
        }
        DietTier::Optimal => {
            profile.fruit_consumption = OPTIMAL_FRUIT;
            profile.green_vegetables_consumption = OPTIMAL_VEGETABLES;
            profile.fried_potato_consumption = OPTIMAL_FRIED;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{YesNo, fixtures::profile};

    fn plan() -> PlanChoice {
        PlanChoice {
            weight_loss_kg: 0,
            exercise: false,
            smoking: true,
            diet: DietTier::Current,
            alcohol_per_week: 10,
        }
    }

    #[test]
    fn test_weight_and_alcohol_scenario() {
        let candidate = apply(
            &profile(),
            &PlanChoice {
                weight_loss_kg: 5,
                alcohol_per_week: 3,
                ..plan()
            },
        );
        assert_eq!(candidate.weight, 65.0);
        assert_eq!(candidate.alcohol_consumption, 3.0);
    }

    #[test]
    fn test_weight_floor() {
        let mut baseline = profile();
        baseline.weight = 38.0;
        for kg in 0..=20 {
            let candidate = apply(
                &baseline,
                &PlanChoice {
                    weight_loss_kg: kg,
                    ..plan()
                },
            );
            assert!(candidate.weight >= MIN_WEIGHT_KG, "{kg} kg gave {}", candidate.weight);
        }
        assert_eq!(with_weight_loss(&baseline, 20).weight, MIN_WEIGHT_KG);
    }

    #[test]
    fn test_optimal_diet_overrides() {
        let candidate = apply(
            &profile(),
            &PlanChoice {
                diet: DietTier::Optimal,
                ..plan()
            },
        );
        assert_eq!(candidate.fruit_consumption, 60.0);
        assert_eq!(candidate.green_vegetables_consumption, 60.0);
        assert_eq!(candidate.fried_potato_consumption, 5.0);
    }

    #[test]
    fn test_improved_diet_offsets_and_clamps() {
        let mut baseline = profile();
        baseline.fruit_consumption = 110.0;
        baseline.green_vegetables_consumption = 30.0;
        baseline.fried_potato_consumption = 4.0;
        let candidate = apply(
            &baseline,
            &PlanChoice {
                diet: DietTier::Improved,
                ..plan()
            },
        );
        assert_eq!(candidate.fruit_consumption, 120.0);
        assert_eq!(candidate.green_vegetables_consumption, 45.0);
        assert_eq!(candidate.fried_potato_consumption, 0.0);
    }

    #[test]
    fn test_improved_diet_clamps_vegetables() {
        let mut baseline = profile();
        baseline.green_vegetables_consumption = 110.0;
        let candidate = apply(
            &baseline,
            &PlanChoice {
                diet: DietTier::Improved,
                ..plan()
            },
        );
        assert_eq!(candidate.green_vegetables_consumption, MAX_PRODUCE_SERVINGS);
        assert_eq!(candidate.fruit_consumption, 25.0);
    }

    #[test]
    fn test_current_diet_untouched() {
        let baseline = profile();
        let candidate = apply(&baseline, &plan());
        assert_eq!(candidate.fruit_consumption, baseline.fruit_consumption);
        assert_eq!(
            candidate.green_vegetables_consumption,
            baseline.green_vegetables_consumption
        );
        assert_eq!(
            candidate.fried_potato_consumption,
            baseline.fried_potato_consumption
        );
    }

    #[test]
    fn test_habit_mapping() {
        let candidate = apply(
            &profile(),
            &PlanChoice {
                exercise: true,
                smoking: false,
                ..plan()
            },
        );
        assert_eq!(candidate.exercise, YesNo::Yes);
        assert_eq!(candidate.smoking_history, YesNo::No);
    }

    #[test]
    fn test_deterministic() {
        let baseline = profile();
        let p = PlanChoice {
            weight_loss_kg: 7,
            diet: DietTier::Improved,
            ..plan()
        };
        assert_eq!(apply(&baseline, &p), apply(&baseline, &p));
    }

    #[test]
    fn test_weight_only_keeps_other_fields() {
        let baseline = profile();
        let candidate = with_weight_loss(&baseline, 4);
        assert_eq!(candidate.weight, 66.0);
        assert_eq!(candidate.alcohol_consumption, baseline.alcohol_consumption);
        assert_eq!(candidate.smoking_history, baseline.smoking_history);
    }
}
