//! The five simulated lifestyle dimensions and their bounds.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{errors::SimError, models::HealthProfile};

/// Largest weight loss the simulator offers, in kg.
pub const MAX_WEIGHT_LOSS_KG: u32 = 20;

/// Default upper bound of the weekly alcohol range.
pub const MAX_ALCOHOL_PER_WEEK: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietTier {
    #[default]
    Current,
    Improved,
    Optimal,
}

impl DietTier {
    pub const ALL: [DietTier; 3] = [DietTier::Current, DietTier::Improved, DietTier::Optimal];

    pub fn as_str(self) -> &'static str {
        match self {
            DietTier::Current => "current",
            DietTier::Improved => "improved",
            DietTier::Optimal => "optimal",
        }
    }
}

impl FromStr for DietTier {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(DietTier::Current),
            "improved" | "improve" => Ok(DietTier::Improved),
            "optimal" => Ok(DietTier::Optimal),
            other => Err(SimError::InvalidAdjustment(format!(
                "unknown diet tier '{other}'"
            ))),
        }
    }
}

/// A complete choice along all five dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanChoice {
    pub weight_loss_kg: u32,
    pub exercise: bool,
    pub smoking: bool,
    pub diet: DietTier,
    pub alcohol_per_week: u32,
}

/// Inclusive upper bounds for the numeric dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentBounds {
    pub max_weight_loss_kg: u32,
    pub max_alcohol_per_week: u32,
}

impl AdjustmentBounds {
    /// The alcohol range widens to cover a baseline above the default ceiling,
    /// so "no change" is always representable.
    pub fn for_baseline(baseline: &HealthProfile) -> Self {
        Self {
            max_weight_loss_kg: MAX_WEIGHT_LOSS_KG,
            max_alcohol_per_week: MAX_ALCOHOL_PER_WEEK.max(baseline.alcohol_drinks()),
        }
    }
}

impl Default for AdjustmentBounds {
    fn default() -> Self {
        Self {
            max_weight_loss_kg: MAX_WEIGHT_LOSS_KG,
            max_alcohol_per_week: MAX_ALCOHOL_PER_WEEK,
        }
    }
}

/// Current position of the user's simulated adjustments.
///
/// Setters clamp numeric values into [`AdjustmentBounds`] and report whether
/// the state actually changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustmentState {
    choice: PlanChoice,
    bounds: AdjustmentBounds,
}

impl AdjustmentState {
    /// Defaults mirror the baseline: no weight loss, current habits, current diet.
    pub fn for_baseline(baseline: &HealthProfile) -> Self {
        let bounds = AdjustmentBounds::for_baseline(baseline);
        Self {
            choice: PlanChoice {
                weight_loss_kg: 0,
                exercise: baseline.exercises(),
                smoking: baseline.smokes(),
                diet: DietTier::Current,
                alcohol_per_week: baseline.alcohol_drinks().min(bounds.max_alcohol_per_week),
            },
            bounds,
        }
    }

    pub fn choice(&self) -> PlanChoice {
        self.choice
    }

    pub fn bounds(&self) -> AdjustmentBounds {
        self.bounds
    }

    pub fn weight_loss_kg(&self) -> u32 {
        self.choice.weight_loss_kg
    }

    pub fn exercise(&self) -> bool {
        self.choice.exercise
    }

    pub fn smoking(&self) -> bool {
        self.choice.smoking
    }

    pub fn diet(&self) -> DietTier {
        self.choice.diet
    }

    pub fn alcohol_per_week(&self) -> u32 {
        self.choice.alcohol_per_week
    }

    pub fn set_weight_loss_kg(&mut self, kg: u32) -> bool {
        let kg = kg.min(self.bounds.max_weight_loss_kg);
        replace(&mut self.choice.weight_loss_kg, kg)
    }

    pub fn set_exercise(&mut self, enabled: bool) -> bool {
        replace(&mut self.choice.exercise, enabled)
    }

    pub fn set_smoking(&mut self, enabled: bool) -> bool {
        replace(&mut self.choice.smoking, enabled)
    }

    pub fn set_diet(&mut self, diet: DietTier) -> bool {
        replace(&mut self.choice.diet, diet)
    }

    pub fn set_alcohol_per_week(&mut self, drinks: u32) -> bool {
        let drinks = drinks.min(self.bounds.max_alcohol_per_week);
        replace(&mut self.choice.alcohol_per_week, drinks)
    }

    /// Set every dimension at once. Numeric values are clamped like the
    /// single-dimension setters.
    pub fn apply(&mut self, plan: PlanChoice) -> bool {
        let clamped = PlanChoice {
            weight_loss_kg: plan.weight_loss_kg.min(self.bounds.max_weight_loss_kg),
            alcohol_per_week: plan.alcohol_per_week.min(self.bounds.max_alcohol_per_week),
            ..plan
        };
        replace(&mut self.choice, clamped)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
