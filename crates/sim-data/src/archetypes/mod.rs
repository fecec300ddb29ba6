//! Baseline profile archetypes.
//!
//! Archetypes describe a typical person; [`sample_profile`] adds day-to-day
//! variation so repeated runs exercise different corners of the search space.

mod active;
mod heavy_drinker;
mod sedentary;

use std::str::FromStr;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use simulator::{HealthProfile, models::MAX_PRODUCE_SERVINGS};

pub use active::ActiveNonSmoker;
pub use heavy_drinker::HeavyDrinker;
pub use sedentary::SedentarySmoker;

/// A typical health profile plus how much its numeric fields vary.
pub trait ProfileArchetype: Send + Sync {
    fn name(&self) -> &'static str;

    /// Central values for every field.
    fn template(&self) -> HealthProfile;

    /// Standard deviation of body weight in kg.
    fn weight_spread_kg(&self) -> f64;

    /// Relative standard deviation applied to consumption fields (0.0 - 1.0).
    fn consumption_spread(&self) -> f64 {
        0.25
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeKind {
    #[default]
    SedentarySmoker,
    ActiveNonSmoker,
    HeavyDrinker,
}

impl ArchetypeKind {
    pub fn archetype(self) -> Box<dyn ProfileArchetype> {
        match self {
            ArchetypeKind::SedentarySmoker => Box::new(SedentarySmoker),
            ArchetypeKind::ActiveNonSmoker => Box::new(ActiveNonSmoker),
            ArchetypeKind::HeavyDrinker => Box::new(HeavyDrinker),
        }
    }
}

impl FromStr for ArchetypeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sedentary_smoker" | "sedentary" => Ok(ArchetypeKind::SedentarySmoker),
            "active_non_smoker" | "active" => Ok(ArchetypeKind::ActiveNonSmoker),
            "heavy_drinker" => Ok(ArchetypeKind::HeavyDrinker),
            other => Err(format!("unknown archetype '{other}'")),
        }
    }
}

/// Draw one baseline profile around the archetype's template.
pub fn sample_profile(archetype: &dyn ProfileArchetype, rng: &mut impl Rng) -> HealthProfile {
    let mut profile = archetype.template();

    profile.weight = jitter(rng, profile.weight, archetype.weight_spread_kg()).clamp(40.0, 200.0);

    let spread = archetype.consumption_spread();
    profile.alcohol_consumption = jitter_relative(rng, profile.alcohol_consumption, spread)
        .round()
        .max(0.0);
    profile.fruit_consumption =
        jitter_relative(rng, profile.fruit_consumption, spread).clamp(0.0, MAX_PRODUCE_SERVINGS);
    profile.green_vegetables_consumption =
        jitter_relative(rng, profile.green_vegetables_consumption, spread)
            .clamp(0.0, MAX_PRODUCE_SERVINGS);
    profile.fried_potato_consumption =
        jitter_relative(rng, profile.fried_potato_consumption, spread).max(0.0);

    profile
}

fn jitter(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    match Normal::new(mean, std_dev) {
        Ok(normal) if std_dev > 0.0 => normal.sample(rng),
        _ => mean,
    }
}

fn jitter_relative(rng: &mut impl Rng, mean: f64, spread: f64) -> f64 {
    jitter(rng, mean, mean.abs() * spread)
}
