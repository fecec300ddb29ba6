use std::ops::Deref;

use enum_map::Enum;
use serde::{Deserialize, Serialize};

/// Lowest weight (kg) a simulated profile may be reduced to.
pub const MIN_WEIGHT_KG: f64 = 30.0;

/// Upper bound for monthly fruit and green vegetable servings.
pub const MAX_PRODUCE_SERVINGS: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { YesNo::Yes } else { YesNo::No }
    }
}

/// A user's health and lifestyle record, in the shape the risk service consumes.
///
/// Categorical fields the engine never interprets (`sex`, `age_category`,
/// `general_health`, `checkup`) are carried as opaque strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub sex: String,
    pub age_category: String,
    pub general_health: String,
    pub checkup: String,
    pub exercise: YesNo,
    pub smoking_history: YesNo,
    /// Collected by the assessment form but not consumed by the risk service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diabetes: Option<YesNo>,
    pub arthritis: YesNo,
    pub skin_cancer: YesNo,
    pub other_cancer: YesNo,
    pub depression: YesNo,
    /// Height in centimetres.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    pub alcohol_consumption: f64,
    pub fruit_consumption: f64,
    pub green_vegetables_consumption: f64,
    pub fried_potato_consumption: f64,
}

impl HealthProfile {
    /// Body-mass index, or `None` when the height is not positive.
    pub fn bmi(&self) -> Option<f64> {
        let height_m = self.height / 100.0;
        (height_m > 0.0).then(|| self.weight / (height_m * height_m))
    }

    pub fn exercises(&self) -> bool {
        self.exercise.is_yes()
    }

    pub fn smokes(&self) -> bool {
        self.smoking_history.is_yes()
    }

    /// Weekly drinks rounded to the whole-drink granularity adjustments use.
    pub fn alcohol_drinks(&self) -> u32 {
        if self.alcohol_consumption.is_finite() && self.alcohol_consumption > 0.0 {
            self.alcohol_consumption.round() as u32
        } else {
            0
        }
    }
}

/// A baseline profile with a set of simulated adjustments applied.
///
/// Only [`crate::mutator`] builds these, so a candidate always satisfies the
/// weight floor and consumption bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CandidateProfile(HealthProfile);

impl CandidateProfile {
    pub(crate) fn new(profile: HealthProfile) -> Self {
        Self(profile)
    }

    pub fn into_inner(self) -> HealthProfile {
        self.0
    }
}

impl Deref for CandidateProfile {
    type Target = HealthProfile;

    fn deref(&self) -> &HealthProfile {
        &self.0
    }
}

/// The two risks the service scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Metric {
    Diabetes,
    HeartDisease,
}

impl Metric {
    /// Order in which metrics are checked for tier improvements.
    pub const PRIORITY: [Metric; 2] = [Metric::Diabetes, Metric::HeartDisease];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Diabetes => "Diabetes",
            Metric::HeartDisease => "Heart",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Scoring result returned by the risk service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Percentage, 0-100.
    pub diabetes_risk: f64,
    /// Percentage, 0-100.
    pub heart_disease_risk: f64,
    #[serde(default)]
    pub diabetes_level: String,
    #[serde(default)]
    pub heart_disease_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    pub bmi: f64,
}

impl RiskAssessment {
    pub fn risk(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Diabetes => self.diabetes_risk,
            Metric::HeartDisease => self.heart_disease_risk,
        }
    }

    pub fn total_risk(&self) -> f64 {
        self.diabetes_risk + self.heart_disease_risk
    }

    /// The service's health score, or `100 - mean(risks)` when it was omitted.
    pub fn health_score_or_derived(&self) -> f64 {
        self.health_score
            .unwrap_or_else(|| 100.0 - self.total_risk() / 2.0)
    }
}
