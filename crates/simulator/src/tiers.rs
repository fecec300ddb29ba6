//! Risk tier classification.
//!
//! Tiers are ordered from worst to best: Critical < High < Moderate < Low.
//! `Unknown` sits outside that order and never takes part in an improvement.

use enum_map::EnumMap;
use serde::{Deserialize, Serialize};

use crate::models::{Metric, RiskAssessment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Critical,
    #[default]
    Unknown,
}

impl RiskTier {
    /// Classify a risk percentage. Non-finite values map to `Unknown`.
    pub fn of(risk_percent: f64) -> Self {
        if !risk_percent.is_finite() {
            return RiskTier::Unknown;
        }
        if risk_percent <= 30.0 {
            RiskTier::Low
        } else if risk_percent <= 55.0 {
            RiskTier::Moderate
        } else if risk_percent <= 75.0 {
            RiskTier::High
        } else {
            RiskTier::Critical
        }
    }

    /// Position in the worst-to-best order, `None` for `Unknown`.
    fn rank(self) -> Option<u8> {
        match self {
            RiskTier::Critical => Some(0),
            RiskTier::High => Some(1),
            RiskTier::Moderate => Some(2),
            RiskTier::Low => Some(3),
            RiskTier::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
            RiskTier::Critical => "Critical",
            RiskTier::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True only when `next` is strictly better than `previous`.
///
/// `Unknown` on either side is never an improvement, so a first projection
/// after an unscored baseline does not notify. Ranking `Unknown` below
/// `Critical` would make `Unknown -> Low` count; that is not wanted here.
pub fn improved(previous: RiskTier, next: RiskTier) -> bool {
    match (previous.rank(), next.rank()) {
        (Some(p), Some(n)) => n > p,
        _ => false,
    }
}

/// Tier of each metric in an assessment.
pub fn tiers_of(assessment: &RiskAssessment) -> EnumMap<Metric, RiskTier> {
    EnumMap::from_fn(|metric| RiskTier::of(assessment.risk(metric)))
}
