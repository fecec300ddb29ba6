//! In-process risk predictor for offline runs and load scenarios.
//!
//! A fixed logistic model over the same fields the risk service reads. The
//! coefficients are tuned for plausible direction and magnitude only; the
//! numbers carry no clinical meaning.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use simulator::{HealthProfile, PredictionError, RiskAssessment, RiskPredictor};

/// Level bands the risk service reports alongside each percentage.
pub fn service_level(risk: f64) -> &'static str {
    if risk < 25.0 {
        "Low"
    } else if risk < 55.0 {
        "Moderate"
    } else {
        "High"
    }
}

/// Ordinal position of an age bracket, 0 for "18-24" up to 12 for "80+".
fn age_index(category: &str) -> f64 {
    const BRACKETS: [&str; 13] = [
        "18-24", "25-29", "30-34", "35-39", "40-44", "45-49", "50-54", "55-59", "60-64",
        "65-69", "70-74", "75-79", "80+",
    ];
    BRACKETS
        .iter()
        .position(|b| *b == category)
        .unwrap_or(6) as f64
}

/// 0 for "Excellent" up to 4 for "Poor".
fn general_health_index(value: &str) -> f64 {
    match value {
        "Excellent" => 0.0,
        "Very Good" => 1.0,
        "Good" => 2.0,
        "Fair" => 3.0,
        "Poor" => 4.0,
        _ => 2.0,
    }
}

fn logistic(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Default)]
pub struct SyntheticPredictor {
    latency: Option<(Duration, Duration)>,
}

impl SyntheticPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep a uniformly drawn duration before each answer.
    pub fn with_latency(mut self, min: Duration, max: Duration) -> Self {
        self.latency = Some((min, max.max(min)));
        self
    }

    /// Score a profile without any simulated delay.
    pub fn score(&self, profile: &HealthProfile) -> Result<RiskAssessment, PredictionError> {
        let bmi = profile
            .bmi()
            .filter(|b| b.is_finite())
            .ok_or_else(|| PredictionError::Rejected {
                status: 422,
                detail: "height must be positive".to_string(),
            })?;

        let age = age_index(&profile.age_category);
        let health = general_health_index(&profile.general_health);
        let smoke = if profile.smokes() { 1.0 } else { 0.0 };
        let exercise = if profile.exercises() { 1.0 } else { 0.0 };
        let male = if profile.sex.eq_ignore_ascii_case("male") { 1.0 } else { 0.0 };
        let alcohol = profile.alcohol_consumption.max(0.0);
        let fruit = profile.fruit_consumption.max(0.0);
        let veg = profile.green_vegetables_consumption.max(0.0);
        let fried = profile.fried_potato_consumption.max(0.0);

        let z_diabetes = -3.6 + 0.16 * (bmi - 25.0) + 0.18 * age + 0.35 * health + 0.4 * smoke
            - 0.6 * exercise
            + 0.01 * alcohol
            - 0.01 * fruit
            - 0.008 * veg
            + 0.02 * fried;
        let z_heart = -4.4 + 0.06 * (bmi - 25.0) + 0.26 * age + 0.3 * health + 0.9 * smoke
            - 0.5 * exercise
            + 0.02 * alcohol
            - 0.006 * fruit
            - 0.006 * veg
            + 0.015 * fried
            + 0.4 * male;

        let diabetes_risk = round1(100.0 * logistic(z_diabetes));
        let heart_disease_risk = round1(100.0 * logistic(z_heart));

        Ok(RiskAssessment {
            diabetes_risk,
            heart_disease_risk,
            diabetes_level: service_level(diabetes_risk).to_string(),
            heart_disease_level: service_level(heart_disease_risk).to_string(),
            health_score: Some(round1(100.0 - (diabetes_risk + heart_disease_risk) / 2.0)),
            bmi: round1(bmi),
        })
    }

    fn draw_delay(&self) -> Option<Duration> {
        let (min, max) = self.latency?;
        if min == max {
            return Some(min);
        }
        Some(rand::thread_rng().gen_range(min..=max))
    }
}

#[async_trait]
impl RiskPredictor for SyntheticPredictor {
    async fn predict(&self, profile: &HealthProfile) -> Result<RiskAssessment, PredictionError> {
        if let Some(delay) = self.draw_delay() {
            tokio::time::sleep(delay).await;
        }
        self.score(profile)
    }
}

#[cfg(test)]
mod tests {
    use simulator::YesNo;

    use super::*;
    use crate::archetypes::{ProfileArchetype, SedentarySmoker};

    fn baseline() -> HealthProfile {
        SedentarySmoker.template()
    }

    #[test]
    fn test_weight_loss_lowers_diabetes_risk() {
        let p = SyntheticPredictor::new();
        let before = p.score(&baseline()).unwrap();
        let mut lighter = baseline();
        lighter.weight -= 15.0;
        let after = p.score(&lighter).unwrap();
        assert!(after.diabetes_risk < before.diabetes_risk);
        assert!(after.bmi < before.bmi);
    }

    #[test]
    fn test_quitting_smoking_lowers_heart_risk() {
        let p = SyntheticPredictor::new();
        let before = p.score(&baseline()).unwrap();
        let mut quit = baseline();
        quit.smoking_history = YesNo::No;
        let after = p.score(&quit).unwrap();
        assert!(after.heart_disease_risk < before.heart_disease_risk);
    }

    #[test]
    fn test_outputs_are_percentages_with_levels() {
        let a = SyntheticPredictor::new().score(&baseline()).unwrap();
        assert!((0.0..=100.0).contains(&a.diabetes_risk));
        assert!((0.0..=100.0).contains(&a.heart_disease_risk));
        assert_eq!(a.diabetes_level, service_level(a.diabetes_risk));
        assert!(a.health_score.is_some());
    }

    #[test]
    fn test_invalid_height_rejected() {
        let mut p = baseline();
        p.height = 0.0;
        let err = SyntheticPredictor::new().score(&p).unwrap_err();
        assert!(matches!(err, PredictionError::Rejected { status: 422, .. }));
    }

    #[test]
    fn test_service_level_bands() {
        assert_eq!(service_level(24.9), "Low");
        assert_eq!(service_level(25.0), "Moderate");
        assert_eq!(service_level(54.9), "Moderate");
        assert_eq!(service_level(55.0), "High");
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let p = SyntheticPredictor::new()
            .with_latency(Duration::from_millis(50), Duration::from_millis(50));
        let start = tokio::time::Instant::now();
        p.predict(&baseline()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
