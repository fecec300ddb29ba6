//! Shared helpers for simulator integration tests.

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use simulator::{HealthProfile, PredictionError, RiskAssessment, RiskPredictor, YesNo};

pub fn baseline() -> HealthProfile {
    HealthProfile {
        sex: "Female".to_string(),
        age_category: "50-54".to_string(),
        general_health: "Fair".to_string(),
        checkup: "Within the past year".to_string(),
        exercise: YesNo::No,
        smoking_history: YesNo::Yes,
        diabetes: None,
        arthritis: YesNo::No,
        skin_cancer: YesNo::No,
        other_cancer: YesNo::No,
        depression: YesNo::No,
        height: 165.0,
        weight: 82.0,
        alcohol_consumption: 10.0,
        fruit_consumption: 10.0,
        green_vegetables_consumption: 8.0,
        fried_potato_consumption: 12.0,
    }
}

pub fn assessment(diabetes: f64, heart: f64) -> RiskAssessment {
    RiskAssessment {
        diabetes_risk: diabetes,
        heart_disease_risk: heart,
        diabetes_level: String::new(),
        heart_disease_level: String::new(),
        health_score: None,
        bmi: 25.0,
    }
}

type ScoreFn = Box<dyn Fn(&HealthProfile) -> Result<RiskAssessment, PredictionError> + Send + Sync>;

/// Predictor driven by a scoring closure, with optional per-call delays.
///
/// Delays are consumed in call order; once exhausted calls resolve immediately.
pub struct ScriptedPredictor {
    score: ScoreFn,
    delays: Mutex<VecDeque<Duration>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<HealthProfile>>,
}

impl ScriptedPredictor {
    pub fn new(
        score: impl Fn(&HealthProfile) -> Result<RiskAssessment, PredictionError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            score: Box::new(score),
            delays: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Risk driven by weight: diabetes = weight - 40, heart = weight / 2.
    pub fn by_weight() -> Self {
        Self::new(|p| Ok(assessment(p.weight - 40.0, p.weight / 2.0)))
    }

    pub fn with_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        *self.delays.lock().unwrap() = delays.into_iter().collect();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<HealthProfile> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RiskPredictor for ScriptedPredictor {
    async fn predict(&self, profile: &HealthProfile) -> Result<RiskAssessment, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(profile.clone());
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        (self.score)(profile)
    }
}
