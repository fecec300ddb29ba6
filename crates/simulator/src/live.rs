//! Debounced live recalculation of the projected risk.
//!
//! Every adjustment change restarts a quiescence timer. When the timer
//! elapses one request is issued, tagged with the next sequence number.
//! Responses are applied only if they carry the latest issued sequence;
//! anything older is dropped on arrival. Superseded requests are never
//! cancelled, their results are just ignored.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use enum_map::EnumMap;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{Instrument, Span, debug, info, warn};

use crate::{
    adjustments::{AdjustmentState, DietTier, PlanChoice},
    config::LiveConfig,
    errors::{PredictionError, SimError},
    models::{CandidateProfile, HealthProfile, Metric, RiskAssessment},
    mutator,
    predictor::RiskPredictor,
    tiers::{RiskTier, improved, tiers_of},
};

/// What the presentation layer shows for the live projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveView {
    /// Latest accepted projection. Survives failed recomputations.
    pub projection: Option<RiskAssessment>,
    pub tiers: EnumMap<Metric, RiskTier>,
    /// Message of the last failure, cleared by the next adjustment change.
    pub error: Option<String>,
    /// The latest issued request has not settled yet.
    pub loading: bool,
    /// Sequence number of the request behind `projection`.
    pub sequence: u64,
}

/// A metric moved into a strictly better tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierImprovement {
    pub metric: Metric,
    pub from: RiskTier,
    pub to: RiskTier,
}

impl std::fmt::Display for TierImprovement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} moved from {} to {} Risk!",
            self.metric, self.from, self.to
        )
    }
}

/// Outcome of handling one response.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Settlement {
    Accepted { improvement: Option<TierImprovement> },
    Failed,
    /// A newer request was issued after this one.
    Stale,
}

struct Tracker {
    latest: u64,
    previous: EnumMap<Metric, RiskTier>,
}

struct Shared {
    tracker: Mutex<Tracker>,
    view: watch::Sender<LiveView>,
    /// Created on first request; until then improvements are not queued.
    notifications: Mutex<Option<mpsc::UnboundedSender<TierImprovement>>>,
}

impl Shared {
    fn new(previous: EnumMap<Metric, RiskTier>) -> Self {
        let (view, _) = watch::channel(LiveView::default());
        Self {
            tracker: Mutex::new(Tracker {
                latest: 0,
                previous,
            }),
            view,
            notifications: Mutex::new(None),
        }
    }

    /// Open the notification channel. `None` if it was opened before.
    fn open_notifications(&self) -> Option<mpsc::UnboundedReceiver<TierImprovement>> {
        let mut slot = self
            .notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *slot = Some(tx);
        Some(rx)
    }

    fn notify(&self, improvement: TierImprovement) {
        let slot = self
            .notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = slot.as_ref() {
            // A dropped receiver just stops delivery
            let _ = tx.send(improvement);
        }
    }

    fn issue(&self) -> u64 {
        let mut tracker = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
        tracker.latest += 1;
        self.view.send_modify(|view| view.loading = true);
        tracker.latest
    }

    fn settle(&self, seq: u64, outcome: Result<RiskAssessment, PredictionError>) -> Settlement {
        let mut tracker = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
        if seq != tracker.latest {
            debug!(seq, latest = tracker.latest, "Discarding stale projection");
            return Settlement::Stale;
        }

        match outcome {
            Ok(assessment) => {
                let next = tiers_of(&assessment);
                let improvement = Metric::PRIORITY
                    .into_iter()
                    .find(|&m| improved(tracker.previous[m], next[m]))
                    .map(|metric| TierImprovement {
                        metric,
                        from: tracker.previous[metric],
                        to: next[metric],
                    });
                tracker.previous = next;

                info!(
                    seq,
                    diabetes = assessment.diabetes_risk,
                    heart = assessment.heart_disease_risk,
                    "Projection updated"
                );
                // Queued before the view changes so watchers always find it
                if let Some(improvement) = improvement {
                    info!(%improvement, "Risk tier improved");
                    self.notify(improvement);
                }
                self.view.send_modify(|view| {
                    view.projection = Some(assessment);
                    view.tiers = next;
                    view.error = None;
                    view.loading = false;
                    view.sequence = seq;
                });
                Settlement::Accepted { improvement }
            }
            Err(e) => {
                warn!(seq, "Projection request failed: {e}");
                self.view.send_modify(|view| {
                    view.error = Some(e.to_string());
                    view.loading = false;
                });
                Settlement::Failed
            }
        }
    }
}

/// Keeps one projected risk in step with the user's latest adjustments.
///
/// Owns the [`AdjustmentState`]; all mutation goes through its setters, each
/// of which restarts the debounce window when the state actually changed.
/// Must be driven from within a Tokio runtime.
pub struct LiveRecalculation {
    baseline: Arc<HealthProfile>,
    adjustments: AdjustmentState,
    predictor: Arc<dyn RiskPredictor>,
    quiescence: Duration,
    shared: Arc<Shared>,
    timer: Option<JoinHandle<()>>,
    span: Span,
}

impl LiveRecalculation {
    /// `baseline_assessment` seeds the tiers the first improvement is
    /// measured against.
    pub fn new(
        baseline: Arc<HealthProfile>,
        baseline_assessment: Option<&RiskAssessment>,
        predictor: Arc<dyn RiskPredictor>,
        config: &LiveConfig,
    ) -> Self {
        let previous = baseline_assessment.map(tiers_of).unwrap_or_default();

        Self {
            adjustments: AdjustmentState::for_baseline(&baseline),
            baseline,
            predictor,
            quiescence: config.quiescence(),
            shared: Arc::new(Shared::new(previous)),
            timer: None,
            span: Span::current(),
        }
    }

    pub fn adjustments(&self) -> &AdjustmentState {
        &self.adjustments
    }

    /// The profile the next recomputation will score.
    pub fn candidate(&self) -> CandidateProfile {
        mutator::apply(&self.baseline, &self.adjustments.choice())
    }

    /// Snapshot of the live view.
    pub fn view(&self) -> LiveView {
        self.shared.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveView> {
        self.shared.view.subscribe()
    }

    /// Receiver for tier improvement notifications. Available once.
    ///
    /// Improvements accepted before this is called are not delivered.
    pub fn take_notifications(&mut self) -> Option<mpsc::UnboundedReceiver<TierImprovement>> {
        self.shared.open_notifications()
    }

    /// Schedule a recomputation for the current state without changing it.
    pub fn refresh(&mut self) {
        self.schedule();
    }

    pub fn set_weight_loss_kg(&mut self, kg: u32) {
        if self.adjustments.set_weight_loss_kg(kg) {
            self.schedule();
        }
    }

    pub fn set_exercise(&mut self, enabled: bool) {
        if self.adjustments.set_exercise(enabled) {
            self.schedule();
        }
    }

    pub fn set_smoking(&mut self, enabled: bool) {
        if self.adjustments.set_smoking(enabled) {
            self.schedule();
        }
    }

    pub fn set_diet(&mut self, diet: DietTier) {
        if self.adjustments.set_diet(diet) {
            self.schedule();
        }
    }

    /// Set the diet tier by name. Unknown names leave the state untouched.
    pub fn set_diet_named(&mut self, name: &str) -> Result<(), SimError> {
        let diet: DietTier = name.parse()?;
        self.set_diet(diet);
        Ok(())
    }

    pub fn set_alcohol_per_week(&mut self, drinks: u32) {
        if self.adjustments.set_alcohol_per_week(drinks) {
            self.schedule();
        }
    }

    /// Apply a whole plan as a single change.
    pub fn apply_plan(&mut self, plan: PlanChoice) {
        if self.adjustments.apply(plan) {
            self.schedule();
        }
    }

    fn schedule(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.shared.view.send_modify(|view| view.error = None);

        let plan = self.adjustments.choice();
        let baseline = self.baseline.clone();
        let predictor = self.predictor.clone();
        let shared = self.shared.clone();
        let quiescence = self.quiescence;
        debug!(?plan, "Recomputation scheduled");

        let task = async move {
            tokio::time::sleep(quiescence).await;
            let candidate = mutator::apply(&baseline, &plan);
            let seq = shared.issue();
            debug!(seq, "Issuing projection request");
            // Detached so a later abort of this timer never cancels the request.
            tokio::spawn(
                async move {
                    let outcome = predictor.predict(&candidate).await;
                    shared.settle(seq, outcome);
                }
                .in_current_span(),
            );
        };
        self.timer = Some(tokio::spawn(task.instrument(self.span.clone())));
    }
}

impl Drop for LiveRecalculation {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::assessment;

    fn shared(previous: EnumMap<Metric, RiskTier>) -> (Shared, mpsc::UnboundedReceiver<TierImprovement>) {
        let shared = Shared::new(previous);
        let rx = shared.open_notifications().unwrap();
        (shared, rx)
    }

    fn tiers(diabetes: RiskTier, heart: RiskTier) -> EnumMap<Metric, RiskTier> {
        let mut map = EnumMap::default();
        map[Metric::Diabetes] = diabetes;
        map[Metric::HeartDisease] = heart;
        map
    }

    #[test]
    fn test_older_response_is_stale() {
        let (shared, _rx) = shared(EnumMap::default());
        let first = shared.issue();
        let second = shared.issue();

        assert_eq!(
            shared.settle(second, Ok(assessment(20.0, 20.0))),
            Settlement::Accepted { improvement: None }
        );
        assert_eq!(shared.settle(first, Ok(assessment(90.0, 90.0))), Settlement::Stale);

        let view = shared.view.borrow();
        assert_eq!(view.projection.as_ref().unwrap().diabetes_risk, 20.0);
        assert_eq!(view.sequence, second);
    }

    #[test]
    fn test_superseded_response_dropped_even_when_first() {
        let (shared, _rx) = shared(EnumMap::default());
        let first = shared.issue();
        let _second = shared.issue();
        assert_eq!(shared.settle(first, Ok(assessment(10.0, 10.0))), Settlement::Stale);
        assert!(shared.view.borrow().projection.is_none());
        assert!(shared.view.borrow().loading);
    }

    #[test]
    fn test_diabetes_improvement_reported_first() {
        let (shared, mut rx) = shared(tiers(RiskTier::High, RiskTier::High));
        let seq = shared.issue();
        let outcome = shared.settle(seq, Ok(assessment(40.0, 20.0)));
        let expected = TierImprovement {
            metric: Metric::Diabetes,
            from: RiskTier::High,
            to: RiskTier::Moderate,
        };
        assert_eq!(
            outcome,
            Settlement::Accepted {
                improvement: Some(expected)
            }
        );
        assert_eq!(rx.try_recv().unwrap(), expected);
        // Exactly one notification per accepted response
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_heart_improvement_when_diabetes_unchanged() {
        let (shared, mut rx) = shared(tiers(RiskTier::Low, RiskTier::Critical));
        let seq = shared.issue();
        shared.settle(seq, Ok(assessment(10.0, 60.0)));
        let got = rx.try_recv().unwrap();
        assert_eq!(got.metric, Metric::HeartDisease);
        assert_eq!(got.to, RiskTier::High);
    }

    #[test]
    fn test_tiers_rebased_after_each_acceptance() {
        let (shared, mut rx) = shared(tiers(RiskTier::High, RiskTier::High));
        let seq = shared.issue();
        shared.settle(seq, Ok(assessment(40.0, 40.0)));
        assert_eq!(rx.try_recv().unwrap().metric, Metric::Diabetes);

        // Heart also improved in the previous response, so this is not new
        let seq = shared.issue();
        assert_eq!(
            shared.settle(seq, Ok(assessment(40.0, 40.0))),
            Settlement::Accepted { improvement: None }
        );
    }

    #[test]
    fn test_failure_keeps_projection_and_tiers() {
        let (shared, mut rx) = shared(tiers(RiskTier::High, RiskTier::High));
        let seq = shared.issue();
        shared.settle(seq, Ok(assessment(60.0, 60.0)));

        let seq = shared.issue();
        let outcome = shared.settle(
            seq,
            Err(PredictionError::Rejected {
                status: 500,
                detail: "model not loaded".to_string(),
            }),
        );
        assert_eq!(outcome, Settlement::Failed);
        {
            let view = shared.view.borrow();
            assert_eq!(view.projection.as_ref().unwrap().diabetes_risk, 60.0);
            assert!(view.error.as_deref().unwrap().contains("model not loaded"));
            assert!(!view.loading);
        }

        // Tiers were not touched by the failure
        let seq = shared.issue();
        shared.settle(seq, Ok(assessment(20.0, 60.0)));
        let got = rx.try_recv().unwrap();
        assert_eq!(got.from, RiskTier::High);
        assert_eq!(got.to, RiskTier::Low);
    }

    #[test]
    fn test_improvements_not_queued_without_receiver() {
        let shared = Shared::new(tiers(RiskTier::High, RiskTier::High));
        let seq = shared.issue();
        assert_eq!(
            shared.settle(seq, Ok(assessment(20.0, 60.0))),
            Settlement::Accepted {
                improvement: Some(TierImprovement {
                    metric: Metric::Diabetes,
                    from: RiskTier::High,
                    to: RiskTier::Low,
                })
            }
        );
        assert!(shared.notifications.lock().unwrap().is_none());

        // Only improvements after the channel opens are delivered
        let mut rx = shared.open_notifications().unwrap();
        assert!(rx.try_recv().is_err());
        let seq = shared.issue();
        shared.settle(seq, Ok(assessment(20.0, 20.0)));
        assert_eq!(rx.try_recv().unwrap().metric, Metric::HeartDisease);
        assert!(shared.open_notifications().is_none());
    }

    #[test]
    fn test_improvement_message() {
        let msg = TierImprovement {
            metric: Metric::HeartDisease,
            from: RiskTier::Critical,
            to: RiskTier::High,
        }
        .to_string();
        assert_eq!(msg, "Heart moved from Critical to High Risk!");
    }
}
