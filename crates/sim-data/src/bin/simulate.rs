//! Runs one simulation session end to end and logs the results.
//!
//! Run with:
//! ```
//! cargo run -p sim-data --bin simulate
//! SIM_PREDICTOR=http RISK_API_URL=http://localhost:8000 cargo run -p sim-data --bin simulate
//! ```

use std::sync::Arc;

use sim_data::prelude::*;
use simulator::{
    HttpRiskPredictor, SimulatorConfig, SimulatorSession,
    plan::{PlanSummary, RiskComparison},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let scenario = ScenarioConfig::from_env()?;
    let mut config = match &scenario.config_file {
        Some(path) => SimulatorConfig::from_file(path)?,
        None => SimulatorConfig::default(),
    };
    config.apply_env()?;

    let baseline: HealthProfile = match &scenario.baseline_file {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => {
            let mut rng = StdRng::seed_from_u64(scenario.seed);
            let archetype = scenario.archetype.archetype();
            tracing::info!(archetype = archetype.name(), seed = scenario.seed, "Sampling baseline");
            sample_profile(archetype.as_ref(), &mut rng)
        }
    };

    let predictor: Arc<dyn RiskPredictor> = match scenario.predictor {
        PredictorKind::Http => {
            let http = HttpRiskPredictor::new(config.predictor.base_url.clone());
            http.check_health().await?;
            tracing::info!("Connected to risk service at {}", http.base_url());
            Arc::new(http)
        }
        PredictorKind::Synthetic => {
            let (min, max) = scenario.latency();
            Arc::new(SyntheticPredictor::new().with_latency(min, max))
        }
    };

    let baseline_assessment = predictor.predict(&baseline).await?;
    tracing::info!(
        "Baseline: diabetes {:.1}%, heart {:.1}%, BMI {:.1}",
        baseline_assessment.diabetes_risk,
        baseline_assessment.heart_disease_risk,
        baseline_assessment.bmi
    );

    let mut session = SimulatorSession::new(
        baseline,
        Some(baseline_assessment.clone()),
        predictor,
        config,
    );

    for point in session.sample_trajectory().await? {
        tracing::info!(
            "  -{:>2} kg: diabetes {:>5.1}%, heart {:>5.1}%",
            point.weight_loss_kg,
            point.diabetes_risk,
            point.heart_risk
        );
    }

    let Some(best) = session.find_optimal_plan().await? else {
        tracing::warn!("Search space was empty");
        return Ok(());
    };

    let summary = PlanSummary::new(session.baseline(), best.plan);
    if summary.is_unchanged() {
        tracing::info!("Current lifestyle is already optimal");
    } else {
        tracing::info!("Optimal plan (total risk {:.1}):", best.total_risk);
        for change in summary.changes() {
            tracing::info!("  {change}");
        }
    }

    // Apply the plan to a live controller the way a user would
    let mut live = session.live();
    let mut notifications = live.take_notifications();
    live.apply_plan(best.plan);

    let mut view = live.subscribe();
    let settled = view
        .wait_for(|v| !v.loading && (v.projection.is_some() || v.error.is_some()))
        .await?
        .clone();

    match (&settled.projection, &settled.error) {
        (Some(projection), None) => {
            let comparison = RiskComparison::between(&baseline_assessment, projection);
            tracing::info!(
                "Projected: diabetes {:+.1}, heart {:+.1}, overall {} -> {}",
                comparison.diabetes_delta,
                comparison.heart_delta,
                comparison.overall_from,
                comparison.overall_to
            );
        }
        (_, Some(error)) => tracing::warn!("Live projection failed: {error}"),
        (None, None) => {}
    }

    if let Some(rx) = notifications.as_mut() {
        while let Ok(improvement) = rx.try_recv() {
            tracing::info!("{improvement}");
        }
    }

    tracing::info!(session_id = %session.id(), "Simulation completed!");
    Ok(())
}
