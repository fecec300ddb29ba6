//! Lifestyle what-if simulation engine.
//!
//! Sits between a user's simulated lifestyle adjustments and an external
//! risk-prediction service:
//! - [`mutator`] turns a baseline profile plus adjustments into a candidate profile
//! - [`tiers`] classifies risk percentages and detects tier improvements
//! - [`live`] keeps a debounced, stale-safe live projection
//! - [`trajectory`] samples risk across a weight-loss grid
//! - [`search`] finds the lowest-risk plan over a discrete candidate grid

pub mod adjustments;
pub mod batch;
pub mod config;
pub mod errors;
pub mod live;
pub mod models;
pub mod mutator;
pub mod plan;
pub mod predictor;
pub mod search;
pub mod session;
pub mod tiers;
pub mod trajectory;

pub use adjustments::{AdjustmentState, DietTier, PlanChoice};
pub use config::SimulatorConfig;
pub use errors::{PredictionError, SimError};
pub use live::{LiveRecalculation, LiveView, TierImprovement};
pub use models::{CandidateProfile, HealthProfile, Metric, RiskAssessment, YesNo};
pub use predictor::{HttpRiskPredictor, RiskPredictor};
pub use search::{OptimalCandidate, SearchSpace};
pub use session::SimulatorSession;
pub use tiers::RiskTier;
pub use trajectory::{TrajectoryPoint, TrajectorySampler};
