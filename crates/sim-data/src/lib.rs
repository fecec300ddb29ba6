//! Scenario data for the lifestyle simulator.
//!
//! Provides baseline profile archetypes, an in-process synthetic risk
//! predictor, and the `simulate` driver that runs a full session end to end.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sim_data::prelude::*;
//!
//! let mut rng = StdRng::seed_from_u64(12345);
//! let baseline = sample_profile(&SedentarySmoker, &mut rng);
//! let predictor = SyntheticPredictor::new();
//! let assessment = predictor.predict(&baseline).await?;
//! ```

pub mod archetypes;
pub mod config;
pub mod synthetic;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::archetypes::{
        ActiveNonSmoker, ArchetypeKind, HeavyDrinker, ProfileArchetype, SedentarySmoker,
        sample_profile,
    };
    pub use crate::config::{PredictorKind, ScenarioConfig};
    pub use crate::synthetic::{SyntheticPredictor, service_level};
    pub use rand::{SeedableRng, rngs::StdRng};
    pub use simulator::{HealthProfile, RiskAssessment, RiskPredictor};
}
