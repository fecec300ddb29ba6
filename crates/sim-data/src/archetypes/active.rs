use simulator::{HealthProfile, YesNo};

use super::ProfileArchetype;

/// Exercising non-smoker with a reasonable diet. Little room to improve.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveNonSmoker;

impl ProfileArchetype for ActiveNonSmoker {
    fn name(&self) -> &'static str {
        "active_non_smoker"
    }

    fn template(&self) -> HealthProfile {
        HealthProfile {
            sex: "Female".to_string(),
            age_category: "35-39".to_string(),
            general_health: "Very Good".to_string(),
            checkup: "Within the past year".to_string(),
            exercise: YesNo::Yes,
            smoking_history: YesNo::No,
            diabetes: None,
            arthritis: YesNo::No,
            skin_cancer: YesNo::No,
            other_cancer: YesNo::No,
            depression: YesNo::No,
            height: 166.0,
            weight: 63.0,
            alcohol_consumption: 2.0,
            fruit_consumption: 40.0,
            green_vegetables_consumption: 35.0,
            fried_potato_consumption: 3.0,
        }
    }

    fn weight_spread_kg(&self) -> f64 {
        5.0
    }

    fn consumption_spread(&self) -> f64 {
        0.15
    }
}
