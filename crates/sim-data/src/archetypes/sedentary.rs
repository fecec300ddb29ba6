use simulator::{HealthProfile, YesNo};

use super::ProfileArchetype;

/// Overweight, inactive smoker in middle age.
#[derive(Debug, Clone, Copy, Default)]
pub struct SedentarySmoker;

impl ProfileArchetype for SedentarySmoker {
    fn name(&self) -> &'static str {
        "sedentary_smoker"
    }

    fn template(&self) -> HealthProfile {
        HealthProfile {
            sex: "Male".to_string(),
            age_category: "50-54".to_string(),
            general_health: "Fair".to_string(),
            checkup: "Within the past 2 years".to_string(),
            exercise: YesNo::No,
            smoking_history: YesNo::Yes,
            diabetes: None,
            arthritis: YesNo::Yes,
            skin_cancer: YesNo::No,
            other_cancer: YesNo::No,
            depression: YesNo::No,
            height: 176.0,
            weight: 96.0,
            alcohol_consumption: 8.0,
            fruit_consumption: 8.0,
            green_vegetables_consumption: 6.0,
            fried_potato_consumption: 14.0,
        }
    }

    fn weight_spread_kg(&self) -> f64 {
        9.0
    }
}
