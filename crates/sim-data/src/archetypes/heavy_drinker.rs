use simulator::{HealthProfile, YesNo};

use super::ProfileArchetype;

/// Older non-smoker whose main risk factor is alcohol.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeavyDrinker;

impl ProfileArchetype for HeavyDrinker {
    fn name(&self) -> &'static str {
        "heavy_drinker"
    }

    fn template(&self) -> HealthProfile {
        HealthProfile {
            sex: "Male".to_string(),
            age_category: "60-64".to_string(),
            general_health: "Good".to_string(),
            checkup: "Within the past 5 years".to_string(),
            exercise: YesNo::No,
            smoking_history: YesNo::No,
            diabetes: None,
            arthritis: YesNo::No,
            skin_cancer: YesNo::No,
            other_cancer: YesNo::No,
            depression: YesNo::Yes,
            height: 180.0,
            weight: 88.0,
            alcohol_consumption: 24.0,
            fruit_consumption: 12.0,
            green_vegetables_consumption: 10.0,
            fried_potato_consumption: 9.0,
        }
    }

    fn weight_spread_kg(&self) -> f64 {
        7.0
    }

    // Drinking habits vary more than diet
    fn consumption_spread(&self) -> f64 {
        0.35
    }
}
