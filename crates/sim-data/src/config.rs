//! Configuration for scenario runs.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::archetypes::ArchetypeKind;

/// Which risk predictor a scenario scores against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    /// The real risk service over HTTP.
    Http,
    /// In-process logistic model.
    #[default]
    Synthetic,
}

/// Configuration for a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Archetype to sample the baseline from.
    pub archetype: ArchetypeKind,

    /// RNG seed, for reproducible baselines.
    pub seed: u64,

    pub predictor: PredictorKind,

    /// Simulated service latency range in milliseconds (synthetic only).
    pub latency_ms: (u64, u64),

    /// Explicit baseline profile (JSON). Overrides `archetype`.
    pub baseline_file: Option<PathBuf>,

    /// Engine configuration file (JSON).
    pub config_file: Option<PathBuf>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            archetype: ArchetypeKind::default(),
            seed: 12345,
            predictor: PredictorKind::default(),
            latency_ms: (20, 80),
            baseline_file: None,
            config_file: None,
        }
    }
}

impl ScenarioConfig {
    /// Defaults overridden by `SIM_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        config.apply_vars(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(value) = var("SIM_ARCHETYPE") {
            self.archetype = value.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(value) = var("SIM_SEED") {
            self.seed = value.trim().parse()?;
        }
        if let Some(value) = var("SIM_PREDICTOR") {
            self.predictor = match value.trim().to_ascii_lowercase().as_str() {
                "http" => PredictorKind::Http,
                "synthetic" => PredictorKind::Synthetic,
                other => anyhow::bail!("unknown predictor '{other}'"),
            };
        }
        if let Some(value) = var("SIM_LATENCY_MS") {
            self.latency_ms = parse_range(&value)?;
        }
        if let Some(value) = var("SIM_BASELINE_FILE") {
            self.baseline_file = Some(PathBuf::from(value));
        }
        if let Some(value) = var("SIM_CONFIG_FILE") {
            self.config_file = Some(PathBuf::from(value));
        }
        Ok(())
    }

    pub fn latency(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.latency_ms.0),
            Duration::from_millis(self.latency_ms.1),
        )
    }
}

/// Parses `"40"` or `"20-80"`.
fn parse_range(value: &str) -> anyhow::Result<(u64, u64)> {
    let (min, max) = match value.split_once('-') {
        Some((min, max)) => (min.trim().parse()?, max.trim().parse()?),
        None => {
            let v = value.trim().parse()?;
            (v, v)
        }
    };
    anyhow::ensure!(min <= max, "latency range {min}-{max} is inverted");
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ScenarioConfig::default();
        config
            .apply_vars(vars(&[
                ("SIM_ARCHETYPE", "heavy_drinker"),
                ("SIM_SEED", "7"),
                ("SIM_PREDICTOR", "HTTP"),
                ("SIM_LATENCY_MS", "5-10"),
            ]))
            .unwrap();

        assert_eq!(config.archetype, ArchetypeKind::HeavyDrinker);
        assert_eq!(config.seed, 7);
        assert_eq!(config.predictor, PredictorKind::Http);
        assert_eq!(config.latency_ms, (5, 10));
    }

    #[test]
    fn test_bad_values_rejected() {
        let mut config = ScenarioConfig::default();
        assert!(config.apply_vars(vars(&[("SIM_PREDICTOR", "grpc")])).is_err());
        assert!(config.apply_vars(vars(&[("SIM_LATENCY_MS", "80-20")])).is_err());
        assert!(config.apply_vars(vars(&[("SIM_SEED", "abc")])).is_err());
    }

    #[test]
    fn test_single_latency_value() {
        assert_eq!(parse_range("40").unwrap(), (40, 40));
    }
}
