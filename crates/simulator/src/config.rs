//! Configuration for the simulation engine.

use std::{env, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{adjustments::MAX_WEIGHT_LOSS_KG, errors::SimError};

/// Environment variable overriding [`PredictorConfig::base_url`].
pub const RISK_API_URL_ENV: &str = "RISK_API_URL";

/// Environment variable overriding [`LiveConfig::quiescence_ms`].
pub const QUIESCENCE_MS_ENV: &str = "SIM_QUIESCENCE_MS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub predictor: PredictorConfig,
    pub live: LiveConfig,
    pub trajectory: TrajectoryConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Base URL of the risk service, without the `/predict` path.
    pub base_url: String,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Debounce window after the last adjustment before a request is issued.
    pub quiescence_ms: u64,
}

impl LiveConfig {
    pub fn quiescence(&self) -> Duration {
        Duration::from_millis(self.quiescence_ms)
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self { quiescence_ms: 120 }
    }
}

/// Weight-loss grid for trajectory sampling: `0, step, 2*step, ..., max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    pub step_kg: u32,
    pub max_kg: u32,
}

impl TrajectoryConfig {
    pub fn grid(&self) -> Vec<u32> {
        if self.step_kg == 0 {
            return vec![0];
        }
        (0..=self.max_kg).step_by(self.step_kg as usize).collect()
    }
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            step_kg: 2,
            max_kg: 20,
        }
    }
}

/// Candidate sets for the optimal plan search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Weight-loss values tried, in enumeration order.
    pub weight_grid: Vec<u32>,
    /// Reductions from the current weekly alcohol tried before quitting entirely.
    pub alcohol_reductions: Vec<u32>,
    /// At or below this many drinks per week only the current value is tried.
    pub low_alcohol_threshold: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            weight_grid: vec![0, 5, 10, 15, 20],
            alcohol_reductions: vec![3, 7],
            low_alcohol_threshold: 2,
        }
    }
}

impl SimulatorConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, SimError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load a JSON configuration file. Missing sections take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| SimError::Config(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), SimError> {
        if let Ok(url) = env::var(RISK_API_URL_ENV) {
            self.predictor.base_url = url;
        }
        if let Ok(ms) = env::var(QUIESCENCE_MS_ENV) {
            self.live.quiescence_ms = ms.parse().map_err(|_| {
                SimError::Config(format!("{QUIESCENCE_MS_ENV} must be an integer, got '{ms}'"))
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let url = self.predictor.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SimError::Config(format!(
                "predictor base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.trajectory.step_kg == 0 {
            return Err(SimError::Config("trajectory step_kg must be positive".to_string()));
        }
        if self.search.weight_grid.is_empty() {
            return Err(SimError::Config("search weight_grid must not be empty".to_string()));
        }
        if self.trajectory.max_kg > MAX_WEIGHT_LOSS_KG {
            return Err(SimError::Config(format!(
                "trajectory max_kg {} exceeds the {MAX_WEIGHT_LOSS_KG} kg weight-loss limit",
                self.trajectory.max_kg
            )));
        }
        if let Some(kg) = self
            .search
            .weight_grid
            .iter()
            .find(|&&kg| kg > MAX_WEIGHT_LOSS_KG)
        {
            return Err(SimError::Config(format!(
                "search weight_grid entry {kg} exceeds the {MAX_WEIGHT_LOSS_KG} kg weight-loss limit"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_trajectory_grid() {
        let grid = TrajectoryConfig::default().grid();
        assert_eq!(grid, vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20]);
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.live.quiescence(), Duration::from_millis(120));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulatorConfig =
            serde_json::from_str(r#"{"live": {"quiescence_ms": 50}}"#).unwrap();
        assert_eq!(config.live.quiescence_ms, 50);
        assert_eq!(config.search, SearchConfig::default());
        assert_eq!(config.predictor.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_rejects_empty_weight_grid() {
        let mut config = SimulatorConfig::default();
        config.search.weight_grid.clear();
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn test_rejects_weight_grid_beyond_limit() {
        let mut config = SimulatorConfig::default();
        config.search.weight_grid = vec![0, 25];
        assert!(matches!(config.validate(), Err(SimError::Config(_))));

        config.search.weight_grid = vec![0, MAX_WEIGHT_LOSS_KG];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_trajectory_beyond_limit() {
        let mut config = SimulatorConfig::default();
        config.trajectory.max_kg = 40;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn test_out_of_range_file_values_rejected() {
        let path = std::env::temp_dir().join(format!(
            "simulator-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"search": {"weight_grid": [0, 25]}}"#).unwrap();
        let result = SimulatorConfig::from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = SimulatorConfig::default();
        config.predictor.base_url = "localhost:8000".to_string();
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }
}
