use thiserror::Error;

/// Failure reported by a [`crate::predictor::RiskPredictor`].
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Risk service rejected the profile (status {status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Malformed risk assessment: {0}")]
    Malformed(String),

    #[error("Risk service not reachable: {0}")]
    Unreachable(String),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictionError),

    #[error("Invalid adjustment: {0}")]
    InvalidAdjustment(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
