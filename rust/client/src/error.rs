use crate::common::defs::Discrete;
use thiserror::Error;

pub type EnvResult<T> = Result<T, EnvError>;

#[derive(Error, Debug)]
pub enum EnvError {
    /// The named save game does not exist. No episode can start without it.
    #[error("no save game named '{save_name}'")]
    SaveNotFound { save_name: String },

    #[error("invalid action {action}, expected 0..{n}")]
    InvalidAction { action: Discrete, n: Discrete },

    #[error("reference trajectory exhausted: index {index}, length {len}")]
    ReferenceExhausted { index: usize, len: usize },

    #[error("episode not ready ({0}), call reset first")]
    NotReady(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("operation not supported by telemetry source: {0}")]
    Unsupported(&'static str),

    #[error("telemetry unavailable: {0}")]
    Telemetry(String),

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
