use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum MeterError {
    #[error("config error: {0}")]
    Config(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T, E = MeterError> = std::result::Result<T, E>;
