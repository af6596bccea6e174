use pairff::core::forcefield::params::ParamLoadError;
use pairff::engine::error::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    ParamLoad(#[from] ParamLoadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Derivative validation failed for '{0}'")]
    ValidationFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
