use crate::core::forcefield::params::ParameterError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid force field input: {source}")]
    Parameter {
        #[from]
        source: ParameterError,
    },

    #[error("No coordinates have been supplied to the '{0}' force field")]
    MissingCoordinates(&'static str),
}
