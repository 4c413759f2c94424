use crate::EosModelName;
use thiserror::Error;

/// Error type for model lookup, model construction and walker initialization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EosError {
    #[error("EOS model name not valid: `{0}`")]
    InvalidModelName(String),
    #[error("Invalid EOS parameters: {0}")]
    InvalidParameters(String),
    #[error("`{name}` is not a valid parameter of `{model}`")]
    InvalidParameterName { model: EosModelName, name: String },
    #[error("Invalid walker configuration: {0}")]
    InvalidWalkerConfig(String),
    #[error("No physical starting point for `{model}` found in {attempts} attempts")]
    WalkerInitialization {
        model: EosModelName,
        attempts: usize,
    },
}

/// Convenience type for `Result<T, EosError>`.
pub type EosResult<T> = Result<T, EosError>;
