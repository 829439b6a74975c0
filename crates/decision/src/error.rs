use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecisionError {
    #[error("Decision parameters from configuration are invalid: {0}")]
    InvalidParameters(String),

    #[error("Unknown profile family: {0}")]
    UnknownProfileFamily(String),
}
