use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown decision status code: {0}")]
    UnknownStatus(String),
}
