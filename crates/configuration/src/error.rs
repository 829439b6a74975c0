use thiserror::Error;

/// Errors raised while reading or checking `EngineConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read engine configuration (file or DEALSHIELD__* environment): {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Engine configuration is invalid: {0}")]
    ValidationError(String),
}
