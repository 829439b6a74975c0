use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{ControlsSettings, DecisionSettings, EngineConfig, FormattingSettings};

/// The file looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "dealshield.toml";

/// Loads the engine configuration from `dealshield.toml` (if present) and the environment.
///
/// Environment variables use the `DEALSHIELD` prefix and `__` as the section
/// separator, e.g. `DEALSHIELD__DECISION__GO_SPREAD_BPS=150`.
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE), false)
}

/// Loads the configuration from a specific file. When `required` is false a
/// missing file falls back to the built-in defaults.
pub fn load_config_from(path: &Path, required: bool) -> Result<EngineConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(required))
        .add_source(config::Environment::with_prefix("DEALSHIELD").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `EngineConfig` struct
    let config = builder.try_deserialize::<EngineConfig>()?;
    validate(&config)?;

    tracing::debug!(path = %path.display(), "Engine configuration loaded.");
    Ok(config)
}

/// Checks the cross-field invariants that serde cannot express.
pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    let decision = &config.decision;
    if decision.near_miss_ratio <= Decimal::ZERO || decision.near_miss_ratio > Decimal::ONE {
        return Err(ConfigError::ValidationError(
            "decision.near_miss_ratio must be in (0, 1]".to_string(),
        ));
    }
    if decision.flex_tight_below_pct > decision.flex_flexible_from_pct {
        return Err(ConfigError::ValidationError(
            "decision.flex_tight_below_pct must not exceed flex_flexible_from_pct".to_string(),
        ));
    }

    let controls = &config.controls;
    if controls.stress_bands.is_empty() {
        return Err(ConfigError::ValidationError(
            "controls.stress_bands must not be empty".to_string(),
        ));
    }
    if !controls.stress_bands.contains(&controls.default_stress_band) {
        return Err(ConfigError::ValidationError(format!(
            "controls.default_stress_band ({}) is not one of {:?}",
            controls.default_stress_band, controls.stress_bands
        )));
    }

    let formatting = &config.formatting;
    if formatting.fraction_ceiling >= formatting.yield_percent_ceiling {
        return Err(ConfigError::ValidationError(
            "formatting.fraction_ceiling must be below yield_percent_ceiling".to_string(),
        ));
    }
    Ok(())
}

/// Command-line override for the configuration file location.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Path to the engine configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: std::path::PathBuf,
}

#[cfg(feature = "clap")]
impl ConfigArgs {
    /// Loads the configuration, requiring the file only when a non-default path was given.
    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        let required = self.config.as_path() != Path::new(DEFAULT_CONFIG_FILE);
        load_config_from(&self.config, required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_pass_validation() {
        let config = EngineConfig::default();
        assert!(validate(&config).is_ok());
        assert_eq!(config.decision.go_spread_bps, dec!(200));
        assert_eq!(config.controls.stress_bands, vec![10, 7, 5, 3]);
    }

    #[test]
    fn missing_optional_file_uses_defaults() {
        let config = load_config_from(Path::new("does-not-exist.toml"), false).unwrap();
        assert_eq!(config.formatting.currency_symbol, "$");
        assert_eq!(config.decision.near_miss_ratio, dec!(0.95));
    }

    #[test]
    fn missing_required_file_is_a_load_error() {
        let result = load_config_from(Path::new("does-not-exist.toml"), true);
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn rejects_default_band_outside_set() {
        let mut config = EngineConfig::default();
        config.controls.default_stress_band = 8;
        assert!(matches!(validate(&config), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_out_of_range_near_miss_ratio() {
        let mut config = EngineConfig::default();
        config.decision.near_miss_ratio = dec!(1.2);
        assert!(validate(&config).is_err());
    }
}
