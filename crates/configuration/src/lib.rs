use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalysisSettings, Config, InputSettings, OutputSettings, ReportFormat};

/// Prefix of the environment variables that override file settings,
/// e.g. `TRADE_INSIGHTS__ANALYSIS__SKIP_INVALID_TRADES=true`.
pub const ENV_PREFIX: &str = "TRADE_INSIGHTS";

/// Loads the application configuration.
///
/// This function is the primary entry point for this crate. Built-in defaults are
/// overridden by the TOML file at `path` (when given) and then by `TRADE_INSIGHTS__*`
/// environment variables. The merged result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        tracing::debug!(path = %path.display(), "Reading configuration file.");
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = settings.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Checks the cross-field rules that serde cannot express.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    for band in &config.analysis.categories {
        band.validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    }
    if config.analysis.daily_risk_free_rate.is_sign_negative() {
        return Err(ConfigError::ValidationError(format!(
            "daily_risk_free_rate must not be negative, got {}",
            config.analysis.daily_risk_free_rate
        )));
    }
    if !config.input.csv_delimiter.is_ascii() {
        return Err(ConfigError::ValidationError(format!(
            "csv_delimiter must be a single ASCII character, got '{}'",
            config.input.csv_delimiter
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CategoryBand, InvalidTradePolicy};
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn no_file_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.analysis.categories, CategoryBand::trading_session());
        assert_eq!(config.analysis.invalid_trade_policy(), InvalidTradePolicy::Reject);
        assert_eq!(config.input.csv_delimiter, ',');
        assert_eq!(config.output.format, ReportFormat::Table);
    }

    #[test]
    fn file_overrides_defaults() {
        let file = toml_file(
            r#"
[analysis]
skip_invalid_trades = true
daily_risk_free_rate = "0.5"

[[analysis.categories]]
name = "Opening"
hour_start = 9
hour_end = 11

[[analysis.categories]]
name = "Rest"
hour_start = 11
hour_end = 18

[input]
csv_delimiter = ";"

[output]
format = "json"
"#,
        );
        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(
            config.analysis.categories,
            vec![
                CategoryBand::new("Opening", 9, 11),
                CategoryBand::new("Rest", 11, 18)
            ]
        );
        assert_eq!(config.analysis.invalid_trade_policy(), InvalidTradePolicy::Skip);
        assert_eq!(config.analysis.daily_risk_free_rate, dec!(0.5));
        assert_eq!(config.input.csv_delimiter, ';');
        assert_eq!(config.output.format, ReportFormat::Json);
    }

    #[rstest]
    #[case("name = \"Late\"\nhour_start = 20\nhour_end = 25")]
    #[case("name = \"Backwards\"\nhour_start = 12\nhour_end = 10")]
    #[case("name = \"\"\nhour_start = 9\nhour_end = 10")]
    fn invalid_bands_fail_validation(#[case] band: &str) {
        let file = toml_file(&format!("[[analysis.categories]]\n{band}\n"));
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let result = load_config(Some(Path::new("/nonexistent/trade-insights.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn negative_risk_free_rate_is_rejected() {
        let mut config = Config::default();
        config.analysis.daily_risk_free_rate = dec!(-1);
        assert!(matches!(validate(&config), Err(ConfigError::ValidationError(_))));
    }
}
