use core_types::{CategoryBand, InvalidTradePolicy};
use rust_decimal::Decimal;
use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisSettings,
    pub input: InputSettings,
    pub output: OutputSettings,
}

/// Contains parameters for the analytics engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Time-of-day bands, reported in the order listed.
    pub categories: Vec<CategoryBand>,
    /// Leave out trades with an unreadable timestamp instead of failing the run.
    pub skip_invalid_trades: bool,
    /// Daily result a risk-free position would earn, used by the Sharpe ratio.
    pub daily_risk_free_rate: Decimal,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            categories: CategoryBand::trading_session(),
            skip_invalid_trades: false,
            daily_risk_free_rate: Decimal::ZERO,
        }
    }
}

impl AnalysisSettings {
    pub fn invalid_trade_policy(&self) -> InvalidTradePolicy {
        if self.skip_invalid_trades {
            InvalidTradePolicy::Skip
        } else {
            InvalidTradePolicy::Reject
        }
    }
}

/// Contains parameters for reading trade files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Field separator of CSV exports (e.g. ";" for spreadsheet exports).
    pub csv_delimiter: char,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self { csv_delimiter: ',' }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: ReportFormat,
}

/// How the report is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}
