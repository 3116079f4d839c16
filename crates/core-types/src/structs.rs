use crate::error::CoreError;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single executed trade, validated and ready for aggregation.
///
/// The timestamp is the wall-clock time at which the trade was opened; every
/// hour, day, weekday and month bucket is derived from it as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: NaiveDateTime,
    pub pnl: Decimal,
}

impl TradeRecord {
    pub fn new(timestamp: NaiveDateTime, pnl: Decimal) -> Self {
        Self { timestamp, pnl }
    }

    pub fn is_win(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.pnl < Decimal::ZERO
    }
}

/// A trade as it arrives from an export or an API, before its timestamp has
/// been checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrade {
    #[serde(alias = "entry_date")]
    pub timestamp: String,
    pub pnl: Decimal,
}

impl RawTrade {
    pub fn new(timestamp: impl Into<String>, pnl: Decimal) -> Self {
        Self {
            timestamp: timestamp.into(),
            pnl,
        }
    }
}

/// A named time-of-day band covering the half-open hour range
/// `[hour_start, hour_end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBand {
    pub name: String,
    #[serde(alias = "hourStart")]
    pub hour_start: u8,
    #[serde(alias = "hourEnd")]
    pub hour_end: u8,
}

impl CategoryBand {
    pub fn new(name: impl Into<String>, hour_start: u8, hour_end: u8) -> Self {
        Self {
            name: name.into(),
            hour_start,
            hour_end,
        }
    }

    pub fn contains(&self, hour: u8) -> bool {
        hour >= self.hour_start && hour < self.hour_end
    }

    pub fn overlaps(&self, other: &CategoryBand) -> bool {
        self.hour_start < other.hour_end && other.hour_start < self.hour_end
    }

    /// Checks that the band is named and spans at least one hour of the day.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "category band".to_string(),
                "name must not be empty".to_string(),
            ));
        }
        if self.hour_end > 24 {
            return Err(CoreError::InvalidInput(
                format!("category band '{}'", self.name),
                format!("hour_end {} is past the end of the day", self.hour_end),
            ));
        }
        if self.hour_start >= self.hour_end {
            return Err(CoreError::InvalidInput(
                format!("category band '{}'", self.name),
                format!(
                    "hour_start {} must be before hour_end {}",
                    self.hour_start, self.hour_end
                ),
            ));
        }
        Ok(())
    }

    /// The default bands of a B3 trading session.
    pub fn trading_session() -> Vec<CategoryBand> {
        vec![
            CategoryBand::new("Pre-Market", 9, 10),
            CategoryBand::new("Morning", 10, 12),
            CategoryBand::new("Lunch", 12, 14),
            CategoryBand::new("Afternoon", 14, 16),
            CategoryBand::new("Close", 16, 19),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn raw_trade_accepts_entry_date_alias() {
        let raw: RawTrade =
            serde_json::from_str(r#"{"entry_date": "2024-01-15T09:30:00", "pnl": 500}"#).unwrap();
        assert_eq!(raw.timestamp, "2024-01-15T09:30:00");
        assert_eq!(raw.pnl, dec!(500));
    }

    #[test]
    fn raw_trade_accepts_fractional_pnl() {
        let raw: RawTrade =
            serde_json::from_str(r#"{"timestamp": "2024-01-15T09:30:00", "pnl": -12.5}"#).unwrap();
        assert_eq!(raw.pnl, dec!(-12.5));
    }

    #[rstest]
    #[case(9, true)]
    #[case(11, true)]
    #[case(12, false)]
    #[case(8, false)]
    fn band_is_half_open(#[case] hour: u8, #[case] expected: bool) {
        let band = CategoryBand::new("Morning", 9, 12);
        assert_eq!(band.contains(hour), expected);
    }

    #[rstest]
    #[case(CategoryBand::new("", 9, 10))]
    #[case(CategoryBand::new("Late", 20, 25))]
    #[case(CategoryBand::new("Empty", 10, 10))]
    #[case(CategoryBand::new("Reversed", 14, 12))]
    fn invalid_bands_are_rejected(#[case] band: CategoryBand) {
        assert!(band.validate().is_err());
    }

    #[test]
    fn session_bands_are_valid_and_disjoint() {
        let bands = CategoryBand::trading_session();
        for band in &bands {
            band.validate().unwrap();
        }
        for (i, a) in bands.iter().enumerate() {
            for b in &bands[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn band_reads_camel_case_keys() {
        let band: CategoryBand =
            serde_json::from_str(r#"{"name": "Lunch", "hourStart": 12, "hourEnd": 14}"#).unwrap();
        assert_eq!(band, CategoryBand::new("Lunch", 12, 14));
    }
}
