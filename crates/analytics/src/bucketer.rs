//! Classification of trades into time buckets.
//!
//! `TimeBucketer` is the only place where period keys are derived. Every
//! aggregator receives its hour, day, weekday, month and week keys from here.

use crate::error::ValidationError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use core_types::{CoreError, InvalidTradePolicy, Month, RawTrade, TradeRecord, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;

/// Naive layouts tried after RFC 3339, most common first.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// An ISO-8601 week, e.g. `2024-W03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeek {
    pub year: i32,
    pub week: u32,
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl Serialize for IsoWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Every bucket a single trade belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketKeys {
    pub hour: u8,
    pub day: NaiveDate,
    pub weekday: Weekday,
    pub month: Month,
    pub week: IsoWeek,
}

/// The outcome of validating a batch of raw trades.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub trades: Vec<TradeRecord>,
    /// Records left out under `InvalidTradePolicy::Skip`.
    pub rejected: Vec<ValidationError>,
}

/// A stateless classifier from timestamps to bucket keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeBucketer;

impl TimeBucketer {
    /// Parses a trade timestamp into its wall-clock date and time.
    ///
    /// Offsets are accepted but not applied: `2024-01-15T09:30:00-03:00` is
    /// bucketed at 09h, the hour the trade was recorded in.
    pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, CoreError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(CoreError::InvalidTimestamp(
                raw.to_string(),
                "timestamp is empty".to_string(),
            ));
        }

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
            return Ok(with_offset.naive_local());
        }

        if let Some(parsed) = NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        {
            return Ok(parsed);
        }

        let reason = if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
            "date has no time of day"
        } else {
            "unrecognised date/time format"
        };
        Err(CoreError::InvalidTimestamp(raw.to_string(), reason.to_string()))
    }

    /// Derives the bucket keys of an already validated trade.
    pub fn keys(trade: &TradeRecord) -> BucketKeys {
        let timestamp = trade.timestamp;
        let day = timestamp.date();
        let iso = day.iso_week();
        BucketKeys {
            // `hour()` is always below 24.
            hour: timestamp.hour() as u8,
            day,
            weekday: Weekday::from(day.weekday()),
            month: Month::of(&day),
            week: IsoWeek {
                year: iso.year(),
                week: iso.week(),
            },
        }
    }

    /// Validates one raw trade and returns it together with its buckets.
    pub fn classify(
        index: usize,
        raw: &RawTrade,
    ) -> Result<(TradeRecord, BucketKeys), ValidationError> {
        let timestamp =
            Self::parse_timestamp(&raw.timestamp).map_err(|source| ValidationError {
                index,
                timestamp: raw.timestamp.clone(),
                source,
            })?;
        let trade = TradeRecord::new(timestamp, raw.pnl);
        let keys = Self::keys(&trade);
        Ok((trade, keys))
    }

    /// Validates a whole batch according to `policy`.
    pub fn ingest(
        raw: &[RawTrade],
        policy: InvalidTradePolicy,
    ) -> Result<Ingested, ValidationError> {
        let mut ingested = Ingested {
            trades: Vec::with_capacity(raw.len()),
            rejected: Vec::new(),
        };

        for (index, record) in raw.iter().enumerate() {
            match Self::classify(index, record) {
                Ok((trade, _)) => ingested.trades.push(trade),
                Err(error) => match policy {
                    InvalidTradePolicy::Reject => return Err(error),
                    InvalidTradePolicy::Skip => {
                        tracing::warn!(
                            index = error.index,
                            timestamp = %error.timestamp,
                            "Skipping trade with invalid timestamp."
                        );
                        ingested.rejected.push(error);
                    }
                },
            }
        }

        tracing::debug!(
            accepted = ingested.trades.len(),
            rejected = ingested.rejected.len(),
            "Trade batch ingested."
        );
        Ok(ingested)
    }
}
