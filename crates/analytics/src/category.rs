use crate::error::AnalyticsError;
use crate::metrics::{MetricsRecord, mean, sum};
use core_types::CategoryBand;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// The metrics of one hour of the day inside a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourMetrics {
    pub hour: u8,
    #[serde(flatten)]
    pub metrics: MetricsRecord,
}

/// Totals and per-hour averages of a time-of-day band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub hour_start: u8,
    pub hour_end: u8,
    pub total_trades: usize,
    pub total_result: Decimal,
    /// Mean win rate of the hours that have trades.
    pub avg_win_rate: Decimal,
    /// Mean profit factor of the hours that have trades.
    pub avg_profit_factor: Decimal,
    /// The active hours of the band, earliest first.
    pub hours: Vec<HourMetrics>,
    /// Hour with the highest net result; the earlier hour wins a tie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_hour: Option<u8>,
}

/// Rolls hourly metrics up into the configured bands.
#[derive(Debug, Clone, Default)]
pub struct CategoryAggregator {
    bands: Vec<CategoryBand>,
}

impl CategoryAggregator {
    /// Bands are expected to be validated already.
    pub fn new(bands: Vec<CategoryBand>) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &[CategoryBand] {
        &self.bands
    }

    pub fn aggregate(
        &self,
        by_hour: &BTreeMap<u8, MetricsRecord>,
    ) -> Result<Vec<CategorySummary>, AnalyticsError> {
        self.bands
            .iter()
            .map(|band| Self::summarize(band, by_hour))
            .collect()
    }

    fn summarize(
        band: &CategoryBand,
        by_hour: &BTreeMap<u8, MetricsRecord>,
    ) -> Result<CategorySummary, AnalyticsError> {
        let hours: Vec<HourMetrics> = by_hour
            .iter()
            .filter(|(hour, metrics)| band.contains(**hour) && metrics.has_trades())
            .map(|(hour, metrics)| HourMetrics {
                hour: *hour,
                metrics: *metrics,
            })
            .collect();

        let results: Vec<Decimal> = hours.iter().map(|h| h.metrics.net_result).collect();
        let win_rates: Vec<Decimal> = hours.iter().map(|h| h.metrics.win_rate).collect();
        let profit_factors: Vec<Decimal> = hours.iter().map(|h| h.metrics.profit_factor).collect();

        let best_hour = hours
            .iter()
            .fold(None::<&HourMetrics>, |best, current| match best {
                Some(b) if b.metrics.net_result >= current.metrics.net_result => Some(b),
                _ => Some(current),
            })
            .map(|h| h.hour);

        Ok(CategorySummary {
            name: band.name.clone(),
            hour_start: band.hour_start,
            hour_end: band.hour_end,
            total_trades: hours.iter().map(|h| h.metrics.trade_count).sum(),
            total_result: sum(&results, "category result")?,
            avg_win_rate: mean(&win_rates, "category win rate")?,
            avg_profit_factor: mean(&profit_factors, "category profit factor")?,
            hours,
            best_hour,
        })
    }
}
