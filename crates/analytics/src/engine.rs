use crate::bucketer::TimeBucketer;
use crate::category::CategoryAggregator;
use crate::daily::DailyAggregator;
use crate::equity::EquityCurve;
use crate::error::AnalyticsError;
use crate::metrics::{MetricsCalculator, MetricsRecord};
use crate::periodic::PeriodicAggregator;
use crate::report::AnalysisReport;
use crate::series::chronological_order;
use crate::trades::TradeStatistics;
use core_types::{CategoryBand, InvalidTradePolicy, Month, RawTrade, TradeRecord, Weekday};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// The tunable inputs of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsSettings {
    /// Time-of-day bands, reported in this order.
    pub categories: Vec<CategoryBand>,
    /// Daily risk-free result subtracted in the Sharpe ratio.
    pub daily_risk_free_rate: Decimal,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            categories: CategoryBand::trading_session(),
            daily_risk_free_rate: Decimal::ZERO,
        }
    }
}

/// A stateless calculator turning a trade list into an `AnalysisReport`.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    daily: DailyAggregator,
    categories: CategoryAggregator,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        let settings = AnalyticsSettings::default();
        Self {
            daily: DailyAggregator::new(settings.daily_risk_free_rate),
            categories: CategoryAggregator::new(settings.categories),
        }
    }
}

impl AnalyticsEngine {
    /// Builds an engine after checking every category band.
    pub fn new(settings: AnalyticsSettings) -> Result<Self, AnalyticsError> {
        for band in &settings.categories {
            band.validate()?;
        }
        for (i, band) in settings.categories.iter().enumerate() {
            for other in &settings.categories[i + 1..] {
                if band.overlaps(other) {
                    tracing::warn!(
                        first = %band.name,
                        second = %other.name,
                        "Category bands overlap; their trade totals will double count."
                    );
                }
            }
        }

        Ok(Self {
            daily: DailyAggregator::new(settings.daily_risk_free_rate),
            categories: CategoryAggregator::new(settings.categories),
        })
    }

    pub fn categories(&self) -> &[CategoryBand] {
        self.categories.bands()
    }

    /// The main entry point for validated trades.
    ///
    /// Input order is irrelevant: trades are sorted before any calculation that
    /// depends on chronology. Fails only when a figure leaves the range of
    /// `Decimal`, in which case no partial report is produced.
    #[tracing::instrument(name = "analyze", skip_all, fields(trades = trades.len()))]
    pub fn analyze(&self, trades: &[TradeRecord]) -> Result<AnalysisReport, AnalyticsError> {
        let mut ordered = trades.to_vec();
        ordered.sort_by(chronological_order);

        let by_hour = Self::hourly(&ordered)?;
        let report = AnalysisReport {
            daily: self.daily.aggregate(&ordered)?,
            by_weekday: PeriodicAggregator::aggregate::<Weekday>(&ordered)?,
            by_month: PeriodicAggregator::aggregate::<Month>(&ordered)?,
            by_category: self.categories.aggregate(&by_hour)?,
            by_hour,
            by_week: PeriodicAggregator::by_week(&ordered)?,
            trades: TradeStatistics::summarize(&ordered)?,
            equity: EquityCurve::all(&ordered)?,
            rejected: Vec::new(),
        };

        tracing::info!(
            trading_days = report.daily.trading_days,
            net_result = %report.daily.net_result,
            "Analysis complete."
        );
        Ok(report)
    }

    /// Validates raw trades under `policy`, then analyses the accepted ones.
    ///
    /// With `InvalidTradePolicy::Reject` an invalid timestamp fails the whole
    /// pass and no report is produced. With `InvalidTradePolicy::Skip` the
    /// skipped records are listed in `AnalysisReport::rejected`.
    pub fn analyze_raw(
        &self,
        raw: &[RawTrade],
        policy: InvalidTradePolicy,
    ) -> Result<AnalysisReport, AnalyticsError> {
        let ingested = TimeBucketer::ingest(raw, policy)?;
        let mut report = self.analyze(&ingested.trades)?;
        report.rejected = ingested.rejected;
        Ok(report)
    }

    /// Metrics for each of the 24 hours of the day.
    pub fn hourly(trades: &[TradeRecord]) -> Result<BTreeMap<u8, MetricsRecord>, AnalyticsError> {
        let mut grouped: BTreeMap<u8, Vec<&TradeRecord>> = (0..24).map(|h| (h, Vec::new())).collect();
        for trade in trades {
            grouped
                .entry(TimeBucketer::keys(trade).hour)
                .or_default()
                .push(trade);
        }
        grouped
            .into_iter()
            .map(|(hour, hour_trades)| Ok((hour, MetricsCalculator::compute(hour_trades)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::trade;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_invalid_bands() {
        let settings = AnalyticsSettings {
            categories: vec![CategoryBand::new("Broken", 12, 10)],
            ..AnalyticsSettings::default()
        };
        assert!(matches!(
            AnalyticsEngine::new(settings),
            Err(AnalyticsError::InvalidCategory(_))
        ));
    }

    #[test]
    fn accepts_overlapping_bands() {
        let settings = AnalyticsSettings {
            categories: vec![CategoryBand::new("A", 9, 12), CategoryBand::new("B", 11, 14)],
            ..AnalyticsSettings::default()
        };
        let engine = AnalyticsEngine::new(settings).unwrap();
        assert_eq!(engine.categories().len(), 2);
    }

    #[test]
    fn hourly_has_all_24_hours() {
        let trades = vec![trade("2024-01-15 23:59", dec!(5)), trade("2024-01-15 00:00", dec!(-5))];
        let by_hour = AnalyticsEngine::hourly(&trades).unwrap();
        assert_eq!(by_hour.len(), 24);
        assert_eq!(by_hour[&0].trade_count, 1);
        assert_eq!(by_hour[&23].trade_count, 1);
        assert_eq!(by_hour[&12], MetricsRecord::zero());
    }

    #[test]
    fn raw_batch_with_invalid_timestamp_produces_no_report() {
        let raw = vec![
            RawTrade::new("2024-01-15T09:30:00", dec!(10)),
            RawTrade::new("15/13/2024 09:30:00", dec!(10)),
        ];
        let engine = AnalyticsEngine::default();
        let err = engine.analyze_raw(&raw, InvalidTradePolicy::Reject).unwrap_err();
        match err {
            AnalyticsError::Validation(validation) => assert_eq!(validation.index, 1),
            other => panic!("unexpected error: {other}"),
        }

        let report = engine.analyze_raw(&raw, InvalidTradePolicy::Skip).unwrap();
        assert_eq!(report.trades.overall.trade_count, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].index, 1);
        assert_eq!(report.rejected[0].timestamp, "15/13/2024 09:30:00");
    }

    #[test]
    fn overflow_yields_an_error_instead_of_a_report() {
        // Two days of +/-5e14: their squared deviations leave the Decimal range.
        let trades = vec![
            trade("2024-01-15 09:30", dec!(500000000000000)),
            trade("2024-01-16 09:30", dec!(-500000000000000)),
        ];
        assert!(matches!(
            AnalyticsEngine::default().analyze(&trades),
            Err(AnalyticsError::Overflow(_))
        ));
    }

    #[test]
    fn overflowing_raw_batch_is_rejected() {
        let raw = vec![
            RawTrade::new("2024-01-15T09:30:00", Decimal::MAX),
            RawTrade::new("2024-01-15T10:30:00", Decimal::MAX),
        ];
        let result = AnalyticsEngine::default().analyze_raw(&raw, InvalidTradePolicy::Reject);
        assert!(matches!(result, Err(AnalyticsError::Overflow(_))));
    }
}
