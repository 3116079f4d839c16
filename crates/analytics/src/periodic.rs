use crate::bucketer::{BucketKeys, IsoWeek, TimeBucketer};
use crate::error::AnalyticsError;
use crate::metrics::{MetricsCalculator, MetricsRecord};
use core_types::{Month, TradeRecord, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// A period dimension whose values can be enumerated up front.
pub trait CalendarPeriod: Copy + Ord + Serialize + 'static {
    /// Every value in calendar order.
    const ALL: &'static [Self];

    fn of(keys: &BucketKeys) -> Self;
}

impl CalendarPeriod for Weekday {
    const ALL: &'static [Self] = &Weekday::ALL;

    fn of(keys: &BucketKeys) -> Self {
        keys.weekday
    }
}

impl CalendarPeriod for Month {
    const ALL: &'static [Self] = &Month::ALL;

    fn of(keys: &BucketKeys) -> Self {
        keys.month
    }
}

/// A metrics record tagged with the period it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodMetrics<K> {
    pub period: K,
    #[serde(flatten)]
    pub metrics: MetricsRecord,
}

/// Per-period metrics plus the best and worst active period.
///
/// `best` and `worst` are `None` when no period has any trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodicSummary<K> {
    pub per_period: BTreeMap<K, MetricsRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<PeriodMetrics<K>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst: Option<PeriodMetrics<K>>,
}

impl<K: Ord + Copy> PeriodicSummary<K> {
    fn from_periods(per_period: BTreeMap<K, MetricsRecord>) -> Self {
        let (best, worst) = select_extremes(&per_period);
        Self {
            per_period,
            best,
            worst,
        }
    }
}

/// Aggregates trades along a period dimension.
#[derive(Debug, Default, Clone, Copy)]
pub struct PeriodicAggregator;

impl PeriodicAggregator {
    /// One record per period value, zero-filled where no trade falls.
    pub fn aggregate<P: CalendarPeriod>(
        trades: &[TradeRecord],
    ) -> Result<PeriodicSummary<P>, AnalyticsError> {
        let mut grouped: BTreeMap<P, Vec<&TradeRecord>> =
            P::ALL.iter().map(|period| (*period, Vec::new())).collect();
        for trade in trades {
            grouped
                .entry(P::of(&TimeBucketer::keys(trade)))
                .or_default()
                .push(trade);
        }

        Ok(PeriodicSummary::from_periods(compute_all(grouped)?))
    }

    /// One record per ISO week that has at least one trade.
    pub fn by_week(trades: &[TradeRecord]) -> Result<PeriodicSummary<IsoWeek>, AnalyticsError> {
        let mut grouped: BTreeMap<IsoWeek, Vec<&TradeRecord>> = BTreeMap::new();
        for trade in trades {
            grouped
                .entry(TimeBucketer::keys(trade).week)
                .or_default()
                .push(trade);
        }

        Ok(PeriodicSummary::from_periods(compute_all(grouped)?))
    }
}

fn compute_all<K: Ord>(
    grouped: BTreeMap<K, Vec<&TradeRecord>>,
) -> Result<BTreeMap<K, MetricsRecord>, AnalyticsError> {
    grouped
        .into_iter()
        .map(|(period, trades)| Ok((period, MetricsCalculator::compute(trades)?)))
        .collect()
}

/// Picks the highest and lowest profit factor among periods with trades.
///
/// Ties on profit factor go to the higher net result, then to the earlier
/// period (map order), since a later period only replaces a strictly better
/// candidate.
fn select_extremes<K: Ord + Copy>(
    per_period: &BTreeMap<K, MetricsRecord>,
) -> (Option<PeriodMetrics<K>>, Option<PeriodMetrics<K>>) {
    let mut best: Option<PeriodMetrics<K>> = None;
    let mut worst: Option<PeriodMetrics<K>> = None;

    for (period, metrics) in per_period.iter().filter(|(_, m)| m.has_trades()) {
        let candidate = PeriodMetrics {
            period: *period,
            metrics: *metrics,
        };

        let replaces_best = best.as_ref().is_none_or(|current| {
            let current = &current.metrics;
            metrics.profit_factor > current.profit_factor
                || (metrics.profit_factor == current.profit_factor
                    && metrics.net_result > current.net_result)
        });
        if replaces_best {
            best = Some(candidate);
        }

        let replaces_worst = worst.as_ref().is_none_or(|current| {
            let current = &current.metrics;
            metrics.profit_factor < current.profit_factor
                || (metrics.profit_factor == current.profit_factor
                    && metrics.net_result > current.net_result)
        });
        if replaces_worst {
            worst = Some(candidate);
        }
    }

    (best, worst)
}
