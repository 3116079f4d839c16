use crate::bucketer::TimeBucketer;
use crate::error::AnalyticsError;
use crate::metrics::{MetricsCalculator, MetricsRecord, mean, percentage, ratio_or_zero, sub, sum};
use crate::series;
use chrono::NaiveDate;
use core_types::TradeRecord;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// The metrics of a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMetrics {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub metrics: MetricsRecord,
}

/// Day-level statistics derived from the net result of each trading day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    // I. Gains and Losses
    pub average_daily_gain: Decimal,
    /// Mean of the losing days, kept negative.
    pub average_daily_loss: Decimal,
    pub max_daily_gain: Decimal,
    /// Most negative day result, `0` without losing days.
    pub max_daily_loss: Decimal,
    pub daily_payoff: Decimal,

    // II. Day Counts
    pub trading_days: usize,
    pub winning_days: usize,
    pub losing_days: usize,
    pub daily_win_rate: Decimal,
    pub consecutive_win_days: usize,
    pub consecutive_loss_days: usize,
    pub average_trades_per_day: Decimal,

    // III. Risk
    pub sharpe_ratio: Decimal,
    pub recovery_factor: Decimal,
    pub max_drawdown: Decimal,
    pub max_drawdown_pct: Decimal,
    /// Mean drawdown of the days that closed below the running peak.
    pub average_drawdown: Decimal,
    pub net_result: Decimal,

    /// Every trading day in chronological order.
    pub days: Vec<DayMetrics>,
}

/// Groups trades by calendar day and summarises the day results.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyAggregator {
    /// Subtracted from the mean day result before dividing by its deviation.
    daily_risk_free_rate: Decimal,
}

impl DailyAggregator {
    pub fn new(daily_risk_free_rate: Decimal) -> Self {
        Self {
            daily_risk_free_rate,
        }
    }

    pub fn aggregate(&self, trades: &[TradeRecord]) -> Result<DailySummary, AnalyticsError> {
        let mut by_day: BTreeMap<NaiveDate, Vec<&TradeRecord>> = BTreeMap::new();
        for trade in trades {
            by_day
                .entry(TimeBucketer::keys(trade).day)
                .or_default()
                .push(trade);
        }

        let days = by_day
            .into_iter()
            .map(|(date, day_trades)| {
                Ok(DayMetrics {
                    date,
                    metrics: MetricsCalculator::compute(day_trades)?,
                })
            })
            .collect::<Result<Vec<DayMetrics>, AnalyticsError>>()?;

        if days.is_empty() {
            return Ok(DailySummary::default());
        }

        let results: Vec<Decimal> = days.iter().map(|d| d.metrics.net_result).collect();
        let gains: Vec<Decimal> = results.iter().copied().filter(|r| *r > Decimal::ZERO).collect();
        let losses: Vec<Decimal> = results.iter().copied().filter(|r| *r < Decimal::ZERO).collect();

        let trading_days = days.len();
        let net_result = sum(&results, "net result")?;
        let average_daily_gain = mean(&gains, "average daily gain")?;
        let average_daily_loss = mean(&losses, "average daily loss")?;
        let (consecutive_win_days, consecutive_loss_days) = series::longest_streaks(&results);
        let drawdown = series::drawdown_stats(&series::equity_steps(&results)?)?;

        Ok(DailySummary {
            average_daily_gain,
            average_daily_loss,
            max_daily_gain: gains.iter().copied().max().unwrap_or(Decimal::ZERO),
            max_daily_loss: losses.iter().copied().min().unwrap_or(Decimal::ZERO),
            daily_payoff: ratio_or_zero(average_daily_gain, average_daily_loss.abs(), "daily payoff")?,
            trading_days,
            winning_days: gains.len(),
            losing_days: losses.len(),
            daily_win_rate: percentage(gains.len(), trading_days),
            consecutive_win_days,
            consecutive_loss_days,
            average_trades_per_day: Decimal::from(trades.len()) / Decimal::from(trading_days),
            sharpe_ratio: self.sharpe_ratio(&results)?,
            recovery_factor: ratio_or_zero(net_result, drawdown.max_drawdown, "recovery factor")?,
            max_drawdown: drawdown.max_drawdown,
            max_drawdown_pct: drawdown.max_drawdown_pct,
            average_drawdown: drawdown.average_drawdown,
            net_result,
            days,
        })
    }

    /// Mean excess day result over the population deviation of day results.
    /// `0` with fewer than two days or no variation between them.
    fn sharpe_ratio(&self, results: &[Decimal]) -> Result<Decimal, AnalyticsError> {
        let mean_result = mean(results, "Sharpe ratio")?;
        match series::std_dev(results, mean_result)? {
            Some(std_dev) if std_dev > Decimal::ZERO => ratio_or_zero(
                sub(mean_result, self.daily_risk_free_rate, "Sharpe ratio")?,
                std_dev,
                "Sharpe ratio",
            ),
            _ => Ok(Decimal::ZERO),
        }
    }
}
