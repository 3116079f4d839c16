//! Calculations over chronologically ordered result series.

use crate::error::AnalyticsError;
use crate::metrics::{add, mean, ratio_or_zero, sub, sum};
use core_types::TradeRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use std::cmp::Ordering;

/// Orders trades by timestamp, then by PnL, so that any permutation of the
/// same batch sorts to the same sequence.
pub(crate) fn chronological_order(a: &TradeRecord, b: &TradeRecord) -> Ordering {
    a.timestamp.cmp(&b.timestamp).then(a.pnl.cmp(&b.pnl))
}

/// Longest runs of strictly positive and strictly negative values.
///
/// A zero breaks both runs.
pub(crate) fn longest_streaks(results: &[Decimal]) -> (usize, usize) {
    let (mut best_wins, mut best_losses) = (0usize, 0usize);
    let (mut wins, mut losses) = (0usize, 0usize);

    for result in results {
        if *result > Decimal::ZERO {
            wins += 1;
            losses = 0;
            best_wins = best_wins.max(wins);
        } else if *result < Decimal::ZERO {
            losses += 1;
            wins = 0;
            best_losses = best_losses.max(losses);
        } else {
            wins = 0;
            losses = 0;
        }
    }

    (best_wins, best_losses)
}

/// Largest summed loss over a run of consecutive losing results, as a
/// magnitude. A zero or positive result ends the run.
pub(crate) fn worst_losing_run(results: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    let mut run = Decimal::ZERO;
    let mut worst = Decimal::ZERO;

    for result in results {
        if *result < Decimal::ZERO {
            run = add(run, result.abs(), "losing run")?;
            worst = worst.max(run);
        } else {
            run = Decimal::ZERO;
        }
    }

    Ok(worst)
}

/// One point of the equity curve obtained by summing results from an
/// initial equity of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EquityStep {
    pub balance: Decimal,
    /// Highest balance so far, never below the zero origin.
    pub peak: Decimal,
    /// `peak - balance`, a magnitude.
    pub drawdown: Decimal,
}

impl EquityStep {
    /// Drawdown as a percentage of the running peak; `0` while the peak is zero.
    pub fn drawdown_pct(&self) -> Result<Decimal, AnalyticsError> {
        percent_of(self.drawdown, self.peak)
    }
}

pub(crate) fn equity_steps(results: &[Decimal]) -> Result<Vec<EquityStep>, AnalyticsError> {
    let mut balance = Decimal::ZERO;
    let mut peak = Decimal::ZERO;

    results
        .iter()
        .map(|result| {
            balance = add(balance, *result, "equity balance")?;
            peak = peak.max(balance);
            Ok(EquityStep {
                balance,
                peak,
                drawdown: sub(peak, balance, "drawdown")?,
            })
        })
        .collect()
}

/// Drawdown figures of an equity curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DrawdownStats {
    pub max_drawdown: Decimal,
    /// Max drawdown over the highest peak, in percent.
    pub max_drawdown_pct: Decimal,
    /// Mean drawdown of the points below their running peak.
    pub average_drawdown: Decimal,
}

pub(crate) fn drawdown_stats(steps: &[EquityStep]) -> Result<DrawdownStats, AnalyticsError> {
    let max_drawdown = steps
        .iter()
        .map(|step| step.drawdown)
        .max()
        .unwrap_or(Decimal::ZERO);
    let highest_peak = steps
        .iter()
        .map(|step| step.peak)
        .max()
        .unwrap_or(Decimal::ZERO);
    let underwater: Vec<Decimal> = steps
        .iter()
        .map(|step| step.drawdown)
        .filter(|drawdown| *drawdown > Decimal::ZERO)
        .collect();

    Ok(DrawdownStats {
        max_drawdown,
        max_drawdown_pct: percent_of(max_drawdown, highest_peak)?,
        average_drawdown: mean(&underwater, "average drawdown")?,
    })
}

/// Largest peak-to-trough decline of the equity curve, as a magnitude.
#[cfg(test)]
pub(crate) fn max_drawdown(results: &[Decimal]) -> Decimal {
    drawdown_stats(&equity_steps(results).unwrap())
        .unwrap()
        .max_drawdown
}

/// `100 * part / whole` for a positive whole, otherwise `0`.
fn percent_of(part: Decimal, whole: Decimal) -> Result<Decimal, AnalyticsError> {
    if whole <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    ratio_or_zero(part, whole, "drawdown percentage")?
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(AnalyticsError::Overflow("drawdown percentage"))
}

/// Population standard deviation. `None` for fewer than two values.
pub(crate) fn std_dev(values: &[Decimal], mean: Decimal) -> Result<Option<Decimal>, AnalyticsError> {
    if values.len() < 2 {
        return Ok(None);
    }
    let squares = values
        .iter()
        .map(|value| {
            let deviation = sub(*value, mean, "standard deviation")?;
            deviation
                .checked_mul(deviation)
                .ok_or(AnalyticsError::Overflow("standard deviation"))
        })
        .collect::<Result<Vec<Decimal>, AnalyticsError>>()?;
    let variance = sum(&squares, "standard deviation")? / Decimal::from(values.len());
    Ok(variance.sqrt())
}
