use crate::error::AnalyticsError;
use crate::metrics::{MetricsCalculator, MetricsRecord, mean, ratio_or_zero, sum};
use crate::series::{self, chronological_order};
use core_types::TradeRecord;
use rust_decimal::Decimal;
use serde::Serialize;

/// Trade-level statistics over the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSummary {
    pub overall: MetricsRecord,

    // I. Profitability
    pub gross_profit: Decimal,
    /// Sum of the losing trades, kept negative.
    pub gross_loss: Decimal,
    pub average_trade: Decimal,
    pub average_win: Decimal,
    pub average_loss: Decimal,
    /// Average win over the magnitude of the average loss.
    pub payoff: Decimal,
    pub max_trade_gain: Decimal,
    pub max_trade_loss: Decimal,

    // II. Sequences and Drawdown
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    pub max_drawdown: Decimal,
    /// Max drawdown over the highest equity peak, in percent.
    pub max_drawdown_pct: Decimal,
    /// Mean drawdown of the trades that left equity below its running peak.
    pub average_drawdown: Decimal,
    /// Largest summed loss of a run of consecutive losing trades, as a magnitude.
    pub max_trade_drawdown: Decimal,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TradeStatistics;

impl TradeStatistics {
    pub fn summarize(trades: &[TradeRecord]) -> Result<TradeSummary, AnalyticsError> {
        if trades.is_empty() {
            return Ok(TradeSummary::default());
        }

        let mut chronological: Vec<&TradeRecord> = trades.iter().collect();
        chronological.sort_by(|a, b| chronological_order(a, b));

        let results: Vec<Decimal> = chronological.iter().map(|t| t.pnl).collect();
        let wins: Vec<Decimal> = results.iter().copied().filter(|r| *r > Decimal::ZERO).collect();
        let losses: Vec<Decimal> = results.iter().copied().filter(|r| *r < Decimal::ZERO).collect();

        let overall = MetricsCalculator::compute(chronological.iter().copied())?;
        let average_win = mean(&wins, "average win")?;
        let average_loss = mean(&losses, "average loss")?;
        let (max_consecutive_wins, max_consecutive_losses) = series::longest_streaks(&results);
        let drawdown = series::drawdown_stats(&series::equity_steps(&results)?)?;

        Ok(TradeSummary {
            gross_profit: sum(&wins, "gross profit")?,
            gross_loss: sum(&losses, "gross loss")?,
            average_trade: mean(&results, "average trade")?,
            average_win,
            average_loss,
            payoff: ratio_or_zero(average_win, average_loss.abs(), "payoff")?,
            max_trade_gain: wins.iter().copied().max().unwrap_or(Decimal::ZERO),
            max_trade_loss: losses.iter().copied().min().unwrap_or(Decimal::ZERO),
            max_consecutive_wins,
            max_consecutive_losses,
            max_drawdown: drawdown.max_drawdown,
            max_drawdown_pct: drawdown.max_drawdown_pct,
            average_drawdown: drawdown.average_drawdown,
            max_trade_drawdown: series::worst_losing_run(&results)?,
            overall,
        })
    }
}
