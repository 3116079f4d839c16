use crate::error::AnalyticsError;
use core_types::TradeRecord;
use rust_decimal::Decimal;
use serde::Serialize;

/// Count, net result, win rate and profit factor of a set of trades.
///
/// This is the metric block shared by every bucket (hour, day, weekday, month
/// and week). It is only ever produced by [`MetricsCalculator::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub trade_count: usize,
    pub net_result: Decimal,
    /// Percentage of trades with a positive PnL, in `[0, 100]`.
    pub win_rate: Decimal,
    /// Gross profit over gross loss. `0` when there are no losses.
    pub profit_factor: Decimal,
}

impl MetricsRecord {
    /// The record of a bucket with no trades.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn has_trades(&self) -> bool {
        self.trade_count > 0
    }
}

/// The single source of truth for win rate and profit factor.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn compute<'a, I>(trades: I) -> Result<MetricsRecord, AnalyticsError>
    where
        I: IntoIterator<Item = &'a TradeRecord>,
    {
        let mut trade_count = 0usize;
        let mut winning_trades = 0usize;
        let mut net_result = Decimal::ZERO;
        let mut gross_profit = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;

        for trade in trades {
            trade_count += 1;
            net_result = add(net_result, trade.pnl, "net result")?;
            if trade.is_win() {
                winning_trades += 1;
                gross_profit = add(gross_profit, trade.pnl, "gross profit")?;
            } else if trade.is_loss() {
                gross_loss = add(gross_loss, trade.pnl.abs(), "gross loss")?;
            }
        }

        Ok(MetricsRecord {
            trade_count,
            net_result,
            win_rate: percentage(winning_trades, trade_count),
            profit_factor: ratio_or_zero(gross_profit, gross_loss, "profit factor")?,
        })
    }
}

/// `a + b`, or `Overflow(what)` outside the range of `Decimal`.
pub(crate) fn add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, AnalyticsError> {
    a.checked_add(b).ok_or(AnalyticsError::Overflow(what))
}

pub(crate) fn sub(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, AnalyticsError> {
    a.checked_sub(b).ok_or(AnalyticsError::Overflow(what))
}

pub(crate) fn sum<'a, I>(values: I, what: &'static str) -> Result<Decimal, AnalyticsError>
where
    I: IntoIterator<Item = &'a Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| add(total, *value, what))
}

/// `100 * part / whole`, or `0` for an empty whole.
pub(crate) fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole)
}

/// `numerator / denominator`, saturating to `0` on a zero denominator.
pub(crate) fn ratio_or_zero(
    numerator: Decimal,
    denominator: Decimal,
    what: &'static str,
) -> Result<Decimal, AnalyticsError> {
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }
    numerator
        .checked_div(denominator)
        .ok_or(AnalyticsError::Overflow(what))
}

/// Arithmetic mean, or `0` for an empty slice.
pub(crate) fn mean(values: &[Decimal], what: &'static str) -> Result<Decimal, AnalyticsError> {
    if values.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Ok(sum(values, what)? / Decimal::from(values.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::trade;
    use rust_decimal_macros::dec;

    fn session() -> Vec<TradeRecord> {
        vec![
            trade("2024-01-15 09:30", dec!(500)),
            trade("2024-01-15 10:15", dec!(-200)),
            trade("2024-01-15 11:45", dec!(300)),
            trade("2024-01-15 13:20", dec!(-150)),
            trade("2024-01-15 14:30", dec!(400)),
            trade("2024-01-15 15:45", dec!(250)),
            trade("2024-01-15 16:30", dec!(-100)),
            trade("2024-01-15 17:15", dec!(350)),
        ]
    }

    #[test]
    fn computes_the_reference_session() {
        let record = MetricsCalculator::compute(&session()).unwrap();
        assert_eq!(record.trade_count, 8);
        assert_eq!(record.net_result, dec!(1350));
        assert_eq!(record.win_rate, dec!(62.5));
        assert_eq!(record.profit_factor, dec!(4));
    }

    #[test]
    fn empty_input_is_zero_filled() {
        let record = MetricsCalculator::compute(&[] as &[TradeRecord]).unwrap();
        assert_eq!(record, MetricsRecord::zero());
        assert!(!record.has_trades());
    }

    #[test]
    fn no_losses_saturates_profit_factor_to_zero() {
        let trades = vec![
            trade("2024-01-15 09:30", dec!(100)),
            trade("2024-01-15 09:45", dec!(50)),
        ];
        let record = MetricsCalculator::compute(&trades).unwrap();
        assert_eq!(record.win_rate, dec!(100));
        assert_eq!(record.profit_factor, Decimal::ZERO);
    }

    #[test]
    fn breakeven_trades_count_but_neither_win_nor_lose() {
        let trades = vec![
            trade("2024-01-15 09:30", dec!(0)),
            trade("2024-01-15 09:45", dec!(-40)),
            trade("2024-01-15 10:00", dec!(80)),
            trade("2024-01-15 10:30", dec!(0)),
        ];
        let record = MetricsCalculator::compute(&trades).unwrap();
        assert_eq!(record.trade_count, 4);
        assert_eq!(record.win_rate, dec!(25));
        assert_eq!(record.profit_factor, dec!(2));
    }

    #[test]
    fn only_losses_give_zero_profit_factor() {
        let trades = vec![trade("2024-01-15 09:30", dec!(-10))];
        let record = MetricsCalculator::compute(&trades).unwrap();
        assert_eq!(record.win_rate, Decimal::ZERO);
        assert_eq!(record.profit_factor, Decimal::ZERO);
        assert_eq!(record.net_result, dec!(-10));
    }

    #[test]
    fn overflowing_net_result_is_an_error() {
        let trades = vec![
            trade("2024-01-15 09:30", Decimal::MAX),
            trade("2024-01-15 09:45", Decimal::MAX),
        ];
        assert!(matches!(
            MetricsCalculator::compute(&trades),
            Err(AnalyticsError::Overflow(_))
        ));
    }

    #[test]
    fn ratio_that_leaves_the_decimal_range_is_an_error() {
        assert!(matches!(
            ratio_or_zero(Decimal::MAX, dec!(0.5), "ratio"),
            Err(AnalyticsError::Overflow("ratio"))
        ));
        assert_eq!(ratio_or_zero(dec!(3), Decimal::ZERO, "ratio").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(MetricsRecord::zero()).unwrap();
        for key in ["tradeCount", "netResult", "winRate", "profitFactor"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
