//! Equity curves: the running balance of the batch, trade by trade or
//! grouped by calendar period, with the drawdown at every point.

use crate::bucketer::{IsoWeek, TimeBucketer};
use crate::error::AnalyticsError;
use crate::metrics::add;
use crate::series::{self, EquityStep, chronological_order};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use core_types::{Month, TradeRecord};
use rust_decimal::Decimal;
use serde::Serialize;

/// The granularity of an equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquityGrouping {
    Trade,
    Day,
    Week,
    Month,
}

/// One point of an equity curve.
///
/// A grouped point closes at the last trade of its period: `balance` and `peak`
/// are taken there, while `drawdown` and `drawdown_pct` are the deepest values
/// reached inside the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    /// Opening time of the first trade of the point.
    pub timestamp: NaiveDateTime,
    pub trades: usize,
    /// Summed result of the trades of the point.
    pub result: Decimal,
    pub balance: Decimal,
    pub peak: Decimal,
    pub drawdown: Decimal,
    pub drawdown_pct: Decimal,
}

/// The equity curve at every granularity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityCurves {
    pub by_trade: Vec<EquityPoint>,
    pub by_day: Vec<EquityPoint>,
    pub by_week: Vec<EquityPoint>,
    pub by_month: Vec<EquityPoint>,
}

#[derive(PartialEq, Eq)]
enum PointKey {
    Trade(usize),
    Day(NaiveDate),
    Week(IsoWeek),
    Month(i32, Month),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EquityCurve;

impl EquityCurve {
    /// Builds the curve starting from a zero balance. Input order is irrelevant.
    pub fn build(
        trades: &[TradeRecord],
        grouping: EquityGrouping,
    ) -> Result<Vec<EquityPoint>, AnalyticsError> {
        let mut chronological: Vec<&TradeRecord> = trades.iter().collect();
        chronological.sort_by(|a, b| chronological_order(a, b));

        let results: Vec<Decimal> = chronological.iter().map(|t| t.pnl).collect();
        let steps = series::equity_steps(&results)?;

        let mut points: Vec<EquityPoint> = Vec::new();
        let mut current_key: Option<PointKey> = None;

        for (index, (trade, step)) in chronological.iter().zip(&steps).enumerate() {
            let key = Self::key(index, trade, grouping);
            let drawdown_pct = step.drawdown_pct()?;
            let same_point = current_key.as_ref() == Some(&key);

            match points.last_mut() {
                Some(point) if same_point => {
                    Self::extend(point, trade, step, drawdown_pct)?;
                }
                _ => {
                    points.push(EquityPoint {
                        timestamp: trade.timestamp,
                        trades: 1,
                        result: trade.pnl,
                        balance: step.balance,
                        peak: step.peak,
                        drawdown: step.drawdown,
                        drawdown_pct,
                    });
                    current_key = Some(key);
                }
            }
        }

        Ok(points)
    }

    pub fn all(trades: &[TradeRecord]) -> Result<EquityCurves, AnalyticsError> {
        Ok(EquityCurves {
            by_trade: Self::build(trades, EquityGrouping::Trade)?,
            by_day: Self::build(trades, EquityGrouping::Day)?,
            by_week: Self::build(trades, EquityGrouping::Week)?,
            by_month: Self::build(trades, EquityGrouping::Month)?,
        })
    }

    fn key(index: usize, trade: &TradeRecord, grouping: EquityGrouping) -> PointKey {
        let keys = TimeBucketer::keys(trade);
        match grouping {
            EquityGrouping::Trade => PointKey::Trade(index),
            EquityGrouping::Day => PointKey::Day(keys.day),
            EquityGrouping::Week => PointKey::Week(keys.week),
            EquityGrouping::Month => PointKey::Month(keys.day.year(), keys.month),
        }
    }

    fn extend(
        point: &mut EquityPoint,
        trade: &TradeRecord,
        step: &EquityStep,
        drawdown_pct: Decimal,
    ) -> Result<(), AnalyticsError> {
        point.trades += 1;
        point.result = add(point.result, trade.pnl, "equity curve")?;
        point.balance = step.balance;
        point.peak = step.peak;
        point.drawdown = point.drawdown.max(step.drawdown);
        point.drawdown_pct = point.drawdown_pct.max(drawdown_pct);
        Ok(())
    }
}
