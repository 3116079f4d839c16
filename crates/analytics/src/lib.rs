//! # Trade Insights Analytics Engine
//!
//! This crate turns a batch of executed trades into a multi-dimensional performance
//! report: per day, weekday, month, hour of day, ISO week and configurable time-of-day
//! category, plus whole-batch trade statistics and equity curves.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files, the
//!   terminal or configuration sources. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless calculator. It takes
//!   trade records as input and produces an `AnalysisReport` as output. Every pass starts
//!   from zero, so analysing the same batch twice yields identical reports.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: Validates the category configuration and runs every aggregator.
//! - `AnalysisReport`: The standardized struct that holds every dimension of the analysis.
//! - `TimeBucketer`: Parses raw timestamps and derives the calendar keys of a trade.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

pub mod bucketer;
pub mod category;
pub mod daily;
pub mod engine;
pub mod equity;
pub mod error;
pub mod metrics;
pub mod periodic;
pub mod report;
mod series;
pub mod trades;

#[cfg(test)]
mod test_support;

pub use bucketer::{BucketKeys, Ingested, IsoWeek, TimeBucketer};
pub use category::{CategoryAggregator, CategorySummary, HourMetrics};
pub use daily::{DailyAggregator, DailySummary, DayMetrics};
pub use engine::{AnalyticsEngine, AnalyticsSettings};
pub use equity::{EquityCurve, EquityCurves, EquityGrouping, EquityPoint};
pub use error::{AnalyticsError, ValidationError};
pub use metrics::{MetricsCalculator, MetricsRecord};
pub use periodic::{CalendarPeriod, PeriodMetrics, PeriodicAggregator, PeriodicSummary};
pub use report::AnalysisReport;
pub use trades::{TradeStatistics, TradeSummary};
