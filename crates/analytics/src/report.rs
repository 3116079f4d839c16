use crate::bucketer::IsoWeek;
use crate::category::CategorySummary;
use crate::daily::DailySummary;
use crate::equity::EquityCurves;
use crate::error::ValidationError;
use crate::metrics::MetricsRecord;
use crate::periodic::PeriodicSummary;
use crate::trades::TradeSummary;
use core_types::{Month, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// The complete result of one analysis pass.
///
/// This struct is the final output of the `AnalyticsEngine` and the only thing
/// the rendering layer consumes. It is rebuilt from scratch on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub daily: DailySummary,
    pub by_weekday: PeriodicSummary<Weekday>,
    pub by_month: PeriodicSummary<Month>,
    /// All 24 hours, zero-filled where no trade was opened.
    pub by_hour: BTreeMap<u8, MetricsRecord>,
    pub by_category: Vec<CategorySummary>,
    /// Only the ISO weeks that contain trades.
    pub by_week: PeriodicSummary<IsoWeek>,
    pub trades: TradeSummary,
    pub equity: EquityCurves,
    /// Records left out under `InvalidTradePolicy::Skip`, in input order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<ValidationError>,
}
