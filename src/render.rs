//! Terminal tables for an `AnalysisReport`.

use analytics::{AnalysisReport, EquityPoint, MetricsRecord, PeriodicSummary};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::CategoryBand;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt::Display;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn money(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn percent(value: Decimal) -> String {
    format!("{}%", value.round_dp(2))
}

fn metrics_table<K: Display>(title: &str, rows: impl IntoIterator<Item = (K, MetricsRecord)>) -> Table {
    let mut table = new_table(vec![title, "Trades", "Net Result", "Win Rate", "Profit Factor"]);
    for (key, metrics) in rows {
        table.add_row(vec![
            key.to_string(),
            metrics.trade_count.to_string(),
            money(metrics.net_result),
            percent(metrics.win_rate),
            money(metrics.profit_factor),
        ]);
    }
    table
}

fn periodic_table<K: Display>(title: &str, summary: &PeriodicSummary<K>) -> Table {
    let mut table = metrics_table(title, summary.per_period.iter().map(|(period, m)| (period, *m)));
    if let Some(best) = &summary.best {
        table.add_row(vec![format!("Best: {}", best.period)]);
    }
    if let Some(worst) = &summary.worst {
        table.add_row(vec![format!("Worst: {}", worst.period)]);
    }
    table
}

fn overview_table(report: &AnalysisReport) -> Table {
    let daily = &report.daily;
    let trades = &report.trades;
    let mut table = new_table(vec!["Metric", "Value"]);
    let rows: Vec<(&str, String)> = vec![
        ("Trades", trades.overall.trade_count.to_string()),
        ("Net Result", money(trades.overall.net_result)),
        ("Win Rate", percent(trades.overall.win_rate)),
        ("Profit Factor", money(trades.overall.profit_factor)),
        ("Payoff", money(trades.payoff)),
        ("Average Win", money(trades.average_win)),
        ("Average Loss", money(trades.average_loss)),
        ("Max Consecutive Wins", trades.max_consecutive_wins.to_string()),
        ("Max Consecutive Losses", trades.max_consecutive_losses.to_string()),
        ("Trading Days", daily.trading_days.to_string()),
        ("Daily Win Rate", percent(daily.daily_win_rate)),
        ("Average Daily Gain", money(daily.average_daily_gain)),
        ("Average Daily Loss", money(daily.average_daily_loss)),
        ("Max Daily Gain", money(daily.max_daily_gain)),
        ("Max Daily Loss", money(daily.max_daily_loss)),
        ("Consecutive Win Days", daily.consecutive_win_days.to_string()),
        ("Consecutive Loss Days", daily.consecutive_loss_days.to_string()),
        ("Sharpe Ratio", money(daily.sharpe_ratio)),
        ("Max Drawdown", money(daily.max_drawdown)),
        ("Max Drawdown %", percent(daily.max_drawdown_pct)),
        ("Average Drawdown", money(daily.average_drawdown)),
        ("Max Trade Drawdown", money(trades.max_trade_drawdown)),
        ("Recovery Factor", money(daily.recovery_factor)),
        ("Skipped Trades", report.rejected.len().to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    table
}

fn hourly_table(by_hour: &BTreeMap<u8, MetricsRecord>) -> Table {
    metrics_table(
        "Hour",
        by_hour
            .iter()
            .filter(|(_, metrics)| metrics.has_trades())
            .map(|(hour, metrics)| (format!("{hour:02}h"), *metrics)),
    )
}

fn category_table(report: &AnalysisReport) -> Table {
    let mut table = new_table(vec![
        "Category",
        "Hours",
        "Trades",
        "Net Result",
        "Avg Win Rate",
        "Avg Profit Factor",
        "Best Hour",
    ]);
    for category in &report.by_category {
        table.add_row(vec![
            category.name.clone(),
            format!("{:02}h-{:02}h", category.hour_start, category.hour_end),
            category.total_trades.to_string(),
            money(category.total_result),
            percent(category.avg_win_rate),
            money(category.avg_profit_factor),
            category
                .best_hour
                .map(|hour| format!("{hour:02}h"))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

fn equity_table(points: &[EquityPoint]) -> Table {
    let mut table = new_table(vec!["Day", "Trades", "Result", "Balance", "Drawdown", "Drawdown %"]);
    for point in points {
        table.add_row(vec![
            point.timestamp.format("%Y-%m-%d").to_string(),
            point.trades.to_string(),
            money(point.result),
            money(point.balance),
            money(point.drawdown),
            percent(point.drawdown_pct),
        ]);
    }
    table
}

/// Every section of the report, in print order.
pub fn report_tables(report: &AnalysisReport) -> Vec<(&'static str, Table)> {
    vec![
        ("Overview", overview_table(report)),
        (
            "Daily Results",
            metrics_table(
                "Day",
                report.daily.days.iter().map(|day| (day.date.format("%Y-%m-%d"), day.metrics)),
            ),
        ),
        ("By Weekday", periodic_table("Weekday", &report.by_weekday)),
        ("By Month", periodic_table("Month", &report.by_month)),
        ("By Week", periodic_table("Week", &report.by_week)),
        ("By Hour", hourly_table(&report.by_hour)),
        ("By Category", category_table(report)),
        ("Equity by Day", equity_table(&report.equity.by_day)),
    ]
}

pub fn print_report(report: &AnalysisReport) {
    for (title, table) in report_tables(report) {
        println!("\n{title}\n{table}");
    }
}

pub fn bands_table(bands: &[CategoryBand]) -> Table {
    let mut table = new_table(vec!["Category", "From", "To (exclusive)"]);
    for band in bands {
        table.add_row(vec![
            band.name.clone(),
            format!("{:02}:00", band.hour_start),
            format!("{:02}:00", band.hour_end),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AnalyticsEngine;
    use core_types::{InvalidTradePolicy, RawTrade};
    use rust_decimal_macros::dec;

    fn sample_report() -> AnalysisReport {
        let raw = vec![
            RawTrade::new("2024-01-15T09:30:00", dec!(500)),
            RawTrade::new("2024-01-15T10:15:00", dec!(-200)),
            RawTrade::new("2024-01-16T16:30:00", dec!(125.555)),
        ];
        AnalyticsEngine::default()
            .analyze_raw(&raw, InvalidTradePolicy::Reject)
            .unwrap()
    }

    #[test]
    fn renders_every_section() {
        let tables = report_tables(&sample_report());
        let titles: Vec<&str> = tables.iter().map(|(title, _)| *title).collect();
        assert_eq!(
            titles,
            vec![
                "Overview",
                "Daily Results",
                "By Weekday",
                "By Month",
                "By Week",
                "By Hour",
                "By Category",
                "Equity by Day"
            ]
        );
    }

    #[test]
    fn tables_use_report_labels() {
        let tables = report_tables(&sample_report());
        let rendered: Vec<String> = tables.iter().map(|(_, table)| table.to_string()).collect();

        assert!(rendered[1].contains("2024-01-16"));
        assert!(rendered[1].contains("125.56"));
        assert!(rendered[2].contains("Mon"));
        assert!(rendered[4].contains("2024-W03"));
        assert!(rendered[5].contains("09h"));
        assert!(!rendered[5].contains("03h"));
        assert!(rendered[6].contains("Pre-Market"));
        // Day two closes at 300 + 125.56 after the peak of 500 was lost to 300.
        assert!(rendered[7].contains("425.56"));
        assert!(rendered[7].contains("200"));
    }

    #[test]
    fn overview_counts_skipped_trades() {
        let raw = vec![
            RawTrade::new("2024-01-15T09:30:00", dec!(500)),
            RawTrade::new("not a date", dec!(10)),
        ];
        let report = AnalyticsEngine::default()
            .analyze_raw(&raw, InvalidTradePolicy::Skip)
            .unwrap();
        let overview = overview_table(&report).to_string();
        assert!(overview.contains("Skipped Trades"));
        assert!(overview.contains("Max Trade Drawdown"));
    }

    #[test]
    fn bands_are_listed_in_order() {
        let rendered = bands_table(&CategoryBand::trading_session()).to_string();
        let morning = rendered.find("Morning").unwrap();
        let close = rendered.find("Close").unwrap();
        assert!(morning < close);
        assert!(rendered.contains("19:00"));
    }
}
