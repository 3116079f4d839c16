use chrono::NaiveDateTime;
use core_types::TradeRecord;
use rust_decimal::Decimal;

/// Builds a trade from a `YYYY-MM-DD HH:MM` timestamp.
pub(crate) fn trade(timestamp: &str, pnl: Decimal) -> TradeRecord {
    let timestamp = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M").unwrap();
    TradeRecord::new(timestamp, pnl)
}
