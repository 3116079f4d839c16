//! Reading trade exports from disk.

use anyhow::{Context, bail};
use core_types::RawTrade;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

/// The accepted JSON shapes: a bare array, or an object holding a `trades` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum TradesDocument {
    List(Vec<RawTrade>),
    Wrapped { trades: Vec<RawTrade> },
}

impl TradesDocument {
    fn into_trades(self) -> Vec<RawTrade> {
        match self {
            TradesDocument::List(trades) | TradesDocument::Wrapped { trades } => trades,
        }
    }
}

/// Loads raw trades from a `.json` or `.csv` file, chosen by extension.
pub fn load_trades(path: &Path, csv_delimiter: char) -> anyhow::Result<Vec<RawTrade>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let trades = match extension.as_deref() {
        Some("json") => read_json(path)?,
        Some("csv") => read_csv(path, csv_delimiter)?,
        _ => bail!(
            "Unsupported trade file '{}': expected a .json or .csv extension",
            path.display()
        ),
    };

    tracing::info!(path = %path.display(), count = trades.len(), "Loaded trades.");
    Ok(trades)
}

fn read_json(path: &Path) -> anyhow::Result<Vec<RawTrade>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let document: TradesDocument = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse trades from {}", path.display()))?;
    Ok(document.into_trades())
}

fn read_csv(path: &Path, delimiter: char) -> anyhow::Result<Vec<RawTrade>> {
    let delimiter = u8::try_from(delimiter)
        .with_context(|| format!("CSV delimiter '{delimiter}' is not a single byte"))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    reader
        .deserialize::<RawTrade>()
        .enumerate()
        .map(|(row, record)| {
            // Row 1 is the header.
            record.with_context(|| format!("Invalid trade on row {} of {}", row + 2, path.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_json_array() {
        let file = file_with(
            ".json",
            r#"[{"timestamp": "2024-01-15T09:30:00", "pnl": 500}, {"timestamp": "2024-01-15T10:15:00", "pnl": "-200.50"}]"#,
        );
        let trades = load_trades(file.path(), ',').unwrap();
        assert_eq!(
            trades,
            vec![
                RawTrade::new("2024-01-15T09:30:00", dec!(500)),
                RawTrade::new("2024-01-15T10:15:00", dec!(-200.50)),
            ]
        );
    }

    #[test]
    fn reads_wrapped_json_with_entry_date() {
        let file = file_with(
            ".json",
            r#"{"trades": [{"entry_date": "2024-01-15 09:30:00", "pnl": 12, "symbol": "WINFUT"}]}"#,
        );
        let trades = load_trades(file.path(), ',').unwrap();
        assert_eq!(trades, vec![RawTrade::new("2024-01-15 09:30:00", dec!(12))]);
    }

    #[test]
    fn reads_csv_with_custom_delimiter() {
        let file = file_with(
            ".csv",
            "entry_date;pnl;symbol\n2024-01-15 09:30:00;500;WINFUT\n2024-01-15 10:15:00; -200 ;WINFUT\n",
        );
        let trades = load_trades(file.path(), ';').unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[1], RawTrade::new("2024-01-15 10:15:00", dec!(-200)));
    }

    #[test]
    fn reports_the_failing_csv_row() {
        let file = file_with(".csv", "timestamp,pnl\n2024-01-15 09:30:00,10\n2024-01-15 10:00:00,abc\n");
        let message = format!("{:#}", load_trades(file.path(), ',').unwrap_err());
        assert!(message.contains("row 3"), "{message}");
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = file_with(".txt", "");
        assert!(load_trades(file.path(), ',').is_err());
    }
}
