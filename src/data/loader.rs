//! CSV loader for OHLCV bar series.
//!
//! Expected header: `timestamp,open,high,low,close,volume`. Timestamps may be
//! a plain date (`2024-01-02`) or a date-time (`2024-01-02T09:15:00` or
//! `2024-01-02 09:15:00`). Every row is checked against the bar invariants and
//! rows must be in ascending timestamp order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::types::Bar;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid bar at row {row}: {reason}")]
    InvalidBar { row: usize, reason: String },

    #[error("Bar at row {row} is older than the previous bar")]
    OutOfOrder { row: usize },
}

#[derive(Debug, Deserialize)]
struct BarRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Load bars from a CSV file.
pub fn load_bars<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>, LoaderError> {
    let file = File::open(path.as_ref())?;
    let bars = read_bars(file)?;
    debug!("Loaded {} bars from {}", bars.len(), path.as_ref().display());
    Ok(bars)
}

/// Read bars from any CSV source.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, LoaderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars: Vec<Bar> = Vec::new();

    for (idx, record) in csv_reader.deserialize::<BarRecord>().enumerate() {
        // Header is row 1.
        let row = idx + 2;
        let record = record?;

        let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| {
            LoaderError::InvalidBar {
                row,
                reason: format!("unparseable timestamp '{}'", record.timestamp),
            }
        })?;

        let bar = Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        );
        bar.check().map_err(|reason| LoaderError::InvalidBar {
            row,
            reason: reason.to_string(),
        })?;

        if let Some(prev) = bars.last() {
            if bar.timestamp < prev.timestamp {
                return Err(LoaderError::OutOfOrder { row });
            }
        }

        bars.push(bar);
    }

    Ok(bars)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
