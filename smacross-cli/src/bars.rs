//! Bar sources for replays: CSV files and seeded synthetic random walks.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use smacross_core::domain::{Bar, Resolution};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    symbol: String,
    timestamp: String,
    close: Option<f64>,
}

/// Accepts `2024-01-02T16:00:00`, `2024-01-02 16:00:00`, or a bare date (stamped 16:00).
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(ts);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid timestamp '{raw}'"))?;
    date.and_hms_opt(16, 0, 0)
        .with_context(|| format!("invalid timestamp '{raw}'"))
}

/// Read `symbol,timestamp,close` rows. An empty close cell yields a bar
/// without a close, which the engine treats as missing data.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.with_context(|| format!("csv record {}", line + 1))?;
        let timestamp = parse_timestamp(&row.timestamp)?;
        let bar = match row.close {
            Some(close) => Bar::new(row.symbol, timestamp, close),
            None => Bar::without_close(row.symbol, timestamp),
        };
        bars.push(bar);
    }
    Ok(bars)
}

pub fn load_csv(path: &Path) -> Result<Vec<Bar>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("open bars {}", path.display()))?;
    read_csv(file).with_context(|| format!("load bars {}", path.display()))
}

/// Random walk from 100.0 with per-bar returns in ±3%.
///
/// The same seed and symbol list always produce the same bars; each symbol
/// gets its own stream derived from the seed and its position.
pub fn synthetic_bars(
    symbols: &[String],
    bar_count: usize,
    resolution: Resolution,
    seed: u64,
) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let start = NaiveDate::from_ymd_opt(2020, 1, 2)
        .and_then(|d| d.and_hms_opt(16, 0, 0))
        .unwrap_or_default();
    // Tick data has no natural spacing; step a second at a time.
    let step = match resolution {
        Resolution::Tick => chrono::Duration::seconds(1),
        other => chrono::Duration::from_std(other.interval())
            .unwrap_or_else(|_| chrono::Duration::days(1)),
    };

    let mut bars = Vec::with_capacity(symbols.len() * bar_count);
    for (i, symbol) in symbols.iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
        let mut price = 100.0_f64;
        for n in 0..bar_count {
            let ret: f64 = rng.gen_range(-0.03..0.03);
            price *= 1.0 + ret;
            bars.push(Bar::new(symbol.as_str(), start + step * n as i32, price));
        }
    }
    bars
}
