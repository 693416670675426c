//! Candle CSV adapter.
//!
//! One file per contract, named `{token}_{segment}.csv`, in the venue's
//! candle column order: timestamp, open, high, low, close, volume. The
//! time-window filter happens here on the raw timestamp text only when it
//! parses; rows with unparsable timestamps are passed through so that
//! `normalize` rejects them loudly instead of this adapter dropping them.

use crate::domain::error::FnosignalError;
use crate::domain::instrument::ExchangeSegment;
use crate::domain::normalize::RawCandleRow;
use crate::ports::data_port::MarketDataPort;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::PathBuf;

pub struct CsvCandleAdapter {
    base_path: PathBuf,
}

impl CsvCandleAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn candle_path(&self, token: &str, segment: ExchangeSegment) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", token, segment))
    }
}

impl MarketDataPort for CsvCandleAdapter {
    fn fetch_candles(
        &self,
        token: &str,
        segment: ExchangeSegment,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RawCandleRow>, FnosignalError> {
        let path = self.candle_path(token, segment);
        let mut rdr =
            csv::Reader::from_path(&path).map_err(|e| FnosignalError::MarketDataSource {
                reason: format!("failed to open {}: {}", path.display(), e),
            })?;

        let mut rows = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| FnosignalError::MarketDataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let field = |i: usize| record.get(i).unwrap_or_default().to_string();
            let raw = RawCandleRow {
                row,
                timestamp: field(0),
                open: field(1),
                high: field(2),
                low: field(3),
                close: field(4),
                volume: field(5),
            };

            if let Some(ts) = try_parse_timestamp(&raw.timestamp) {
                if ts < from || ts > to {
                    continue;
                }
            }
            rows.push(raw);
        }
        Ok(rows)
    }
}

fn try_parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let s = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}
