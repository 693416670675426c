//! Normalization of raw candle rows into a canonical [`Series`].
//!
//! Every field is parsed explicitly and failures name the offending row;
//! a missing value is a hard error, never a silent zero (a zero-priced
//! candle would poison every indicator downstream). The only rows that may
//! be dropped are sentinel-empty ones, where the upstream source emitted a
//! fully blank row.

use crate::domain::candle::{Candle, Series, SeriesOrderError};
use chrono::{DateTime, NaiveDateTime, Utc};

/// One raw candle row as delivered by a market-data collaborator, in the
/// venue's column order: timestamp, open, high, low, close, volume.
/// `row` is the position in the source payload, kept for error messages.
#[derive(Debug, Clone)]
pub struct RawCandleRow {
    pub row: usize,
    pub timestamp: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl RawCandleRow {
    /// A fully blank row is the upstream's "no data" sentinel and is
    /// skipped; anything partially blank is an error instead.
    pub fn is_sentinel_empty(&self) -> bool {
        self.timestamp.trim().is_empty()
            && self.open.trim().is_empty()
            && self.high.trim().is_empty()
            && self.low.trim().is_empty()
            && self.close.trim().is_empty()
            && self.volume.trim().is_empty()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum NormalizeError {
    #[error("candle row {row}: unparsable timestamp {value:?}")]
    TimestampParse { row: usize, value: String },

    #[error("candle row {row}: invalid {field} value {value:?}")]
    NumericParse {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("candle row {row}: missing {field}")]
    MissingField { row: usize, field: &'static str },

    #[error("duplicate candle timestamp {timestamp}")]
    DuplicateTimestamp { timestamp: DateTime<Utc> },

    #[error("no valid candle rows in input")]
    EmptySeries,
}

/// Parse, validate and sort raw rows into a canonical series.
pub fn normalize(rows: &[RawCandleRow]) -> Result<Series, NormalizeError> {
    let mut candles = Vec::with_capacity(rows.len());

    for raw in rows {
        if raw.is_sentinel_empty() {
            continue;
        }
        candles.push(parse_row(raw)?);
    }

    if candles.is_empty() {
        return Err(NormalizeError::EmptySeries);
    }

    candles.sort_by_key(|c: &Candle| c.timestamp);

    Series::new(candles).map_err(|e| match e {
        SeriesOrderError::DuplicateTimestamp { timestamp } => {
            NormalizeError::DuplicateTimestamp { timestamp }
        }
        // Unreachable after the sort; surface it as a duplicate anyway
        // rather than panicking.
        SeriesOrderError::OutOfOrder { .. } => NormalizeError::EmptySeries,
    })
}

fn parse_row(raw: &RawCandleRow) -> Result<Candle, NormalizeError> {
    let timestamp = parse_timestamp(raw.row, &raw.timestamp)?;
    let open = parse_price(raw.row, "open", &raw.open)?;
    let high = parse_price(raw.row, "high", &raw.high)?;
    let low = parse_price(raw.row, "low", &raw.low)?;
    let close = parse_price(raw.row, "close", &raw.close)?;
    let volume = parse_volume(raw.row, &raw.volume)?;

    Ok(Candle {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
    })
}

/// RFC 3339 first (the venue sends offsets like `+05:30`), then naive
/// datetime forms taken as UTC.
fn parse_timestamp(row: usize, value: &str) -> Result<DateTime<Utc>, NormalizeError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(NormalizeError::MissingField {
            row,
            field: "timestamp",
        });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    Err(NormalizeError::TimestampParse {
        row,
        value: value.to_string(),
    })
}

fn parse_price(row: usize, field: &'static str, value: &str) -> Result<f64, NormalizeError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(NormalizeError::MissingField { row, field });
    }
    let parsed: f64 = s.parse().map_err(|_| NormalizeError::NumericParse {
        row,
        field,
        value: value.to_string(),
    })?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(NormalizeError::NumericParse {
            row,
            field,
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

fn parse_volume(row: usize, value: &str) -> Result<i64, NormalizeError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(NormalizeError::MissingField {
            row,
            field: "volume",
        });
    }
    let parsed: i64 = s.parse().map_err(|_| NormalizeError::NumericParse {
        row,
        field: "volume",
        value: value.to_string(),
    })?;
    if parsed < 0 {
        return Err(NormalizeError::NumericParse {
            row,
            field: "volume",
            value: value.to_string(),
        });
    }
    Ok(parsed)
}
