//! Candle and series representation.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Candle {
    /// |close - open|
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// An ordered candle series. Timestamps are strictly increasing; the
/// constructor rejects anything else so every downstream stage can rely on
/// the ordering without re-checking it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    candles: Vec<Candle>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SeriesOrderError {
    #[error("candles out of order at index {index}")]
    OutOfOrder { index: usize },

    #[error("duplicate candle timestamp {timestamp}")]
    DuplicateTimestamp { timestamp: DateTime<Utc> },
}

impl Series {
    pub fn new(candles: Vec<Candle>) -> Result<Self, SeriesOrderError> {
        for i in 1..candles.len() {
            if candles[i].timestamp == candles[i - 1].timestamp {
                return Err(SeriesOrderError::DuplicateTimestamp {
                    timestamp: candles[i].timestamp,
                });
            }
            if candles[i].timestamp < candles[i - 1].timestamp {
                return Err(SeriesOrderError::OutOfOrder { index: i });
            }
        }
        Ok(Series { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }
}
