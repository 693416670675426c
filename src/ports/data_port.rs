//! Market data port trait.
//!
//! Candles are fetched by token + segment, the pair a resolution produces.
//! Implementations return raw rows; `normalize` owns all validation, and
//! the caller owns any timeout/retry policy around the fetch.

use crate::domain::error::FnosignalError;
use crate::domain::instrument::ExchangeSegment;
use crate::domain::normalize::RawCandleRow;
use chrono::{DateTime, Utc};

pub trait MarketDataPort {
    fn fetch_candles(
        &self,
        token: &str,
        segment: ExchangeSegment,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RawCandleRow>, FnosignalError>;
}
