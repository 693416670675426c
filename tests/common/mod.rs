#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use fnosignal::domain::catalog::RawContractRow;
use fnosignal::domain::error::FnosignalError;
use fnosignal::domain::instrument::ExchangeSegment;
use fnosignal::domain::normalize::RawCandleRow;
use fnosignal::ports::catalog_port::CatalogPort;
use fnosignal::ports::data_port::MarketDataPort;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn session_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 20, 9, 15, 0).unwrap()
}

/// Scrip-master option row; strike is given in rupees and written in paise
/// the way the venue publishes it.
pub fn option_row(name: &str, expiry: &str, strike: f64, option: &str, token: &str) -> RawContractRow {
    RawContractRow {
        token: token.to_string(),
        symbol: format!("{name}{expiry}{strike}{option}"),
        name: name.to_string(),
        expiry: expiry.to_string(),
        strike: format!("{}", strike * 100.0),
        instrument_type: "OPTIDX".to_string(),
        exch_seg: "NFO".to_string(),
    }
}

pub fn future_row(name: &str, expiry: &str, token: &str) -> RawContractRow {
    RawContractRow {
        token: token.to_string(),
        symbol: format!("{name}{expiry}FUT"),
        name: name.to_string(),
        expiry: expiry.to_string(),
        strike: String::new(),
        instrument_type: "FUTIDX".to_string(),
        exch_seg: "NFO".to_string(),
    }
}

/// A raw candle row `index` steps of 15 minutes after the session start.
pub fn candle_row(index: usize, open: f64, high: f64, low: f64, close: f64) -> RawCandleRow {
    let ts = session_start() + Duration::minutes(15 * index as i64);
    RawCandleRow {
        row: index,
        timestamp: ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        open: open.to_string(),
        high: high.to_string(),
        low: low.to_string(),
        close: close.to_string(),
        volume: "1000".to_string(),
    }
}

/// Steadily rising raw candles: each closes one point above the last, with
/// a half-point range beyond the body.
pub fn rising_candle_rows(count: usize) -> Vec<RawCandleRow> {
    (0..count)
        .map(|i| {
            let open = 100.0 + i as f64;
            let close = open + 1.0;
            candle_row(i, open, close + 0.5, open - 0.5, close)
        })
        .collect()
}

pub struct MockCatalogPort {
    pub rows: Vec<RawContractRow>,
}

impl MockCatalogPort {
    pub fn new(rows: Vec<RawContractRow>) -> Self {
        Self { rows }
    }
}

impl CatalogPort for MockCatalogPort {
    fn fetch_rows(&self) -> Result<Vec<RawContractRow>, FnosignalError> {
        Ok(self.rows.clone())
    }
}

pub struct MockMarketDataPort {
    pub data: HashMap<String, Vec<RawCandleRow>>,
    pub errors: HashMap<String, String>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_candles(mut self, token: &str, rows: Vec<RawCandleRow>) -> Self {
        self.data.insert(token.to_string(), rows);
        self
    }

    pub fn with_error(mut self, token: &str, reason: &str) -> Self {
        self.errors.insert(token.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_candles(
        &self,
        token: &str,
        _segment: ExchangeSegment,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<RawCandleRow>, FnosignalError> {
        if let Some(reason) = self.errors.get(token) {
            return Err(FnosignalError::MarketDataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(token).cloned().unwrap_or_default())
    }
}
