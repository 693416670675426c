//! Indicator engine: parallel derived columns over an immutable series.
//!
//! Every indicator is a pure function of the series prefix up to the
//! current index. Warm-up points carry `valid: false` and must be treated
//! as "not yet available" — a numeric payload on an invalid point is
//! meaningless and never zero-means-flat.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod pattern;
pub mod rsi;

pub use atr::calculate_atr;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use pattern::calculate_engulfing;
pub use rsi::calculate_rsi;

use crate::domain::candle::Series;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Utc>,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Engulfing {
        bullish: bool,
        bearish: bool,
    },
}

impl IndicatorValue {
    /// The scalar payload of a single-value indicator.
    pub fn simple(&self) -> Option<f64> {
        match self {
            IndicatorValue::Simple(v) => Some(*v),
            _ => None,
        }
    }
}

/// Indicator identity plus parameters; doubles as the lookup key in an
/// [`AnnotatedSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Engulfing,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Engulfing => write!(f, "ENGULFING"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn point(&self, index: usize) -> Option<&IndicatorPoint> {
        self.values.get(index)
    }
}

/// A series plus the indicator columns computed over it. The candles are
/// never touched after construction; annotation only adds columns.
#[derive(Debug, Clone)]
pub struct AnnotatedSeries {
    pub series: Series,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
}

impl AnnotatedSeries {
    pub fn get(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.indicators.get(indicator_type)
    }

    /// The point for `indicator_type` at `index`, only if it is past its
    /// warm-up.
    pub fn valid_point(
        &self,
        indicator_type: &IndicatorType,
        index: usize,
    ) -> Option<&IndicatorPoint> {
        self.get(indicator_type)
            .and_then(|s| s.point(index))
            .filter(|p| p.valid)
    }
}

/// Compute the requested indicator set over `series`. Indicators are
/// independent of each other, so duplicates in the request are computed
/// once.
pub fn annotate(series: Series, indicator_set: &[IndicatorType]) -> AnnotatedSeries {
    let mut indicators = HashMap::with_capacity(indicator_set.len());
    for indicator_type in indicator_set {
        indicators
            .entry(*indicator_type)
            .or_insert_with(|| compute(&series, indicator_type));
    }
    AnnotatedSeries { series, indicators }
}

fn compute(series: &Series, indicator_type: &IndicatorType) -> IndicatorSeries {
    match *indicator_type {
        IndicatorType::Ema(span) => calculate_ema(series, span),
        IndicatorType::Rsi(period) => calculate_rsi(series, period),
        IndicatorType::Atr(period) => calculate_atr(series, period),
        IndicatorType::Macd { fast, slow, signal } => calculate_macd(series, fast, slow, signal),
        IndicatorType::Engulfing => calculate_engulfing(series),
    }
}
