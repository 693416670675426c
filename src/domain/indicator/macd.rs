//! Moving Average Convergence Divergence.
//!
//! MACD line = EMA(fast) - EMA(slow); signal line = EMA(signal) of the
//! MACD line; histogram = line - signal. All three EMA recursions are
//! first-value-seeded and run from index 0, so the signal line's warm-up
//! overlaps the slow EMA's: points are valid from
//! max(fast, slow, signal) - 1.

use crate::domain::candle::Series;
use crate::domain::indicator::ema::ema_raw;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    series: &Series,
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_span,
    };
    if series.is_empty() || fast == 0 || slow == 0 || signal_span == 0 {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let candles = series.candles();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let ema_fast = ema_raw(&closes, fast);
    let ema_slow = ema_raw(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_raw(&macd_line, signal_span);

    let warmup = fast.max(slow).max(signal_span) - 1;

    let values = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let line = macd_line[i];
            let signal = signal_line[i];
            IndicatorPoint {
                timestamp: candle.timestamp,
                valid: i >= warmup,
                value: IndicatorValue::Macd {
                    line,
                    signal,
                    histogram: line - signal,
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(series: &Series) -> IndicatorSeries {
    calculate_macd(series, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
