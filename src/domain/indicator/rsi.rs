//! Relative Strength Index over a simple trailing window.
//!
//! Average gain and average loss are plain means of the last `period`
//! close-to-close changes (not Wilder's recursive smoothing). The first
//! index with a full window of changes is `period`; everything before is
//! warm-up. A window with zero average loss reads RSI = 100.

use crate::domain::candle::Series;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_rsi(series: &Series, period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(period);
    let candles = series.candles();

    if period == 0 || candles.is_empty() {
        return IndicatorSeries {
            indicator_type,
            values: candles
                .iter()
                .map(|c| IndicatorPoint {
                    timestamp: c.timestamp,
                    valid: false,
                    value: IndicatorValue::Simple(0.0),
                })
                .collect(),
        };
    }

    let mut gains = Vec::with_capacity(candles.len().saturating_sub(1));
    let mut losses = Vec::with_capacity(candles.len().saturating_sub(1));
    for i in 1..candles.len() {
        let change = candles[i].close - candles[i - 1].close;
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let values = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            // Change j covers the move into candle j+1, so candle i has a
            // full window once i >= period.
            if i < period {
                return IndicatorPoint {
                    timestamp: candle.timestamp,
                    valid: false,
                    value: IndicatorValue::Simple(0.0),
                };
            }
            let window = (i - period)..i;
            let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
            let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
            let rsi = if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
            };
            IndicatorPoint {
                timestamp: candle.timestamp,
                valid: true,
                value: IndicatorValue::Simple(rsi),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
