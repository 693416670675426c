//! Average True Range over a rolling mean.
//!
//! True range per candle is max(high-low, |high-prev_close|,
//! |low-prev_close|); the first candle has no previous close and uses
//! high-low alone. ATR is the plain mean of the trailing `period` true
//! ranges, valid from index period-1.

use crate::domain::candle::Series;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_atr(series: &Series, period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Atr(period);
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

    let true_ranges: Vec<f64> = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            if i == 0 {
                candle.high - candle.low
            } else {
                candle.true_range(candles[i - 1].close)
            }
        })
        .collect();

    let values = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            if i + 1 < period {
                IndicatorPoint {
                    timestamp: candle.timestamp,
                    valid: false,
                    value: IndicatorValue::Simple(0.0),
                }
            } else {
                let window = &true_ranges[i + 1 - period..=i];
                let atr = window.iter().sum::<f64>() / period as f64;
                IndicatorPoint {
                    timestamp: candle.timestamp,
                    valid: true,
                    value: IndicatorValue::Simple(atr),
                }
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
