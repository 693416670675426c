//! Engulfing candlestick flags.
//!
//! A candle engulfs its predecessor only when the two bodies point in
//! opposite directions and the later body strictly contains the earlier
//! open/close range. The inequalities are strict on purpose: a doji or an
//! exactly-equal boundary never counts.

use crate::domain::candle::{Candle, Series};
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_engulfing(series: &Series) -> IndicatorSeries {
    let candles = series.candles();

    let values = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let (valid, bullish, bearish) = if i == 0 {
                (false, false, false)
            } else {
                let prev = &candles[i - 1];
                (
                    true,
                    is_bullish_engulfing(prev, candle),
                    is_bearish_engulfing(prev, candle),
                )
            };
            IndicatorPoint {
                timestamp: candle.timestamp,
                valid,
                value: IndicatorValue::Engulfing { bullish, bearish },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Engulfing,
        values,
    }
}

fn is_bullish_engulfing(prev: &Candle, curr: &Candle) -> bool {
    prev.is_bearish() && curr.is_bullish() && curr.open < prev.close && curr.close > prev.open
}

fn is_bearish_engulfing(prev: &Candle, curr: &Candle) -> bool {
    prev.is_bullish() && curr.is_bearish() && curr.open > prev.close && curr.close < prev.open
}
