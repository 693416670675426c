//! Exponential Moving Average.
//!
//! k = 2/(span+1); the recursion is seeded with the first close and runs
//! from index 0, matching an `adjust=false` exponential weighting. Points
//! are only valid from index span-1 — the leading stretch has too little
//! history to be meaningful even though the recursion has a number for it.

use crate::domain::candle::Series;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};

pub fn calculate_ema(series: &Series, span: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(span);
    if span == 0 || series.is_empty() {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let candles = series.candles();
    let k = 2.0 / (span as f64 + 1.0);
    let mut ema = candles[0].close;

    let values = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            if i > 0 {
                ema = candle.close * k + ema * (1.0 - k);
            }
            IndicatorPoint {
                timestamp: candle.timestamp,
                valid: i >= span - 1,
                value: IndicatorValue::Simple(ema),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

/// Raw EMA recursion values with no validity bookkeeping, for indicators
/// built on top of EMA.
pub(crate) fn ema_raw(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }
    let k = 2.0 / (span as f64 + 1.0);
    let mut ema = values[0];
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i > 0 {
                ema = v * k + ema * (1.0 - k);
            }
            ema
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::series_from_closes;
    use approx::assert_relative_eq;

    #[test]
    fn ema_warmup_flags() {
        let series = series_from_closes(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let ema = calculate_ema(&series, 3);

        assert!(!ema.values[0].valid);
        assert!(!ema.values[1].valid);
        assert!(ema.values[2].valid);
        assert!(ema.values[3].valid);
        assert!(ema.values[4].valid);
    }

    #[test]
    fn ema_longer_than_series_is_all_invalid() {
        let series = series_from_closes(&[10.0, 20.0, 30.0]);
        let ema = calculate_ema(&series, 5);

        assert_eq!(ema.values.len(), 3);
        assert!(ema.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn ema_seeded_with_first_close() {
        let series = series_from_closes(&[10.0, 20.0, 30.0]);
        let ema = calculate_ema(&series, 3);

        // seed = 10; k = 0.5
        let e1 = 20.0 * 0.5 + 10.0 * 0.5;
        let e2 = 30.0 * 0.5 + e1 * 0.5;
        assert_relative_eq!(ema.values[0].value.simple().unwrap(), 10.0);
        assert_relative_eq!(ema.values[1].value.simple().unwrap(), e1);
        assert_relative_eq!(ema.values[2].value.simple().unwrap(), e2);
    }

    #[test]
    fn ema_of_constant_series_is_the_constant() {
        let series = series_from_closes(&[250.0; 40]);
        for span in [1, 5, 20] {
            let ema = calculate_ema(&series, span);
            for point in &ema.values {
                assert_relative_eq!(point.value.simple().unwrap(), 250.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn ema_span_1_tracks_closes() {
        let series = series_from_closes(&[10.0, 20.0, 30.0]);
        let ema = calculate_ema(&series, 1);

        assert!(ema.values.iter().all(|p| p.valid));
        assert_relative_eq!(ema.values[1].value.simple().unwrap(), 20.0);
        assert_relative_eq!(ema.values[2].value.simple().unwrap(), 30.0);
    }

    #[test]
    fn ema_span_0_is_empty() {
        let series = series_from_closes(&[10.0, 20.0]);
        assert!(calculate_ema(&series, 0).values.is_empty());
    }

    #[test]
    fn ema_empty_series_is_empty() {
        let series = series_from_closes(&[]);
        assert!(calculate_ema(&series, 3).values.is_empty());
    }

    #[test]
    fn ema_raw_matches_indicator_values() {
        let closes = [10.0, 20.0, 30.0, 40.0];
        let series = series_from_closes(&closes);
        let ema = calculate_ema(&series, 3);
        let raw = ema_raw(&closes, 3);

        for (point, raw_value) in ema.values.iter().zip(&raw) {
            assert_relative_eq!(point.value.simple().unwrap(), *raw_value);
        }
    }
}
