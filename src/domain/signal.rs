//! Signal classification over an annotated series.
//!
//! One canonical three-state direction; CALL/PUT wording belongs to the
//! presentation layer. Classification is stateless: each call inspects the
//! last one or two annotated candles and nothing else. If any required
//! indicator is still in warm-up the classifier holds — it never guesses
//! through missing values.

use crate::domain::indicator::{AnnotatedSeries, IndicatorType, IndicatorValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
    Hold,
}

impl Direction {
    /// Presentation label for an option-direction framing.
    pub fn option_label(&self) -> &'static str {
        match self {
            Direction::Buy => "CALL",
            Direction::Sell => "PUT",
            Direction::Hold => "HOLD",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
            Direction::Hold => write!(f, "HOLD"),
        }
    }
}

/// Entry, target and stop always travel together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    pub entry: f64,
    pub target: f64,
    pub stop: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub direction: Direction,
    pub levels: Option<Levels>,
}

impl Signal {
    pub fn hold() -> Self {
        Signal {
            direction: Direction::Hold,
            levels: None,
        }
    }

    pub fn is_directional(&self) -> bool {
        self.direction != Direction::Hold
    }
}

/// How the fast-vs-slow EMA trend condition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendPolicy {
    /// Fires on every candle while the ordering holds. The default.
    CurrentlyAbove,
    /// Fires only on the candle where the ordering flips.
    JustCrossed,
}

/// RSI band filter: buy only when oversold, sell only when overbought.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiBands {
    pub oversold: f64,
    pub overbought: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub fast_ema: usize,
    pub slow_ema: usize,
    pub trend_policy: TrendPolicy,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub rsi_bands: Option<RsiBands>,
    pub require_pattern: bool,
    pub atr_period: usize,
    pub reward_multiple: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            fast_ema: 5,
            slow_ema: 20,
            trend_policy: TrendPolicy::CurrentlyAbove,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            rsi_bands: None,
            require_pattern: false,
            atr_period: 14,
            reward_multiple: 1.5,
        }
    }
}

impl ClassifierConfig {
    /// The indicator columns `classify` reads; feed this to `annotate`.
    pub fn required_indicators(&self) -> Vec<IndicatorType> {
        let mut set = vec![
            IndicatorType::Ema(self.fast_ema),
            IndicatorType::Ema(self.slow_ema),
            IndicatorType::Macd {
                fast: self.macd_fast,
                slow: self.macd_slow,
                signal: self.macd_signal,
            },
            IndicatorType::Atr(self.atr_period),
        ];
        if self.rsi_bands.is_some() {
            set.push(IndicatorType::Rsi(self.rsi_period));
        }
        if self.require_pattern {
            set.push(IndicatorType::Engulfing);
        }
        set
    }
}

/// Classify the latest candle of `annotated`.
///
/// Emits BUY or SELL only when the trend tier, the momentum tier and every
/// enabled optional tier agree; anything else — including any required
/// indicator still in warm-up — is HOLD.
pub fn classify(annotated: &AnnotatedSeries, config: &ClassifierConfig) -> Signal {
    let len = annotated.series.len();
    if len == 0 {
        return Signal::hold();
    }
    let last = len - 1;

    let fast = IndicatorType::Ema(config.fast_ema);
    let slow = IndicatorType::Ema(config.slow_ema);
    let macd = IndicatorType::Macd {
        fast: config.macd_fast,
        slow: config.macd_slow,
        signal: config.macd_signal,
    };

    let (fast_now, slow_now) = match (simple_at(annotated, &fast, last), simple_at(annotated, &slow, last)) {
        (Some(f), Some(s)) => (f, s),
        _ => return Signal::hold(),
    };

    let trend_up;
    let trend_down;
    match config.trend_policy {
        TrendPolicy::CurrentlyAbove => {
            trend_up = fast_now > slow_now;
            trend_down = fast_now < slow_now;
        }
        TrendPolicy::JustCrossed => {
            if last == 0 {
                return Signal::hold();
            }
            let (fast_prev, slow_prev) = match (
                simple_at(annotated, &fast, last - 1),
                simple_at(annotated, &slow, last - 1),
            ) {
                (Some(f), Some(s)) => (f, s),
                _ => return Signal::hold(),
            };
            trend_up = fast_now > slow_now && fast_prev <= slow_prev;
            trend_down = fast_now < slow_now && fast_prev >= slow_prev;
        }
    }

    let (macd_line, macd_signal) = match macd_at(annotated, &macd, last) {
        Some(pair) => pair,
        None => return Signal::hold(),
    };
    let momentum_up = macd_line > macd_signal;
    let momentum_down = macd_line < macd_signal;

    let mut buy = trend_up && momentum_up;
    let mut sell = trend_down && momentum_down;

    if let Some(bands) = config.rsi_bands {
        let rsi = match simple_at(annotated, &IndicatorType::Rsi(config.rsi_period), last) {
            Some(v) => v,
            None => return Signal::hold(),
        };
        buy = buy && rsi < bands.oversold;
        sell = sell && rsi > bands.overbought;
    }

    if config.require_pattern {
        let (bullish, bearish) = match engulfing_at(annotated, last) {
            Some(pair) => pair,
            None => return Signal::hold(),
        };
        buy = buy && bullish;
        sell = sell && bearish;
    }

    let direction = match (buy, sell) {
        (true, false) => Direction::Buy,
        (false, true) => Direction::Sell,
        _ => return Signal::hold(),
    };

    let atr = match simple_at(annotated, &IndicatorType::Atr(config.atr_period), last) {
        Some(v) => v,
        None => return Signal::hold(),
    };
    let latest = match annotated.series.latest() {
        Some(c) => c,
        None => return Signal::hold(),
    };

    // Target and stop share the same entry reference so risk:reward stays
    // internally consistent.
    let entry = latest.close;
    let risk = atr.max(latest.body());
    if !risk.is_finite() || risk <= 0.0 {
        return Signal::hold();
    }

    let levels = match direction {
        Direction::Buy => Levels {
            entry,
            stop: entry - risk,
            target: entry + risk * config.reward_multiple,
        },
        Direction::Sell => Levels {
            entry,
            stop: entry + risk,
            target: entry - risk * config.reward_multiple,
        },
        Direction::Hold => unreachable!(),
    };

    Signal {
        direction,
        levels: Some(levels),
    }
}

fn simple_at(annotated: &AnnotatedSeries, indicator_type: &IndicatorType, index: usize) -> Option<f64> {
    annotated
        .valid_point(indicator_type, index)
        .and_then(|p| p.value.simple())
}

fn macd_at(
    annotated: &AnnotatedSeries,
    indicator_type: &IndicatorType,
    index: usize,
) -> Option<(f64, f64)> {
    match annotated.valid_point(indicator_type, index)?.value {
        IndicatorValue::Macd { line, signal, .. } => Some((line, signal)),
        _ => None,
    }
}

fn engulfing_at(annotated: &AnnotatedSeries, index: usize) -> Option<(bool, bool)> {
    match annotated.valid_point(&IndicatorType::Engulfing, index)?.value {
        IndicatorValue::Engulfing { bullish, bearish } => Some((bullish, bearish)),
        _ => None,
    }
}
