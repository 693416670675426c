//! Building and validating the classifier configuration.
//!
//! Every value is range-checked before the pipeline runs; a config that
//! parses but cannot produce a sane classifier is rejected up front.

use crate::domain::error::FnosignalError;
use crate::domain::signal::{ClassifierConfig, RsiBands, TrendPolicy};
use crate::ports::config_port::ConfigPort;

const SECTION: &str = "signal";

/// Read the `[signal]` section into a validated [`ClassifierConfig`].
/// Missing keys fall back to the defaults; present keys must validate.
pub fn build_classifier_config(config: &dyn ConfigPort) -> Result<ClassifierConfig, FnosignalError> {
    let defaults = ClassifierConfig::default();

    let fast_ema = get_period(config, "fast_ema", defaults.fast_ema)?;
    let slow_ema = get_period(config, "slow_ema", defaults.slow_ema)?;
    if fast_ema >= slow_ema {
        return Err(invalid("fast_ema", "fast_ema must be less than slow_ema"));
    }

    let trend_policy = match config.get_string(SECTION, "trend_policy") {
        None => defaults.trend_policy,
        Some(s) => match s.trim().to_lowercase().as_str() {
            "above" => TrendPolicy::CurrentlyAbove,
            "crossover" => TrendPolicy::JustCrossed,
            _ => {
                return Err(invalid(
                    "trend_policy",
                    "expected \"above\" or \"crossover\"",
                ));
            }
        },
    };

    let macd_fast = get_period(config, "macd_fast", defaults.macd_fast)?;
    let macd_slow = get_period(config, "macd_slow", defaults.macd_slow)?;
    let macd_signal = get_period(config, "macd_signal", defaults.macd_signal)?;
    if macd_fast >= macd_slow {
        return Err(invalid("macd_fast", "macd_fast must be less than macd_slow"));
    }

    let rsi_period = get_period(config, "rsi_period", defaults.rsi_period)?;
    let rsi_bands = if config.get_bool(SECTION, "rsi_filter", false) {
        let oversold = config.get_double(SECTION, "rsi_oversold", 30.0);
        let overbought = config.get_double(SECTION, "rsi_overbought", 70.0);
        if !(0.0..=100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
            return Err(invalid("rsi_oversold", "RSI bands must lie within 0..=100"));
        }
        if oversold >= overbought {
            return Err(invalid(
                "rsi_oversold",
                "rsi_oversold must be below rsi_overbought",
            ));
        }
        Some(RsiBands {
            oversold,
            overbought,
        })
    } else {
        None
    };

    let require_pattern = config.get_bool(SECTION, "require_pattern", defaults.require_pattern);
    let atr_period = get_period(config, "atr_period", defaults.atr_period)?;

    let reward_multiple = config.get_double(SECTION, "reward_multiple", defaults.reward_multiple);
    if !reward_multiple.is_finite() || reward_multiple <= 0.0 {
        return Err(invalid(
            "reward_multiple",
            "reward_multiple must be positive",
        ));
    }

    Ok(ClassifierConfig {
        fast_ema,
        slow_ema,
        trend_policy,
        macd_fast,
        macd_slow,
        macd_signal,
        rsi_period,
        rsi_bands,
        require_pattern,
        atr_period,
        reward_multiple,
    })
}

fn get_period(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, FnosignalError> {
    let value = config.get_int(SECTION, key, default as i64);
    if value < 1 {
        return Err(invalid(key, "period must be at least 1"));
    }
    Ok(value as usize)
}

fn invalid(key: &str, reason: &str) -> FnosignalError {
    FnosignalError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
