//! Tradable instrument records as they appear in the scrip master.

use chrono::NaiveDate;
use std::fmt;

/// Exchange segment a contract trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeSegment {
    /// NSE equity cash.
    Cash,
    /// NFO futures and options.
    Derivatives,
}

impl ExchangeSegment {
    /// Parse a scrip-master `exch_seg` value. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NSE" => Some(ExchangeSegment::Cash),
            "NFO" => Some(ExchangeSegment::Derivatives),
            _ => None,
        }
    }
}

impl fmt::Display for ExchangeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeSegment::Cash => write!(f, "NSE"),
            ExchangeSegment::Derivatives => write!(f, "NFO"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentKind {
    Future,
    CallOption,
    PutOption,
    Index,
    Equity,
}

impl InstrumentKind {
    pub fn is_option(&self) -> bool {
        matches!(self, InstrumentKind::CallOption | InstrumentKind::PutOption)
    }

    /// Futures and options carry an expiry; cash and index rows do not.
    pub fn is_derivative(&self) -> bool {
        matches!(
            self,
            InstrumentKind::Future | InstrumentKind::CallOption | InstrumentKind::PutOption
        )
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentKind::Future => write!(f, "future"),
            InstrumentKind::CallOption => write!(f, "call-option"),
            InstrumentKind::PutOption => write!(f, "put-option"),
            InstrumentKind::Index => write!(f, "index"),
            InstrumentKind::Equity => write!(f, "equity"),
        }
    }
}

/// One immutable row of the loaded catalog.
///
/// `symbol` is the root (e.g. `NIFTY`); `trading_symbol` is the full venue
/// symbol (e.g. `NIFTY30JAN2522000CE`); `token` is the venue's opaque
/// identifier used when requesting market data.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractRecord {
    pub symbol: String,
    pub segment: ExchangeSegment,
    pub kind: InstrumentKind,
    pub expiry: Option<NaiveDate>,
    pub strike: Option<f64>,
    pub trading_symbol: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_parse() {
        assert_eq!(ExchangeSegment::parse("NFO"), Some(ExchangeSegment::Derivatives));
        assert_eq!(ExchangeSegment::parse("nse"), Some(ExchangeSegment::Cash));
        assert_eq!(ExchangeSegment::parse(" NFO "), Some(ExchangeSegment::Derivatives));
        assert_eq!(ExchangeSegment::parse("MCX"), None);
    }

    #[test]
    fn segment_display_round_trips() {
        assert_eq!(
            ExchangeSegment::parse(&ExchangeSegment::Derivatives.to_string()),
            Some(ExchangeSegment::Derivatives)
        );
        assert_eq!(
            ExchangeSegment::parse(&ExchangeSegment::Cash.to_string()),
            Some(ExchangeSegment::Cash)
        );
    }

    #[test]
    fn kind_is_option() {
        assert!(InstrumentKind::CallOption.is_option());
        assert!(InstrumentKind::PutOption.is_option());
        assert!(!InstrumentKind::Future.is_option());
        assert!(!InstrumentKind::Index.is_option());
    }

    #[test]
    fn kind_is_derivative() {
        assert!(InstrumentKind::Future.is_derivative());
        assert!(InstrumentKind::CallOption.is_derivative());
        assert!(!InstrumentKind::Equity.is_derivative());
        assert!(!InstrumentKind::Index.is_derivative());
    }

    #[test]
    fn kind_display() {
        assert_eq!(InstrumentKind::CallOption.to_string(), "call-option");
        assert_eq!(InstrumentKind::Future.to_string(), "future");
    }
}
