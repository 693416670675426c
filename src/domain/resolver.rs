//! Deterministic selection of one contract from the catalog.
//!
//! Root symbols are matched by exact normalized equality, never by
//! substring or prefix (a `NIFTY` query must not pick up `NIFTYIT` rows).
//! Expired contracts are never selectable. ATM ties resolve to the lower
//! strike so repeated runs pick the same contract.

use crate::domain::catalog::Catalog;
use crate::domain::instrument::{ContractRecord, InstrumentKind};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpiryRule {
    /// The nearest expiry on or after the as-of date.
    NearestFuture,
    /// Exactly this expiry date.
    On(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrikeRule {
    Exact(f64),
    /// Strike nearest to this reference price; ties go to the lower strike.
    NearestTo(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractQuery {
    pub symbol: String,
    pub kind: InstrumentKind,
    pub expiry: ExpiryRule,
    pub strike: Option<StrikeRule>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolutionError {
    #[error("no {kind} contract found for symbol {symbol}")]
    SymbolNotFound { symbol: String, kind: InstrumentKind },

    #[error("no matching expiry for {symbol} (wanted {wanted})")]
    NoMatchingExpiry { symbol: String, wanted: String },

    #[error("no contract for {symbol} at strike {strike}")]
    NoMatchingStrike { symbol: String, strike: f64 },
}

/// Non-fatal: more than one row survived every filter. The first row in
/// catalog load order was chosen; callers decide whether that is fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateContractWarning {
    pub trading_symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub record: ContractRecord,
    pub warning: Option<DuplicateContractWarning>,
}

/// Resolve `query` against a catalog snapshot as of `as_of`.
///
/// Read-only over the catalog; safe to call concurrently against the same
/// snapshot. The result is a pure function of (catalog, query, as_of).
pub fn resolve(
    catalog: &Catalog,
    query: &ContractQuery,
    as_of: NaiveDate,
) -> Result<Resolution, ResolutionError> {
    let symbol = query.symbol.trim().to_uppercase();

    let mut candidates: Vec<&ContractRecord> = catalog
        .records()
        .iter()
        .filter(|r| r.symbol == symbol && r.kind == query.kind)
        .collect();

    if candidates.is_empty() {
        return Err(ResolutionError::SymbolNotFound {
            symbol,
            kind: query.kind,
        });
    }

    if query.kind.is_derivative() {
        candidates.retain(|r| matches!(r.expiry, Some(e) if e >= as_of));

        let expiry = match query.expiry {
            ExpiryRule::NearestFuture => candidates.iter().filter_map(|r| r.expiry).min(),
            ExpiryRule::On(date) => Some(date),
        };
        let expiry = match expiry {
            Some(e) => e,
            None => {
                return Err(ResolutionError::NoMatchingExpiry {
                    symbol,
                    wanted: expiry_wanted(&query.expiry),
                });
            }
        };

        candidates.retain(|r| r.expiry == Some(expiry));
        if candidates.is_empty() {
            return Err(ResolutionError::NoMatchingExpiry {
                symbol,
                wanted: expiry_wanted(&query.expiry),
            });
        }
    }

    if query.kind.is_option() {
        match query.strike {
            Some(StrikeRule::Exact(strike)) => {
                candidates.retain(|r| matches!(r.strike, Some(s) if (s - strike).abs() < 1e-9));
                if candidates.is_empty() {
                    return Err(ResolutionError::NoMatchingStrike { symbol, strike });
                }
            }
            Some(StrikeRule::NearestTo(reference)) => {
                let best = candidates
                    .iter()
                    .filter_map(|r| r.strike.map(|s| (s - reference).abs()))
                    .fold(f64::INFINITY, f64::min);
                if !best.is_finite() {
                    return Err(ResolutionError::NoMatchingStrike {
                        symbol,
                        strike: reference,
                    });
                }
                // Keep every strike at the minimal distance, then the
                // lower-strike tie-break below picks one deterministically.
                candidates.retain(
                    |r| matches!(r.strike, Some(s) if ((s - reference).abs() - best).abs() < 1e-9),
                );
                if candidates.len() > 1 {
                    let low = candidates
                        .iter()
                        .filter_map(|r| r.strike)
                        .fold(f64::INFINITY, f64::min);
                    candidates.retain(|r| matches!(r.strike, Some(s) if (s - low).abs() < 1e-9));
                }
            }
            None => {}
        }
    }

    // Should be a single row by now; duplicates mean a dirty catalog.
    let record = candidates[0].clone();
    let warning = if candidates.len() > 1 {
        Some(DuplicateContractWarning {
            trading_symbols: candidates.iter().map(|r| r.trading_symbol.clone()).collect(),
        })
    } else {
        None
    };

    Ok(Resolution { record, warning })
}

fn expiry_wanted(rule: &ExpiryRule) -> String {
    match rule {
        ExpiryRule::NearestFuture => "nearest upcoming".to_string(),
        ExpiryRule::On(date) => date.to_string(),
    }
}
