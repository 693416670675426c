//! Instrument catalog loading and the shared reloadable handle.
//!
//! Raw scrip-master rows come in stringly; `Catalog::load` trims,
//! case-normalizes and parses them into [`ContractRecord`]s in one pass.
//! Any malformed row fails the whole load, so a catalog is either fully
//! usable or absent.

use crate::domain::instrument::{ContractRecord, ExchangeSegment, InstrumentKind};
use chrono::NaiveDate;
use std::sync::{Arc, RwLock};

/// One row of the scrip master before parsing. Field names follow the
/// venue's column names: `symbol` is the full trading symbol, `name` the
/// root symbol.
#[derive(Debug, Clone, Default)]
pub struct RawContractRow {
    pub token: String,
    pub symbol: String,
    pub name: String,
    pub expiry: String,
    pub strike: String,
    pub instrument_type: String,
    pub exch_seg: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog row {row}: empty token")]
    EmptyToken { row: usize },

    #[error("catalog row {row}: empty trading symbol")]
    EmptyTradingSymbol { row: usize },

    #[error("catalog row {row}: unknown exchange segment {value:?}")]
    UnknownSegment { row: usize, value: String },

    #[error("catalog row {row}: unknown instrument type {value:?}")]
    UnknownInstrumentType { row: usize, value: String },

    #[error("catalog row {row}: option symbol {symbol:?} has no CE/PE suffix")]
    MissingOptionSuffix { row: usize, symbol: String },

    #[error("catalog row {row}: invalid expiry {value:?}")]
    InvalidExpiry { row: usize, value: String },

    #[error("catalog row {row}: invalid strike {value:?}")]
    InvalidStrike { row: usize, value: String },
}

/// The loaded catalog: contract records in load order, read-only.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ContractRecord>,
}

impl Catalog {
    /// Parse raw scrip-master rows into a catalog.
    pub fn load(rows: &[RawContractRow]) -> Result<Catalog, CatalogError> {
        let mut records = Vec::with_capacity(rows.len());
        for (row, raw) in rows.iter().enumerate() {
            records.push(parse_row(row, raw)?);
        }
        Ok(Catalog { records })
    }

    pub fn records(&self) -> &[ContractRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_row(row: usize, raw: &RawContractRow) -> Result<ContractRecord, CatalogError> {
    let token = raw.token.trim().to_string();
    if token.is_empty() {
        return Err(CatalogError::EmptyToken { row });
    }

    let trading_symbol = raw.symbol.trim().to_uppercase();
    if trading_symbol.is_empty() {
        return Err(CatalogError::EmptyTradingSymbol { row });
    }

    let symbol = raw.name.trim().to_uppercase();

    let segment =
        ExchangeSegment::parse(&raw.exch_seg).ok_or_else(|| CatalogError::UnknownSegment {
            row,
            value: raw.exch_seg.clone(),
        })?;

    let kind = parse_kind(row, &raw.instrument_type, &trading_symbol)?;

    let expiry = if kind.is_derivative() {
        Some(parse_expiry(&raw.expiry).ok_or_else(|| CatalogError::InvalidExpiry {
            row,
            value: raw.expiry.clone(),
        })?)
    } else {
        None
    };

    let strike = if kind.is_option() {
        let paise: f64 = raw
            .strike
            .trim()
            .parse()
            .map_err(|_| CatalogError::InvalidStrike {
                row,
                value: raw.strike.clone(),
            })?;
        if !paise.is_finite() || paise <= 0.0 {
            return Err(CatalogError::InvalidStrike {
                row,
                value: raw.strike.clone(),
            });
        }
        // The scrip master quotes strikes in paise.
        Some(paise / 100.0)
    } else {
        None
    };

    Ok(ContractRecord {
        symbol,
        segment,
        kind,
        expiry,
        strike,
        trading_symbol,
        token,
    })
}

fn parse_kind(
    row: usize,
    instrument_type: &str,
    trading_symbol: &str,
) -> Result<InstrumentKind, CatalogError> {
    match instrument_type.trim().to_uppercase().as_str() {
        "FUTIDX" | "FUTSTK" => Ok(InstrumentKind::Future),
        "OPTIDX" | "OPTSTK" => {
            if trading_symbol.ends_with("CE") {
                Ok(InstrumentKind::CallOption)
            } else if trading_symbol.ends_with("PE") {
                Ok(InstrumentKind::PutOption)
            } else {
                Err(CatalogError::MissingOptionSuffix {
                    row,
                    symbol: trading_symbol.to_string(),
                })
            }
        }
        "AMXIDX" | "INDEX" => Ok(InstrumentKind::Index),
        "" | "EQ" => Ok(InstrumentKind::Equity),
        other => Err(CatalogError::UnknownInstrumentType {
            row,
            value: other.to_string(),
        }),
    }
}

/// Accepts the scrip-master `30JAN2025` form and ISO `2025-01-30`.
fn parse_expiry(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%d%b%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Process-lifetime catalog handle: many concurrent readers, one writer.
///
/// `snapshot` hands out an `Arc` to the current catalog; `replace` swaps in
/// a freshly loaded one atomically. In-flight resolutions keep working on
/// the snapshot they took and never see a partial reload.
#[derive(Debug)]
pub struct CatalogHandle {
    inner: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, catalog: Catalog) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(catalog);
    }
}
