//! Scrip-master CSV catalog adapter.
//!
//! Reads a locally saved scrip-master file with a header row naming at
//! least `token,symbol,name,expiry,strike,instrumenttype,exch_seg`.
//! Columns are located by header name, so extra venue columns (lot size,
//! tick size, ...) are ignored. Rows come back raw; `Catalog::load` does
//! the parsing.

use crate::domain::catalog::RawContractRow;
use crate::domain::error::FnosignalError;
use crate::ports::catalog_port::CatalogPort;
use std::path::PathBuf;

pub struct CsvCatalogAdapter {
    path: PathBuf,
}

struct ColumnMap {
    token: usize,
    symbol: usize,
    name: usize,
    expiry: usize,
    strike: usize,
    instrument_type: usize,
    exch_seg: usize,
}

impl CsvCatalogAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CatalogPort for CsvCatalogAdapter {
    fn fetch_rows(&self) -> Result<Vec<RawContractRow>, FnosignalError> {
        let mut rdr =
            csv::Reader::from_path(&self.path).map_err(|e| FnosignalError::CatalogSource {
                reason: format!("failed to open {}: {}", self.path.display(), e),
            })?;

        let headers = rdr.headers().map_err(|e| FnosignalError::CatalogSource {
            reason: format!("unreadable header row: {}", e),
        })?;
        let columns = map_columns(headers)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| FnosignalError::CatalogSource {
                reason: format!("CSV parse error: {}", e),
            })?;
            let field = |i: usize| record.get(i).unwrap_or_default().to_string();
            rows.push(RawContractRow {
                token: field(columns.token),
                symbol: field(columns.symbol),
                name: field(columns.name),
                expiry: field(columns.expiry),
                strike: field(columns.strike),
                instrument_type: field(columns.instrument_type),
                exch_seg: field(columns.exch_seg),
            });
        }
        Ok(rows)
    }
}

fn map_columns(headers: &csv::StringRecord) -> Result<ColumnMap, FnosignalError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| FnosignalError::CatalogSource {
                reason: format!("missing required column {:?}", name),
            })
    };
    Ok(ColumnMap {
        token: find("token")?,
        symbol: find("symbol")?,
        name: find("name")?,
        expiry: find("expiry")?,
        strike: find("strike")?,
        instrument_type: find("instrumenttype")?,
        exch_seg: find("exch_seg")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SCRIP_MASTER: &str = "\
token,symbol,name,expiry,strike,lotsize,instrumenttype,exch_seg,tick_size
43854,NIFTY30JAN2522000CE,NIFTY,30JAN2025,2200000.000000,75,OPTIDX,NFO,5.000000
43855,NIFTY30JAN2522100CE,NIFTY,30JAN2025,2210000.000000,75,OPTIDX,NFO,5.000000
26009,NIFTY29MAY25FUT,NIFTY,29MAY2025,-1.000000,75,FUTIDX,NFO,5.000000
";

    fn write_master(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scrip_master.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn fetch_rows_maps_named_columns() {
        let (_dir, path) = write_master(SCRIP_MASTER);
        let rows = CsvCatalogAdapter::new(path).fetch_rows().unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].token, "43854");
        assert_eq!(rows[0].symbol, "NIFTY30JAN2522000CE");
        assert_eq!(rows[0].name, "NIFTY");
        assert_eq!(rows[0].expiry, "30JAN2025");
        assert_eq!(rows[0].strike, "2200000.000000");
        assert_eq!(rows[0].instrument_type, "OPTIDX");
        assert_eq!(rows[0].exch_seg, "NFO");
    }

    #[test]
    fn fetch_rows_ignores_extra_columns() {
        let (_dir, path) = write_master(SCRIP_MASTER);
        let rows = CsvCatalogAdapter::new(path).fetch_rows().unwrap();
        // lotsize/tick_size are present in the file but not in the row.
        assert_eq!(rows[2].instrument_type, "FUTIDX");
        assert_eq!(rows[2].strike, "-1.000000");
    }

    #[test]
    fn column_order_does_not_matter() {
        let reordered = "\
name,exch_seg,token,instrumenttype,expiry,strike,symbol
NIFTY,NFO,43854,OPTIDX,30JAN2025,2200000,NIFTY30JAN2522000CE
";
        let (_dir, path) = write_master(reordered);
        let rows = CsvCatalogAdapter::new(path).fetch_rows().unwrap();
        assert_eq!(rows[0].token, "43854");
        assert_eq!(rows[0].name, "NIFTY");
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let no_token = "\
symbol,name,expiry,strike,instrumenttype,exch_seg
NIFTY30JAN2522000CE,NIFTY,30JAN2025,2200000,OPTIDX,NFO
";
        let (_dir, path) = write_master(no_token);
        let err = CsvCatalogAdapter::new(path).fetch_rows().unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let adapter = CsvCatalogAdapter::new(PathBuf::from("/nonexistent/scrip.csv"));
        assert!(adapter.fetch_rows().is_err());
    }
}
