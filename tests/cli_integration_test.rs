//! CLI-facing integration tests: real INI files on disk, file-backed
//! catalog and candle adapters, and the query-building helpers.

mod common;

use common::*;
use chrono::Duration;
use fnosignal::adapters::csv_candle_adapter::CsvCandleAdapter;
use fnosignal::adapters::csv_catalog_adapter::CsvCatalogAdapter;
use fnosignal::adapters::file_config_adapter::FileConfigAdapter;
use fnosignal::cli::{build_query, load_config, KindArg};
use fnosignal::domain::catalog::Catalog;
use fnosignal::domain::config_validation::build_classifier_config;
use fnosignal::domain::indicator::annotate;
use fnosignal::domain::normalize::normalize;
use fnosignal::domain::resolver::resolve;
use fnosignal::domain::signal::{classify, Direction, TrendPolicy};
use fnosignal::ports::catalog_port::CatalogPort;
use fnosignal::ports::data_port::MarketDataPort;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[catalog]
scrip_master = data/scrip_master.csv

[data]
candle_dir = data/candles
history_days = 7

[signal]
fast_ema = 5
slow_ema = 20
trend_policy = above
macd_fast = 12
macd_slow = 26
macd_signal = 9
rsi_period = 14
rsi_filter = false
require_pattern = false
atr_period = 14
reward_multiple = 1.5
"#;

mod config_loading {
    use super::*;

    #[test]
    fn valid_ini_builds_a_classifier_config() {
        let file = write_temp_ini(VALID_INI);
        let adapter = load_config(&file.path().to_path_buf()).unwrap();
        let config = build_classifier_config(&adapter).unwrap();

        assert_eq!(config.fast_ema, 5);
        assert_eq!(config.slow_ema, 20);
        assert_eq!(config.trend_policy, TrendPolicy::CurrentlyAbove);
        assert_eq!(config.reward_multiple, 1.5);
        assert!(config.rsi_bands.is_none());
        assert!(!config.require_pattern);
    }

    #[test]
    fn crossover_policy_parses_from_ini() {
        let file = write_temp_ini("[signal]\ntrend_policy = crossover\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let config = build_classifier_config(&adapter).unwrap();
        assert_eq!(config.trend_policy, TrendPolicy::JustCrossed);
    }

    #[test]
    fn invalid_ema_ordering_is_rejected() {
        let file = write_temp_ini("[signal]\nfast_ema = 50\nslow_ema = 20\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert!(build_classifier_config(&adapter).is_err());
    }

    #[test]
    fn missing_config_file_fails_to_load() {
        let missing = PathBuf::from("/nonexistent/fnosignal.ini");
        assert!(load_config(&missing).is_err());
    }
}

mod file_backed_resolution {
    use super::*;

    const SCRIP_MASTER: &str = "\
token,symbol,name,expiry,strike,lotsize,instrumenttype,exch_seg,tick_size
43854,NIFTY30JAN2522000CE,NIFTY,30JAN2025,2200000.0,75,OPTIDX,NFO,5.0
43855,NIFTY30JAN2522100CE,NIFTY,30JAN2025,2210000.0,75,OPTIDX,NFO,5.0
59001,NIFTYIT30JAN2538000CE,NIFTYIT,30JAN2025,3800000.0,50,OPTIDX,NFO,5.0
26009,NIFTY29MAY25FUT,NIFTY,29MAY2025,-1.0,75,FUTIDX,NFO,5.0
";

    #[test]
    fn atm_tie_resolves_lower_strike_from_a_real_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scrip_master.csv");
        fs::write(&path, SCRIP_MASTER).unwrap();

        let rows = CsvCatalogAdapter::new(path).fetch_rows().unwrap();
        let catalog = Catalog::load(&rows).unwrap();

        let query = build_query("NIFTY", KindArg::Call, None, None, Some(22050.0)).unwrap();
        let resolution = resolve(&catalog, &query, date(2025, 1, 20)).unwrap();

        assert_eq!(resolution.record.token, "43854");
        assert_eq!(resolution.record.strike, Some(22000.0));
    }

    #[test]
    fn future_resolves_without_strike_flags() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scrip_master.csv");
        fs::write(&path, SCRIP_MASTER).unwrap();

        let rows = CsvCatalogAdapter::new(path).fetch_rows().unwrap();
        let catalog = Catalog::load(&rows).unwrap();

        let query = build_query("NIFTY", KindArg::Future, None, None, None).unwrap();
        let resolution = resolve(&catalog, &query, date(2025, 1, 20)).unwrap();
        assert_eq!(resolution.record.token, "26009");
    }
}

mod file_backed_signal {
    use super::*;

    #[test]
    fn rising_candle_file_classifies_as_buy() {
        let dir = tempfile::TempDir::new().unwrap();

        let mut candle_csv = String::from("timestamp,open,high,low,close,volume\n");
        for row in rising_candle_rows(30) {
            candle_csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                row.timestamp, row.open, row.high, row.low, row.close, row.volume
            ));
        }
        fs::write(dir.path().join("43854_NFO.csv"), candle_csv).unwrap();

        let file = write_temp_ini(VALID_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let config = build_classifier_config(&adapter).unwrap();

        let raw = CsvCandleAdapter::new(dir.path().to_path_buf())
            .fetch_candles(
                "43854",
                fnosignal::domain::instrument::ExchangeSegment::Derivatives,
                session_start() - Duration::days(1),
                session_start() + Duration::days(7),
            )
            .unwrap();
        let series = normalize(&raw).unwrap();
        let annotated = annotate(series, &config.required_indicators());
        let signal = classify(&annotated, &config);

        assert_eq!(signal.direction, Direction::Buy);
        let levels = signal.levels.unwrap();
        assert!(levels.stop < levels.entry && levels.entry < levels.target);
    }
}
