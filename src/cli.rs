//! CLI definition and dispatch.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_candle_adapter::CsvCandleAdapter;
use crate::adapters::csv_catalog_adapter::CsvCatalogAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::catalog::Catalog;
use crate::domain::config_validation::build_classifier_config;
use crate::domain::error::FnosignalError;
use crate::domain::indicator::{annotate, AnnotatedSeries, IndicatorValue};
use crate::domain::instrument::{ContractRecord, InstrumentKind};
use crate::domain::normalize::normalize;
use crate::domain::resolver::{resolve, ContractQuery, ExpiryRule, Resolution, StrikeRule};
use crate::domain::signal::{classify, ClassifierConfig, Direction, Signal};
use crate::ports::catalog_port::CatalogPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "fnosignal", about = "FnO contract resolution and signal derivation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Future,
    Call,
    Put,
}

impl KindArg {
    pub fn instrument_kind(self) -> InstrumentKind {
        match self {
            KindArg::Future => InstrumentKind::Future,
            KindArg::Call => InstrumentKind::CallOption,
            KindArg::Put => InstrumentKind::PutOption,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve one contract from a scrip-master CSV
    Resolve {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Exact expiry date (YYYY-MM-DD); defaults to nearest upcoming
        #[arg(long)]
        expiry: Option<NaiveDate>,
        /// Exact strike in rupees (options)
        #[arg(long)]
        strike: Option<f64>,
        /// Reference price for nearest-strike selection (options)
        #[arg(long)]
        reference: Option<f64>,
        /// Resolution date; defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Run the full pipeline and print a signal for one contract
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long)]
        expiry: Option<NaiveDate>,
        #[arg(long)]
        strike: Option<f64>,
        #[arg(long)]
        reference: Option<f64>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Summarize a scrip-master CSV
    CatalogInfo {
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Validate a signal configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Resolve {
            catalog,
            symbol,
            kind,
            expiry,
            strike,
            reference,
            as_of,
        } => run_resolve(&catalog, &symbol, kind, expiry, strike, reference, as_of),
        Command::Signal {
            config,
            symbol,
            kind,
            expiry,
            strike,
            reference,
            as_of,
        } => run_signal(&config, &symbol, kind, expiry, strike, reference, as_of),
        Command::CatalogInfo { catalog } => run_catalog_info(&catalog),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FnosignalError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Turn CLI flags into a [`ContractQuery`]. An option query needs either an
/// exact strike or a reference price; anything else is ambiguous.
pub fn build_query(
    symbol: &str,
    kind: KindArg,
    expiry: Option<NaiveDate>,
    strike: Option<f64>,
    reference: Option<f64>,
) -> Result<ContractQuery, FnosignalError> {
    let kind = kind.instrument_kind();

    let strike_rule = match (strike, reference) {
        (Some(s), _) => Some(StrikeRule::Exact(s)),
        (None, Some(r)) => Some(StrikeRule::NearestTo(r)),
        (None, None) => None,
    };
    if kind.is_option() && strike_rule.is_none() {
        return Err(FnosignalError::ConfigInvalid {
            section: "query".to_string(),
            key: "strike".to_string(),
            reason: "an option query needs --strike or --reference".to_string(),
        });
    }

    Ok(ContractQuery {
        symbol: symbol.to_string(),
        kind,
        expiry: match expiry {
            Some(date) => ExpiryRule::On(date),
            None => ExpiryRule::NearestFuture,
        },
        strike: strike_rule,
    })
}

fn load_catalog(path: &PathBuf) -> Result<Catalog, FnosignalError> {
    eprintln!("Loading catalog from {}", path.display());
    let rows = CsvCatalogAdapter::new(path.clone()).fetch_rows()?;
    let catalog = Catalog::load(&rows)?;
    eprintln!("  {} contracts loaded", catalog.len());
    Ok(catalog)
}

fn resolve_contract(
    catalog: &Catalog,
    query: &ContractQuery,
    as_of: NaiveDate,
) -> Result<ContractRecord, FnosignalError> {
    let Resolution { record, warning } = resolve(catalog, query, as_of)?;
    if let Some(warning) = warning {
        eprintln!(
            "warning: {} contracts matched, using first in catalog order: {}",
            warning.trading_symbols.len(),
            warning.trading_symbols.join(", ")
        );
    }
    eprintln!(
        "Resolved {} -> {} (token {})",
        query.symbol, record.trading_symbol, record.token
    );
    Ok(record)
}

fn run_resolve(
    catalog_path: &PathBuf,
    symbol: &str,
    kind: KindArg,
    expiry: Option<NaiveDate>,
    strike: Option<f64>,
    reference: Option<f64>,
    as_of: Option<NaiveDate>,
) -> ExitCode {
    let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());

    let result = build_query(symbol, kind, expiry, strike, reference)
        .and_then(|query| {
            let catalog = load_catalog(catalog_path)?;
            resolve_contract(&catalog, &query, as_of)
        });

    match result {
        Ok(record) => {
            println!("trading_symbol: {}", record.trading_symbol);
            println!("token: {}", record.token);
            println!("segment: {}", record.segment);
            if let Some(expiry) = record.expiry {
                println!("expiry: {}", expiry);
            }
            if let Some(strike) = record.strike {
                println!("strike: {}", strike);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_signal(
    config_path: &PathBuf,
    symbol: &str,
    kind: KindArg,
    expiry: Option<NaiveDate>,
    strike: Option<f64>,
    reference: Option<f64>,
    as_of: Option<NaiveDate>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());

    match signal_pipeline(&adapter, symbol, kind, expiry, strike, reference, as_of) {
        Ok((record, annotated, classifier, signal)) => {
            print_signal(&record, &annotated, &classifier, &signal);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

type PipelineOutput = (ContractRecord, AnnotatedSeries, ClassifierConfig, Signal);

fn signal_pipeline(
    config: &dyn ConfigPort,
    symbol: &str,
    kind: KindArg,
    expiry: Option<NaiveDate>,
    strike: Option<f64>,
    reference: Option<f64>,
    as_of: NaiveDate,
) -> Result<PipelineOutput, FnosignalError> {
    let classifier = build_classifier_config(config)?;

    let scrip_master = require_path(config, "catalog", "scrip_master")?;
    let candle_dir = require_path(config, "data", "candle_dir")?;
    let history_days = config.get_int("data", "history_days", 7).max(1);

    let query = build_query(symbol, kind, expiry, strike, reference)?;
    let catalog = load_catalog(&scrip_master)?;
    let record = resolve_contract(&catalog, &query, as_of)?;

    let to = as_of
        .and_hms_opt(23, 59, 59)
        .unwrap_or(NaiveDateTime::MIN)
        .and_utc();
    let from = to - Duration::days(history_days);
    eprintln!(
        "Fetching candles for token {} from {} to {}",
        record.token, from, to
    );
    let raw = CsvCandleAdapter::new(candle_dir).fetch_candles(
        &record.token,
        record.segment,
        from,
        to,
    )?;

    let series = normalize(&raw)?;
    eprintln!("  {} candles after normalization", series.len());

    let annotated = annotate(series, &classifier.required_indicators());
    let signal = classify(&annotated, &classifier);
    Ok((record, annotated, classifier, signal))
}

fn require_path(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<PathBuf, FnosignalError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(PathBuf::from(s.trim())),
        _ => Err(FnosignalError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

/// CALL/PUT at the presentation boundary only; the core stays BUY/SELL.
pub fn direction_label(direction: Direction, kind: InstrumentKind) -> &'static str {
    if kind.is_option() {
        direction.option_label()
    } else {
        match direction {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
            Direction::Hold => "HOLD",
        }
    }
}

fn print_signal(
    record: &ContractRecord,
    annotated: &AnnotatedSeries,
    classifier: &ClassifierConfig,
    signal: &Signal,
) {
    println!("contract: {} (token {})", record.trading_symbol, record.token);
    println!(
        "signal: {}",
        direction_label(signal.direction, record.kind)
    );
    if let Some(levels) = &signal.levels {
        println!("entry: {:.2}", levels.entry);
        println!("target: {:.2}", levels.target);
        println!("stop: {:.2}", levels.stop);
    }

    let last = annotated.series.len().saturating_sub(1);
    for indicator_type in classifier.required_indicators() {
        let Some(point) = annotated.valid_point(&indicator_type, last) else {
            println!("{}: n/a", indicator_type);
            continue;
        };
        match point.value {
            IndicatorValue::Simple(v) => println!("{}: {:.2}", indicator_type, v),
            IndicatorValue::Macd { line, signal, .. } => {
                println!("{}: line {:.2} signal {:.2}", indicator_type, line, signal)
            }
            IndicatorValue::Engulfing { bullish, bearish } => {
                println!("{}: bullish {} bearish {}", indicator_type, bullish, bearish)
            }
        }
    }
}

fn run_catalog_info(catalog_path: &PathBuf) -> ExitCode {
    let catalog = match load_catalog(catalog_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    let mut by_kind: Vec<(InstrumentKind, usize)> = Vec::new();
    for record in catalog.records() {
        match by_kind.iter_mut().find(|(k, _)| *k == record.kind) {
            Some((_, count)) => *count += 1,
            None => by_kind.push((record.kind, 1)),
        }
    }
    let roots: BTreeSet<&str> = catalog.records().iter().map(|r| r.symbol.as_str()).collect();

    println!("contracts: {}", catalog.len());
    for (kind, count) in by_kind {
        println!("{}: {}", kind, count);
    }
    println!("distinct roots: {}", roots.len());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match build_classifier_config(&adapter) {
        Ok(config) => {
            println!("signal config OK");
            println!(
                "trend: EMA({}) vs EMA({}), policy {:?}",
                config.fast_ema, config.slow_ema, config.trend_policy
            );
            println!(
                "momentum: MACD({},{},{}){}",
                config.macd_fast,
                config.macd_slow,
                config.macd_signal,
                if config.rsi_bands.is_some() {
                    " + RSI bands"
                } else {
                    ""
                }
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}
