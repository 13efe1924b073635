//! FeatureLab CLI — download, featurize, and preset commands.
//!
//! Commands:
//! - `download` — fetch daily bars from Yahoo Finance into raw-bar CSVs
//! - `featurize` — build a feature table (+ optional label) for one or
//!   more inputs and export `features.csv` / `manifest.json` per symbol
//! - `preset show` — print the standard pipeline config as TOML

mod config;
mod export;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use featurelab_core::FeaturePipeline;
use featurelab_data::{
    read_raw_bars, series_from_raw, write_raw_bars, DataProvider, SyntheticProvider,
    YahooProvider,
};

use crate::config::PipelineConfig;
use crate::export::{build_manifest, export_features_csv, save_run};

#[derive(Parser)]
#[command(
    name = "featurelab",
    about = "FeatureLab CLI — technical-analysis feature and label tables"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily bars from Yahoo Finance into raw-bar CSV files.
    Download {
        /// Symbols to download (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 10 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Output directory for the per-symbol CSV files.
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
    },
    /// Build a feature table and export features.csv + manifest.json.
    Featurize {
        /// Raw-bar CSV files to featurize (repeatable).
        #[arg(long = "csv")]
        csv_files: Vec<PathBuf>,

        /// Symbols to fetch and featurize (repeatable).
        #[arg(long = "symbol")]
        symbols: Vec<String>,

        /// Generate synthetic bars for --symbol inputs instead of fetching.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for synthetic bar generation.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Start date (YYYY-MM-DD) for fetched/synthetic bars. Defaults to 5 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD) for fetched/synthetic bars. Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Path to a TOML pipeline config. Defaults to the standard preset.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Drop the leading rows on which any feature is still undefined.
        #[arg(long, default_value_t = false)]
        drop_warmup: bool,

        /// Output directory; one subdirectory per symbol.
        #[arg(long, default_value = "runs")]
        out_dir: PathBuf,
    },
    /// Pipeline preset commands.
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// Print the standard pipeline config as TOML.
    Show,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Download { symbols, start, end, out_dir } => {
            run_download(symbols, start, end, out_dir)
        }
        Commands::Featurize {
            csv_files,
            symbols,
            synthetic,
            seed,
            start,
            end,
            config,
            drop_warmup,
            out_dir,
        } => run_featurize(
            csv_files, symbols, synthetic, seed, start, end, config, drop_warmup, out_dir,
        ),
        Commands::Preset { action } => match action {
            PresetAction::Show => {
                print!("{}", PipelineConfig::standard().to_toml()?);
                Ok(())
            }
        },
    }
}

fn parse_date(arg: Option<&str>, default_days_back: i64) -> Result<NaiveDate> {
    match arg {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)")),
        None => Ok(chrono::Local::now().date_naive() - chrono::Duration::days(default_days_back)),
    }
}

fn run_download(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    out_dir: PathBuf,
) -> Result<()> {
    let start_date = parse_date(start.as_deref(), 365 * 10)?;
    let end_date = parse_date(end.as_deref(), 0)?;

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create output dir: {}", out_dir.display()))?;

    let provider = YahooProvider::new();
    let mut errors: Vec<(String, String)> = Vec::new();

    for symbol in &symbols {
        match provider.fetch(symbol, start_date, end_date) {
            Ok(bars) => {
                let path = out_dir.join(format!("{symbol}.csv"));
                match write_raw_bars(&path, &bars) {
                    Ok(()) => {
                        info!(symbol, rows = bars.len(), path = %path.display(), "downloaded")
                    }
                    Err(e) => errors.push((symbol.clone(), e.to_string())),
                }
            }
            Err(e) => errors.push((symbol.clone(), e.to_string())),
        }
    }

    if !errors.is_empty() {
        for (symbol, err) in &errors {
            eprintln!("Error for {symbol}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

/// One featurize input: a CSV file on disk or a symbol to fetch/generate.
enum Input {
    Csv(PathBuf),
    Symbol(String),
}

impl Input {
    fn display_name(&self) -> String {
        match self {
            Input::Csv(path) => path.display().to_string(),
            Input::Symbol(symbol) => symbol.clone(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_featurize(
    csv_files: Vec<PathBuf>,
    symbols: Vec<String>,
    synthetic: bool,
    seed: u64,
    start: Option<String>,
    end: Option<String>,
    config_path: Option<PathBuf>,
    drop_warmup: bool,
    out_dir: PathBuf,
) -> Result<()> {
    if csv_files.is_empty() && symbols.is_empty() {
        bail!("nothing to featurize: pass at least one --csv or --symbol");
    }

    let start_date = parse_date(start.as_deref(), 365 * 5)?;
    let end_date = parse_date(end.as_deref(), 0)?;

    let config = match &config_path {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::standard(),
    };
    // Validate the whole pipeline once, before touching any input.
    let pipeline = FeaturePipeline::new(config.build_transforms()?)?;
    let config_hash = config.config_hash();
    info!(
        columns = pipeline.output_columns().len(),
        warmup = pipeline.warmup(),
        config_hash = %config_hash,
        "pipeline validated"
    );

    let inputs: Vec<Input> = csv_files
        .into_iter()
        .map(Input::Csv)
        .chain(symbols.into_iter().map(Input::Symbol))
        .collect();

    let results: Vec<Result<PathBuf, (String, String)>> = inputs
        .par_iter()
        .map(|input| {
            featurize_one(
                input, synthetic, seed, start_date, end_date, &config, &pipeline,
                &config_hash, drop_warmup, &out_dir,
            )
            .map_err(|e| (input.display_name(), format!("{e:#}")))
        })
        .collect();

    let mut failed = false;
    for result in results {
        match result {
            Ok(run_dir) => println!("wrote {}", run_dir.display()),
            Err((name, err)) => {
                eprintln!("Error for {name}: {err}");
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn featurize_one(
    input: &Input,
    synthetic: bool,
    seed: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    config: &PipelineConfig,
    pipeline: &FeaturePipeline,
    config_hash: &str,
    drop_warmup: bool,
    out_dir: &Path,
) -> Result<PathBuf> {
    let (symbol, source, raw) = match input {
        Input::Csv(path) => {
            let symbol = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_uppercase)
                .unwrap_or_else(|| "UNKNOWN".to_string());
            let bars = read_raw_bars(path)?;
            (symbol, "csv".to_string(), bars)
        }
        Input::Symbol(symbol) if synthetic => {
            let provider = SyntheticProvider::new(seed);
            let bars = provider.fetch(symbol, start_date, end_date)?;
            (symbol.clone(), provider.name().to_string(), bars)
        }
        Input::Symbol(symbol) => {
            let provider = YahooProvider::new();
            let bars = provider.fetch(symbol, start_date, end_date)?;
            (symbol.clone(), provider.name().to_string(), bars)
        }
    };

    let (series, report) = series_from_raw(&symbol, raw)?;
    info!(
        symbol = %symbol,
        rows = report.output_rows,
        dropped = report.duplicates_dropped + report.unusable_dropped,
        "series ready"
    );

    let table = pipeline.run(&series)?;
    let labels = config
        .label
        .as_ref()
        .map(|spec| spec.apply(&series))
        .transpose()?;

    let skip_rows = if drop_warmup {
        table.first_complete_row().unwrap_or(table.n_rows())
    } else {
        0
    };
    let csv_text = export_features_csv(&series, &table, labels.as_ref(), skip_rows)?;
    let manifest = build_manifest(
        &source,
        &series,
        &table,
        labels.as_ref(),
        config_hash.to_string(),
        drop_warmup,
    );

    save_run(out_dir, &csv_text, &manifest)
}
