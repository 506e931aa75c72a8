//! Command-line parsing for the OWID COVID-19 pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the data-transformation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid", version, about = "OWID COVID-19 trends pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the OWID dataset CSV into a local data directory.
    Fetch(FetchArgs),
    /// Run the full pipeline: load, filter, clean, enrich, export, summarize.
    Run(RunArgs),
    /// Load and process the data, print the summary only (no exports).
    Summary(RunArgs),
}

/// Options for `fetch`.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Directory to store the downloaded CSV.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Dataset URL override (also honors the OWID_COVID_URL env var).
    #[arg(long)]
    pub url: Option<String>,
}

/// Common options for running and summarizing.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Path to the input CSV.
    #[arg(short = 'i', long, default_value = "data/owid-covid-data.csv")]
    pub input: PathBuf,

    /// Directory for output files.
    #[arg(short = 'o', long, default_value = "output")]
    pub out_dir: PathBuf,

    /// Comma-separated country list overriding the default focus set.
    #[arg(long, value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Trailing window (days) for the smoothed daily series.
    #[arg(long, default_value_t = crate::domain::DEFAULT_SMOOTHING_WINDOW)]
    pub window: usize,

    /// Processed-table CSV path (defaults to <out-dir>/processed_covid_data.csv).
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Latest-by-country CSV path (defaults to <out-dir>/latest_by_country.csv).
    #[arg(long = "export-latest")]
    pub export_latest: Option<PathBuf>,

    /// Also write a latest-by-country snapshot as JSON.
    #[arg(long = "export-snapshot")]
    pub export_snapshot: Option<PathBuf>,

    /// Countries shown in the summary table.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Suppress the terminal summary.
    #[arg(long)]
    pub no_summary: bool,
}
