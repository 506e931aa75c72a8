//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during the clean/enrich passes
//! - exported to CSV/JSON
//! - reloaded later for mapping or comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregate pseudo-locations present in the OWID file that must never be
/// treated as countries (they double-count every real location).
pub const EXCLUDED_AGGREGATES: [&str; 3] = ["World", "European Union", "International"];

/// Default focus countries for the detailed comparison output.
pub const DEFAULT_COUNTRIES: [&str; 10] = [
    "United States",
    "India",
    "Brazil",
    "United Kingdom",
    "Russia",
    "France",
    "Germany",
    "Italy",
    "Spain",
    "China",
];

/// Trailing window length (days) for the smoothed daily series.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 7;

/// A raw row of CSV inputs (mostly optional).
///
/// This mirrors the OWID column set we consume and allows us to:
/// - perform row-level validation with good error messages
/// - keep "missing" distinct from zero until the cleaning pass decides
#[derive(Debug, Clone)]
pub struct RawRow {
    pub location: String,
    /// 3-letter ISO code; absent for aggregate regions like "World".
    pub iso_code: Option<String>,
    pub date: NaiveDate,
    pub population: Option<f64>,

    pub total_cases: Option<f64>,
    pub new_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub new_deaths: Option<f64>,

    pub total_vaccinations: Option<f64>,
    pub people_vaccinated: Option<f64>,

    pub total_cases_per_million: Option<f64>,
    pub total_deaths_per_million: Option<f64>,
    pub people_vaccinated_per_hundred: Option<f64>,
}

/// A row after the cleaning pass: the six counters are gap-free.
///
/// Forward-fill runs first (within a location, by date), then any value that
/// is still missing (including missing-at-start-of-series) becomes zero.
#[derive(Debug, Clone)]
pub struct CleanRow {
    pub location: String,
    pub iso_code: Option<String>,
    pub date: NaiveDate,
    pub population: Option<f64>,

    pub total_cases: f64,
    pub new_cases: f64,
    pub total_deaths: f64,
    pub new_deaths: f64,
    pub total_vaccinations: f64,
    pub people_vaccinated: f64,

    pub total_cases_per_million: Option<f64>,
    pub total_deaths_per_million: Option<f64>,
    pub people_vaccinated_per_hundred: Option<f64>,
}

/// A fully enriched observation: cleaned counters plus derived metrics.
///
/// The derived columns are computed, never loaded, and are deterministic in
/// the cleaned counters plus population.
#[derive(Debug, Clone)]
pub struct Observation {
    pub location: String,
    pub iso_code: Option<String>,
    pub date: NaiveDate,
    pub population: Option<f64>,

    pub total_cases: f64,
    pub new_cases: f64,
    pub total_deaths: f64,
    pub new_deaths: f64,
    pub total_vaccinations: f64,
    pub people_vaccinated: f64,

    pub total_cases_per_million: Option<f64>,
    pub total_deaths_per_million: Option<f64>,
    pub people_vaccinated_per_hundred: Option<f64>,

    /// total_deaths / total_cases × 100, or 0 when total_cases == 0.
    pub death_rate: f64,
    /// people_vaccinated / population × 100, or 0 when population is 0 or missing.
    pub vaccination_rate: f64,
    /// Trailing 7-day mean of new_cases; `None` until a full window exists.
    pub new_cases_smoothed: Option<f64>,
    /// Trailing 7-day mean of new_deaths; `None` until a full window exists.
    pub new_deaths_smoothed: Option<f64>,
}

/// Summary stats about the rows actually used for processing.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_rows: usize,
    pub n_locations: usize,
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub out_dir: PathBuf,

    /// Countries retained for the detailed `focus` view, in output order.
    pub countries: Vec<String>,
    /// Aggregate pseudo-locations removed before any country selection.
    pub excluded: Vec<String>,

    /// Trailing window (days) for the smoothed daily series.
    pub window: usize,

    /// Processed-table CSV path; defaults to `<out_dir>/processed_covid_data.csv`.
    pub export_processed: Option<PathBuf>,
    /// Latest-by-country CSV path; defaults to `<out_dir>/latest_by_country.csv`.
    pub export_latest: Option<PathBuf>,
    /// Optional JSON snapshot export (off by default).
    pub export_snapshot: Option<PathBuf>,

    pub top_n: usize,
    pub summary: bool,
}

impl RunConfig {
    pub fn processed_path(&self) -> PathBuf {
        self.export_processed
            .clone()
            .unwrap_or_else(|| self.out_dir.join("processed_covid_data.csv"))
    }

    pub fn latest_path(&self) -> PathBuf {
        self.export_latest
            .clone()
            .unwrap_or_else(|| self.out_dir.join("latest_by_country.csv"))
    }
}

/// A saved snapshot file (JSON).
///
/// This is the "portable" representation of the latest-by-country table:
/// run metadata plus one entry per retained country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub tool: String,
    /// Most recent date observed across the focus countries.
    pub asof_date: NaiveDate,
    pub window: usize,
    pub countries: Vec<CountrySnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountrySnapshot {
    pub location: String,
    pub iso_code: Option<String>,
    pub date: NaiveDate,
    pub total_cases: f64,
    pub total_deaths: f64,
    pub people_vaccinated: f64,
    pub death_rate: f64,
    pub vaccination_rate: f64,
}

impl From<&Observation> for CountrySnapshot {
    fn from(obs: &Observation) -> Self {
        Self {
            location: obs.location.clone(),
            iso_code: obs.iso_code.clone(),
            date: obs.date,
            total_cases: obs.total_cases,
            total_deaths: obs.total_deaths,
            people_vaccinated: obs.people_vaccinated,
            death_rate: obs.death_rate,
            vaccination_rate: obs.vaccination_rate,
        }
    }
}
