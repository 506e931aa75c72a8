//! One-shot download of the OWID COVID-19 dataset.
//!
//! Writes two copies into the data directory: a dated file (audit trail of
//! when a snapshot was pulled) and the standard filename the `run`
//! subcommand looks for by default.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use reqwest::blocking::Client;

use crate::error::AppError;

/// Canonical OWID dataset URL; overridable via `--url` or `OWID_COVID_URL`.
pub const DEFAULT_DATA_URL: &str = "https://covid.ourworldindata.org/data/owid-covid-data.csv";

/// Standard filename the pipeline reads by default.
pub const STANDARD_FILENAME: &str = "owid-covid-data.csv";

/// Result of a fetch: where the snapshot landed.
#[derive(Debug, Clone)]
pub struct FetchedData {
    pub dated_path: PathBuf,
    pub standard_path: PathBuf,
    pub bytes: usize,
}

/// Resolve the dataset URL: explicit flag wins, then the environment
/// (`.env` honored), then the canonical OWID URL.
pub fn resolve_url(override_url: Option<&str>) -> String {
    if let Some(url) = override_url {
        return url.to_string();
    }
    dotenvy::dotenv().ok();
    std::env::var("OWID_COVID_URL").unwrap_or_else(|_| DEFAULT_DATA_URL.to_string())
}

/// Download the dataset into `data_dir`.
pub fn fetch_dataset(data_dir: &Path, url: &str) -> Result<FetchedData, AppError> {
    fs::create_dir_all(data_dir).map_err(|e| {
        AppError::data_unavailable(format!(
            "Failed to create data directory '{}': {e}",
            data_dir.display()
        ))
    })?;

    let client = Client::new();
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::data_unavailable(format!("Failed to download '{url}': {e}")))?;

    let body = response
        .bytes()
        .map_err(|e| AppError::data_unavailable(format!("Failed to read download body: {e}")))?;

    let stamp = Local::now().format("%Y%m%d");
    let dated_path = data_dir.join(format!("owid-covid-data_{stamp}.csv"));
    let standard_path = data_dir.join(STANDARD_FILENAME);

    fs::write(&dated_path, &body).map_err(|e| {
        AppError::export(format!("Failed to write '{}': {e}", dated_path.display()))
    })?;
    fs::write(&standard_path, &body).map_err(|e| {
        AppError::export(format!("Failed to write '{}': {e}", standard_path.display()))
    })?;

    Ok(FetchedData {
        dated_path,
        standard_path,
        bytes: body.len(),
    })
}
