//! CSV ingest and validation.
//!
//! This module is responsible for turning the raw OWID CSV into a clean set
//! of `RawRow`s that are safe to transform.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors, detected before
//!   any cleaning runs)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic output order**: rows sorted by (location, date), the
//!   order the fill and smoothing passes rely on
//! - **Separation of concerns**: no cleaning or metric logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{DatasetStats, RawRow};
use crate::error::AppError;

/// Columns that must be present in the header for the run to proceed.
///
/// The per-million/per-hundred convenience columns are tolerated as absent;
/// they pass through untouched when present.
const REQUIRED_COLUMNS: [&str; 9] = [
    "location",
    "date",
    "population",
    "total_cases",
    "new_cases",
    "total_deaths",
    "new_deaths",
    "total_vaccinations",
    "people_vaccinated",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub location: Option<String>,
    pub message: String,
}

/// Ingest output: validated rows + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    /// Rows sorted by (location, date ascending).
    pub rows: Vec<RawRow>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and validate the OWID CSV from a file path.
pub fn load_rows(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::data_unavailable(format!("Failed to open input CSV '{}': {e}", path.display()))
    })?;
    read_rows(file)
}

/// Load and validate the OWID CSV from any reader.
///
/// Split out from [`load_rows`] so tests can feed in-memory data without
/// touching the filesystem.
pub fn read_rows<R: Read>(input: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data_unavailable(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    location: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => rows.push(row),
            Err((location, message)) => row_errors.push(RowError {
                line,
                location,
                message,
            }),
        }
    }

    let rows_used = rows.len();
    if rows_used == 0 {
        return Err(AppError::data_unavailable(
            "No valid rows found in input CSV.",
        ));
    }

    // Establish the (location, date) order the fill/smoothing passes rely
    // on, then reject duplicates rather than silently picking one row.
    rows.sort_by(|a, b| (a.location.as_str(), a.date).cmp(&(b.location.as_str(), b.date)));
    ensure_unique(&rows)?;

    let stats = compute_stats(&rows);

    Ok(IngestedData {
        rows,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿iso_code"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::schema(format!(
                "Missing required column: `{name}`"
            )));
        }
    }
    Ok(())
}

fn ensure_unique(rows: &[RawRow]) -> Result<(), AppError> {
    for pair in rows.windows(2) {
        if pair[0].location == pair[1].location && pair[0].date == pair[1].date {
            return Err(AppError::schema(format!(
                "Duplicate (location, date) row: '{}' on {}",
                pair[0].location, pair[0].date
            )));
        }
    }
    Ok(())
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<RawRow, (Option<String>, String)> {
    let location = get_required(record, header_map, "location")
        .map_err(|e| (None, e))?
        .to_string();

    let date = get_required(record, header_map, "date")
        .and_then(parse_date)
        .map_err(|e| (Some(location.clone()), e))?;

    let iso_code = get_optional(record, header_map, "iso_code").map(str::to_string);
    let population = parse_opt_f64(get_optional(record, header_map, "population"));

    let row = RawRow {
        location,
        iso_code,
        date,
        population,
        total_cases: parse_opt_f64(get_optional(record, header_map, "total_cases")),
        new_cases: parse_opt_f64(get_optional(record, header_map, "new_cases")),
        total_deaths: parse_opt_f64(get_optional(record, header_map, "total_deaths")),
        new_deaths: parse_opt_f64(get_optional(record, header_map, "new_deaths")),
        total_vaccinations: parse_opt_f64(get_optional(record, header_map, "total_vaccinations")),
        people_vaccinated: parse_opt_f64(get_optional(record, header_map, "people_vaccinated")),
        total_cases_per_million: parse_opt_f64(get_optional(
            record,
            header_map,
            "total_cases_per_million",
        )),
        total_deaths_per_million: parse_opt_f64(get_optional(
            record,
            header_map,
            "total_deaths_per_million",
        )),
        people_vaccinated_per_hundred: parse_opt_f64(get_optional(
            record,
            header_map,
            "people_vaccinated_per_hundred",
        )),
    };

    Ok(row)
}

fn compute_stats(rows: &[RawRow]) -> DatasetStats {
    let mut date_min = rows[0].date;
    let mut date_max = rows[0].date;
    let mut n_locations = 0usize;
    let mut prev_location: Option<&str> = None;

    for row in rows {
        date_min = date_min.min(row.date);
        date_max = date_max.max(row.date);
        if prev_location != Some(row.location.as_str()) {
            n_locations += 1;
            prev_location = Some(row.location.as_str());
        }
    }

    DatasetStats {
        n_rows: rows.len(),
        n_locations,
        date_min,
        date_max,
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // OWID exports ISO dates (`YYYY-MM-DD`), but spreadsheet round-trips
    // often rewrite them. We accept a small set of common formats to reduce
    // friction while keeping parsing deterministic.
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, YYYY/MM/DD."
    ))
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?;
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
