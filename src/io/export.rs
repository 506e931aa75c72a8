//! Export the processed and latest-by-country tables to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or
//! downstream scripts; smoothed values render as empty fields while their
//! window is incomplete, so the missing/zero distinction survives the
//! round-trip.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::Observation;
use crate::error::AppError;

const PROCESSED_HEADER: &str = "iso_code,location,date,population,\
total_cases,new_cases,total_deaths,new_deaths,\
total_vaccinations,people_vaccinated,\
total_cases_per_million,total_deaths_per_million,people_vaccinated_per_hundred,\
death_rate,vaccination_rate,new_cases_smoothed,new_deaths_smoothed";

/// Write the full processed focus table (input columns + derived columns).
pub fn write_processed_csv(path: &Path, rows: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::export(format!(
            "Failed to create processed CSV '{}': {e}",
            path.display()
        ))
    })?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{PROCESSED_HEADER}")
        .map_err(|e| AppError::export(format!("Failed to write processed CSV header: {e}")))?;

    for row in rows {
        writeln!(out, "{}", format_row(row))
            .map_err(|e| AppError::export(format!("Failed to write processed CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::export(format!("Failed to flush processed CSV: {e}")))
}

/// Write the latest-by-country comparison table (same schema, one row per
/// location).
pub fn write_latest_csv(path: &Path, rows: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::export(format!(
            "Failed to create latest CSV '{}': {e}",
            path.display()
        ))
    })?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{PROCESSED_HEADER}")
        .map_err(|e| AppError::export(format!("Failed to write latest CSV header: {e}")))?;

    for row in rows {
        writeln!(out, "{}", format_row(row))
            .map_err(|e| AppError::export(format!("Failed to write latest CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::export(format!("Failed to flush latest CSV: {e}")))
}

fn format_row(row: &Observation) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{:.4},{:.4},{},{}",
        row.iso_code.as_deref().unwrap_or(""),
        quote(&row.location),
        row.date,
        fmt_opt(row.population),
        row.total_cases,
        row.new_cases,
        row.total_deaths,
        row.new_deaths,
        row.total_vaccinations,
        row.people_vaccinated,
        fmt_opt(row.total_cases_per_million),
        fmt_opt(row.total_deaths_per_million),
        fmt_opt(row.people_vaccinated_per_hundred),
        row.death_rate,
        row.vaccination_rate,
        fmt_smoothed(row.new_cases_smoothed),
        fmt_smoothed(row.new_deaths_smoothed),
    )
}

/// Quote a location name if it contains a comma (e.g. "Bonaire, Sint
/// Eustatius and Saba").
fn quote(location: &str) -> String {
    if location.contains(',') || location.contains('"') {
        format!("\"{}\"", location.replace('"', "\"\""))
    } else {
        location.to_string()
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn fmt_smoothed(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs() -> Observation {
        Observation {
            location: "Testland".to_string(),
            iso_code: Some("TST".to_string()),
            date: NaiveDate::from_ymd_opt(2021, 1, 7).unwrap(),
            population: Some(1000.0),
            total_cases: 100.0,
            new_cases: 10.0,
            total_deaths: 2.0,
            new_deaths: 1.0,
            total_vaccinations: 0.0,
            people_vaccinated: 0.0,
            total_cases_per_million: None,
            total_deaths_per_million: None,
            people_vaccinated_per_hundred: None,
            death_rate: 2.0,
            vaccination_rate: 0.0,
            new_cases_smoothed: Some(4.0),
            new_deaths_smoothed: None,
        }
    }

    #[test]
    fn row_format_matches_header_arity() {
        let header_fields = PROCESSED_HEADER.split(',').count();
        let row_fields = format_row(&obs()).split(',').count();
        assert_eq!(header_fields, row_fields);
    }

    #[test]
    fn undefined_smoothed_renders_empty() {
        let line = format_row(&obs());
        assert!(line.ends_with("4.000,"));
    }

    #[test]
    fn comma_in_location_is_quoted() {
        let mut o = obs();
        o.location = "Bonaire, Sint Eustatius and Saba".to_string();
        let line = format_row(&o);
        assert!(line.contains("\"Bonaire, Sint Eustatius and Saba\""));
    }
}
