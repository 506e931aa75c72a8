//! Gap filling for the counter columns.
//!
//! Per location, in date order:
//!
//! 1. forward-fill {total_cases, total_deaths, new_cases, new_deaths} from
//!    the most recent non-missing value in the same location's series
//! 2. zero-fill whatever is still missing in the six counter columns
//!    (including vaccination counters, which are never forward-filled)
//!
//! A missing value at the start of a series has no prior value to carry, so
//! it falls through to the zero-fill: missing-at-start means zero. Carrying
//! the last seen value forward can never fabricate a decreasing cumulative
//! counter, so monotone inputs stay monotone.

use crate::domain::{CleanRow, RawRow};

/// Fill gaps in the counter columns, producing a gap-free table.
pub fn clean(rows: &[RawRow]) -> Vec<CleanRow> {
    let mut out = Vec::with_capacity(rows.len());

    let mut current: Option<&str> = None;
    let mut last_total_cases: Option<f64> = None;
    let mut last_new_cases: Option<f64> = None;
    let mut last_total_deaths: Option<f64> = None;
    let mut last_new_deaths: Option<f64> = None;

    for row in rows {
        if current != Some(row.location.as_str()) {
            current = Some(row.location.as_str());
            last_total_cases = None;
            last_new_cases = None;
            last_total_deaths = None;
            last_new_deaths = None;
        }

        let total_cases = carry(&mut last_total_cases, row.total_cases);
        let new_cases = carry(&mut last_new_cases, row.new_cases);
        let total_deaths = carry(&mut last_total_deaths, row.total_deaths);
        let new_deaths = carry(&mut last_new_deaths, row.new_deaths);

        out.push(CleanRow {
            location: row.location.clone(),
            iso_code: row.iso_code.clone(),
            date: row.date,
            population: row.population,
            total_cases,
            new_cases,
            total_deaths,
            new_deaths,
            total_vaccinations: row.total_vaccinations.unwrap_or(0.0),
            people_vaccinated: row.people_vaccinated.unwrap_or(0.0),
            total_cases_per_million: row.total_cases_per_million,
            total_deaths_per_million: row.total_deaths_per_million,
            people_vaccinated_per_hundred: row.people_vaccinated_per_hundred,
        });
    }

    out
}

/// Forward-fill a single value, falling back to zero when there is nothing
/// to carry (start of a location's series).
fn carry(last: &mut Option<f64>, value: Option<f64>) -> f64 {
    match value {
        Some(v) => {
            *last = Some(v);
            v
        }
        None => last.unwrap_or(0.0),
    }
}
