//! Latest-snapshot aggregation.
//!
//! For each location, select the single observation with the maximum date.
//! Input order is (location, date ascending), so this reduces to taking the
//! last row of every location run. Duplicate max dates cannot occur once
//! ingest has enforced (location, date) uniqueness.

use crate::domain::Observation;

/// One row per location: the most recent observation.
pub fn latest_by_location(rows: &[Observation]) -> Vec<Observation> {
    let mut out: Vec<Observation> = Vec::new();

    for row in rows {
        match out.last_mut() {
            Some(last) if last.location == row.location => *last = row.clone(),
            _ => out.push(row.clone()),
        }
    }

    out
}
