//! Write snapshot JSON files.
//!
//! Snapshot JSON is the "portable" representation of the latest-by-country
//! table: run metadata plus one entry per retained country. The schema is
//! defined by `domain::SnapshotFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{CountrySnapshot, Observation, SnapshotFile};
use crate::error::AppError;

/// Write a snapshot JSON file from the latest-by-country rows.
pub fn write_snapshot_json(
    path: &Path,
    latest: &[Observation],
    window: usize,
) -> Result<(), AppError> {
    let Some(asof_date) = latest.iter().map(|o| o.date).max() else {
        return Err(AppError::export(
            "Cannot write snapshot JSON: no latest rows.",
        ));
    };

    let snapshot = SnapshotFile {
        tool: "covid-trends".to_string(),
        asof_date,
        window,
        countries: latest.iter().map(CountrySnapshot::from).collect(),
    };

    let file = File::create(path).map_err(|e| {
        AppError::export(format!(
            "Failed to create snapshot JSON '{}': {e}",
            path.display()
        ))
    })?;

    serde_json::to_writer_pretty(file, &snapshot)
        .map_err(|e| AppError::export(format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn empty_latest_rows_is_an_export_error() {
        let path = std::env::temp_dir().join("covid-trends-empty-snapshot.json");
        let err = write_snapshot_json(&path, &[], 7).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Export);
    }
}
