//! Shared pipeline logic used by both `run` and `summary`.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> filter -> clean -> enrich -> latest snapshot
//!
//! The subcommands can then focus on presentation (exports vs printing).

use crate::domain::{Observation, RawRow, RunConfig};
use crate::error::{AppError, ErrorKind};
use crate::io::ingest::IngestedData;
use crate::transform;

/// All computed outputs of a single pipeline run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    /// The full table, kept for world-map consumers.
    pub world: Vec<RawRow>,
    /// Configured countries absent from the raw data.
    pub missing_countries: Vec<String>,
    /// Cleaned and enriched focus table.
    pub processed: Vec<Observation>,
    /// Latest snapshot per focus country.
    pub latest: Vec<Observation>,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_pipeline(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) Load and validate the raw CSV.
    let ingest = crate::io::load_rows(&config.input)?;

    run_pipeline_with_data(config, ingest)
}

/// Execute the pipeline with pre-loaded data.
///
/// This is useful for tests and for callers that already hold the parsed
/// table (e.g. re-running with a different country list).
pub fn run_pipeline_with_data(
    config: &RunConfig,
    ingest: IngestedData,
) -> Result<RunOutput, AppError> {
    // 2) Remove aggregates and select the focus countries.
    let views = transform::split_views(&ingest.rows, &config.excluded, &config.countries);
    if views.focus.is_empty() {
        return Err(AppError::new(
            ErrorKind::Empty,
            "No focus-country rows remain after filtering.",
        ));
    }

    // 3) Fill gaps in the counter columns.
    let cleaned = transform::clean(&views.focus);

    // 4) Compute derived columns.
    let processed = transform::enrich(&cleaned, config.window);

    // 5) Latest snapshot per country for the comparison table.
    let latest = transform::latest_by_location(&processed);

    Ok(RunOutput {
        ingest,
        world: views.world,
        missing_countries: views.missing,
        processed,
        latest,
    })
}
