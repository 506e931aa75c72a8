//! Formatted terminal output for a pipeline run.
//!
//! We keep formatting code in one place so:
//! - the transform code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{Observation, RunConfig};

/// Latest rows ordered for the comparison table (most total cases first).
pub fn rank_by_total_cases(latest: &[Observation], top_n: usize) -> Vec<Observation> {
    let mut sorted = latest.to_vec();
    sorted.sort_by(|a, b| {
        b.total_cases
            .partial_cmp(&a.total_cases)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);
    sorted
}

/// Format the full run summary (dataset stats + filter results + the
/// latest-by-country comparison table).
pub fn format_run_summary(run: &RunOutput, config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str("=== covid-trends — OWID COVID-19 pipeline ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));
    out.push_str(&format!(
        "Rows: read={} used={} | locations={} | dates=[{} .. {}]\n",
        run.ingest.rows_read,
        run.ingest.rows_used,
        run.ingest.stats.n_locations,
        run.ingest.stats.date_min,
        run.ingest.stats.date_max,
    ));

    if !run.ingest.row_errors.is_empty() {
        out.push_str(&format!(
            "Row errors: {} (first: line {}: {})\n",
            run.ingest.row_errors.len(),
            run.ingest.row_errors[0].line,
            run.ingest.row_errors[0].message,
        ));
    }

    out.push_str(&format!(
        "Views: world={} rows | focus={} rows across {} countries\n",
        run.world.len(),
        run.processed.len(),
        run.latest.len(),
    ));

    if !run.missing_countries.is_empty() {
        out.push_str(&format!(
            "Not found in data: {}\n",
            run.missing_countries.join(", ")
        ));
    }

    out.push_str("\nLatest by country:\n");
    out.push_str(&format_latest_table(&rank_by_total_cases(
        &run.latest,
        config.top_n,
    )));

    out
}

fn format_latest_table(rows: &[Observation]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:>10} {:>14} {:>12} {:>10} {:>10}\n",
        "country", "date", "total_cases", "total_deaths", "death%", "vacc%"
    ));
    out.push_str(&format!(
        "{:-<20} {:-<10} {:-<14} {:-<12} {:-<10} {:-<10}\n",
        "", "", "", "", "", ""
    ));

    for r in rows {
        out.push_str(&format!(
            "{:<20} {:>10} {:>14} {:>12} {:>10.2} {:>10.2}\n",
            truncate(&r.location, 20),
            r.date.to_string(),
            r.total_cases,
            r.total_deaths,
            r.death_rate,
            r.vaccination_rate,
        ));
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(location: &str, total_cases: f64) -> Observation {
        Observation {
            location: location.to_string(),
            iso_code: Some("TST".to_string()),
            date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            population: Some(1000.0),
            total_cases,
            new_cases: 0.0,
            total_deaths: 1.0,
            new_deaths: 0.0,
            total_vaccinations: 0.0,
            people_vaccinated: 0.0,
            total_cases_per_million: None,
            total_deaths_per_million: None,
            people_vaccinated_per_hundred: None,
            death_rate: 1.0,
            vaccination_rate: 0.0,
            new_cases_smoothed: None,
            new_deaths_smoothed: None,
        }
    }

    #[test]
    fn rank_orders_by_total_cases_desc() {
        let latest = vec![obs("Aland", 10.0), obs("Testland", 100.0)];
        let ranked = rank_by_total_cases(&latest, 10);
        assert_eq!(ranked[0].location, "Testland");
        assert_eq!(ranked[1].location, "Aland");
    }

    #[test]
    fn rank_truncates_to_top_n() {
        let latest = vec![obs("A", 1.0), obs("B", 2.0), obs("C", 3.0)];
        let ranked = rank_by_total_cases(&latest, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].location, "C");
    }

    #[test]
    fn latest_table_contains_country_names() {
        let table = format_latest_table(&[obs("Testland", 5.0)]);
        assert!(table.contains("Testland"));
        assert!(table.contains("total_cases"));
    }
}
