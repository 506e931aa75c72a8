//! Derived metric computation.
//!
//! Appends four computed columns to the cleaned table:
//!
//! - `death_rate`: total_deaths / total_cases × 100, guarded to 0 when
//!   total_cases == 0 (a zero-case row with nonzero deaths is a data
//!   anomaly, not an error)
//! - `vaccination_rate`: people_vaccinated / population × 100, guarded to 0
//!   when population is 0 or missing
//! - `new_cases_smoothed` / `new_deaths_smoothed`: trailing windowed mean
//!   per location; `None` until the location has a full window, rather than
//!   a partial-window average
//!
//! The pass is a pure function of the cleaned counters plus population, so
//! recomputing it over the same input yields identical columns.

use crate::domain::{CleanRow, Observation};

/// Compute derived columns over a cleaned, (location, date)-ordered table.
pub fn enrich(rows: &[CleanRow], window: usize) -> Vec<Observation> {
    let mut out = Vec::with_capacity(rows.len());

    let mut smoother_cases = TrailingMean::new(window);
    let mut smoother_deaths = TrailingMean::new(window);
    let mut current: Option<&str> = None;

    for row in rows {
        if current != Some(row.location.as_str()) {
            current = Some(row.location.as_str());
            smoother_cases.reset();
            smoother_deaths.reset();
        }

        let death_rate = ratio_pct(row.total_deaths, row.total_cases);
        let vaccination_rate = ratio_pct(row.people_vaccinated, row.population.unwrap_or(0.0));

        out.push(Observation {
            location: row.location.clone(),
            iso_code: row.iso_code.clone(),
            date: row.date,
            population: row.population,
            total_cases: row.total_cases,
            new_cases: row.new_cases,
            total_deaths: row.total_deaths,
            new_deaths: row.new_deaths,
            total_vaccinations: row.total_vaccinations,
            people_vaccinated: row.people_vaccinated,
            total_cases_per_million: row.total_cases_per_million,
            total_deaths_per_million: row.total_deaths_per_million,
            people_vaccinated_per_hundred: row.people_vaccinated_per_hundred,
            death_rate,
            vaccination_rate,
            new_cases_smoothed: smoother_cases.push(row.new_cases),
            new_deaths_smoothed: smoother_deaths.push(row.new_deaths),
        });
    }

    out
}

/// numerator / denominator × 100 with an explicit divide-by-zero guard.
///
/// The ratio is passed through raw otherwise; values above 100 are possible
/// on anomalous rows and deliberately not clamped.
fn ratio_pct(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Trailing fixed-window arithmetic mean over a single series.
///
/// Yields `None` until `window` values have been pushed since the last
/// reset, then the mean of the most recent `window` values.
struct TrailingMean {
    window: usize,
    values: Vec<f64>,
    sum: f64,
    next: usize,
    filled: usize,
}

impl TrailingMean {
    fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            values: Vec::new(),
            sum: 0.0,
            next: 0,
            filled: 0,
        }
    }

    fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
        self.next = 0;
        self.filled = 0;
    }

    fn push(&mut self, value: f64) -> Option<f64> {
        if self.filled < self.window {
            self.values.push(value);
            self.sum += value;
            self.filled += 1;
        } else {
            self.sum += value - self.values[self.next];
            self.values[self.next] = value;
            self.next = (self.next + 1) % self.window;
        }

        if self.filled < self.window {
            None
        } else {
            Some(self.sum / self.window as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(location: &str, day: u32, new_cases: f64, new_deaths: f64) -> CleanRow {
        CleanRow {
            location: location.to_string(),
            iso_code: Some("TST".to_string()),
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            population: Some(1000.0),
            total_cases: 100.0,
            new_cases,
            total_deaths: 2.0,
            new_deaths,
            total_vaccinations: 0.0,
            people_vaccinated: 0.0,
            total_cases_per_million: None,
            total_deaths_per_million: None,
            people_vaccinated_per_hundred: None,
        }
    }

    #[test]
    fn death_rate_guards_zero_cases() {
        let mut anomaly = row("Testland", 1, 0.0, 0.0);
        anomaly.total_cases = 0.0;
        anomaly.total_deaths = 5.0;
        let obs = enrich(&[anomaly], 7);
        assert_eq!(obs[0].death_rate, 0.0);
    }

    #[test]
    fn death_rate_is_raw_percentage() {
        let mut r = row("Testland", 1, 0.0, 0.0);
        r.total_cases = 200.0;
        r.total_deaths = 5.0;
        let obs = enrich(&[r], 7);
        assert!((obs[0].death_rate - 2.5).abs() < 1e-12);
    }

    #[test]
    fn vaccination_rate_guards_missing_population() {
        let mut r = row("Testland", 1, 0.0, 0.0);
        r.population = None;
        r.people_vaccinated = 800.0;
        let obs = enrich(&[r], 7);
        assert_eq!(obs[0].vaccination_rate, 0.0);

        let mut r = row("Testland", 1, 0.0, 0.0);
        r.people_vaccinated = 800.0;
        let obs = enrich(&[r], 7);
        assert!((obs[0].vaccination_rate - 80.0).abs() < 1e-12);
    }

    #[test]
    fn smoothed_is_none_until_full_window() {
        let rows: Vec<CleanRow> = (1..=10)
            .map(|d| row("Testland", d, d as f64, 0.0))
            .collect();
        let obs = enrich(&rows, 7);

        for o in &obs[..6] {
            assert!(o.new_cases_smoothed.is_none());
        }
        // Row 7: mean of new_cases for rows 1-7 = (1+..+7)/7 = 4.
        assert!((obs[6].new_cases_smoothed.unwrap() - 4.0).abs() < 1e-12);
        // Row 8: mean of rows 2-8 = 5.
        assert!((obs[7].new_cases_smoothed.unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn window_resets_between_locations() {
        let mut rows: Vec<CleanRow> = (1..=7).map(|d| row("Aland", d, 1.0, 0.0)).collect();
        rows.extend((1..=7).map(|d| row("Testland", d, 2.0, 0.0)));
        let obs = enrich(&rows, 7);

        assert!(obs[6].new_cases_smoothed.is_some());
        // First 6 rows of the second location are back to None.
        for o in &obs[7..13] {
            assert!(o.new_cases_smoothed.is_none());
        }
        assert!((obs[13].new_cases_smoothed.unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn enrich_is_idempotent() {
        let rows: Vec<CleanRow> = (1..=20)
            .map(|d| row("Testland", d, (d * 3 % 11) as f64, (d % 4) as f64))
            .collect();
        let first = enrich(&rows, 7);
        let second = enrich(&rows, 7);

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.death_rate.to_bits(), b.death_rate.to_bits());
            assert_eq!(a.vaccination_rate.to_bits(), b.vaccination_rate.to_bits());
            assert_eq!(
                a.new_cases_smoothed.map(f64::to_bits),
                b.new_cases_smoothed.map(f64::to_bits)
            );
            assert_eq!(
                a.new_deaths_smoothed.map(f64::to_bits),
                b.new_deaths_smoothed.map(f64::to_bits)
            );
        }
    }
}
