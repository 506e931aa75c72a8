//! Location filtering: aggregate removal and focus-country selection.
//!
//! Aggregate pseudo-locations ("World", "European Union", "International")
//! are removed before any country selection so they can never leak into
//! comparisons. The full unfiltered table survives as the `world` view for
//! map-style consumers, which drop rows without an ISO code on their own;
//! the `focus` view keeps only the configured countries.

use crate::domain::RawRow;

/// The two views produced by the filter stage.
#[derive(Debug, Clone)]
pub struct FilteredData {
    /// The full table, retained for world-map consumers.
    pub world: Vec<RawRow>,
    /// Only the configured focus countries, for detailed analysis.
    pub focus: Vec<RawRow>,
    /// Configured countries that never appeared in the raw data.
    ///
    /// Silently omitted from `focus` by contract; surfaced in the run
    /// summary so a typo in a country name is still visible.
    pub missing: Vec<String>,
}

/// Split the raw table into world and focus views.
pub fn split_views(rows: &[RawRow], excluded: &[String], countries: &[String]) -> FilteredData {
    let world = rows.to_vec();

    let focus: Vec<RawRow> = rows
        .iter()
        .filter(|r| !is_excluded(&r.location, excluded))
        .filter(|r| countries.iter().any(|c| c == &r.location))
        .cloned()
        .collect();

    let missing = countries
        .iter()
        .filter(|c| !focus.iter().any(|r| r.location == c.as_str()))
        .cloned()
        .collect();

    FilteredData {
        world,
        focus,
        missing,
    }
}

/// Rows usable for choropleth mapping: locations that carry an ISO code
/// (regions without one cannot be joined to map geometry).
pub fn mappable(world: &[RawRow]) -> Vec<&RawRow> {
    world.iter().filter(|r| r.iso_code.is_some()).collect()
}

fn is_excluded(location: &str, excluded: &[String]) -> bool {
    excluded.iter().any(|e| e == location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(location: &str, iso: Option<&str>) -> RawRow {
        RawRow {
            location: location.to_string(),
            iso_code: iso.map(str::to_string),
            date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            population: Some(1000.0),
            total_cases: Some(10.0),
            new_cases: Some(1.0),
            total_deaths: Some(0.0),
            new_deaths: Some(0.0),
            total_vaccinations: None,
            people_vaccinated: None,
            total_cases_per_million: None,
            total_deaths_per_million: None,
            people_vaccinated_per_hundred: None,
        }
    }

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn aggregates_never_reach_focus_but_stay_in_world() {
        let rows = vec![
            row("World", Some("OWID_WRL")),
            row("European Union", None),
            row("France", Some("FRA")),
            row("Brazil", Some("BRA")),
        ];
        // Even a country list that names an aggregate cannot pull it into
        // focus: exclusion runs first.
        let views = split_views(
            &rows,
            &strings(&["World", "European Union"]),
            &strings(&["France", "World"]),
        );

        assert_eq!(views.focus.len(), 1);
        assert_eq!(views.focus[0].location, "France");

        assert_eq!(views.world.len(), 4);
        assert!(views.world.iter().any(|r| r.location == "World"));
    }

    #[test]
    fn absent_focus_country_is_silently_omitted_but_reported() {
        let rows = vec![row("France", Some("FRA"))];
        let views = split_views(&rows, &[], &strings(&["France", "Atlantis"]));
        assert_eq!(views.focus.len(), 1);
        assert_eq!(views.missing, vec!["Atlantis".to_string()]);
    }

    #[test]
    fn mappable_requires_iso_code() {
        let rows = vec![
            row("European Union", None),
            row("France", Some("FRA")),
            row("World", Some("OWID_WRL")),
        ];
        let views = split_views(&rows, &[], &[]);
        let map_rows = mappable(&views.world);
        assert_eq!(map_rows.len(), 2);
        assert!(map_rows.iter().all(|r| r.iso_code.is_some()));
    }
}
