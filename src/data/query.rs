use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::model::{Metric, Record, Table};

// ---------------------------------------------------------------------------
// View queries: pure functions over the immutable base table
// ---------------------------------------------------------------------------
//
// Each chart section calls one or more of these with the current selector
// values and renders the returned rows. All of them borrow from the table
// and preserve source order; an empty result is ordinary data, rendered by
// the UI as a "no data" label.

/// Direction of a year-slice ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Top,
    Bottom,
}

/// (min, max) of a metric over all non-null values, for the map colour
/// scale. `None` when the column holds no values at all.
pub fn metric_range(table: &Table, metric: Metric) -> Option<(f64, f64)> {
    let mut values = table.records().iter().filter_map(|r| metric.value_of(r));
    let first = values.next()?;
    Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Rows whose country is in `countries` and whose year falls in the
/// inclusive window, in source order.
pub fn window<'t>(
    table: &'t Table,
    countries: &BTreeSet<String>,
    years: RangeInclusive<i32>,
) -> Vec<&'t Record> {
    table
        .records()
        .iter()
        .filter(|r| countries.contains(&r.country_name) && years.contains(&r.year))
        .collect()
}

/// Rows where both fertility rate and GDP are present and strictly
/// positive. Keeps trend lines free of missing or degenerate points.
pub fn positive_only<'r>(rows: &[&'r Record]) -> Vec<&'r Record> {
    rows.iter()
        .filter(|r| r.fertility_rate.is_some_and(|v| v > 0.0) && r.gdp.is_some_and(|v| v > 0.0))
        .copied()
        .collect()
}

/// All rows of one year, in source order. The animation-frame slice shared
/// by the map and scatter sections.
pub fn year_slice(table: &Table, year: i32) -> Vec<&Record> {
    table.records().iter().filter(|r| r.year == year).collect()
}

/// The `n` rows with the largest (`Top`) or smallest (`Bottom`) value of
/// `metric` within `year`, excluding rows where the metric is missing or
/// non-positive. Ties keep source order (first-encountered wins), so the
/// ranking is deterministic across runs.
pub fn rank_year(
    table: &Table,
    metric: Metric,
    year: i32,
    direction: Direction,
    n: usize,
) -> Vec<&Record> {
    let mut rows: Vec<&Record> = table
        .records()
        .iter()
        .filter(|r| r.year == year && metric.value_of(r).is_some_and(|v| v > 0.0))
        .collect();

    // All survivors have a value; NAN stands in only for the unreachable
    // None arm and sorts last either way.
    let key = |r: &Record| metric.value_of(r).unwrap_or(f64::NAN);
    match direction {
        Direction::Top => rows.sort_by(|a, b| key(b).total_cmp(&key(a))),
        Direction::Bottom => rows.sort_by(|a, b| key(a).total_cmp(&key(b))),
    }
    rows.truncate(n);
    rows
}

/// Case-insensitive substring search over country names. An empty or
/// whitespace-only needle yields no results, not the full table.
pub fn search_country<'t>(table: &'t Table, needle: &str) -> Vec<&'t Record> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    table
        .records()
        .iter()
        .filter(|r| r.country_name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, year: i32, gdp: Option<f64>, fertility: Option<f64>) -> Record {
        Record {
            country_name: name.to_string(),
            country_code: name[..3.min(name.len())].to_ascii_uppercase(),
            year,
            gdp,
            fertility_rate: fertility,
            gdp_percentage: Some(1.0),
        }
    }

    fn sample_table() -> Table {
        Table::from_records(vec![
            record("France", 2019, Some(40494.9), Some(1.86)),
            record("France", 2020, Some(39030.4), Some(1.79)),
            record("Togo", 2019, None, Some(4.3)),
            record("Togo", 2020, Some(915.0), Some(4.2)),
            record("Niger", 2020, Some(595.0), None),
        ])
    }

    #[test]
    fn metric_range_skips_nulls() {
        let table = sample_table();
        assert_eq!(
            metric_range(&table, Metric::GdpPerCapita),
            Some((595.0, 40494.9))
        );
    }

    #[test]
    fn metric_range_is_none_when_all_null() {
        let table = Table::from_records(vec![record("Togo", 2019, None, None)]);
        assert_eq!(metric_range(&table, Metric::GdpPerCapita), None);
        assert_eq!(metric_range(&table, Metric::FertilityRate), None);
    }

    #[test]
    fn window_is_a_subset_preserving_order() {
        let table = sample_table();
        let countries: BTreeSet<String> =
            ["France", "Togo"].into_iter().map(String::from).collect();
        let rows = window(&table, &countries, 2019..=2019);
        let names: Vec<&str> = rows.iter().map(|r| r.country_name.as_str()).collect();
        assert_eq!(names, ["France", "Togo"]);
        assert!(rows
            .iter()
            .all(|r| countries.contains(&r.country_name) && r.year == 2019));
    }

    #[test]
    fn window_keeps_null_metric_rows() {
        let table = sample_table();
        let countries: BTreeSet<String> = [String::from("Togo")].into();
        let rows = window(&table, &countries, 2019..=2020);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].gdp, None);
    }

    #[test]
    fn positivity_filter_drops_missing_and_is_a_fixpoint() {
        let table = sample_table();
        let all: Vec<&Record> = table.records().iter().collect();
        let positive = positive_only(&all);
        // Togo 2019 (no GDP) and Niger 2020 (no fertility) drop out.
        assert_eq!(positive.len(), 3);
        assert_eq!(positive_only(&positive), positive);
    }

    #[test]
    fn top_and_bottom_one_by_gdp() {
        let table = Table::from_records(vec![
            record("Chad", 2023, Some(700.0), Some(6.1)),
            record("Monaco", 2023, Some(190000.0), Some(1.2)),
        ]);
        let top = rank_year(&table, Metric::GdpPerCapita, 2023, Direction::Top, 1);
        assert_eq!(top[0].country_name, "Monaco");
        let bottom = rank_year(&table, Metric::GdpPerCapita, 2023, Direction::Bottom, 1);
        assert_eq!(bottom[0].country_name, "Chad");
    }

    #[test]
    fn rank_returns_exactly_n_sorted_rows() {
        let gdps = [3.0, 11.0, 7.0, 2.0, 13.0, 5.0, 17.0, 1.0, 19.0, 23.0, 29.0, 31.0];
        let records: Vec<Record> = gdps
            .iter()
            .enumerate()
            .map(|(i, &g)| record(&format!("Country {i}"), 2023, Some(g), Some(2.0)))
            .collect();
        let table = Table::from_records(records);

        let top = rank_year(&table, Metric::GdpPerCapita, 2023, Direction::Top, 10);
        assert_eq!(top.len(), 10);
        let values: Vec<f64> = top.iter().filter_map(|r| r.gdp).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(values[0], 31.0);

        let bottom = rank_year(&table, Metric::GdpPerCapita, 2023, Direction::Bottom, 10);
        let values: Vec<f64> = bottom.iter().filter_map(|r| r.gdp).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values[0], 1.0);
    }

    #[test]
    fn rank_excludes_missing_and_non_positive_and_other_years() {
        let table = Table::from_records(vec![
            record("A", 2023, Some(5.0), Some(2.0)),
            record("B", 2023, None, Some(2.0)),
            record("C", 2023, Some(0.0), Some(2.0)),
            record("D", 2022, Some(9.0), Some(2.0)),
        ]);
        let top = rank_year(&table, Metric::GdpPerCapita, 2023, Direction::Top, 10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].country_name, "A");
    }

    #[test]
    fn rank_ties_keep_source_order_and_repeat_identically() {
        let table = Table::from_records(vec![
            record("First", 2023, Some(10.0), Some(2.0)),
            record("Second", 2023, Some(10.0), Some(2.0)),
            record("Third", 2023, Some(10.0), Some(2.0)),
        ]);
        let once = rank_year(&table, Metric::GdpPerCapita, 2023, Direction::Top, 2);
        let names: Vec<&str> = once.iter().map(|r| r.country_name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);

        let twice = rank_year(&table, Metric::GdpPerCapita, 2023, Direction::Top, 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn search_is_case_insensitive() {
        let table = sample_table();
        let lower = search_country(&table, "france");
        let upper = search_country(&table, "FRANCE");
        assert_eq!(lower, upper);
        assert_eq!(lower.len(), 2);
    }

    #[test]
    fn empty_search_returns_nothing() {
        let table = sample_table();
        assert!(search_country(&table, "").is_empty());
        assert!(search_country(&table, "   ").is_empty());
    }

    #[test]
    fn substring_search_matches_partial_names() {
        let table = sample_table();
        let hits = search_country(&table, "og");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|r| r.country_name == "Togo"));
    }
}
