use std::collections::BTreeSet;

use crate::color::CountryColors;
use crate::data::model::{Metric, Table};

/// Countries preselected for the trend comparison on first launch.
const DEFAULT_COUNTRIES: [&str; 3] = ["Afghanistan", "Albania", "Algeria"];
/// Initial trend window.
const DEFAULT_TREND_YEARS: (i32, i32) = (2014, 2022);
/// Initial animation-frame year for the map and scatter sections.
const DEFAULT_FRAME_YEAR: i32 = 2023;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Current selector values plus the immutable base table. The table is
/// loaded once and only ever replaced wholesale (File → Open…); every chart
/// section re-queries it with these values each frame.
pub struct AppState {
    pub table: Table,

    /// Metric shown by the map section.
    pub metric: Metric,

    /// Countries compared in the trend section.
    pub selected_countries: BTreeSet<String>,

    /// Inclusive (min, max) year window for the trend section.
    pub trend_years: (i32, i32),

    /// Year rendered by the map and scatter sections.
    pub frame_year: i32,

    /// Country search input.
    pub search_text: String,

    /// Per-country series colours, rebuilt when the table changes.
    pub country_colors: CountryColors,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: Table) -> Self {
        let country_colors = CountryColors::new(table.country_names());
        let mut state = AppState {
            selected_countries: BTreeSet::new(),
            metric: Metric::GdpPerCapita,
            trend_years: DEFAULT_TREND_YEARS,
            frame_year: DEFAULT_FRAME_YEAR,
            search_text: String::new(),
            country_colors,
            status_message: None,
            table,
        };
        state.selected_countries = state.default_countries();
        state.clamp_years();
        state
    }

    /// Swap in a freshly loaded table, keeping whatever selections still
    /// apply to it.
    pub fn replace_table(&mut self, table: Table) {
        self.country_colors = CountryColors::new(table.country_names());
        self.table = table;
        let names = self.table.country_names().to_vec();
        self.selected_countries
            .retain(|c| names.binary_search(c).is_ok());
        if self.selected_countries.is_empty() {
            self.selected_countries = self.default_countries();
        }
        self.clamp_years();
        self.status_message = None;
    }

    fn default_countries(&self) -> BTreeSet<String> {
        let names = self.table.country_names();
        let defaults: BTreeSet<String> = DEFAULT_COUNTRIES
            .iter()
            .filter(|c| names.binary_search(&c.to_string()).is_ok())
            .map(|c| c.to_string())
            .collect();
        if !defaults.is_empty() {
            return defaults;
        }
        names.iter().take(3).cloned().collect()
    }

    /// Keep the year selectors inside the table's actual span.
    fn clamp_years(&mut self) {
        if let Some((lo, hi)) = self.table.year_bounds() {
            self.trend_years.0 = self.trend_years.0.clamp(lo, hi);
            self.trend_years.1 = self.trend_years.1.clamp(self.trend_years.0, hi);
            self.frame_year = self.frame_year.clamp(lo, hi);
        }
    }

    pub fn toggle_country(&mut self, country: &str) {
        if !self.selected_countries.remove(country) {
            self.selected_countries.insert(country.to_string());
        }
    }

    pub fn select_all_countries(&mut self) {
        self.selected_countries = self.table.country_names().iter().cloned().collect();
    }

    pub fn select_no_countries(&mut self) {
        self.selected_countries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn record(name: &str, year: i32) -> Record {
        Record {
            country_name: name.to_string(),
            country_code: name[..3.min(name.len())].to_ascii_uppercase(),
            year,
            gdp: Some(1000.0),
            fertility_rate: Some(2.0),
            gdp_percentage: Some(0.5),
        }
    }

    #[test]
    fn defaults_fall_back_to_first_countries_present() {
        let table = Table::from_records(vec![
            record("Uruguay", 2014),
            record("Vanuatu", 2015),
        ]);
        let state = AppState::new(table);
        assert_eq!(state.selected_countries.len(), 2);
        // Years clamp into the table's 2014–2015 span.
        assert_eq!(state.trend_years, (2014, 2015));
        assert_eq!(state.frame_year, 2015);
    }

    #[test]
    fn replacing_the_table_prunes_stale_selections() {
        let mut state = AppState::new(Table::from_records(vec![
            record("Albania", 2020),
            record("Uruguay", 2020),
        ]));
        state.toggle_country("Uruguay");
        assert!(state.selected_countries.contains("Uruguay"));

        state.replace_table(Table::from_records(vec![record("Albania", 2020)]));
        assert!(!state.selected_countries.contains("Uruguay"));
        assert!(state.selected_countries.contains("Albania"));
    }

    #[test]
    fn toggle_flips_membership() {
        let mut state = AppState::new(Table::from_records(vec![record("Albania", 2020)]));
        assert!(state.selected_countries.contains("Albania"));
        state.toggle_country("Albania");
        assert!(!state.selected_countries.contains("Albania"));
        state.toggle_country("Albania");
        assert!(state.selected_countries.contains("Albania"));
    }
}
