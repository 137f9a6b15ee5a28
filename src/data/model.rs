use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::error::DataError;

// ---------------------------------------------------------------------------
// Record – one (country, year) observation
// ---------------------------------------------------------------------------

/// A single country-year observation (one row of the source file).
///
/// The three metric columns are `Option<f64>`: a source cell that failed
/// numeric coercion is stored as `None` and skipped by range, positivity and
/// ranking logic, but the row itself is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country_name: String,
    /// Short ISO-style identifier, e.g. "FRA".
    pub country_code: String,
    pub year: i32,
    /// GDP per capita, USD.
    pub gdp: Option<f64>,
    /// Births per woman.
    pub fertility_rate: Option<f64>,
    /// Year-over-year GDP growth in percent, may be negative.
    pub gdp_percentage: Option<f64>,
}

impl Record {
    /// Absolute growth percentage, used only for bubble sizing in the
    /// scatter view. Never used for ranking or filtering.
    pub fn gdp_percentage_size(&self) -> Option<f64> {
        self.gdp_percentage.map(f64::abs)
    }
}

// ---------------------------------------------------------------------------
// Metric – the three selectable numeric columns
// ---------------------------------------------------------------------------

/// The selectable metrics offered by the dashboard dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    GdpPerCapita,
    FertilityRate,
    GdpPercentage,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::GdpPerCapita,
        Metric::FertilityRate,
        Metric::GdpPercentage,
    ];

    /// Display label, as shown in the selector.
    pub fn label(self) -> &'static str {
        match self {
            Metric::GdpPerCapita => "GDP per Capita",
            Metric::FertilityRate => "Fertility Rate",
            Metric::GdpPercentage => "GDP Percentage",
        }
    }

    /// Source column the metric reads from; also the column-name binding
    /// handed to the charting layer for the colour channel.
    pub fn column(self) -> &'static str {
        match self {
            Metric::GdpPerCapita => "GDP",
            Metric::FertilityRate => "Fertility Rate",
            Metric::GdpPercentage => "GDP Percentage",
        }
    }

    /// Value of this metric for one record.
    pub fn value_of(self, record: &Record) -> Option<f64> {
        match self {
            Metric::GdpPerCapita => record.gdp,
            Metric::FertilityRate => record.fertility_rate,
            Metric::GdpPercentage => record.gdp_percentage,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| DataError::configuration(s))
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full dataset: an ordered, immutable sequence of records plus a
/// pre-computed country index. Constructed once at load time and passed by
/// shared reference into every query call.
#[derive(Debug, Clone)]
pub struct Table {
    records: Vec<Record>,
    /// Sorted unique country names, for the multi-select widget.
    country_names: Vec<String>,
}

impl Table {
    /// Build the table and its country index. Insertion order of `records`
    /// is the source file order and is preserved for the table's lifetime.
    pub fn from_records(records: Vec<Record>) -> Self {
        let names: BTreeSet<&str> = records.iter().map(|r| r.country_name.as_str()).collect();
        let country_names = names.into_iter().map(str::to_owned).collect();
        Table {
            records,
            country_names,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn country_names(&self) -> &[String] {
        &self.country_names
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inclusive (min, max) over the year column, `None` on an empty table.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.records.iter().map(|r| r.year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, year: i32) -> Record {
        Record {
            country_name: name.to_string(),
            country_code: name[..3.min(name.len())].to_ascii_uppercase(),
            year,
            gdp: Some(1000.0),
            fertility_rate: Some(2.0),
            gdp_percentage: Some(-1.5),
        }
    }

    #[test]
    fn metric_parses_its_own_labels() {
        for metric in Metric::ALL {
            assert_eq!(metric.label().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn unknown_metric_is_a_configuration_error() {
        let err = "Life Expectancy".parse::<Metric>().unwrap_err();
        assert!(matches!(
            err,
            crate::data::error::DataError::Configuration { .. }
        ));
    }

    #[test]
    fn size_column_is_absolute() {
        let r = record("Chile", 2020);
        assert_eq!(r.gdp_percentage_size(), Some(1.5));
    }

    #[test]
    fn country_index_is_sorted_and_unique() {
        let table = Table::from_records(vec![
            record("Norway", 2014),
            record("Chad", 2014),
            record("Norway", 2015),
        ]);
        assert_eq!(table.country_names(), ["Chad", "Norway"]);
        assert_eq!(table.year_bounds(), Some((2014, 2015)));
    }
}
