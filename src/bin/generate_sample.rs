use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;
use serde_json::{json, Value};

/// One output row, keyed like the production dataset.
#[derive(Serialize)]
struct Row {
    #[serde(rename = "Country Name")]
    country_name: &'static str,
    #[serde(rename = "Country Code")]
    country_code: &'static str,
    #[serde(rename = "Year")]
    year: i64,
    #[serde(rename = "GDP")]
    gdp: Option<f64>,
    #[serde(rename = "Fertility Rate")]
    fertility_rate: Option<f64>,
    #[serde(rename = "GDP Percentage")]
    gdp_percentage: Option<f64>,
}

/// (name, ISO3 code, 2014 GDP per capita, 2014 fertility rate)
const COUNTRIES: &[(&str, &str, f64, f64)] = &[
    ("Afghanistan", "AFG", 625.0, 5.3),
    ("Albania", "ALB", 4578.0, 1.7),
    ("Algeria", "DZA", 5466.0, 3.0),
    ("Argentina", "ARG", 12335.0, 2.3),
    ("Australia", "AUS", 62328.0, 1.8),
    ("Bangladesh", "BGD", 1109.0, 2.2),
    ("Brazil", "BRA", 12112.0, 1.8),
    ("Canada", "CAN", 50893.0, 1.6),
    ("Chad", "TCD", 1025.0, 6.3),
    ("Chile", "CHL", 14670.0, 1.8),
    ("China", "CHN", 7636.0, 1.7),
    ("Colombia", "COL", 8114.0, 1.9),
    ("Egypt", "EGY", 3328.0, 3.3),
    ("Ethiopia", "ETH", 567.0, 4.6),
    ("France", "FRA", 43011.0, 2.0),
    ("Germany", "DEU", 48024.0, 1.5),
    ("Ghana", "GHA", 1971.0, 4.0),
    ("India", "IND", 1574.0, 2.4),
    ("Indonesia", "IDN", 3492.0, 2.5),
    ("Italy", "ITA", 35560.0, 1.4),
    ("Japan", "JPN", 38109.0, 1.4),
    ("Kenya", "KEN", 1335.0, 4.0),
    ("Mexico", "MEX", 10581.0, 2.2),
    ("Monaco", "MCO", 185152.0, 1.2),
    ("Morocco", "MAR", 3190.0, 2.5),
    ("Netherlands", "NLD", 52830.0, 1.7),
    ("Niger", "NER", 427.0, 7.4),
    ("Nigeria", "NGA", 3099.0, 5.6),
    ("Norway", "NOR", 97019.0, 1.8),
    ("Pakistan", "PAK", 1251.0, 3.8),
    ("Peru", "PER", 6673.0, 2.4),
    ("Philippines", "PHL", 2959.0, 2.9),
    ("Poland", "POL", 14271.0, 1.3),
    ("South Africa", "ZAF", 6433.0, 2.5),
    ("South Korea", "KOR", 29250.0, 1.2),
    ("Spain", "ESP", 29462.0, 1.3),
    ("Sweden", "SWE", 60020.0, 1.9),
    ("Turkiye", "TUR", 12158.0, 2.1),
    ("United Kingdom", "GBR", 47425.0, 1.8),
    ("United States", "USA", 55050.0, 1.9),
];

const YEARS: std::ops::RangeInclusive<i64> = 2014..=2023;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(name, code, gdp_2014, fertility_2014) in COUNTRIES {
        let mut gdp = gdp_2014;
        let mut fertility = fertility_2014;
        for year in YEARS {
            let growth = rng.gauss(2.0, 2.5);
            gdp *= 1.0 + growth / 100.0;
            fertility = (fertility - 0.025 + rng.gauss(0.0, 0.04)).max(0.8);

            // Sprinkle missing cells so the null-tolerant paths show up in
            // the running app.
            let gdp_cell = (rng.next_f64() >= 0.03).then_some((gdp * 100.0).round() / 100.0);
            let fertility_cell =
                (rng.next_f64() >= 0.03).then_some((fertility * 100.0).round() / 100.0);
            let growth_cell = (rng.next_f64() >= 0.03).then_some((growth * 10.0).round() / 10.0);

            rows.push(Row {
                country_name: name,
                country_code: code,
                year,
                gdp: gdp_cell,
                fertility_rate: fertility_cell,
                gdp_percentage: growth_cell,
            });
        }
    }
    rows
}

/// Serialize the rows, turning a handful of missing GDP cells into the
/// literal `"N/A"` text that appears in real exports.
fn to_json(rows: &[Row], rng: &mut SimpleRng) -> Value {
    let values: Vec<Value> = rows
        .iter()
        .map(|row| {
            let mut value = serde_json::to_value(row).expect("Row serializes");
            if row.gdp.is_none() && rng.next_f64() < 0.5 {
                value["GDP"] = json!("N/A");
            }
            value
        })
        .collect();
    Value::Array(values)
}

fn write_parquet(rows: &[Row], path: &str) {
    let names = StringArray::from(rows.iter().map(|r| r.country_name).collect::<Vec<_>>());
    let codes = StringArray::from(rows.iter().map(|r| r.country_code).collect::<Vec<_>>());
    let years = Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>());
    let gdps = Float64Array::from(rows.iter().map(|r| r.gdp).collect::<Vec<_>>());
    let fertilities = Float64Array::from(rows.iter().map(|r| r.fertility_rate).collect::<Vec<_>>());
    let growths = Float64Array::from(rows.iter().map(|r| r.gdp_percentage).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("Country Name", DataType::Utf8, false),
        Field::new("Country Code", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("GDP", DataType::Float64, true),
        Field::new("Fertility Rate", DataType::Float64, true),
        Field::new("GDP Percentage", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(names),
            Arc::new(codes),
            Arc::new(years),
            Arc::new(gdps),
            Arc::new(fertilities),
            Arc::new(growths),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let json_path = "fertility_gdp_2014_2024.json";
    let json = to_json(&rows, &mut rng);
    let file = std::fs::File::create(json_path).expect("Failed to create output file");
    serde_json::to_writer_pretty(file, &json).expect("Failed to write JSON");

    let parquet_path = "fertility_gdp_2014_2024.parquet";
    write_parquet(&rows, parquet_path);

    println!(
        "Wrote {} records ({} countries, {}-{}) to {json_path} and {parquet_path}",
        rows.len(),
        COUNTRIES.len(),
        YEARS.start(),
        YEARS.end()
    );
}
