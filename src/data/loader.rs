use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{Record, Table};

/// Column names of the source schema.
const COL_NAME: &str = "Country Name";
const COL_CODE: &str = "Country Code";
const COL_YEAR: &str = "Year";
const COL_GDP: &str = "GDP";
const COL_FERTILITY: &str = "Fertility Rate";
const COL_GROWTH: &str = "GDP Percentage";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the country-year table from a file. Dispatch by extension.
///
/// Supported formats, all encoding the same logical schema:
/// * `.json`    – `[{ "Country Name": ..., "Year": ..., "GDP": ... }, ...]`
/// * `.csv`     – header row with the same column names
/// * `.parquet` – flat columns with the same names
///
/// Coercion rules: `Year` must be integer-coercible in every record or the
/// whole load fails (no partial tables). The three metric columns are
/// lenient: an uncoercible cell loads as `None`. Source record order is
/// preserved.
pub fn load_file(path: &Path) -> Result<Table, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::malformed(format!(
            "unsupported file extension .{other} ({})",
            path.display()
        ))),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the canonical source format:
///
/// ```json
/// [
///   {
///     "Country Name": "France",
///     "Country Code": "FRA",
///     "Year": 2019,
///     "GDP": 40494.9,
///     "Fertility Rate": 1.86,
///     "GDP Percentage": 1.8
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table, DataError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DataError::malformed(format!("reading {}: {e}", path.display())))?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| DataError::malformed(format!("parsing {}: {e}", path.display())))?;
    parse_json_records(&root).map(Table::from_records)
}

fn parse_json_records(root: &JsonValue) -> Result<Vec<Record>, DataError> {
    let rows = root
        .as_array()
        .ok_or_else(|| DataError::malformed("expected a top-level JSON array of records"))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DataError::malformed(format!("row {i} is not a JSON object")))?;

        records.push(Record {
            country_name: json_string(obj.get(COL_NAME)),
            country_code: json_string(obj.get(COL_CODE)),
            year: json_year(obj.get(COL_YEAR), i)?,
            gdp: json_metric(obj.get(COL_GDP)),
            fertility_rate: json_metric(obj.get(COL_FERTILITY)),
            gdp_percentage: json_metric(obj.get(COL_GROWTH)),
        });
    }
    Ok(records)
}

fn json_string(val: Option<&JsonValue>) -> String {
    match val {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Strict: every record's year must coerce to an integer.
fn json_year(val: Option<&JsonValue>, row: usize) -> Result<i32, DataError> {
    let parsed = match val {
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Some(JsonValue::String(s)) => parse_year_text(s),
        _ => None,
    };
    parsed.map(|y| y as i32).ok_or_else(|| {
        DataError::malformed(format!(
            "row {row}: year {:?} is not integer-coercible",
            val.unwrap_or(&JsonValue::Null)
        ))
    })
}

/// Lenient: numbers and numeric strings pass through, everything else
/// (missing, null, `"N/A"`, NaN-producing text) loads as `None`.
fn json_metric(val: Option<&JsonValue>) -> Option<f64> {
    match val {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => parse_metric_text(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Text coercion shared by the CSV and parquet loaders
// ---------------------------------------------------------------------------

fn parse_year_text(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
}

fn parse_metric_text(s: &str) -> Option<f64> {
    // "NaN" parses as f64::NAN; a NaN cell behaves like a missing one.
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV with a header row carrying the same column names as the JSON keys.
fn load_csv(path: &Path) -> Result<Table, DataError> {
    let reader = csv::Reader::from_path(path)
        .map_err(|e| DataError::malformed(format!("opening {}: {e}", path.display())))?;
    parse_csv(reader).map(Table::from_records)
}

fn parse_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Record>, DataError> {
    let headers = reader
        .headers()
        .map_err(|e| DataError::malformed(format!("reading CSV headers: {e}")))?
        .clone();

    let col = |name: &str| -> Result<usize, DataError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::malformed(format!("CSV missing {name:?} column")))
    };
    let name_idx = col(COL_NAME)?;
    let code_idx = col(COL_CODE)?;
    let year_idx = col(COL_YEAR)?;
    let gdp_idx = col(COL_GDP)?;
    let fertility_idx = col(COL_FERTILITY)?;
    let growth_idx = col(COL_GROWTH)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.map_err(|e| DataError::malformed(format!("CSV row {row_no}: {e}")))?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let year = parse_year_text(cell(year_idx)).ok_or_else(|| {
            DataError::malformed(format!(
                "CSV row {row_no}: year {:?} is not integer-coercible",
                cell(year_idx)
            ))
        })?;

        records.push(Record {
            country_name: cell(name_idx).to_string(),
            country_code: cell(code_idx).to_string(),
            year: year as i32,
            gdp: parse_metric_text(cell(gdp_idx)),
            fertility_rate: parse_metric_text(cell(fertility_idx)),
            gdp_percentage: parse_metric_text(cell(growth_idx)),
        });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Parquet with flat columns named like the JSON keys. Numeric columns may
/// arrive as Float64/Float32/Int64/Int32 or as Utf8 (spreadsheet exports
/// often stringify), in which case cells are coerced like JSON values.
fn load_parquet(path: &Path) -> Result<Table, DataError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DataError::malformed(format!("opening {}: {e}", path.display())))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataError::malformed(format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| DataError::malformed(format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch =
            batch_result.map_err(|e| DataError::malformed(format!("reading record batch: {e}")))?;
        let schema = batch.schema();

        let col = |name: &str| -> Result<Arc<dyn Array>, DataError> {
            schema
                .index_of(name)
                .map(|i| batch.column(i).clone())
                .map_err(|_| DataError::malformed(format!("parquet missing {name:?} column")))
        };
        let names = col(COL_NAME)?;
        let codes = col(COL_CODE)?;
        let years = col(COL_YEAR)?;
        let gdps = col(COL_GDP)?;
        let fertilities = col(COL_FERTILITY)?;
        let growths = col(COL_GROWTH)?;

        let base = records.len();
        for row in 0..batch.num_rows() {
            records.push(Record {
                country_name: cell_string(&names, row),
                country_code: cell_string(&codes, row),
                year: cell_year(&years, row, base + row)?,
                gdp: cell_metric(&gdps, row),
                fertility_rate: cell_metric(&fertilities, row),
                gdp_percentage: cell_metric(&growths, row),
            });
        }
    }
    Ok(Table::from_records(records))
}

// -- Arrow column helpers --

fn cell_string(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        _ => String::new(),
    }
}

fn cell_year(col: &Arc<dyn Array>, row: usize, record_no: usize) -> Result<i32, DataError> {
    let parsed = if col.is_null(row) {
        None
    } else {
        match col.data_type() {
            DataType::Int64 => col
                .as_any()
                .downcast_ref::<Int64Array>()
                .map(|a| a.value(row)),
            DataType::Int32 => col
                .as_any()
                .downcast_ref::<Int32Array>()
                .map(|a| a.value(row) as i64),
            DataType::Float64 => col
                .as_any()
                .downcast_ref::<Float64Array>()
                .map(|a| a.value(row))
                .filter(|f| f.is_finite())
                .map(|f| f as i64),
            DataType::Utf8 => parse_year_text(col.as_string::<i32>().value(row)),
            DataType::LargeUtf8 => parse_year_text(col.as_string::<i64>().value(row)),
            _ => None,
        }
    };
    parsed.map(|y| y as i32).ok_or_else(|| {
        DataError::malformed(format!("row {record_no}: year is not integer-coercible"))
    })
}

fn cell_metric(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Utf8 => parse_metric_text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => parse_metric_text(col.as_string::<i64>().value(row)),
        _ => None,
    }
    .filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write as _;

    #[test]
    fn json_records_load_in_source_order() {
        let root = json!([
            {"Country Name": "Chad", "Country Code": "TCD", "Year": 2023,
             "GDP": 700.0, "Fertility Rate": 6.1, "GDP Percentage": 2.0},
            {"Country Name": "Monaco", "Country Code": "MCO", "Year": 2023,
             "GDP": 190000.0, "Fertility Rate": 1.2, "GDP Percentage": -0.5},
        ]);
        let records = parse_json_records(&root).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country_name, "Chad");
        assert_eq!(records[1].country_name, "Monaco");
        assert_eq!(records[1].gdp, Some(190000.0));
        assert_eq!(records[1].gdp_percentage, Some(-0.5));
    }

    #[test]
    fn non_numeric_metric_text_loads_as_none() {
        let root = json!([
            {"Country Name": "Eritrea", "Country Code": "ERI", "Year": 2020,
             "GDP": "N/A", "Fertility Rate": "", "GDP Percentage": null},
        ]);
        let records = parse_json_records(&root).unwrap();
        assert_eq!(records[0].gdp, None);
        assert_eq!(records[0].fertility_rate, None);
        assert_eq!(records[0].gdp_percentage, None);
    }

    #[test]
    fn numeric_strings_and_integral_floats_coerce() {
        let root = json!([
            {"Country Name": "Peru", "Country Code": "PER", "Year": "2018",
             "GDP": "6958.3", "Fertility Rate": 2.2, "GDP Percentage": "4.0"},
            {"Country Name": "Peru", "Country Code": "PER", "Year": 2019.0,
             "GDP": 7000, "Fertility Rate": null, "GDP Percentage": "NaN"},
        ]);
        let records = parse_json_records(&root).unwrap();
        assert_eq!(records[0].year, 2018);
        assert_eq!(records[0].gdp, Some(6958.3));
        assert_eq!(records[1].year, 2019);
        assert_eq!(records[1].gdp, Some(7000.0));
        // NaN text behaves like a missing cell.
        assert_eq!(records[1].gdp_percentage, None);
    }

    #[test]
    fn uncoercible_year_fails_the_whole_load() {
        let root = json!([
            {"Country Name": "Peru", "Country Code": "PER", "Year": 2018,
             "GDP": 6958.3, "Fertility Rate": 2.2, "GDP Percentage": 4.0},
            {"Country Name": "Peru", "Country Code": "PER", "Year": "unknown",
             "GDP": 7000.0, "Fertility Rate": 2.1, "GDP Percentage": 3.0},
        ]);
        let err = parse_json_records(&root).unwrap_err();
        assert!(matches!(err, DataError::MalformedInput { .. }));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn csv_round_trips_the_same_schema() {
        let csv_text = "\
Country Name,Country Code,Year,GDP,Fertility Rate,GDP Percentage
France,FRA,2019,40494.9,1.86,1.8
France,FRA,2020,39030.4,1.79,
Togo,TGO,2019,N/A,4.3,-0.2
";
        let reader = csv::Reader::from_reader(csv_text.as_bytes());
        let records = parse_csv(reader).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].gdp_percentage, None);
        assert_eq!(records[2].gdp, None);
        assert_eq!(records[2].gdp_percentage, Some(-0.2));
    }

    #[test]
    fn csv_missing_column_is_malformed() {
        let csv_text = "Country Name,Year\nFrance,2019\n";
        let reader = csv::Reader::from_reader(csv_text.as_bytes());
        let err = parse_csv(reader).unwrap_err();
        assert!(err.to_string().contains("Country Code"));
    }

    #[test]
    fn load_file_reads_json_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[{{"Country Name": "Nauru", "Country Code": "NRU", "Year": 2021,
                 "GDP": 10125.0, "Fertility Rate": 3.4, "GDP Percentage": 1.2}}]"#
        )
        .unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].country_code, "NRU");
    }

    #[test]
    fn absent_file_is_malformed() {
        let err = load_file(Path::new("no/such/file.json")).unwrap_err();
        assert!(matches!(err, DataError::MalformedInput { .. }));
    }

    #[test]
    fn unsupported_extension_is_malformed() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
