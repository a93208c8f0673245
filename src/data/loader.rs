use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail, ensure};
use arrow::array::{Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::TelemetryLog;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a telemetry log from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row of column names, numeric cells (the format the
///                vehicle logger emits)
/// * `.json`    – records orientation: `[{ "t": 0.0, "v_vel": ..., ... }, ...]`
/// * `.parquet` – flat numeric columns, as written by pandas / polars
pub fn load_file(path: &Path) -> Result<TelemetryLog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Zip header-ordered columns into a [`TelemetryLog`].
fn into_log(names: Vec<String>, columns: Vec<Vec<f64>>) -> Result<TelemetryLog> {
    let map: BTreeMap<String, Vec<f64>> = names.iter().cloned().zip(columns).collect();
    TelemetryLog::from_columns(names, map)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every body cell numeric.
/// Boolean flags (`grounded`, `jump`) arrive as 0/1.
fn load_csv(path: &Path) -> Result<TelemetryLog> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, cell) in record.iter().enumerate() {
            let value: f64 = cell.trim().parse().with_context(|| {
                format!(
                    "Row {row_no}, '{}': '{cell}' is not a number",
                    headers[col_idx]
                )
            })?;
            columns[col_idx].push(value);
        }
    }

    into_log(headers, columns)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')` / `df.write_json()`):
///
/// ```json
/// [
///   { "t": 0.00, "altitude": 1.2, "v_vel": 0.0, "grounded": true },
///   { "t": 0.02, "altitude": 1.2, "v_vel": 0.1, "grounded": true }
/// ]
/// ```
///
/// The column set is the union of the record keys; a record missing one of
/// them is ragged input and rejected. Booleans are coerced to the logger's
/// 0/1 encoding.
fn load_json(path: &Path) -> Result<TelemetryLog> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for rec in records {
        if let Some(obj) = rec.as_object() {
            for key in obj.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
        }
    }

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for (col_idx, name) in names.iter().enumerate() {
            let val = obj
                .get(name)
                .with_context(|| format!("Row {i}: missing '{name}'"))?;
            let value = json_to_f64(val).with_context(|| format!("Row {i}, '{name}'"))?;
            columns[col_idx].push(value);
        }
    }

    into_log(names, columns)
}

fn json_to_f64(val: &JsonValue) -> Result<f64> {
    match val {
        JsonValue::Number(n) => n
            .as_f64()
            .with_context(|| format!("{n} is not representable as f64")),
        JsonValue::Bool(b) => Ok(*b as u8 as f64),
        other => bail!("{other} is not numeric"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing telemetry.
///
/// Expected schema: one flat numeric column per signal
/// (Float64 / Float32 / Int64 / Int32 / Boolean).  Works with files written
/// by both **pandas** (`df.to_parquet()`) and **polars**
/// (`df.write_parquet()`).  List columns are rejected.
fn load_parquet(path: &Path) -> Result<TelemetryLog> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    // Take the schema from the metadata so a file with no row groups still
    // yields its (empty) columns.
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    let reader = builder.build().context("building parquet reader")?;
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, name) in names.iter().enumerate() {
            let values = extract_f64_column(batch.column(col_idx))
                .with_context(|| format!("column '{name}'"))?;
            columns[col_idx].extend(values);
        }
    }

    into_log(names, columns)
}

// -- Parquet / Arrow helpers --

/// Read a whole scalar column as `f64`.  Telemetry stores every signal
/// numerically; list columns and null cells are structural errors.
fn extract_f64_column(col: &Arc<dyn Array>) -> Result<Vec<f64>> {
    ensure!(col.null_count() == 0, "column contains null cells");

    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.values().to_vec())
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(arr.values().iter().map(|&v| v as f64).collect())
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.values().iter().map(|&v| v as f64).collect())
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.values().iter().map(|&v| v as f64).collect())
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            Ok((0..arr.len()).map(|i| arr.value(i) as u8 as f64).collect())
        }
        other => bail!("unsupported column type {other:?}, expected a flat numeric column"),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use arrow::array::{BooleanArray, Float64Array};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("telemetry-triage-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_columns_parse_by_header_name() {
        let path = temp_path("basic.csv");
        fs::write(&path, "t,v_vel,grounded\n0.0,1.5,1\n0.02,2.0,0\n").unwrap();
        let log = load_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(log.len(), 2);
        assert_eq!(log.column_names(), ["t", "v_vel", "grounded"]);
        assert_eq!(log.column("v_vel").unwrap(), &[1.5, 2.0]);
        assert_eq!(log.column("grounded").unwrap(), &[1.0, 0.0]);
    }

    #[test]
    fn csv_bad_cell_error_names_row_and_column() {
        let path = temp_path("bad-cell.csv");
        fs::write(&path, "t,v_vel\n0.0,1.0\n0.02,fast\n").unwrap();
        let err = load_file(&path).unwrap_err();
        fs::remove_file(&path).ok();

        let msg = format!("{err:#}");
        assert!(msg.contains("v_vel"), "got: {msg}");
        assert!(msg.contains("fast"), "got: {msg}");
        assert!(msg.contains("Row 1"), "got: {msg}");
    }

    #[test]
    fn csv_header_only_loads_as_empty_log() {
        let path = temp_path("header-only.csv");
        fs::write(&path, "t,v_vel\n").unwrap();
        let log = load_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(log.is_empty());
        assert!(log.has_column("v_vel"));
    }

    #[test]
    fn json_records_coerce_booleans() {
        let path = temp_path("records.json");
        fs::write(
            &path,
            r#"[{"t": 0.0, "grounded": true}, {"t": 0.02, "grounded": false}]"#,
        )
        .unwrap();
        let log = load_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(log.column("t").unwrap(), &[0.0, 0.02]);
        assert_eq!(log.column("grounded").unwrap(), &[1.0, 0.0]);
    }

    #[test]
    fn json_ragged_records_rejected() {
        let path = temp_path("ragged.json");
        fs::write(&path, r#"[{"t": 0.0}, {"v_vel": 1.0}]"#).unwrap();
        let err = load_file(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(format!("{err:#}").contains("missing"));
    }

    #[test]
    fn unsupported_extension_rejected() {
        let path = temp_path("log.xlsx");
        fs::write(&path, "").unwrap();
        let err = load_file(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(err.to_string().contains("xlsx"));
    }

    #[test]
    fn parquet_flat_numeric_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("t", DataType::Float64, false),
            Field::new("grounded", DataType::Boolean, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![0.0, 0.02])),
                Arc::new(BooleanArray::from(vec![true, false])),
            ],
        )
        .unwrap();

        let path = temp_path("flat.parquet");
        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let log = load_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(log.len(), 2);
        assert_eq!(log.column("t").unwrap(), &[0.0, 0.02]);
        assert_eq!(log.column("grounded").unwrap(), &[1.0, 0.0]);
    }
}
