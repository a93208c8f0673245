use std::collections::BTreeMap;

use anyhow::{Context, Result, ensure};

/// Standard gravity in m/s², used to derive vehicle weight from mass.
pub const GRAVITY: f64 = 9.81;

// ---------------------------------------------------------------------------
// TelemetryLog – the complete loaded log
// ---------------------------------------------------------------------------

/// A telemetry log: one column of `f64` cells per recorded signal, all
/// columns row-aligned. Rows are samples in file order; `t` is expected to
/// ascend but nothing here relies on it.
///
/// Boolean signals (`grounded`, `jump`) are stored numerically as 0/1, the
/// way the vehicle logger writes them. A negative `altitude` is the logger's
/// sentinel for "no ground raycast hit".
#[derive(Debug, Clone)]
pub struct TelemetryLog {
    /// Column names in the order the file header gave them.
    column_names: Vec<String>,
    /// Column-major cells, keyed by column name.
    columns: BTreeMap<String, Vec<f64>>,
    /// Number of rows (identical for every column).
    len: usize,
}

impl TelemetryLog {
    /// Build a log from named columns, validating that every named column is
    /// present and that all columns have the same length.
    pub fn from_columns(
        column_names: Vec<String>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self> {
        ensure!(
            column_names.len() == columns.len(),
            "{} column names for {} columns (duplicate header name?)",
            column_names.len(),
            columns.len()
        );

        let mut len = None;
        for name in &column_names {
            let values = columns
                .get(name)
                .with_context(|| format!("column '{name}' named but not provided"))?;
            match len {
                None => len = Some(values.len()),
                Some(n) => ensure!(
                    values.len() == n,
                    "column '{name}' has {} values, expected {n}",
                    values.len()
                ),
            }
        }

        Ok(TelemetryLog {
            column_names,
            columns,
            len: len.unwrap_or(0),
        })
    }

    /// Column names in header order.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Whether the log has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// All cells of one column. Referencing a column the log does not have
    /// is an error; reports rely on this to fail loudly.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .with_context(|| format!("log has no '{name}' column"))
    }

    /// A single cell.
    pub fn value(&self, name: &str, row: usize) -> Result<f64> {
        self.column(name)?
            .get(row)
            .copied()
            .with_context(|| format!("row {row} out of range for column '{name}'"))
    }

    /// Derive a sub-log of the rows whose index satisfies `pred`, preserving
    /// row order. The input log is never mutated.
    pub fn filter_rows(&self, mut pred: impl FnMut(usize) -> bool) -> TelemetryLog {
        let kept: Vec<usize> = (0..self.len).filter(|&i| pred(i)).collect();
        self.select(&kept)
    }

    fn select(&self, rows: &[usize]) -> TelemetryLog {
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| {
                let taken: Vec<f64> = rows.iter().map(|&i| values[i]).collect();
                (name.clone(), taken)
            })
            .collect();

        TelemetryLog {
            column_names: self.column_names.clone(),
            columns,
            len: rows.len(),
        }
    }

    /// Vehicle mass in kg. The logger records mass on every row; the last
    /// row's value is treated as authoritative.
    pub fn last_mass(&self) -> Result<f64> {
        ensure!(!self.is_empty(), "mass of an empty log is undefined");
        self.value("mass", self.len - 1)
    }

    /// Vehicle weight in Newtons, from [`last_mass`](Self::last_mass).
    pub fn weight(&self) -> Result<f64> {
        Ok(self.last_mass()? * GRAVITY)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
