use crate::dataframe_handler::{DataFrameHandler, NBODY_COLUMN};
use crate::errors::{BenchError, BenchResult};
use polars::prelude::*;
use std::fmt;

/// Measurements of one benchmark configuration, one row per problem size.
///
/// Always carries an integer `nbody` column; every other column is a
/// floating point metric (`calc_avg`, `fps_avg`, `speedup`, ...).
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    frame: DataFrame,
}

impl MeasurementTable {
    /// Build a table from a problem-size column and named metric columns
    pub fn new<S: Into<String>>(nbody: Vec<i64>, metrics: Vec<(S, Vec<f64>)>) -> BenchResult<Self> {
        let metrics = metrics
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();
        Self::from_frame(DataFrameHandler::from_columns(nbody, metrics)?)
    }

    /// Wrap an existing DataFrame, which must contain an `nbody` column
    pub fn from_frame(frame: DataFrame) -> BenchResult<Self> {
        if frame.column(NBODY_COLUMN).is_err() {
            return Err(BenchError::MissingColumn(NBODY_COLUMN.to_string()));
        }
        Ok(Self { frame })
    }

    /// Parse the CSV body of a benchmark file
    pub fn from_csv(payload: &str) -> BenchResult<Self> {
        Self::from_frame(DataFrameHandler::csv_to_dataframe(payload)?)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    pub fn nbody(&self) -> BenchResult<Vec<i64>> {
        DataFrameHandler::int_column(&self.frame, NBODY_COLUMN)
    }

    pub fn metric(&self, name: &str) -> BenchResult<Vec<f64>> {
        DataFrameHandler::float_column(&self.frame, name)
    }

    /// Metric column names in table order, `nbody` excluded
    pub fn metric_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .filter(|name| *name != NBODY_COLUMN)
            .map(str::to_string)
            .collect()
    }

    /// Add (or replace) a metric column in place.
    pub fn set_metric(&mut self, name: &str, values: Vec<f64>) -> BenchResult<()> {
        if values.len() != self.height() {
            return Err(BenchError::MisalignedTables(format!(
                "column '{}' has {} values for a table of {} rows",
                name,
                values.len(),
                self.height()
            )));
        }
        self.frame.with_column(Series::new(name, values))?;
        Ok(())
    }

    /// True when problem sizes never decrease from one row to the next
    pub fn is_ordered_by_problem_size(&self) -> BenchResult<bool> {
        let nbody = self.nbody()?;
        Ok(nbody.windows(2).all(|w| w[0] <= w[1]))
    }
}

impl fmt::Display for MeasurementTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frame)
    }
}

/// A labelled measurement table
#[derive(Debug, Clone)]
pub struct BenchmarkRecord {
    pub label: String,
    pub table: MeasurementTable,
}

/// Insertion-ordered mapping from label to measurement table.
///
/// Inserting an existing label replaces its table but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkCollection {
    records: Vec<BenchmarkRecord>,
}

impl BenchmarkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the table previously stored under `label`
    pub fn insert(
        &mut self,
        label: impl Into<String>,
        table: MeasurementTable,
    ) -> Option<MeasurementTable> {
        let label = label.into();
        match self.records.iter_mut().find(|r| r.label == label) {
            Some(existing) => Some(std::mem::replace(&mut existing.table, table)),
            None => {
                self.records.push(BenchmarkRecord { label, table });
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&MeasurementTable> {
        self.records
            .iter()
            .find(|r| r.label == label)
            .map(|r| &r.table)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut MeasurementTable> {
        self.records
            .iter_mut()
            .find(|r| r.label == label)
            .map(|r| &mut r.table)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.records.iter().any(|r| r.label == label)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MeasurementTable)> {
        self.records.iter().map(|r| (r.label.as_str(), &r.table))
    }

    /// Copy of the collection ordered by label, descending
    pub fn sorted_by_label_desc(&self) -> Self {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.label.cmp(&a.label));
        Self { records }
    }
}

impl FromIterator<(String, MeasurementTable)> for BenchmarkCollection {
    fn from_iter<I: IntoIterator<Item = (String, MeasurementTable)>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl Extend<(String, MeasurementTable)> for BenchmarkCollection {
    fn extend<I: IntoIterator<Item = (String, MeasurementTable)>>(&mut self, iter: I) {
        for (label, table) in iter {
            self.insert(label, table);
        }
    }
}

impl IntoIterator for BenchmarkCollection {
    type Item = BenchmarkRecord;
    type IntoIter = std::vec::IntoIter<BenchmarkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl fmt::Display for BenchmarkCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, table) in self.iter() {
            writeln!(f, "{}", label)?;
            writeln!(f, "{}", table)?;
        }
        Ok(())
    }
}
