use crate::errors::{BenchError, BenchResult};
use polars::{io::csv::QuoteStyle, prelude::*};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the problem-size column shared by every measurement table
pub const NBODY_COLUMN: &str = "nbody";

/// Handles DataFrame operations for benchmark tables
pub struct DataFrameHandler;

impl DataFrameHandler {
    /// Sanitizes a filename by replacing characters that might cause issues
    pub fn sanitize_filename(name: &str) -> String {
        name.replace([':', '/', '\\'], "_").replace('"', "")
    }

    /// Parses the CSV body of a benchmark file (header row plus data rows).
    ///
    /// The `nbody` column becomes an `Int64` series, every other column a
    /// `Float64` series. Empty or non-numeric cells are rejected.
    pub fn csv_to_dataframe(payload: &str) -> BenchResult<DataFrame> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(payload.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if !headers.iter().any(|h| h == NBODY_COLUMN) {
            return Err(BenchError::MissingColumn(NBODY_COLUMN.to_string()));
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (idx, value) in record.iter().enumerate() {
                cells[idx].push(value.to_string());
            }
        }

        Self::create_dataframe_from_columns(&headers, cells)
    }

    /// Builds a table from a problem-size column and named metric columns
    pub fn from_columns(nbody: Vec<i64>, metrics: Vec<(String, Vec<f64>)>) -> BenchResult<DataFrame> {
        let mut series_vec = Vec::with_capacity(metrics.len() + 1);
        series_vec.push(Series::new(NBODY_COLUMN, nbody));
        for (name, values) in metrics {
            series_vec.push(Series::new(name.as_str(), values));
        }

        DataFrame::new(series_vec)
            .map_err(|e| BenchError::DataFrameError(format!("Failed to create DataFrame: {}", e)))
    }

    fn create_dataframe_from_columns(
        headers: &[String],
        cells: Vec<Vec<String>>,
    ) -> BenchResult<DataFrame> {
        let mut series_vec = Vec::with_capacity(headers.len());

        for (column, values) in headers.iter().zip(cells) {
            if column == NBODY_COLUMN {
                let ints = values
                    .iter()
                    .enumerate()
                    .map(|(row, v)| {
                        Self::parse_problem_size(v).ok_or_else(|| BenchError::MissingValue {
                            column: column.clone(),
                            row,
                        })
                    })
                    .collect::<BenchResult<Vec<i64>>>()?;
                series_vec.push(Series::new(column.as_str(), ints));
            } else {
                let floats = values
                    .iter()
                    .enumerate()
                    .map(|(row, v)| {
                        v.parse::<f64>().map_err(|_| BenchError::MissingValue {
                            column: column.clone(),
                            row,
                        })
                    })
                    .collect::<BenchResult<Vec<f64>>>()?;
                series_vec.push(Series::new(column.as_str(), floats));
            }
        }

        DataFrame::new(series_vec)
            .map_err(|e| BenchError::DataFrameError(format!("Failed to create DataFrame: {}", e)))
    }

    // Problem sizes are written as integers, but accept "1000.0" as well.
    fn parse_problem_size(value: &str) -> Option<i64> {
        if let Ok(v) = value.parse::<i64>() {
            return Some(v);
        }
        match value.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 => Some(v as i64),
            _ => None,
        }
    }

    /// Extracts an integer column, failing on missing values
    pub fn int_column(df: &DataFrame, name: &str) -> BenchResult<Vec<i64>> {
        let series = df
            .column(name)
            .map_err(|_| BenchError::MissingColumn(name.to_string()))?
            .cast(&DataType::Int64)?;

        series
            .i64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.ok_or_else(|| BenchError::MissingValue {
                    column: name.to_string(),
                    row,
                })
            })
            .collect()
    }

    /// Extracts a floating point column, failing on missing values
    pub fn float_column(df: &DataFrame, name: &str) -> BenchResult<Vec<f64>> {
        let series = df
            .column(name)
            .map_err(|_| BenchError::MissingColumn(name.to_string()))?
            .cast(&DataType::Float64)?;

        series
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.ok_or_else(|| BenchError::MissingValue {
                    column: name.to_string(),
                    row,
                })
            })
            .collect()
    }

    /// Writes a DataFrame to CSV atomically using a temporary file
    pub fn write_csv(df: &mut DataFrame, file_path: &Path) -> BenchResult<()> {
        let temp_path: PathBuf = file_path.with_extension("csv.tmp");
        let file = fs::File::create(&temp_path)?;

        CsvWriter::new(&file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_style(QuoteStyle::NonNumeric)
            .finish(df)
            .map_err(|e| BenchError::DataFrameError(format!("Failed to write CSV: {}", e)))?;

        fs::rename(temp_path, file_path)?;

        tracing::info!(
            "Wrote {} rows to {}",
            df.height(),
            file_path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PAYLOAD: &str = "nbody,calc_min,calc_max,calc_avg,fps_min,fps_max,fps_avg\n\
                           100,0.001,0.003,0.002,200,400,300\n\
                           1000,0.01,0.03,0.02,20,40,30\n";

    #[test]
    fn test_csv_to_dataframe_types() {
        let df = DataFrameHandler::csv_to_dataframe(PAYLOAD).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 7);
        assert_eq!(df.column("nbody").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("fps_avg").unwrap().dtype(), &DataType::Float64);

        assert_eq!(
            DataFrameHandler::int_column(&df, "nbody").unwrap(),
            vec![100, 1000]
        );
        assert_eq!(
            DataFrameHandler::float_column(&df, "calc_avg").unwrap(),
            vec![0.002, 0.02]
        );
    }

    #[test]
    fn test_csv_to_dataframe_requires_nbody() {
        let err = DataFrameHandler::csv_to_dataframe("size,calc_avg\n1,2.0\n").unwrap_err();
        assert!(matches!(err, BenchError::MissingColumn(c) if c == "nbody"));
    }

    #[test]
    fn test_csv_to_dataframe_rejects_non_numeric_cells() {
        let err = DataFrameHandler::csv_to_dataframe("nbody,calc_avg\n10,fast\n").unwrap_err();
        assert!(matches!(err, BenchError::MissingValue { row: 0, .. }));
    }

    #[test]
    fn test_parse_problem_size_accepts_integral_floats() {
        assert_eq!(DataFrameHandler::parse_problem_size("1000.0"), Some(1000));
        assert_eq!(DataFrameHandler::parse_problem_size("10.5"), None);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(
            DataFrameHandler::sanitize_filename("GPU Kernel: \"nbody.cl\""),
            "GPU Kernel_ nbody.cl"
        );
    }

    #[test]
    fn test_write_csv_replaces_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("speedup.csv");
        let mut df = DataFrameHandler::from_columns(
            vec![1, 2],
            vec![("speedup".to_string(), vec![10.0, 20.0])],
        )
        .unwrap();

        DataFrameHandler::write_csv(&mut df, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let header = written.lines().next().unwrap();
        assert!(header.contains("nbody") && header.contains("speedup"));
        assert_eq!(written.lines().count(), 3);
        assert!(!dir.path().join("speedup.csv.tmp").exists());
    }
}
