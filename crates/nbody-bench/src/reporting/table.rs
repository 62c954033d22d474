//! Column-aligned numeric tables for the console.
//!
//! Two flavors: a boxed grid for reading in a terminal and a LaTeX
//! `tabular` for pasting into documents.

use crate::errors::{BenchError, BenchResult};
use crate::measurement::MeasurementTable;
use crate::reporting::format::{escape_latex, format_g};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Grid,
    Latex,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableColumn {
    Integer(Vec<i64>),
    Float(Vec<f64>),
}

impl TableColumn {
    fn len(&self) -> usize {
        match self {
            TableColumn::Integer(v) => v.len(),
            TableColumn::Float(v) => v.len(),
        }
    }

    fn cell(&self, row: usize) -> String {
        match self {
            TableColumn::Integer(v) => v.get(row).map(|x| x.to_string()),
            TableColumn::Float(v) => v.get(row).map(|x| format_g(*x)),
        }
        .unwrap_or_default()
    }
}

/// Headers plus numeric columns.
///
/// Columns may differ in length; missing cells render blank.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    headers: Vec<String>,
    columns: Vec<TableColumn>,
}

impl SummaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_int_column(mut self, header: impl Into<String>, values: Vec<i64>) -> Self {
        self.headers.push(header.into());
        self.columns.push(TableColumn::Integer(values));
        self
    }

    pub fn with_float_column(mut self, header: impl Into<String>, values: Vec<f64>) -> Self {
        self.headers.push(header.into());
        self.columns.push(TableColumn::Float(values));
        self
    }

    /// `nbody` followed by the given metric columns of a measurement table
    pub fn from_measurements(
        table: &MeasurementTable,
        nbody_header: &str,
        metrics: &[(&str, &str)],
    ) -> BenchResult<Self> {
        let mut summary = Self::new().with_int_column(nbody_header, table.nbody()?);
        for (column, header) in metrics {
            summary = summary.with_float_column(*header, table.metric(column)?);
        }
        Ok(summary)
    }

    pub fn row_count(&self) -> usize {
        self.columns.iter().map(TableColumn::len).max().unwrap_or(0)
    }

    pub fn render(&self, format: TableFormat) -> BenchResult<String> {
        if self.columns.is_empty() || self.row_count() == 0 {
            return Err(BenchError::EmptySeries(
                "summary table has no rows".to_string(),
            ));
        }

        let rows: Vec<Vec<String>> = (0..self.row_count())
            .map(|row| self.columns.iter().map(|c| c.cell(row)).collect())
            .collect();

        match format {
            TableFormat::Grid => self.render_grid(&rows),
            TableFormat::Latex => self.render_latex(&rows),
        }
    }

    fn render_grid(&self, rows: &[Vec<String>]) -> BenchResult<String> {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                rows.iter()
                    .map(|r| r[idx].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let border = |fill: char| -> String {
            let mut line = String::from("+");
            for width in &widths {
                line.push_str(&fill.to_string().repeat(width + 2));
                line.push('+');
            }
            line
        };
        let line = |cells: &[String]| -> String {
            let mut line = String::from("|");
            for (cell, width) in cells.iter().zip(&widths) {
                line.push_str(&format!(" {:>width$} |", cell, width = *width));
            }
            line
        };

        let mut out = String::new();
        writeln!(out, "{}", border('-'))?;
        writeln!(out, "{}", line(&self.headers))?;
        writeln!(out, "{}", border('='))?;
        for (idx, row) in rows.iter().enumerate() {
            writeln!(out, "{}", line(row))?;
            if idx + 1 < rows.len() {
                writeln!(out, "{}", border('-'))?;
            }
        }
        write!(out, "{}", border('-'))?;
        Ok(out)
    }

    fn render_latex(&self, rows: &[Vec<String>]) -> BenchResult<String> {
        let headers: Vec<String> = self.headers.iter().map(|h| escape_latex(h)).collect();
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                rows.iter()
                    .map(|r| r[idx].len())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" & ")
        };

        let mut out = String::new();
        writeln!(out, "\\begin{{tabular}}{{{}}}", "r".repeat(headers.len()))?;
        writeln!(out, "\\hline")?;
        writeln!(out, "{} \\\\", line(&headers))?;
        writeln!(out, "\\hline")?;
        for row in rows {
            writeln!(out, "{} \\\\", line(row))?;
        }
        writeln!(out, "\\hline")?;
        write!(out, "\\end{{tabular}}")?;
        Ok(out)
    }
}
