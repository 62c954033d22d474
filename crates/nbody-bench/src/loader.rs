//! Reads benchmark files into a [`BenchmarkCollection`].
//!
//! A benchmark file holds a free-form label on its first line followed by a
//! CSV table (`nbody,calc_min,calc_max,calc_avg,fps_min,fps_max,fps_avg`).

use crate::bench_config::SourceConfig;
use crate::errors::{BenchError, BenchResult};
use crate::measurement::{BenchmarkCollection, MeasurementTable};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory layout the benchmarks were loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLayout {
    /// `<root>/<group>/*.csv`, one group per machine
    Nested,
    /// `<dir>/*.csv`, a single machine
    Flat,
}

/// Loaded benchmarks plus the layout they came from
#[derive(Debug, Clone)]
pub struct LoadedBenchmarks {
    pub layout: SourceLayout,
    pub results: BenchmarkCollection,
}

impl LoadedBenchmarks {
    /// Cross-system reports only make sense for the nested layout
    pub fn multiple_systems(&self) -> bool {
        self.layout == SourceLayout::Nested
    }
}

/// Load from the nested root when it exists, otherwise from the flat directory
pub fn load_benchmarks(sources: &SourceConfig) -> BenchResult<LoadedBenchmarks> {
    if sources.nested_root.exists() {
        tracing::info!(
            "Loading benchmarks from nested directory {}",
            sources.nested_root.display()
        );
        Ok(LoadedBenchmarks {
            layout: SourceLayout::Nested,
            results: load_nested(&sources.nested_root, &sources.extension)?,
        })
    } else {
        tracing::info!(
            "Loading benchmarks from flat directory {}",
            sources.flat_root.display()
        );
        Ok(LoadedBenchmarks {
            layout: SourceLayout::Flat,
            results: load_flat(&sources.flat_root, &sources.extension)?,
        })
    }
}

/// Load every benchmark file in every sub-directory of `root`
pub fn load_nested(root: &Path, extension: &str) -> BenchResult<BenchmarkCollection> {
    let mut results = BenchmarkCollection::new();
    for group in sorted_entries(root)? {
        if group.is_dir() {
            tracing::debug!("Loading benchmark group {}", group.display());
            results.extend(read_directory(&group, extension)?);
        }
    }
    Ok(results)
}

/// Load every benchmark file directly inside `dir`.
///
/// A missing directory yields an empty collection.
pub fn load_flat(dir: &Path, extension: &str) -> BenchResult<BenchmarkCollection> {
    if !dir.is_dir() {
        tracing::warn!("Benchmark directory {} does not exist", dir.display());
        return Ok(BenchmarkCollection::new());
    }
    Ok(read_directory(dir, extension)?.into_iter().collect())
}

fn read_directory(dir: &Path, extension: &str) -> BenchResult<Vec<(String, MeasurementTable)>> {
    sorted_entries(dir)?
        .into_iter()
        .filter(|path| path.is_file() && has_extension(path, extension))
        .map(|path| read_benchmark_file(&path))
        .collect()
}

// read_dir order is platform dependent; sort for stable output.
fn sorted_entries(dir: &Path) -> BenchResult<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    Ok(entries)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == extension)
        .unwrap_or(false)
}

/// Read one benchmark file into its label and table
pub fn read_benchmark_file(path: &Path) -> BenchResult<(String, MeasurementTable)> {
    let content = fs::read_to_string(path)?;
    let (label, table) = parse_benchmark(&content).map_err(|e| match e {
        BenchError::IoError(_) => e,
        other => BenchError::MalformedFile {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;

    if !table.is_ordered_by_problem_size()? {
        tracing::warn!(
            "Rows of {} are not ordered by nbody; speed-up and average series may misalign",
            path.display()
        );
    }
    tracing::debug!("Loaded '{}' with {} rows", label, table.height());
    Ok((label, table))
}

/// Split file content into the label line and the CSV table below it
pub fn parse_benchmark(content: &str) -> BenchResult<(String, MeasurementTable)> {
    let (label, payload) = match content.split_once('\n') {
        Some((label, payload)) => (label, payload),
        None => (content, ""),
    };
    let label = label.trim_end_matches('\r').trim_end();
    if label.is_empty() {
        return Err(BenchError::Other("missing label line".to_string()));
    }
    if payload.trim().is_empty() {
        return Err(BenchError::Other("missing measurement table".to_string()));
    }

    Ok((label.to_string(), MeasurementTable::from_csv(payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const GPU_FILE: &str = "Linux (gcc) GPU (NVIDIA GeForce RTX 2080) Kernel: nbody.cl\n\
                            nbody,calc_min,calc_max,calc_avg,fps_min,fps_max,fps_avg\n\
                            100,0.001,0.002,0.0015,500,900,700\n\
                            1000,0.01,0.02,0.015,50,90,70\n";

    #[test]
    fn test_parse_benchmark() {
        let (label, table) = parse_benchmark(GPU_FILE).unwrap();
        assert_eq!(
            label,
            "Linux (gcc) GPU (NVIDIA GeForce RTX 2080) Kernel: nbody.cl"
        );
        assert_eq!(table.nbody().unwrap(), vec![100, 1000]);
        assert_eq!(table.metric("fps_avg").unwrap(), vec![700.0, 70.0]);
    }

    #[test]
    fn test_parse_benchmark_strips_crlf() {
        let content = "Windows GPU (X) Kernel: nbody.cl\r\nnbody,calc_avg,fps_avg\r\n10,1.0,2.0\r\n";
        let (label, table) = parse_benchmark(content).unwrap();
        assert_eq!(label, "Windows GPU (X) Kernel: nbody.cl");
        assert_eq!(table.metric("fps_avg").unwrap(), vec![2.0]);
    }

    #[test]
    fn test_parse_benchmark_rejects_label_only() {
        assert!(parse_benchmark("Linux (gcc) CPU\n").is_err());
        assert!(parse_benchmark("").is_err());
    }

    #[test]
    fn test_read_benchmark_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "label\nsize,calc_avg\n1,2\n").unwrap();

        let err = read_benchmark_file(&path).unwrap_err();
        assert!(matches!(err, BenchError::MalformedFile { path: p, .. } if p == path));
    }

    #[test]
    fn test_load_flat_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let results = load_flat(&dir.path().join("absent"), "csv").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_load_flat_filters_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), GPU_FILE).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a benchmark").unwrap();

        let results = load_flat(dir.path(), "csv").unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_duplicate_labels_overwrite() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), GPU_FILE).unwrap();
        fs::write(
            dir.path().join("b.csv"),
            GPU_FILE.replace("0.0015", "0.0025"),
        )
        .unwrap();

        let results = load_flat(dir.path(), "csv").unwrap();
        assert_eq!(results.len(), 1);
        let (_, table) = results.iter().next().unwrap();
        assert_eq!(table.metric("calc_avg").unwrap(), vec![0.0025, 0.015]);
    }

    #[test]
    fn test_load_benchmarks_prefers_nested_layout() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("data");
        fs::create_dir_all(nested.join("machine-a")).unwrap();
        fs::write(nested.join("machine-a").join("gpu.csv"), GPU_FILE).unwrap();
        fs::write(nested.join("stray.csv"), GPU_FILE).unwrap();

        let sources = SourceConfig {
            nested_root: nested,
            flat_root: dir.path().join("benchmarks"),
            extension: "csv".to_string(),
        };
        let loaded = load_benchmarks(&sources).unwrap();
        assert_eq!(loaded.layout, SourceLayout::Nested);
        assert!(loaded.multiple_systems());
        assert_eq!(loaded.results.len(), 1);
    }

    #[test]
    fn test_load_benchmarks_falls_back_to_flat() {
        let dir = tempdir().unwrap();
        let flat = dir.path().join("benchmarks");
        fs::create_dir_all(&flat).unwrap();
        fs::write(flat.join("gpu.csv"), GPU_FILE).unwrap();

        let sources = SourceConfig {
            nested_root: dir.path().join("data"),
            flat_root: flat,
            extension: "csv".to_string(),
        };
        let loaded = load_benchmarks(&sources).unwrap();
        assert_eq!(loaded.layout, SourceLayout::Flat);
        assert!(!loaded.multiple_systems());
        assert_eq!(loaded.results.len(), 1);
    }
}
