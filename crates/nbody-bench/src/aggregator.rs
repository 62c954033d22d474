//! Derived series: cross-device averages and speed-up ratios.
//!
//! Every function here reads its inputs and returns new tables. The only
//! function that touches a collection, [`append_average_speedups`], adds new
//! labels and leaves existing entries alone.

use crate::errors::{BenchError, BenchResult};
use crate::measurement::{BenchmarkCollection, MeasurementTable};
use crate::selector::{find_first, ExactLabel};

/// Number of devices averaged per configuration
pub const AVERAGED_DEVICES: usize = 3;

/// Column holding speed-up ratios in derived tables
pub const SPEEDUP_COLUMN: &str = "speedup";

/// Metric compared when computing speed-ups
pub const CALC_COLUMN: &str = "calc_avg";

/// Check that tables share row count and problem-size progression
pub fn ensure_aligned(tables: &[&MeasurementTable]) -> BenchResult<()> {
    let Some((first, rest)) = tables.split_first() else {
        return Ok(());
    };
    let reference = first.nbody()?;

    for (idx, table) in rest.iter().enumerate() {
        let nbody = table.nbody()?;
        if nbody.len() != reference.len() {
            return Err(BenchError::MisalignedTables(format!(
                "table {} has {} rows, table 0 has {}",
                idx + 1,
                nbody.len(),
                reference.len()
            )));
        }
        if let Some(row) = nbody.iter().zip(&reference).position(|(a, b)| a != b) {
            return Err(BenchError::MisalignedTables(format!(
                "table {} has nbody={} in row {}, table 0 has nbody={}",
                idx + 1,
                nbody[row],
                row,
                reference[row]
            )));
        }
    }
    Ok(())
}

/// Row-wise mean of three device tables.
///
/// Rows are paired by position and the tables must be aligned (same row
/// count, same `nbody` per row). The result keeps the first table's `nbody`
/// column and averages every metric column present in all three inputs.
pub fn device_average(devices: &[&MeasurementTable]) -> BenchResult<MeasurementTable> {
    if devices.len() != AVERAGED_DEVICES {
        return Err(BenchError::DeviceCount {
            expected: AVERAGED_DEVICES,
            actual: devices.len(),
        });
    }
    ensure_aligned(devices)?;

    let shared: Vec<String> = devices[0]
        .metric_names()
        .into_iter()
        .filter(|name| devices[1..].iter().all(|d| d.has_column(name)))
        .collect();

    let mut metrics = Vec::with_capacity(shared.len());
    for name in shared {
        let columns = devices
            .iter()
            .map(|d| d.metric(&name))
            .collect::<BenchResult<Vec<_>>>()?;

        let mean = (0..devices[0].height())
            .map(|row| columns.iter().map(|c| c[row]).sum::<f64>() / AVERAGED_DEVICES as f64)
            .collect();
        metrics.push((name, mean));
    }

    MeasurementTable::new(devices[0].nbody()?, metrics)
}

/// Average the first three records of a collection.
///
/// Extra records are ignored with a warning; fewer than three is an error.
pub fn collection_average(devices: &BenchmarkCollection) -> BenchResult<MeasurementTable> {
    if devices.len() > AVERAGED_DEVICES {
        tracing::warn!(
            "Averaging the first {} of {} matching devices",
            AVERAGED_DEVICES,
            devices.len()
        );
    }
    let tables: Vec<&MeasurementTable> = devices
        .iter()
        .take(AVERAGED_DEVICES)
        .map(|(_, table)| table)
        .collect();
    device_average(&tables)
}

/// Per-row `denominator / numerator` for `metric`.
///
/// The numerator is the faster device, so values above one mean the
/// numerator wins. The series is as long as the shorter table.
pub fn speedup_series(
    numerator: &MeasurementTable,
    denominator: &MeasurementTable,
    metric: &str,
) -> BenchResult<Vec<f64>> {
    let fast = numerator.metric(metric)?;
    let slow = denominator.metric(metric)?;
    Ok(fast.iter().zip(&slow).map(|(f, s)| s / f).collect())
}

/// Speed-up series as a table with columns `nbody` and `speedup`.
///
/// Problem sizes come from the denominator table, cut to the series length.
pub fn speedup_table(
    numerator: &MeasurementTable,
    denominator: &MeasurementTable,
    metric: &str,
) -> BenchResult<MeasurementTable> {
    let ratios = speedup_series(numerator, denominator, metric)?;
    let mut nbody = denominator.nbody()?;
    nbody.truncate(ratios.len());
    MeasurementTable::new(nbody, vec![(SPEEDUP_COLUMN, ratios)])
}

/// Labels used in the working collection of averaged series
#[derive(Debug, Clone)]
pub struct AverageLabels {
    pub gpu: String,
    pub single_thread_cpu: String,
    pub multi_thread_cpu: String,
    pub single_speedup: String,
    pub multi_speedup: String,
}

impl Default for AverageLabels {
    fn default() -> Self {
        Self {
            gpu: "GPU Kernel: nbody.cl".to_string(),
            single_thread_cpu: "Single-Thread CPU".to_string(),
            multi_thread_cpu: "Multi-Thread CPU".to_string(),
            single_speedup: "Single-Core CPU vs. GPU".to_string(),
            multi_speedup: "Multi-Core CPU vs. GPU".to_string(),
        }
    }
}

fn lookup<'a>(working: &'a BenchmarkCollection, label: &str) -> BenchResult<&'a MeasurementTable> {
    find_first(working, &ExactLabel::new(label))
        .ok_or_else(|| BenchError::MissingSeries(label.to_string()))
}

/// Add GPU speed-up tables over single- and multi-thread CPU averages.
///
/// Reads the averaged GPU and CPU tables from `working` and inserts two new
/// `speedup` tables under `labels.single_speedup` and `labels.multi_speedup`.
/// Both share the single-thread problem sizes and the length of the shortest
/// of the three inputs. Fails without touching `working` when either label
/// is already taken.
pub fn append_average_speedups(
    working: &mut BenchmarkCollection,
    labels: &AverageLabels,
) -> BenchResult<()> {
    for label in [&labels.single_speedup, &labels.multi_speedup] {
        if working.contains(label) {
            return Err(BenchError::DuplicateSeries(label.clone()));
        }
    }

    let gpu = lookup(working, &labels.gpu)?;
    let single = lookup(working, &labels.single_thread_cpu)?;
    let multi = lookup(working, &labels.multi_thread_cpu)?;

    let rows = gpu.height().min(single.height()).min(multi.height());
    let mut nbody = single.nbody()?;
    nbody.truncate(rows);
    let mut single_ratios = speedup_series(gpu, single, CALC_COLUMN)?;
    single_ratios.truncate(rows);
    let mut multi_ratios = speedup_series(gpu, multi, CALC_COLUMN)?;
    multi_ratios.truncate(rows);

    let single_speedup = MeasurementTable::new(nbody.clone(), vec![(SPEEDUP_COLUMN, single_ratios)])?;
    let multi_speedup = MeasurementTable::new(nbody, vec![(SPEEDUP_COLUMN, multi_ratios)])?;

    working.insert(labels.single_speedup.clone(), single_speedup);
    working.insert(labels.multi_speedup.clone(), multi_speedup);
    Ok(())
}
