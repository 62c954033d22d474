use crate::aggregator::{
    append_average_speedups, collection_average, speedup_series, speedup_table,
    AVERAGED_DEVICES, CALC_COLUMN, SPEEDUP_COLUMN,
};
use crate::bench_config::ReportConfig;
use crate::dataframe_handler::DataFrameHandler;
use crate::errors::{BenchError, BenchResult};
use crate::measurement::{BenchmarkCollection, MeasurementTable};
use crate::reporting::chart::{write_line_chart, ChartSpec};
use crate::reporting::table::{SummaryTable, TableFormat};
use crate::selector::{compile_patterns, filter_and, filter_or, find_first, ExactLabel, Pattern};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FPS_COLUMN: &str = "fps_avg";
const MULTI_SPEEDUP_COLUMN: &str = "multi_speedup";
const BODIES_HEADER: &str = "# Bodies";
const SINGLE_SPEEDUP_HEADER: &str = "Single-Thread Speed-Up";
const MULTI_SPEEDUP_HEADER: &str = "Multi-Thread Speed-Up";
const TIME_LABEL: &str = "Time in s";
const FPS_LABEL: &str = "Frames per Second";

/// The reports the suite knows how to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    LinuxSystems,
    GpuComparisonLinux,
    CpuLinuxWindows,
    CpuLinux,
    AverageValues,
}

impl ReportKind {
    /// Every report, in execution order
    pub const ALL: [ReportKind; 5] = [
        ReportKind::LinuxSystems,
        ReportKind::GpuComparisonLinux,
        ReportKind::CpuLinuxWindows,
        ReportKind::CpuLinux,
        ReportKind::AverageValues,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::LinuxSystems => "linux_systems",
            ReportKind::GpuComparisonLinux => "gpu_comparison_linux",
            ReportKind::CpuLinuxWindows => "cpu_linux_windows",
            ReportKind::CpuLinux => "cpu_linux",
            ReportKind::AverageValues => "average_values",
        }
    }

    /// Only the per-party report makes sense for a single machine
    pub fn requires_multiple_systems(&self) -> bool {
        !matches!(self, ReportKind::LinuxSystems)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| {
                BenchError::ConfigError(format!(
                    "Unknown report '{}', expected one of: {}",
                    s,
                    ReportKind::ALL.map(|k| k.name()).join(", ")
                ))
            })
    }
}

/// Everything a generator needs besides the loaded records
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub config: &'a ReportConfig,
    pub output_dir: &'a Path,
    /// True when benchmarks came from several machines (nested layout)
    pub multiple_systems: bool,
}

impl<'a> ReportContext<'a> {
    pub fn new(config: &'a ReportConfig, output_dir: &'a Path, multiple_systems: bool) -> Self {
        Self {
            config,
            output_dir,
            multiple_systems,
        }
    }

    /// Chart with the configured default geometry
    fn chart_spec(&self, title: &str, y_label: &str) -> ChartSpec {
        let defaults = &self.config.chart;
        ChartSpec::new(title, y_label)
            .with_size(defaults.width, defaults.height)
            .with_font_size(defaults.font_size)
    }

    fn average_chart_spec(&self, title: &str, y_label: &str) -> ChartSpec {
        self.chart_spec(title, y_label)
            .with_font_size(self.config.chart.average_font_size)
    }

    fn speedup_chart_spec(&self) -> ChartSpec {
        let defaults = &self.config.chart;
        ChartSpec::new("Speed-Up between GPU and CPU", "Speed-Up")
            .with_size(defaults.speedup_width, defaults.speedup_height)
            .with_font_size(defaults.speedup_font_size)
    }

    fn chart(
        &self,
        results: &BenchmarkCollection,
        column: &str,
        spec: &ChartSpec,
        name: &str,
    ) -> BenchResult<PathBuf> {
        write_line_chart(results, column, spec, self.output_dir, name)
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    fn kind(&self) -> ReportKind;

    /// Write the report's charts into the context's output directory and its
    /// console tables to `out`; returns the files written
    fn generate(
        &self,
        results: &BenchmarkCollection,
        ctx: &ReportContext<'_>,
        out: &mut dyn Write,
    ) -> BenchResult<Vec<PathBuf>>;
}

/// Generator for one report kind
pub fn generator_for(kind: ReportKind) -> Box<dyn ReportGenerator> {
    match kind {
        ReportKind::LinuxSystems => Box::new(LinuxSystemsReport),
        ReportKind::GpuComparisonLinux => Box::new(GpuComparisonReport),
        ReportKind::CpuLinuxWindows => Box::new(CpuLinuxWindowsReport),
        ReportKind::CpuLinux => Box::new(CpuLinuxReport),
        ReportKind::AverageValues => Box::new(AverageValuesReport),
    }
}

fn pattern(source: &str) -> BenchResult<Pattern> {
    Pattern::new(source)
}

/// Speed-up, FPS and calculation time of each party's Linux systems.
///
/// With a single machine the whole collection is one group, index 0.
pub struct LinuxSystemsReport;

impl LinuxSystemsReport {
    fn groups(
        results: &BenchmarkCollection,
        ctx: &ReportContext<'_>,
    ) -> BenchResult<Vec<BenchmarkCollection>> {
        if !ctx.multiple_systems {
            return Ok(vec![results.sorted_by_label_desc()]);
        }

        let linux = [pattern(&ctx.config.patterns.linux)?];
        ctx.config
            .parties
            .iter()
            .map(|party| -> BenchResult<BenchmarkCollection> {
                let members = filter_or(results, &party.patterns()?);
                Ok(filter_or(&members, &linux).sorted_by_label_desc())
            })
            .collect()
    }

    /// GPU vs. CPU speed-up chart plus its grid table.
    ///
    /// `None` when the group lacks the GPU kernel or one of the CPU runs.
    fn speedup(
        group: &BenchmarkCollection,
        ctx: &ReportContext<'_>,
        name: &str,
        out: &mut dyn Write,
    ) -> BenchResult<Option<PathBuf>> {
        let patterns = &ctx.config.patterns;
        let gpu = find_first(group, &pattern(&patterns.gpu_kernel)?);
        let multi = find_first(group, &pattern(&patterns.cpu_multi_thread)?);
        let single = find_first(group, &pattern(&patterns.cpu_single_thread)?);

        let (Some(gpu), Some(multi), Some(single)) = (gpu, multi, single) else {
            tracing::warn!(
                "Skipping chart '{}': GPU kernel, multi-thread or single-thread CPU run missing",
                name
            );
            return Ok(None);
        };

        let mut speedups = BenchmarkCollection::new();
        speedups.insert(
            "GPU vs. Multi-Thread CPU",
            speedup_table(gpu, multi, CALC_COLUMN)?,
        );
        speedups.insert(
            "GPU vs. Single-Thread CPU",
            speedup_table(gpu, single, CALC_COLUMN)?,
        );

        let summary = SummaryTable::new()
            .with_int_column(BODIES_HEADER, single.nbody()?)
            .with_float_column(
                SINGLE_SPEEDUP_HEADER,
                speedup_series(gpu, single, CALC_COLUMN)?,
            )
            .with_float_column(
                MULTI_SPEEDUP_HEADER,
                speedup_series(gpu, multi, CALC_COLUMN)?,
            );
        writeln!(out, "{}", summary.render(TableFormat::Grid)?)?;

        let path = ctx.chart(&speedups, SPEEDUP_COLUMN, &ctx.speedup_chart_spec(), name)?;
        Ok(Some(path))
    }
}

impl ReportGenerator for LinuxSystemsReport {
    fn kind(&self) -> ReportKind {
        ReportKind::LinuxSystems
    }

    fn generate(
        &self,
        results: &BenchmarkCollection,
        ctx: &ReportContext<'_>,
        out: &mut dyn Write,
    ) -> BenchResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (index, group) in Self::groups(results, ctx)?.iter().enumerate() {
            tracing::info!("Party {}: {} benchmark series", index, group.len());

            written.extend(Self::speedup(
                group,
                ctx,
                &format!("{}_speedup", index),
                out,
            )?);
            written.push(ctx.chart(
                group,
                FPS_COLUMN,
                &ctx.chart_spec("Avg FPS Comparison", FPS_LABEL),
                &format!("{}_fps_avg", index),
            )?);
            written.push(ctx.chart(
                group,
                CALC_COLUMN,
                &ctx.chart_spec("Avg Calc Time Comparison", TIME_LABEL),
                &format!("{}_calc_avg", index),
            )?);
        }
        Ok(written)
    }
}

/// The configured GPU models running the reference kernel on Linux
pub struct GpuComparisonReport;

impl ReportGenerator for GpuComparisonReport {
    fn kind(&self) -> ReportKind {
        ReportKind::GpuComparisonLinux
    }

    fn generate(
        &self,
        results: &BenchmarkCollection,
        ctx: &ReportContext<'_>,
        _out: &mut dyn Write,
    ) -> BenchResult<Vec<PathBuf>> {
        let patterns = &ctx.config.patterns;
        let gpus = filter_or(results, &compile_patterns(&ctx.config.gpu_models)?);
        let selected = filter_and(
            &gpus,
            &compile_patterns(&[&patterns.gpu_kernel, &patterns.linux])?,
        );

        Ok(vec![
            ctx.chart(
                &selected,
                FPS_COLUMN,
                &ctx.chart_spec("GPU Comparison (Frames per Second)", FPS_LABEL),
                "gpu_fps_avg",
            )?,
            ctx.chart(
                &selected,
                CALC_COLUMN,
                &ctx.chart_spec("GPU Comparison (Calculation Time)", TIME_LABEL),
                "gpu_calc_avg",
            )?,
        ])
    }
}

/// The CPU benchmarked on both operating systems, Windows against Linux
pub struct CpuLinuxWindowsReport;

impl ReportGenerator for CpuLinuxWindowsReport {
    fn kind(&self) -> ReportKind {
        ReportKind::CpuLinuxWindows
    }

    fn generate(
        &self,
        results: &BenchmarkCollection,
        ctx: &ReportContext<'_>,
        _out: &mut dyn Write,
    ) -> BenchResult<Vec<PathBuf>> {
        let patterns = &ctx.config.patterns;
        let cpu = &ctx.config.cross_os_cpu;
        let multi = filter_and(
            results,
            &compile_patterns(&[cpu, &patterns.cpu_multi_thread])?,
        );
        let single = filter_and(
            results,
            &compile_patterns(&[cpu, &patterns.cpu_single_thread])?,
        );

        Ok(vec![
            ctx.chart(
                &multi,
                CALC_COLUMN,
                &ctx.chart_spec(
                    "Multi-Thread CPU Windows vs. Linux (Calculation Time)",
                    TIME_LABEL,
                ),
                "multi_linux_windows_calc_avg",
            )?,
            ctx.chart(
                &single,
                CALC_COLUMN,
                &ctx.chart_spec(
                    "Single-Thread CPU Windows vs. Linux (Calculation Time)",
                    TIME_LABEL,
                ),
                "single_linux_windows_calc_avg",
            )?,
        ])
    }
}

/// The configured CPU models on Linux, multi- and single-threaded
pub struct CpuLinuxReport;

impl ReportGenerator for CpuLinuxReport {
    fn kind(&self) -> ReportKind {
        ReportKind::CpuLinux
    }

    fn generate(
        &self,
        results: &BenchmarkCollection,
        ctx: &ReportContext<'_>,
        _out: &mut dyn Write,
    ) -> BenchResult<Vec<PathBuf>> {
        let patterns = &ctx.config.patterns;
        let cpus = filter_or(results, &compile_patterns(&ctx.config.cpu_models)?);
        let multi = filter_and(
            &cpus,
            &compile_patterns(&[&patterns.linux, &patterns.cpu_multi_thread])?,
        );
        let single = filter_and(
            &cpus,
            &compile_patterns(&[&patterns.linux, &patterns.cpu_single_thread])?,
        );

        Ok(vec![
            ctx.chart(
                &multi,
                CALC_COLUMN,
                &ctx.chart_spec("Multi-Thread CPU Comparison (Calculation Time)", TIME_LABEL),
                "multi_cpu_linux_calc_avg",
            )?,
            ctx.chart(
                &single,
                CALC_COLUMN,
                &ctx.chart_spec(
                    "Single-Thread CPU Comparison (Calculation Time)",
                    TIME_LABEL,
                ),
                "single_cpu_linux_calc_avg",
            )?,
        ])
    }
}

/// Averages over three devices per configuration, and the GPU speed-up
/// derived from them
pub struct AverageValuesReport;

impl AverageValuesReport {
    /// Average of the records matching `source`, or `None` (with a warning)
    /// when fewer than three devices match
    fn average(
        results: &BenchmarkCollection,
        source: &str,
        label: &str,
    ) -> BenchResult<Option<MeasurementTable>> {
        let devices = filter_or(results, &[pattern(source)?]);
        if devices.len() < AVERAGED_DEVICES {
            tracing::warn!(
                "Cannot average '{}': {} of {} devices found",
                label,
                devices.len(),
                AVERAGED_DEVICES
            );
            return Ok(None);
        }
        collection_average(&devices).map(Some)
    }

    fn exact(labels: &[&str]) -> Vec<ExactLabel> {
        labels.iter().map(|l| ExactLabel::new(*l)).collect()
    }

    /// Print the speed-up LaTeX table and persist it as CSV.
    ///
    /// The multi-thread ratios become a column of the single-thread table.
    fn speedup_summary(
        averages: &mut BenchmarkCollection,
        ctx: &ReportContext<'_>,
        out: &mut dyn Write,
    ) -> BenchResult<PathBuf> {
        let labels = ctx.config.averages.labels();
        let multi = averages
            .get(&labels.multi_speedup)
            .ok_or_else(|| BenchError::MissingSeries(labels.multi_speedup.clone()))?
            .metric(SPEEDUP_COLUMN)?;
        let single = averages
            .get_mut(&labels.single_speedup)
            .ok_or_else(|| BenchError::MissingSeries(labels.single_speedup.clone()))?;
        single.set_metric(MULTI_SPEEDUP_COLUMN, multi)?;

        let summary = SummaryTable::from_measurements(
            single,
            BODIES_HEADER,
            &[
                (SPEEDUP_COLUMN, SINGLE_SPEEDUP_HEADER),
                (MULTI_SPEEDUP_COLUMN, MULTI_SPEEDUP_HEADER),
            ],
        )?;
        writeln!(out, "\nSpeed-Up results as Latex table:\n")?;
        writeln!(out, "{}", summary.render(TableFormat::Latex)?)?;

        let path = ctx.output_dir.join("avg_speedup_linux.csv");
        DataFrameHandler::write_csv(&mut single.frame().clone(), &path)?;
        Ok(path)
    }
}

impl ReportGenerator for AverageValuesReport {
    fn kind(&self) -> ReportKind {
        ReportKind::AverageValues
    }

    fn generate(
        &self,
        results: &BenchmarkCollection,
        ctx: &ReportContext<'_>,
        out: &mut dyn Write,
    ) -> BenchResult<Vec<PathBuf>> {
        let averages_config = &ctx.config.averages;
        let labels = averages_config.labels();
        let mut written = Vec::new();
        let mut averages = BenchmarkCollection::new();

        let multi = Self::average(
            results,
            &averages_config.multi_thread_cpu,
            &labels.multi_thread_cpu,
        )?;
        let single = Self::average(
            results,
            &averages_config.single_thread_cpu,
            &labels.single_thread_cpu,
        )?;
        let (Some(multi), Some(single)) = (multi, single) else {
            tracing::warn!("Skipping average report: CPU averages unavailable");
            return Ok(written);
        };
        averages.insert(labels.multi_thread_cpu.clone(), multi);
        averages.insert(labels.single_thread_cpu.clone(), single);

        written.push(ctx.chart(
            &averages,
            CALC_COLUMN,
            &ctx.average_chart_spec(
                "Single-Thread vs. Multi-Thread CPU Comparison (Calculation Time)",
                TIME_LABEL,
            ),
            "avg_multi_single_cpu_linux",
        )?);

        for kernel in &averages_config.gpu_kernels {
            if let Some(table) = Self::average(results, &kernel.pattern, &kernel.label)? {
                averages.insert(kernel.label.clone(), table);
            }
        }
        let has_gpu = averages.contains(&labels.gpu);

        if has_gpu {
            let gpu_cpu = filter_or(
                &averages,
                &Self::exact(&[labels.multi_thread_cpu.as_str(), labels.gpu.as_str()]),
            );
            written.push(ctx.chart(
                &gpu_cpu,
                CALC_COLUMN,
                &ctx.average_chart_spec("GPU vs. CPU (Calculation Time)", TIME_LABEL),
                "avg_calc_gpu_cpu_linux",
            )?);
            written.push(ctx.chart(
                &gpu_cpu,
                FPS_COLUMN,
                &ctx.average_chart_spec("GPU vs. CPU (Frames per Second)", FPS_LABEL),
                "avg_fps_gpu_cpu_linux",
            )?);
        } else {
            tracing::warn!("Skipping GPU vs. CPU charts: '{}' unavailable", labels.gpu);
        }

        let kernel_labels: Vec<&str> = averages_config
            .gpu_kernels
            .iter()
            .map(|k| k.label.as_str())
            .collect();
        let kernels = filter_or(&averages, &Self::exact(&kernel_labels));
        if kernels.is_empty() {
            tracing::warn!("Skipping GPU kernel charts: no kernel averages available");
        } else {
            written.push(ctx.chart(
                &kernels,
                CALC_COLUMN,
                &ctx.average_chart_spec("GPU Kernel Comparison (Calculation Time)", TIME_LABEL),
                "avg_calc_gpu_kernel_linux",
            )?);
            written.push(ctx.chart(
                &kernels,
                FPS_COLUMN,
                &ctx.average_chart_spec("GPU Kernel Comparison (Frames per Second)", FPS_LABEL),
                "avg_fps_gpu_kernel_linux",
            )?);
        }

        if has_gpu {
            append_average_speedups(&mut averages, &labels)?;
            let speedups = filter_or(
                &averages,
                &Self::exact(&[
                    labels.single_speedup.as_str(),
                    labels.multi_speedup.as_str(),
                ]),
            );
            written.push(ctx.chart(
                &speedups,
                SPEEDUP_COLUMN,
                &ctx.average_chart_spec("Speed-Up between GPU and CPU", "Speed-Up"),
                "avg_speedup_linux",
            )?);
        }

        write!(out, "{}", averages)?;
        if has_gpu {
            written.push(Self::speedup_summary(&mut averages, ctx, out)?);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use test_case::test_case;

    const NBODY: [i64; 3] = [100, 1000, 10000];

    fn table(calc: [f64; 3]) -> MeasurementTable {
        MeasurementTable::new(
            NBODY.to_vec(),
            vec![
                ("calc_avg", calc.to_vec()),
                ("fps_avg", calc.iter().map(|c| 1.0 / c).collect()),
            ],
        )
        .unwrap()
    }

    /// Three Linux machines, each with a GPU run of every kernel plus
    /// single- and multi-thread CPU runs
    fn results() -> BenchmarkCollection {
        let machines = [
            ("NVIDIA GeForce RTX 2080", "AMD Ryzen 9 5900X 12-Core Processor", 1.0),
            ("NVIDIA GeForce RTX 3070", "Intel(R) Core(TM) i5-6600K CPU @ 3.50GHz", 2.0),
            ("NVIDIA GeForce RTX 2070 SUPER", "AMD Ryzen 7 1800X Eight-Core Processor", 3.0),
        ];
        let mut c = BenchmarkCollection::new();
        for (gpu, cpu, scale) in machines {
            for kernel in ["nbody", "nbody_local", "nbody_async"] {
                c.insert(
                    format!("Linux (gcc) GPU ({}) Kernel: {}.cl", gpu, kernel),
                    table([0.001 * scale, 0.01 * scale, 0.1 * scale]),
                );
            }
            c.insert(
                format!("Linux (gcc) CPU ({}) Release Mode - with SIMD - with OpenMP", cpu),
                table([0.01 * scale, 0.1 * scale, 1.0 * scale]),
            );
            c.insert(
                format!("Linux (gcc) CPU ({}) Release Mode - with SIMD", cpu),
                table([0.1 * scale, 1.0 * scale, 10.0 * scale]),
            );
        }
        c.insert(
            "Windows (msvc) CPU (AMD Ryzen 7 1800X Eight-Core Processor) Release Mode - with SIMD - with OpenMP",
            table([0.02, 0.2, 2.0]),
        );
        c
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    #[test_case("linux_systems", ReportKind::LinuxSystems)]
    #[test_case("gpu-comparison-linux", ReportKind::GpuComparisonLinux)]
    #[test_case(" CPU_LINUX ", ReportKind::CpuLinux)]
    #[test_case("average_values", ReportKind::AverageValues)]
    fn test_report_kind_from_str(input: &str, expected: ReportKind) {
        assert_eq!(input.parse::<ReportKind>().unwrap(), expected);
    }

    #[test]
    fn test_report_kind_unknown() {
        assert!(matches!(
            "plot_everything".parse::<ReportKind>(),
            Err(BenchError::ConfigError(_))
        ));
        assert!(!ReportKind::LinuxSystems.requires_multiple_systems());
        assert!(ReportKind::AverageValues.requires_multiple_systems());
    }

    #[test]
    fn test_linux_systems_per_party() {
        let dir = tempdir().unwrap();
        let config = ReportConfig::default();
        let ctx = ReportContext::new(&config, dir.path(), true);
        let mut out = Vec::new();

        let written = LinuxSystemsReport
            .generate(&results(), &ctx, &mut out)
            .unwrap();

        let names = file_names(&written);
        assert_eq!(names.len(), 9);
        for index in 0..3 {
            assert!(names.contains(&format!("{}_speedup.svg", index)));
            assert!(names.contains(&format!("{}_fps_avg.svg", index)));
            assert!(names.contains(&format!("{}_calc_avg.svg", index)));
        }

        // one grid table per party; single-thread speed-up is 100, multi 10
        let console = String::from_utf8(out).unwrap();
        assert_eq!(console.matches("Single-Thread Speed-Up").count(), 3);
        assert!(console.contains(" 100 |"));
        assert!(console.contains(" 10 |"));
    }

    #[test]
    fn test_linux_systems_single_machine() {
        let dir = tempdir().unwrap();
        let config = ReportConfig::default();
        let ctx = ReportContext::new(&config, dir.path(), false);

        let written = LinuxSystemsReport
            .generate(&results(), &ctx, &mut std::io::sink())
            .unwrap();

        assert_eq!(
            file_names(&written),
            vec!["0_speedup.svg", "0_fps_avg.svg", "0_calc_avg.svg"]
        );
    }

    #[test]
    fn test_linux_systems_skips_missing_speedup() {
        let dir = tempdir().unwrap();
        let config = ReportConfig::default();
        let ctx = ReportContext::new(&config, dir.path(), false);
        let mut only_gpu = BenchmarkCollection::new();
        only_gpu.insert("Linux (gcc) GPU (X) Kernel: nbody.cl", table([1.0, 2.0, 3.0]));

        let written = LinuxSystemsReport
            .generate(&only_gpu, &ctx, &mut std::io::sink())
            .unwrap();
        assert_eq!(file_names(&written), vec!["0_fps_avg.svg", "0_calc_avg.svg"]);
    }

    #[test]
    fn test_gpu_comparison_selects_reference_kernel() {
        let dir = tempdir().unwrap();
        let config = ReportConfig::default();
        let ctx = ReportContext::new(&config, dir.path(), true);

        let written = GpuComparisonReport
            .generate(&results(), &ctx, &mut std::io::sink())
            .unwrap();
        assert_eq!(file_names(&written), vec!["gpu_fps_avg.svg", "gpu_calc_avg.svg"]);

        let svg = std::fs::read_to_string(&written[1]).unwrap();
        assert_eq!(svg.matches("<polyline").count(), 3);
        assert!(!svg.contains("nbody_local"));
    }

    #[test]
    fn test_cpu_linux_windows() {
        let dir = tempdir().unwrap();
        let config = ReportConfig::default();
        let ctx = ReportContext::new(&config, dir.path(), true);

        let written = CpuLinuxWindowsReport
            .generate(&results(), &ctx, &mut std::io::sink())
            .unwrap();
        let multi = std::fs::read_to_string(&written[0]).unwrap();
        assert!(multi.contains("Windows (msvc)"));
        assert_eq!(multi.matches("<polyline").count(), 2);
    }

    #[test]
    fn test_cpu_linux() {
        let dir = tempdir().unwrap();
        let config = ReportConfig::default();
        let ctx = ReportContext::new(&config, dir.path(), true);

        let written = CpuLinuxReport
            .generate(&results(), &ctx, &mut std::io::sink())
            .unwrap();
        assert_eq!(
            file_names(&written),
            vec!["multi_cpu_linux_calc_avg.svg", "single_cpu_linux_calc_avg.svg"]
        );
        let multi = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(multi.matches("<polyline").count(), 3);
        assert!(!multi.contains("Windows"));
    }

    #[test]
    fn test_average_values() {
        let dir = tempdir().unwrap();
        let config = ReportConfig::default();
        let ctx = ReportContext::new(&config, dir.path(), true);
        let mut out = Vec::new();

        let written = AverageValuesReport
            .generate(&results(), &ctx, &mut out)
            .unwrap();

        assert_eq!(
            file_names(&written),
            vec![
                "avg_multi_single_cpu_linux.svg",
                "avg_calc_gpu_cpu_linux.svg",
                "avg_fps_gpu_cpu_linux.svg",
                "avg_calc_gpu_kernel_linux.svg",
                "avg_fps_gpu_kernel_linux.svg",
                "avg_speedup_linux.svg",
                "avg_speedup_linux.csv",
            ]
        );

        let console = String::from_utf8(out).unwrap();
        assert!(console.contains("Multi-Core CPU vs. GPU"));
        assert!(console.contains("Speed-Up results as Latex table:"));
        assert!(console.contains("\\begin{tabular}{rrr}"));

        let csv = std::fs::read_to_string(dir.path().join("avg_speedup_linux.csv")).unwrap();
        let header = csv.lines().next().unwrap();
        assert!(header.contains("speedup") && header.contains("multi_speedup"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_average_values_skips_without_cpu_triples() {
        let dir = tempdir().unwrap();
        let config = ReportConfig::default();
        let ctx = ReportContext::new(&config, dir.path(), true);
        let mut out = Vec::new();

        let mut partial = BenchmarkCollection::new();
        partial.insert(
            "Linux (gcc) CPU (A) Release Mode - with SIMD - with OpenMP",
            table([1.0, 2.0, 3.0]),
        );

        let written = AverageValuesReport
            .generate(&partial, &ctx, &mut out)
            .unwrap();
        assert!(written.is_empty());
        assert!(out.is_empty());
    }
}
