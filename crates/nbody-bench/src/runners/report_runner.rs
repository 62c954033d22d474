use crate::bench_config::ReportConfig;
use crate::config_manager::ConfigManager;
use crate::errors::BenchResult;
use crate::loader::{load_benchmarks, LoadedBenchmarks, SourceLayout};
use crate::reporting::{generator_for, ReportContext, ReportKind};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// What a run produced
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub layout: SourceLayout,
    /// Number of benchmark series loaded
    pub series: usize,
    pub executed: Vec<ReportKind>,
    /// Reports left out because the data covers a single machine
    pub skipped: Vec<ReportKind>,
    pub files: Vec<PathBuf>,
}

/// Loads benchmarks and runs the selected reports over them
pub struct ReportRunner {
    config: ReportConfig,
}

impl ReportRunner {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Create a runner from a resolved configuration manager
    pub fn from_config_manager(config_manager: ConfigManager) -> BenchResult<Self> {
        Ok(Self::new(config_manager.finish()?))
    }

    pub fn load(&self) -> BenchResult<LoadedBenchmarks> {
        load_benchmarks(&self.config.sources)
    }

    /// Load the benchmarks and run `only` (every report when empty)
    pub fn run(&self, only: &[ReportKind], out: &mut dyn Write) -> BenchResult<ReportSummary> {
        let loaded = self.load()?;
        self.run_loaded(&loaded, only, out)
    }

    /// Run reports over already loaded benchmarks
    pub fn run_loaded(
        &self,
        loaded: &LoadedBenchmarks,
        only: &[ReportKind],
        out: &mut dyn Write,
    ) -> BenchResult<ReportSummary> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir)?;

        let multiple_systems = loaded.multiple_systems();
        let ctx = ReportContext::new(&self.config, output_dir, multiple_systems);
        let selected: Vec<ReportKind> = if only.is_empty() {
            ReportKind::ALL.to_vec()
        } else {
            ReportKind::ALL
                .into_iter()
                .filter(|kind| only.contains(kind))
                .collect()
        };

        tracing::info!(
            "Running {} reports over {} benchmark series",
            selected.len(),
            loaded.results.len()
        );

        let mut summary = ReportSummary {
            layout: loaded.layout,
            series: loaded.results.len(),
            executed: Vec::new(),
            skipped: Vec::new(),
            files: Vec::new(),
        };

        for kind in selected {
            if kind.requires_multiple_systems() && !multiple_systems {
                tracing::info!("Skipping report {}: benchmarks of a single system", kind);
                summary.skipped.push(kind);
                continue;
            }

            tracing::info!("Generating report {}", kind);
            let files = generator_for(kind).generate(&loaded.results, &ctx, out)?;
            tracing::debug!("Report {} wrote {} files", kind, files.len());
            summary.files.extend(files);
            summary.executed.push(kind);
        }

        tracing::info!(
            "Generated {} files in {}",
            summary.files.len(),
            output_dir.display()
        );
        Ok(summary)
    }
}
