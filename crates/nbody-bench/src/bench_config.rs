use crate::aggregator::AverageLabels;
use crate::errors::BenchResult;
use crate::selector::{compile_patterns, Pattern};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where benchmark files are read from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Root of the nested layout (`<root>/<group>/*.csv`)
    pub nested_root: PathBuf,
    /// Flat legacy directory (`<dir>/*.csv`)
    pub flat_root: PathBuf,
    /// File extension of benchmark files, without the dot
    pub extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            nested_root: PathBuf::from("data"),
            flat_root: PathBuf::from("../benchmarks"),
            extension: "csv".to_string(),
        }
    }
}

/// A GPU pattern and a CPU pattern describing one machine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Party {
    pub gpu: String,
    pub cpu: String,
}

impl Party {
    pub fn new(gpu: &str, cpu: &str) -> Self {
        Self {
            gpu: gpu.to_string(),
            cpu: cpu.to_string(),
        }
    }

    pub fn patterns(&self) -> BenchResult<Vec<Pattern>> {
        compile_patterns(&[&self.gpu, &self.cpu])
    }
}

/// Patterns identifying operating system and device class in a label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatternConfig {
    pub linux: String,
    pub gpu_kernel: String,
    pub cpu_multi_thread: String,
    pub cpu_single_thread: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            linux: r"^Linux.*".to_string(),
            gpu_kernel: r".*Kernel: nbody.cl$".to_string(),
            cpu_multi_thread: r".*- with SIMD - with OpenMP$".to_string(),
            cpu_single_thread: r".*- with SIMD$".to_string(),
        }
    }
}

/// One averaged GPU kernel: label in the working collection plus the
/// pattern selecting its three devices
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KernelAverage {
    pub label: String,
    pub pattern: String,
}

/// Patterns selecting the device triples that get averaged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AverageConfig {
    pub multi_thread_cpu: String,
    pub single_thread_cpu: String,
    /// The first kernel is the reference for speed-up charts
    pub gpu_kernels: Vec<KernelAverage>,
}

impl Default for AverageConfig {
    fn default() -> Self {
        let kernel = |name: &str| KernelAverage {
            label: format!("GPU Kernel: {}.cl", name),
            pattern: format!(r"^Linux \(gcc\) GPU.*Kernel: {}\.cl$", name),
        };
        Self {
            multi_thread_cpu: r"^Linux \(gcc\) CPU.*Release Mode - with SIMD - with OpenMP$"
                .to_string(),
            single_thread_cpu: r"^Linux \(gcc\) CPU.*Release Mode - with SIMD$".to_string(),
            gpu_kernels: vec![kernel("nbody"), kernel("nbody_local"), kernel("nbody_async")],
        }
    }
}

impl AverageConfig {
    /// Labels of the averaged series, using the first kernel as GPU reference
    pub fn labels(&self) -> AverageLabels {
        let mut labels = AverageLabels::default();
        if let Some(reference) = self.gpu_kernels.first() {
            labels.gpu = reference.label.clone();
        }
        labels
    }
}

/// Chart geometry and font sizes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartDefaults {
    pub width: u32,
    pub height: u32,
    pub speedup_width: u32,
    pub speedup_height: u32,
    pub speedup_font_size: u32,
    pub font_size: u32,
    pub average_font_size: u32,
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 800,
            speedup_width: 1000,
            speedup_height: 600,
            speedup_font_size: 16,
            font_size: 12,
            average_font_size: 20,
        }
    }
}

/// Everything the report suite needs to know about its inputs and outputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub gpu_models: Vec<String>,
    pub cpu_models: Vec<String>,
    /// CPU benchmarked on both Windows and Linux
    pub cross_os_cpu: String,
    pub sources: SourceConfig,
    pub patterns: PatternConfig,
    pub parties: Vec<Party>,
    pub averages: AverageConfig,
    pub chart: ChartDefaults,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let rtx_2080 = r".*NVIDIA GeForce RTX 2080.*";
        let rtx_3070 = r".*GeForce RTX 3070.*";
        let rtx_2070 = r".*GeForce RTX 2070 SUPER.*";
        let ryzen_9 = r".*AMD Ryzen 9 5900X 12-Core Processor.*";
        let core_i5 = r".*Intel\(R\) Core\(TM\) i5-6600K CPU @ 3.50GHz.*";
        let ryzen_7 = r".*AMD Ryzen 7 1800X Eight-Core Processor.*";

        Self {
            output_dir: PathBuf::from("results"),
            gpu_models: vec![rtx_2080.into(), rtx_3070.into(), rtx_2070.into()],
            cpu_models: vec![ryzen_7.into(), ryzen_9.into(), core_i5.into()],
            cross_os_cpu: ryzen_7.to_string(),
            sources: SourceConfig::default(),
            patterns: PatternConfig::default(),
            parties: vec![
                Party::new(rtx_2080, ryzen_9),
                Party::new(rtx_3070, core_i5),
                Party::new(rtx_2070, ryzen_7),
            ],
            averages: AverageConfig::default(),
            chart: ChartDefaults::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_toml_str(content: &str) -> BenchResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> BenchResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Every pattern in the configuration, for validation
    pub fn all_patterns(&self) -> Vec<&str> {
        let mut patterns = vec![
            self.patterns.linux.as_str(),
            self.patterns.gpu_kernel.as_str(),
            self.patterns.cpu_multi_thread.as_str(),
            self.patterns.cpu_single_thread.as_str(),
            self.cross_os_cpu.as_str(),
            self.averages.multi_thread_cpu.as_str(),
            self.averages.single_thread_cpu.as_str(),
        ];
        for party in &self.parties {
            patterns.push(&party.gpu);
            patterns.push(&party.cpu);
        }
        patterns.extend(self.gpu_models.iter().map(String::as_str));
        patterns.extend(self.cpu_models.iter().map(String::as_str));
        patterns.extend(self.averages.gpu_kernels.iter().map(|k| k.pattern.as_str()));
        patterns
    }

    /// Compile every pattern once so bad expressions fail before any report runs
    pub fn validate(&self) -> BenchResult<()> {
        compile_patterns(&self.all_patterns())?;
        Ok(())
    }
}
