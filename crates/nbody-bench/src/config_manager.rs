use crate::bench_config::ReportConfig;
use crate::errors::{util, BenchError, BenchResult};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the report output directory
pub const OUTPUT_DIR_ENV: &str = "NBODY_BENCH_OUTPUT_DIR";
/// Environment variable overriding the nested data root
pub const DATA_DIR_ENV: &str = "NBODY_BENCH_DATA_DIR";
/// Environment variable overriding the flat benchmarks directory
pub const BENCHMARKS_DIR_ENV: &str = "NBODY_BENCH_BENCHMARKS_DIR";

/// Resolves the report configuration from file, environment and overrides.
///
/// Precedence, lowest first: built-in defaults, TOML file, environment,
/// explicit overrides.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ReportConfig,
}

impl ConfigManager {
    /// Create a new ConfigManager from a TOML string
    pub fn from_string(config_str: &str) -> BenchResult<Self> {
        let config = ReportConfig::from_toml_str(config_str)?;
        Ok(Self { config })
    }

    /// Load from an optional TOML file; `None` means built-in defaults
    pub fn load(path: Option<&Path>) -> BenchResult<Self> {
        match path {
            Some(path) => {
                util::ensure_file_exists(path)?;
                let content = fs::read_to_string(path).map_err(|e| {
                    BenchError::ConfigError(format!(
                        "Failed to read config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                tracing::debug!("Loaded report configuration from {}", path.display());
                Self::from_string(&content)
            }
            None => Ok(Self {
                config: ReportConfig::default(),
            }),
        }
    }

    /// Get a reference to the underlying configuration
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn into_config(self) -> ReportConfig {
        self.config
    }

    /// Apply directory overrides from the process environment
    pub fn with_process_env(self) -> Self {
        self.with_env_vars(env::vars())
    }

    /// Apply directory overrides from the given key-value pairs
    pub fn with_env_vars<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                OUTPUT_DIR_ENV => self.config.output_dir = PathBuf::from(value),
                DATA_DIR_ENV => self.config.sources.nested_root = PathBuf::from(value),
                BENCHMARKS_DIR_ENV => self.config.sources.flat_root = PathBuf::from(value),
                _ => continue,
            }
            tracing::debug!("Configuration override from {}={}", key, value);
        }
        self
    }

    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.config.output_dir = dir;
        }
        self
    }

    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.config.sources.nested_root = dir;
        }
        self
    }

    pub fn with_benchmarks_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.config.sources.flat_root = dir;
        }
        self
    }

    /// Validate the final configuration and hand it out
    pub fn finish(self) -> BenchResult<ReportConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
