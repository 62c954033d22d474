pub mod aggregator;
pub mod bench_config;
pub mod config_manager;
pub mod dataframe_handler;
pub mod errors;
pub mod loader;
pub mod measurement;
pub mod reporting;
pub mod runners;
pub mod selector;

// Re-export main components for easier use
pub use bench_config::ReportConfig;
pub use config_manager::ConfigManager;
pub use dataframe_handler::DataFrameHandler;
pub use errors::{BenchError, BenchResult};
pub use loader::{load_benchmarks, LoadedBenchmarks, SourceLayout};
pub use measurement::{BenchmarkCollection, BenchmarkRecord, MeasurementTable};
pub use reporting::ReportKind;
pub use runners::ReportRunner;
pub use selector::{filter_and, filter_or, find_first, LabelPredicate, Pattern};
