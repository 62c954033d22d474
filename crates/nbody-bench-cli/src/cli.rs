use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::commands::list::handle_list;
use crate::commands::report::handle_report;
use crate::commands::show_config::handle_show_config;
use crate::logging::setup_logging;
use nbody_bench::ReportKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "nbody-bench",
    author,
    version,
    about = "Charts and tables from n-body benchmark results",
    long_about = None
)]
pub struct Cli {
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v info, -vv debug, -vvv trace)",
        long_help = "Increase log verbosity. Repeat for more detail. RUST_LOG takes precedence when set."
    )]
    pub verbose: u8,

    #[arg(
        long,
        value_name = "PATH",
        global = true,
        help = "Also write logs to this file",
        long_help = "Write logs to this file in addition to stderr. When PATH is an existing directory, a timestamped log file is created inside it."
    )]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Where to read configuration and benchmarks from, and where to write
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct SourceArgs {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Report configuration file (TOML)",
        long_help = "Path to a TOML file overriding the built-in report configuration. Missing keys keep their defaults."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Root of the per-system benchmark directories",
        long_help = "Directory holding one sub-directory of benchmark files per system. Used when it exists."
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory of benchmark files from a single system",
        long_help = "Directory of benchmark files read when the per-system root does not exist."
    )]
    pub benchmarks_dir: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "DIR",
        help = "Directory receiving charts and CSV files"
    )]
    pub output_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate charts and tables
    #[command(about = "Generate charts and tables from benchmark results")]
    Report {
        #[command(flatten)]
        sources: SourceArgs,

        #[arg(
            long = "only",
            value_name = "REPORT",
            help = "Run only this report (repeatable)",
            long_help = "Run only the named report. Repeat to run several. One of: linux_systems, gpu_comparison_linux, cpu_linux_windows, cpu_linux, average_values."
        )]
        only: Vec<ReportKind>,
    },

    /// List loaded benchmark series
    #[command(about = "List loaded benchmark series and the directory layout used")]
    List {
        #[command(flatten)]
        sources: SourceArgs,

        #[arg(
            long,
            value_enum,
            default_value_t = OutputFormat::Text,
            help = "Output format"
        )]
        format: OutputFormat,
    },

    /// Print the effective configuration
    #[command(about = "Print the effective report configuration as TOML")]
    ShowConfig {
        #[command(flatten)]
        sources: SourceArgs,
    },
}

pub fn cli() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Some(Command::Report { sources, only }) => handle_report(&sources, &only),
        Some(Command::List { sources, format }) => handle_list(&sources, format),
        Some(Command::ShowConfig { sources }) => handle_show_config(&sources),
        None => handle_report(&SourceArgs::default(), &[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["nbody-bench"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_report_arguments() {
        let cli = Cli::try_parse_from([
            "nbody-bench",
            "report",
            "--data-dir",
            "runs",
            "-o",
            "charts",
            "--only",
            "cpu_linux",
            "--only",
            "average-values",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Report { sources, only }) => {
                assert_eq!(sources.data_dir, Some(PathBuf::from("runs")));
                assert_eq!(sources.output_dir, Some(PathBuf::from("charts")));
                assert_eq!(only, vec![ReportKind::CpuLinux, ReportKind::AverageValues]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_report_is_rejected() {
        assert!(Cli::try_parse_from(["nbody-bench", "report", "--only", "everything"]).is_err());
    }

    #[test]
    fn test_list_format() {
        let cli = Cli::try_parse_from(["nbody-bench", "list", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::List {
                format: OutputFormat::Json,
                ..
            })
        ));
    }
}
