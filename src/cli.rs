//! Command-line interface module for dirsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Root directory validation
//! - Organization orchestration (plan, execute, report)
//! - Optional JSON counts and chart output

use crate::chart;
use crate::config::{ConfigError, FilterConfig};
use crate::file_organizer::{ExecutionMode, ExecutionReport, MoveExecutor, OrganizeError};
use crate::output::OutputFormatter;
use crate::planner::MovePlanner;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Exit code for a missing or non-directory root.
pub const EXIT_INVALID_ROOT: u8 = 2;
/// Exit code for any other fatal error.
pub const EXIT_FAILURE: u8 = 1;

/// Organize files in a folder into Images, Documents, Videos, Audio,
/// Archives, Code, eBooks and Others based on extension.
#[derive(Debug, Clone, Parser)]
#[command(name = "dirsort", version)]
pub struct Cli {
    /// Path to the folder to organize
    pub folder: PathBuf,

    /// Show what would happen without moving files
    #[arg(long)]
    pub simulate: bool,

    /// Show a chart of the counts after the summary
    #[arg(long)]
    pub plot_pie: bool,

    /// Filter configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the final counts as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Options for organizing `folder` with every flag off.
    pub fn for_folder(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            simulate: false,
            plot_pie: false,
            config: None,
            json: false,
            verbose: 0,
        }
    }
}

/// Fatal errors surfaced to the process exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("The path must be an existing directory")]
    InvalidRoot { path: PathBuf },

    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Organize(#[from] OrganizeError),

    #[error("Error encoding counts: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidRoot { .. } => EXIT_INVALID_ROOT,
            _ => EXIT_FAILURE,
        }
    }
}

/// Checks that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> Result<(), CliError> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(CliError::InvalidRoot {
            path: root.to_path_buf(),
        })
    }
}

/// Runs one organization pass as described by `cli`.
///
/// Validates the root, loads filters, plans, executes (or simulates), prints
/// the summary and the optional JSON counts and chart. Per-move failures are
/// reported but do not make this function fail.
///
/// # Examples
///
/// ```no_run
/// use dirsort::cli::{Cli, run_cli};
///
/// let mut cli = Cli::for_folder("/path/to/Downloads");
/// cli.simulate = true;
/// match run_cli(&cli) {
///     Ok(report) => println!("{} files", report.counts.total()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<ExecutionReport, CliError> {
    let root = cli.folder.as_path();
    validate_root(root)?;

    let (config, config_file) = FilterConfig::load_with_source(cli.config.as_deref())?;
    let mut planner = MovePlanner::new(config.compile()?);
    if let Some(path) = &config_file {
        planner = planner.protect(path);
    }
    let moves = planner.plan(root)?;
    let mode = ExecutionMode::from_simulate(cli.simulate);
    tracing::info!(root = %root.display(), files = moves.len(), ?mode, "organizing");

    let report = match mode {
        ExecutionMode::Simulate => {
            OutputFormatter::info(&format!("Simulating organization of: {}", root.display()));
            MoveExecutor::new().run(&moves, mode)
        }
        ExecutionMode::Commit => {
            OutputFormatter::info(&format!("Organizing contents of: {}", root.display()));
            let progress = OutputFormatter::create_progress_bar(moves.len() as u64);
            MoveExecutor::new().with_progress(progress).run(&moves, mode)
        }
    };

    OutputFormatter::print_summary(&report.counts);

    if report.has_failures() {
        let failed = report.skipped().count();
        OutputFormatter::warning(&format!(
            "{} file{} could not be organized. Please review the SKIP lines above.",
            failed,
            if failed == 1 { "" } else { "s" }
        ));
    }

    match mode {
        ExecutionMode::Simulate => OutputFormatter::dry_run_notice("No files were modified."),
        ExecutionMode::Commit if report.moved() > 0 => {
            OutputFormatter::success(&format!("Moved {} files.", report.moved()))
        }
        ExecutionMode::Commit => {}
    }

    if cli.json {
        OutputFormatter::plain(&serde_json::to_string_pretty(&report.counts)?);
    }

    if cli.plot_pie {
        chart::show_chart(&report.counts);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["dirsort", ".", "--simulate", "--plot-pie"]);
        assert!(cli.simulate);
        assert!(cli.plot_pie);
        assert!(!cli.json);
        assert_eq!(cli.folder, PathBuf::from("."));
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["dirsort", "/tmp/downloads"]);
        assert!(!cli.simulate);
        assert!(!cli.plot_pie);
        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_config_and_verbosity() {
        let cli = Cli::parse_from(["dirsort", "dl", "--config", "rules.toml", "-vv", "--json"]);
        assert_eq!(cli.config, Some(PathBuf::from("rules.toml")));
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
    }

    #[test]
    fn test_folder_is_required() {
        assert!(Cli::try_parse_from(["dirsort"]).is_err());
    }

    #[test]
    fn test_invalid_root_exit_code_and_message() {
        let err = validate_root(Path::new("/non/existent/path")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INVALID_ROOT);
        assert_eq!(err.to_string(), "The path must be an existing directory");
    }

    #[test]
    fn test_config_error_exit_code() {
        let err = CliError::from(ConfigError::Invalid("bad".to_string()));
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }
}
