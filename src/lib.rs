//! dirsort - sort the files of a directory into category subfolders
//!
//! This library classifies files by extension, picks collision-free
//! destination names, plans the moves for a directory's top-level files,
//! applies or simulates them with per-move failure tolerance, and reports
//! per-category counts as text, JSON or a terminal chart.

pub mod chart;
pub mod cli;
pub mod config;
pub mod destination;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod planner;

pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use destination::resolve;
pub use file_category::{Category, FileMapper, categorize};
pub use file_organizer::{
    CategoryCounts, ExecutionMode, ExecutionReport, MoveExecutor, MoveOutcome, OrganizeError,
    PlannedMove, execute,
};
pub use planner::{MovePlanner, plan};

pub use cli::{Cli, CliError, run_cli};
