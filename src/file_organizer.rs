/// Move execution for planned file organization.
///
/// This module applies (or simulates) a list of planned moves, creating
/// category subdirectories on demand and tallying how many files ended up in
/// each category. A failed move is reported and skipped; it never aborts the
/// rest of the batch.
use crate::file_category::Category;
use crate::output::OutputFormatter;
use indicatif::ProgressBar;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during file organization.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The root directory could not be listed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDirectory { path: PathBuf, source: io::Error },

    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    /// Failed to move a file to its destination.
    #[error("Failed to move {} to {}: {error}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: io::Error,
    },

    /// Something appeared at the destination after planning.
    #[error("Destination already exists: {}", .path.display())]
    DestinationOccupied { path: PathBuf },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A computed move that has not been applied yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// The file to move. A regular file at plan time.
    pub source: PathBuf,
    /// Where the file should go. Did not exist at plan time.
    pub destination: PathBuf,
    pub category: Category,
}

impl PlannedMove {
    pub fn source_name(&self) -> String {
        file_name_lossy(&self.source)
    }

    pub fn destination_name(&self) -> String {
        file_name_lossy(&self.destination)
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Per-category file counts.
///
/// Always holds every category, zero counts included, and iterates in the
/// fixed reporting order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: [usize; Category::ALL.len()],
}

impl CategoryCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    pub fn increment(&mut self, category: Category) {
        self.counts[category.index()] += 1;
    }

    /// Sum over all categories.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Every category with its count, in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    /// Only the categories with at least one file, in reporting order.
    pub fn non_zero(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        self.iter().filter(|(_, count)| *count > 0)
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, count) in self.iter() {
            map.serialize_entry(category.dir_name(), &count)?;
        }
        map.end()
    }
}

/// Whether moves are applied to disk or only counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Simulate,
    Commit,
}

impl ExecutionMode {
    pub fn from_simulate(simulate: bool) -> Self {
        if simulate {
            ExecutionMode::Simulate
        } else {
            ExecutionMode::Commit
        }
    }
}

/// What happened to a single planned move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Simulated,
    Moved,
    Skipped { reason: String },
}

/// A planned move together with its outcome.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub planned: PlannedMove,
    pub outcome: MoveOutcome,
}

/// The result of running a plan.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub counts: CategoryCounts,
    pub records: Vec<MoveRecord>,
}

impl ExecutionReport {
    /// Number of files actually moved on disk.
    pub fn moved(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == MoveOutcome::Moved)
            .count()
    }

    /// Moves that failed, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (&PlannedMove, &str)> {
        self.records.iter().filter_map(|r| match &r.outcome {
            MoveOutcome::Skipped { reason } => Some((&r.planned, reason.as_str())),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.skipped().next().is_some()
    }
}

/// Applies or simulates planned moves, strictly in order.
#[derive(Default)]
pub struct MoveExecutor {
    progress: Option<ProgressBar>,
    quiet: bool,
}

impl MoveExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance `progress` once per move. Log lines are routed through it.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Suppress the per-move MOVE/SKIP lines.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Runs every move and returns the counts plus per-move outcomes.
    ///
    /// A failing move is recorded as [`MoveOutcome::Skipped`], is not
    /// counted, and processing continues with the next move.
    pub fn run(&self, moves: &[PlannedMove], mode: ExecutionMode) -> ExecutionReport {
        let mut report = ExecutionReport::default();

        for planned in moves {
            let outcome = match mode {
                ExecutionMode::Simulate => {
                    report.counts.increment(planned.category);
                    self.emit(OutputFormatter::dry_run_line(planned));
                    MoveOutcome::Simulated
                }
                ExecutionMode::Commit => match Self::commit(planned) {
                    Ok(()) => {
                        report.counts.increment(planned.category);
                        self.emit(OutputFormatter::move_line(planned));
                        MoveOutcome::Moved
                    }
                    Err(e) => {
                        let reason = e.to_string();
                        tracing::warn!(
                            source = %planned.source.display(),
                            destination = %planned.destination.display(),
                            error = %reason,
                            "move skipped"
                        );
                        self.emit(OutputFormatter::skip_line(planned, &reason));
                        MoveOutcome::Skipped { reason }
                    }
                },
            };

            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
            report.records.push(MoveRecord {
                planned: planned.clone(),
                outcome,
            });
        }

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }
        report
    }

    fn emit(&self, line: String) {
        if self.quiet {
            return;
        }
        // println on a bar is dropped when stderr is not a terminal
        match &self.progress {
            Some(pb) => pb.suspend(|| OutputFormatter::plain(&line)),
            None => OutputFormatter::plain(&line),
        }
    }

    /// Moves one file on disk, creating the category directory as needed.
    ///
    /// Refuses to overwrite: a destination that appeared after planning is
    /// an error.
    pub fn commit(planned: &PlannedMove) -> OrganizeResult<()> {
        if let Some(parent) = planned.destination.parent() {
            fs::create_dir_all(parent).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        if planned.destination.symlink_metadata().is_ok() {
            return Err(OrganizeError::DestinationOccupied {
                path: planned.destination.clone(),
            });
        }

        let to_failure = |error: io::Error| OrganizeError::FileMoveFailure {
            from: planned.source.clone(),
            to: planned.destination.clone(),
            error,
        };

        match fs::rename(&planned.source, &planned.destination) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                tracing::warn!(error = %e, "rename crossed devices, falling back to copy+remove");
                fs::copy(&planned.source, &planned.destination).map_err(to_failure)?;
                fs::remove_file(&planned.source).map_err(to_failure)?;
                Ok(())
            }
            Err(e) => Err(to_failure(e)),
        }
    }
}

/// Applies or simulates `moves` and returns the per-category counts.
///
/// # Examples
///
/// ```no_run
/// use dirsort::file_organizer::execute;
/// use dirsort::planner::plan;
/// use std::path::Path;
///
/// let moves = plan(Path::new("/path/to/Downloads")).unwrap();
/// let counts = execute(&moves, true);
/// println!("{} files would be organized", counts.total());
/// ```
pub fn execute(moves: &[PlannedMove], simulate: bool) -> CategoryCounts {
    MoveExecutor::new()
        .run(moves, ExecutionMode::from_simulate(simulate))
        .counts
}
