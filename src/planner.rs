//! Move planning.
//!
//! Builds the to-do list of moves for one directory without touching the
//! filesystem. Only direct children that are regular files are considered.

use crate::config::{CompiledFilters, LOCAL_CONFIG_FILE};
use crate::destination::{FsOccupancy, Occupancy, Reserved, resolve_with};
use crate::file_category::FileMapper;
use crate::file_organizer::{OrganizeError, OrganizeResult, PlannedMove};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Plans the moves for `root` with default filters.
pub fn plan(root: &Path) -> OrganizeResult<Vec<PlannedMove>> {
    MovePlanner::new(CompiledFilters::allow_all()).plan(root)
}

/// Pairs every top-level file of a directory with its destination.
pub struct MovePlanner<'a, O: Occupancy = FsOccupancy> {
    mapper: &'a FileMapper,
    filters: CompiledFilters,
    occupancy: O,
    protected: HashSet<PathBuf>,
}

impl MovePlanner<'static, FsOccupancy> {
    pub fn new(filters: CompiledFilters) -> Self {
        Self {
            mapper: FileMapper::global(),
            filters,
            occupancy: FsOccupancy,
            protected: HashSet::new(),
        }
    }
}

impl<'a, O: Occupancy> MovePlanner<'a, O> {
    /// Swap the existence oracle, e.g. for a simulated directory state.
    pub fn with_occupancy<P: Occupancy>(self, occupancy: P) -> MovePlanner<'a, P> {
        MovePlanner {
            mapper: self.mapper,
            filters: self.filters,
            occupancy,
            protected: self.protected,
        }
    }

    /// Never move `path`, e.g. the configuration file driving this run.
    pub fn protect(mut self, path: &Path) -> Self {
        match fs::canonicalize(path) {
            Ok(canonical) => {
                self.protected.insert(canonical);
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot protect path");
            }
        }
        self
    }

    fn is_protected(&self, name: &OsStr, source: &Path) -> bool {
        if name == LOCAL_CONFIG_FILE {
            return true;
        }
        !self.protected.is_empty()
            && fs::canonicalize(source).is_ok_and(|c| self.protected.contains(&c))
    }

    /// Lists the regular files directly under `root`, in listing order.
    pub fn scan_top_level(&self, root: &Path) -> OrganizeResult<Vec<PathBuf>> {
        let entries = fs::read_dir(root).map_err(|e| OrganizeError::ReadDirectory {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() {
                        files.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                }
            }
        }
        Ok(files)
    }

    /// Computes the ordered list of moves for `root`.
    ///
    /// Destinations already claimed by an earlier move in the same plan are
    /// treated as taken, so no two moves share a destination.
    pub fn plan(&self, root: &Path) -> OrganizeResult<Vec<PlannedMove>> {
        let mut moves = Vec::new();
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for source in self.scan_top_level(root)? {
            let Some(name) = source.file_name() else {
                continue;
            };

            if self.is_protected(name, &source) {
                tracing::debug!(file = %source.display(), "configuration file, not moved");
                continue;
            }

            if !self.filters.should_include(&name.to_string_lossy()) {
                tracing::debug!(file = %source.display(), "excluded by filters");
                continue;
            }

            let category = self.mapper.categorize(&source);
            let occupancy = Reserved {
                inner: &self.occupancy,
                claimed: &claimed,
            };
            let destination = resolve_with(&occupancy, &root.join(category.dir_name()), name);

            claimed.insert(destination.clone());
            moves.push(PlannedMove {
                source,
                destination,
                category,
            });
        }

        tracing::debug!(root = %root.display(), planned = moves.len(), "plan complete");
        Ok(moves)
    }
}
