//! Processing methods for the analyzer.
//!
//! Contains: dump discovery, `analyze_paths`, `analyze_dump`, `analyze_unit`
//! and fix application.

use super::types::{AnalysisReport, FileReport, LoadError, LoadFailure, UnitDump};
use super::Analyzer;
use crate::ast::TranslationUnit;
use crate::constants::{DEFAULT_EXCLUDE_FOLDERS, DUMP_SUFFIX};
use crate::dispatch::CheckDispatcher;
use crate::fix::{RewriteError, SourceRewriter};
use crate::source::SourceManager;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn is_dump(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(DUMP_SUFFIX))
}

impl Analyzer {
    /// Collects every dump under `root`, skipping excluded folders and
    /// honouring `.gitignore` files.
    #[must_use]
    pub fn collect_dumps(&self, root: &Path) -> Vec<PathBuf> {
        let excludes: Vec<String> = DEFAULT_EXCLUDE_FOLDERS()
            .iter()
            .map(|&s| s.to_owned())
            .chain(self.exclude_folders.iter().cloned())
            .collect();
        let root_for_filter = root.to_path_buf();

        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .filter_entry(move |entry| {
                if entry.path() == root_for_filter
                    || !entry.file_type().is_some_and(|ft| ft.is_dir())
                {
                    return true;
                }
                entry
                    .file_name()
                    .to_str()
                    .map_or(true, |name| !excludes.iter().any(|ex| ex == name))
            })
            .build();

        let mut dumps = Vec::new();
        for result in walker {
            match result {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_file()) && is_dump(entry.path()) {
                        dumps.push(entry.into_path());
                    }
                }
                Err(e) => tracing::debug!(error = %e, "skipping unreadable entry"),
            }
        }
        dumps.sort();
        dumps
    }

    /// Analyzes dump files and directories of dumps, in parallel.
    ///
    /// Dumps that fail to load are reported in [`AnalysisReport::load_errors`]
    /// and do not stop the run.
    #[must_use]
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> AnalysisReport {
        let mut dumps = Vec::new();
        for path in paths {
            if path.is_dir() {
                dumps.extend(self.collect_dumps(path));
            } else {
                dumps.push(path.clone());
            }
        }
        tracing::debug!(count = dumps.len(), "analyzing dumps");

        let results: Vec<Result<FileReport, LoadFailure>> = dumps
            .par_iter()
            .map(|dump| {
                self.analyze_dump(dump).map_err(|e| {
                    tracing::warn!(dump = %dump.display(), error = %e, "failed to load dump");
                    LoadFailure {
                        dump: dump.clone(),
                        error: e.to_string(),
                    }
                })
            })
            .collect();

        let mut files = Vec::with_capacity(results.len());
        let mut load_errors = Vec::new();
        for result in results {
            match result {
                Ok(report) => files.push(report),
                Err(failure) => load_errors.push(failure),
            }
        }
        AnalysisReport::from_parts(files, load_errors)
    }

    /// Loads one dump and analyzes its unit.
    ///
    /// # Errors
    ///
    /// [`LoadError`] if the dump or its source cannot be read, or the dump is malformed.
    pub fn analyze_dump(&self, dump_path: &Path) -> Result<FileReport, LoadError> {
        let text = fs::read_to_string(dump_path).map_err(|source| LoadError::Io {
            path: dump_path.to_path_buf(),
            source,
        })?;
        let dump: UnitDump = serde_json::from_str(&text).map_err(|source| LoadError::Json {
            path: dump_path.to_path_buf(),
            source,
        })?;

        let file = match dump_path.parent() {
            Some(dir) if dump.file.is_relative() => dir.join(&dump.file),
            _ => dump.file.clone(),
        };
        let source = match dump.source {
            Some(source) => source,
            None => fs::read_to_string(&file).map_err(|source| LoadError::Io {
                path: file.clone(),
                source,
            })?,
        };
        Ok(self.analyze_unit(file, source, &dump.unit))
    }

    /// Runs the selected checks over one unit whose main file reads `source`.
    #[must_use]
    pub fn analyze_unit(&self, file: PathBuf, source: String, unit: &TranslationUnit) -> FileReport {
        let sources = SourceManager::new(source.as_str()).with_scan_limit(self.scan_limit);
        let diagnostics = CheckDispatcher::new(&self.selection).run(unit, &sources);
        FileReport {
            file,
            source,
            diagnostics,
        }
    }
}

impl FileReport {
    /// Applies the edits of every diagnostic to the source.
    ///
    /// Each diagnostic's edits are all-or-nothing. A group overlapping edits
    /// already accepted is skipped with a warning. Returns `None` when there
    /// is nothing to apply.
    ///
    /// # Errors
    ///
    /// [`RewriteError`] if an accepted edit does not fall on character boundaries.
    pub fn apply_fixits(&self) -> Result<Option<String>, RewriteError> {
        let mut rewriter = SourceRewriter::new(self.source.as_str());
        for diagnostic in self.diagnostics.iter().filter(|d| !d.fixits.is_empty()) {
            if let Err(e) = rewriter.add_group(&diagnostic.fixits) {
                tracing::warn!(
                    file = %self.file.display(),
                    check = diagnostic.check,
                    line = diagnostic.line,
                    error = %e,
                    "skipping fix-it"
                );
            }
        }
        if !rewriter.has_edits() {
            return Ok(None);
        }
        rewriter.apply().map(Some)
    }
}
