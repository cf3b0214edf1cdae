//! Analyzer over translation-unit dumps.
//!
//! This module contains the batch driver, broken down into:
//! - `types`: dump format and result types (`UnitDump`, `FileReport`, `AnalysisReport`)
//! - `processing`: dump discovery, parallel analysis and fix application
//! - the `Analyzer` struct itself

mod processing;
/// Dump and result types.
pub mod types;

pub use types::{AnalysisReport, AnalysisSummary, FileReport, LoadError, LoadFailure, UnitDump};

use crate::constants::DEFAULT_SCAN_LIMIT;
use crate::registry::Selection;

/// Runs a selection of checks over dumps and units.
#[derive(Debug, Clone)]
pub struct Analyzer {
    /// Checks and fixits that run.
    pub selection: Selection,
    /// Token budget of each forward scan.
    pub scan_limit: usize,
    /// Folder names skipped in addition to the defaults.
    pub exclude_folders: Vec<String>,
}

impl Analyzer {
    /// Creates an analyzer for `selection` with default limits.
    #[must_use]
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            scan_limit: DEFAULT_SCAN_LIMIT,
            exclude_folders: Vec::new(),
        }
    }

    /// Builder-style method to set the token scan limit.
    #[must_use]
    pub fn with_scan_limit(mut self, scan_limit: usize) -> Self {
        self.scan_limit = scan_limit;
        self
    }

    /// Builder-style method to set extra excluded folders.
    #[must_use]
    pub fn with_excludes(mut self, folders: Vec<String>) -> Self {
        self.exclude_folders = folders;
        self
    }
}
