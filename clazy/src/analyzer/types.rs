//! Type definitions for dumps and analysis results.

use crate::ast::TranslationUnit;
use crate::diagnostic::Diagnostic;
use crate::registry::CheckLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// One translation unit as handed over by a frontend.
#[derive(Debug, Deserialize)]
pub struct UnitDump {
    /// Main file of the unit. Relative paths are resolved against the dump's directory.
    pub file: PathBuf,
    /// Text of the main file. Read from `file` when absent.
    #[serde(default)]
    pub source: Option<String>,
    /// The tree.
    pub unit: TranslationUnit,
}

/// A dump that could not be analyzed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dump or its source file cannot be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The dump is not valid JSON for a unit, or its tree is malformed.
    #[error("invalid dump {path}: {source}")]
    Json {
        /// Dump path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Represents a dump that failed to load.
#[derive(Serialize, Clone, Debug)]
pub struct LoadFailure {
    /// The dump.
    pub dump: PathBuf,
    /// The error message.
    pub error: String,
}

/// Diagnostics of one translation unit.
#[derive(Serialize, Debug, Clone)]
pub struct FileReport {
    /// Main file of the unit.
    pub file: PathBuf,
    /// Text the diagnostics' offsets refer to.
    #[serde(skip)]
    pub source: String,
    /// What the checks reported, in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Holds the results of the analysis.
/// This struct is serialized to JSON if requested.
#[derive(Serialize, Debug, Default)]
pub struct AnalysisReport {
    /// One entry per analyzed unit.
    pub files: Vec<FileReport>,
    /// Dumps that could not be analyzed.
    pub load_errors: Vec<LoadFailure>,
    /// Summary statistics.
    pub summary: AnalysisSummary,
}

/// Summary statistics for the analysis result.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct AnalysisSummary {
    /// Number of units analyzed.
    pub total_units: usize,
    /// Number of diagnostics over all units.
    pub total_diagnostics: usize,
    /// Diagnostics from level0 checks.
    pub level0_count: usize,
    /// Diagnostics carrying at least one edit.
    pub fixable_count: usize,
    /// Number of dumps that failed to load.
    pub load_errors_count: usize,
}

impl AnalysisReport {
    pub(crate) fn from_parts(files: Vec<FileReport>, load_errors: Vec<LoadFailure>) -> Self {
        let diagnostics = || files.iter().flat_map(|f| f.diagnostics.iter());
        let summary = AnalysisSummary {
            total_units: files.len(),
            total_diagnostics: diagnostics().count(),
            level0_count: diagnostics()
                .filter(|d| d.level == CheckLevel::Level0)
                .count(),
            fixable_count: diagnostics().filter(|d| !d.fixits.is_empty()).count(),
            load_errors_count: load_errors.len(),
        };
        Self {
            files,
            load_errors,
            summary,
        }
    }
}
