//! Suppression comments in the analyzed source.
//!
//! - `// clazy:skip` anywhere in the file silences every check.
//! - `// clazy:excludeall=a,b` silences checks `a` and `b` for the whole file.
//! - `// clazy:exclude=a,b` silences them on the comment's own line.

use crate::constants::{EXCLUDE_ALL_RE, EXCLUDE_LINE_RE, SKIP_FILE_RE};
use crate::diagnostic::Diagnostic;
use rustc_hash::{FxHashMap, FxHashSet};

/// Suppressions parsed from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suppressions {
    skip_file: bool,
    file_wide: FxHashSet<String>,
    /// 1-indexed line to the checks excluded on it.
    by_line: FxHashMap<usize, FxHashSet<String>>,
}

fn check_names(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

impl Suppressions {
    /// Collects the suppression comments of `source`.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut suppressions = Self::default();
        for (i, line) in source.lines().enumerate() {
            if !line.contains("clazy:") {
                continue;
            }
            if SKIP_FILE_RE().is_match(line) {
                suppressions.skip_file = true;
            }
            for caps in EXCLUDE_ALL_RE().captures_iter(line) {
                suppressions.file_wide.extend(check_names(&caps[1]));
            }
            for caps in EXCLUDE_LINE_RE().captures_iter(line) {
                suppressions
                    .by_line
                    .entry(i + 1)
                    .or_default()
                    .extend(check_names(&caps[1]));
            }
        }
        suppressions
    }

    /// Returns `true` if nothing is suppressed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.skip_file && self.file_wide.is_empty() && self.by_line.is_empty()
    }

    /// Returns `true` if `check` must not report at `line` (1-indexed, 0 when unknown).
    #[must_use]
    pub fn is_suppressed(&self, check: &str, line: usize) -> bool {
        if self.skip_file || self.file_wide.contains(check) {
            return true;
        }
        self.by_line
            .get(&line)
            .is_some_and(|checks| checks.contains(check))
    }

    /// Drops the suppressed diagnostics, keeping the order of the rest.
    pub fn retain(&self, diagnostics: &mut Vec<Diagnostic>) {
        if self.is_empty() {
            return;
        }
        let before = diagnostics.len();
        diagnostics.retain(|d| !self.is_suppressed(d.check, d.line));
        let dropped = before - diagnostics.len();
        if dropped > 0 {
            tracing::debug!(dropped, "diagnostics suppressed by comments");
        }
    }
}
