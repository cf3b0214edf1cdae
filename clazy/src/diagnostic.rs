//! Diagnostics emitted by checks, and the per-unit buffer collecting them.

use crate::fix::TextEdit;
use crate::registry::CheckLevel;
use crate::source::SourceLocation;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// One warning, with the edits that fix it when a fixit was enabled and succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Name of the emitting check.
    pub check: &'static str,
    /// Level of the emitting check.
    pub level: CheckLevel,
    /// Where the warning points.
    pub location: SourceLocation,
    /// 1-indexed line, 0 if the location is invalid.
    pub line: usize,
    /// 1-indexed column, 0 if the location is invalid.
    pub column: usize,
    /// Human-readable message.
    pub message: String,
    /// Ordered, non-overlapping edits. Empty when no fix is offered.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixits: Vec<TextEdit>,
    /// Fixit that was requested but could not be synthesized here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_fixit: Option<&'static str>,
}

#[derive(Debug, Clone)]
struct ManualFixit {
    check: &'static str,
    level: CheckLevel,
    location: SourceLocation,
    line: usize,
    column: usize,
    fixit: &'static str,
}

/// Collects the diagnostics of one walk.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    manual: Vec<ManualFixit>,
    seen_macro_locations: FxHashSet<(&'static str, SourceLocation)>,
}

impl DiagnosticSink {
    /// An empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of diagnostics so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns `true` if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Records a diagnostic.
    ///
    /// A macro expands to the same location every time it is used, so a check
    /// reports each macro location once.
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.location.is_macro()
            && !self
                .seen_macro_locations
                .insert((diagnostic.check, diagnostic.location))
        {
            return;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Queues a note that `fixit` needs manual intervention at `location`.
    pub(crate) fn queue_manual(
        &mut self,
        check: &'static str,
        level: CheckLevel,
        location: SourceLocation,
        (line, column): (usize, usize),
        fixit: &'static str,
    ) {
        let queued = self
            .manual
            .iter()
            .any(|m| m.check == check && m.location == location);
        if !queued {
            self.manual.push(ManualFixit {
                check,
                level,
                location,
                line,
                column,
                fixit,
            });
        }
    }

    /// Merges queued manual-fixit notes and returns the diagnostics in emission order.
    ///
    /// A note attaches to the diagnostic of the same check at the same
    /// location; otherwise it becomes a warning of its own.
    #[must_use]
    pub fn finish(mut self) -> Vec<Diagnostic> {
        for note in std::mem::take(&mut self.manual) {
            let target = self
                .diagnostics
                .iter_mut()
                .find(|d| d.check == note.check && d.location == note.location);
            match target {
                Some(diagnostic) => diagnostic.manual_fixit = Some(note.fixit),
                None => self.diagnostics.push(Diagnostic {
                    check: note.check,
                    level: note.level,
                    location: note.location,
                    line: note.line,
                    column: note.column,
                    message: format!(
                        "fixit `{}` failed, requires manual intervention",
                        note.fixit
                    ),
                    fixits: Vec::new(),
                    manual_fixit: Some(note.fixit),
                }),
            }
        }
        self.diagnostics
    }
}
