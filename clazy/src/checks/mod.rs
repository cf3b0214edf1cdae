//! The `Check` trait, the context handed to callbacks, and the built-in checks.

use crate::ast::{NodeId, ParentIndex, TranslationUnit};
use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::fix::{FixItSynthesizer, TextEdit, Unfixable};
use crate::registry::{CheckDescriptor, FixitId, Selection};
use crate::source::{SourceLocation, SourceManager};
use thiserror::Error;

/// A check hit a tree shape it cannot handle.
///
/// The dispatcher logs it and moves on to the next check and node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The node does not look the way the frontend promises.
    #[error("unexpected tree shape: {0}")]
    UnexpectedShape(String),
}

/// Trait implemented by every check.
///
/// A fresh instance is created per translation unit, so checks may keep state
/// across the nodes of one walk.
pub trait Check: Send {
    /// Returns the registered name of the check.
    fn name(&self) -> &'static str;
    /// Called for each declaration, if the check registered interest in declarations.
    fn visit_decl(
        &mut self,
        _decl: NodeId,
        _cx: &mut CheckContext<'_>,
    ) -> Result<(), CheckError> {
        Ok(())
    }
    /// Called for each statement and expression, if the check registered interest in them.
    fn visit_stmt(
        &mut self,
        _stmt: NodeId,
        _cx: &mut CheckContext<'_>,
    ) -> Result<(), CheckError> {
        Ok(())
    }
}

/// What a check sees while visiting one node.
pub struct CheckContext<'a> {
    /// The translation unit being walked.
    pub unit: &'a TranslationUnit,
    /// Its main file.
    pub sources: &'a SourceManager,
    /// Parents of every node visited so far, including the current one.
    pub parents: &'a ParentIndex,
    descriptor: &'a CheckDescriptor,
    selection: &'a Selection,
    sink: &'a mut DiagnosticSink,
}

impl<'a> CheckContext<'a> {
    pub(crate) fn new(
        unit: &'a TranslationUnit,
        sources: &'a SourceManager,
        parents: &'a ParentIndex,
        descriptor: &'a CheckDescriptor,
        selection: &'a Selection,
        sink: &'a mut DiagnosticSink,
    ) -> Self {
        Self {
            unit,
            sources,
            parents,
            descriptor,
            selection,
            sink,
        }
    }

    /// The edit synthesizer for this unit.
    #[must_use]
    pub fn fixits(&self) -> FixItSynthesizer<'a> {
        FixItSynthesizer::new(self.unit, self.sources)
    }

    /// Returns `true` if this check's fixit `id` was enabled.
    #[must_use]
    pub fn is_fixit_enabled(&self, id: FixitId) -> bool {
        self.selection.is_fixit_enabled(self.descriptor.name, id)
    }

    /// Runs `synthesize` if fixit `id` is enabled.
    ///
    /// A declined fix queues a manual-fixit note at `loc` and yields no edits.
    pub fn try_fixit<F>(
        &mut self,
        id: FixitId,
        loc: SourceLocation,
        synthesize: F,
    ) -> Vec<TextEdit>
    where
        F: FnOnce(FixItSynthesizer<'a>) -> Result<Vec<TextEdit>, Unfixable>,
    {
        if !self.is_fixit_enabled(id) {
            return Vec::new();
        }
        match synthesize(self.fixits()) {
            Ok(edits) => edits,
            Err(reason) => {
                tracing::debug!(check = self.descriptor.name, %reason, "fixit declined");
                self.queue_manual_fixit_warning(loc, id);
                Vec::new()
            }
        }
    }

    /// Emits a warning at `loc`, with the edits that fix it (possibly none).
    pub fn emit_warning(
        &mut self,
        loc: SourceLocation,
        message: impl Into<String>,
        fixits: Vec<TextEdit>,
    ) {
        let (line, column) = self.sources.line_column(loc);
        self.sink.push(Diagnostic {
            check: self.descriptor.name,
            level: self.descriptor.level,
            location: loc,
            line,
            column,
            message: message.into(),
            fixits,
            manual_fixit: None,
        });
    }

    /// Notes that fixit `id` could not be applied at `loc`. Ignored unless the fixit is enabled.
    pub fn queue_manual_fixit_warning(&mut self, loc: SourceLocation, id: FixitId) {
        if !self.is_fixit_enabled(id) {
            return;
        }
        let Some(fixit) = self.descriptor.fixits.iter().find(|f| f.id == id) else {
            return;
        };
        let position = self.sources.line_column(loc);
        self.sink.queue_manual(
            self.descriptor.name,
            self.descriptor.level,
            loc,
            position,
            fixit.name,
        );
    }
}

/// Returns the descriptors of every check shipped with the crate.
#[must_use]
pub fn builtin_descriptors() -> Vec<CheckDescriptor> {
    vec![
        qdatetime_utc::DESCRIPTOR,
        qgetenv::DESCRIPTOR,
        qset_intersects::DESCRIPTOR,
        rule_of_three::DESCRIPTOR,
        ctor_missing_parent_argument::DESCRIPTOR,
        qt4_qstring_from_array::DESCRIPTOR,
    ]
}

/// `ctor-missing-parent-argument`
pub mod ctor_missing_parent_argument;
/// Check and fixit name constants.
pub mod ids;
/// `qdatetime-utc`
pub mod qdatetime_utc;
/// `qgetenv`
pub mod qgetenv;
/// `qset-intersects`
pub mod qset_intersects;
/// `qt4-qstring-from-array`
pub mod qt4_qstring_from_array;
/// `rule-of-three`
pub mod rule_of_three;
