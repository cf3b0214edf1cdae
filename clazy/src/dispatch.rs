//! Runs the selected checks over a translation unit.
//!
//! One [`UnitWalk`] per unit: it owns fresh check instances, the parent
//! index and the diagnostic sink, and visits every node exactly once.

use crate::ast::{NodeId, ParentIndex, TranslationUnit};
use crate::checks::{Check, CheckContext, CheckError};
use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::registry::{CheckDescriptor, Selection};
use crate::source::SourceManager;
use crate::suppression::Suppressions;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Misuse of a [`UnitWalk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The unit was already walked, or is being walked.
    #[error("translation unit already walked")]
    AlreadyWalked,
    /// Diagnostics were requested before the walk completed.
    #[error("translation unit not walked yet")]
    NotWalked,
}

/// Lifecycle of a [`UnitWalk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// Checks instantiated, nothing visited.
    NotStarted,
    /// Nodes are being delivered.
    Visiting,
    /// Every node was visited.
    Done,
}

struct ActiveCheck {
    descriptor: CheckDescriptor,
    check: Box<dyn Check>,
}

#[derive(Clone, Copy)]
enum Callback {
    Decl,
    Stmt,
}

/// A single pass of the selected checks over one unit.
pub struct UnitWalk<'a> {
    unit: &'a TranslationUnit,
    sources: &'a SourceManager,
    selection: &'a Selection,
    checks: Vec<ActiveCheck>,
    parents: ParentIndex,
    sink: DiagnosticSink,
    state: WalkState,
}

impl<'a> UnitWalk<'a> {
    /// Instantiates every selected check for `unit`.
    #[must_use]
    pub fn new(
        unit: &'a TranslationUnit,
        sources: &'a SourceManager,
        selection: &'a Selection,
    ) -> Self {
        let checks = selection
            .checks()
            .iter()
            .map(|descriptor| ActiveCheck {
                descriptor: *descriptor,
                check: (descriptor.factory)(),
            })
            .collect();
        Self {
            unit,
            sources,
            selection,
            checks,
            parents: ParentIndex::new(),
            sink: DiagnosticSink::new(),
            state: WalkState::NotStarted,
        }
    }

    /// Where the walk is in its lifecycle.
    #[must_use]
    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Parents recorded so far.
    #[must_use]
    pub fn parents(&self) -> &ParentIndex {
        &self.parents
    }

    /// Visits every node in pre-order, handing declarations and statements to
    /// the checks that asked for them.
    ///
    /// # Errors
    ///
    /// [`DispatchError::AlreadyWalked`] unless the walk is [`WalkState::NotStarted`].
    pub fn walk(&mut self) -> Result<(), DispatchError> {
        if self.state != WalkState::NotStarted {
            return Err(DispatchError::AlreadyWalked);
        }
        self.state = WalkState::Visiting;

        let unit = self.unit;
        for visit in unit.pre_order() {
            if let Some(parent) = visit.parent {
                self.parents.record(visit.node, parent);
            }
            let Some(kind) = unit.kind(visit.node) else {
                continue;
            };
            let callback = if kind.is_decl() {
                Callback::Decl
            } else {
                Callback::Stmt
            };
            self.deliver(visit.node, callback);
        }

        self.state = WalkState::Done;
        Ok(())
    }

    fn deliver(&mut self, node: NodeId, callback: Callback) {
        let unit = self.unit;
        let sources = self.sources;
        let selection = self.selection;
        let parents = &self.parents;
        let sink = &mut self.sink;

        for active in &mut self.checks {
            let wanted = match callback {
                Callback::Decl => active.descriptor.interest.wants_decls(),
                Callback::Stmt => active.descriptor.interest.wants_stmts(),
            };
            if !wanted {
                continue;
            }

            let mut cx = CheckContext::new(
                unit,
                sources,
                parents,
                &active.descriptor,
                selection,
                sink,
            );
            let check = &mut active.check;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| match callback {
                Callback::Decl => check.visit_decl(node, &mut cx),
                Callback::Stmt => check.visit_stmt(node, &mut cx),
            }));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(CheckError::UnexpectedShape(reason))) => {
                    tracing::warn!(
                        check = active.descriptor.name,
                        node = node.0,
                        %reason,
                        "check failed, skipping node"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        check = active.descriptor.name,
                        node = node.0,
                        "check panicked, skipping node"
                    );
                }
            }
        }
    }

    /// Ends the walk and returns its diagnostics, with manual-fixit notes
    /// merged and suppression comments honoured.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NotWalked`] if the walk has not completed.
    pub fn finish(self) -> Result<Vec<Diagnostic>, DispatchError> {
        if self.state != WalkState::Done {
            return Err(DispatchError::NotWalked);
        }
        let suppressions = Suppressions::parse(self.sources.text());
        let mut diagnostics = self.sink.finish();
        suppressions.retain(&mut diagnostics);
        Ok(diagnostics)
    }
}

/// Runs a [`Selection`] over any number of units.
#[derive(Debug, Clone, Copy)]
pub struct CheckDispatcher<'r> {
    selection: &'r Selection,
}

impl<'r> CheckDispatcher<'r> {
    /// A dispatcher for the checks and fixits in `selection`.
    #[must_use]
    pub fn new(selection: &'r Selection) -> Self {
        Self { selection }
    }

    /// Walks `unit` once and returns what the checks reported.
    pub fn run(&self, unit: &TranslationUnit, sources: &SourceManager) -> Vec<Diagnostic> {
        let mut walk = UnitWalk::new(unit, sources, self.selection);
        match walk.walk().and_then(|()| walk.finish()) {
            Ok(diagnostics) => diagnostics,
            // A fresh walk is always NotStarted
            Err(_) => Vec::new(),
        }
    }
}
