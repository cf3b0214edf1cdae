//! Fix-it synthesis and application.
//!
//! Checks describe fixes as [`TextEdit`]s built by the [`FixItSynthesizer`].
//! Hosts that want to write the fixes back use the [`SourceRewriter`].

mod edit;
mod rewriter;
mod synth;

pub use edit::TextEdit;
pub use rewriter::{RewriteError, SourceRewriter};
pub use synth::{FixItSynthesizer, Unfixable};
