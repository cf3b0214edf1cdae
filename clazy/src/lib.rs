//! Core library for the clazy check runner.
//!
//! Runs pluggable checks over the syntax tree of a C++ translation unit,
//! reports diagnostics, and synthesizes source edits that fix them.
//!
//! The usual flow: build a [`registry::Registry`], resolve a
//! [`registry::Selection`], and hand each unit and its source to a
//! [`dispatch::CheckDispatcher`]. [`analyzer::Analyzer`] does this for JSON
//! dumps on disk.

#![allow(clippy::similar_names, clippy::items_after_statements)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module containing the batch analyzer over translation-unit dumps.
pub mod analyzer;

/// Module defining the arena syntax tree, its builder and traversals.
pub mod ast;

/// Module containing the checks shipped with the crate.
pub mod checks;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module defining diagnostics and the per-unit sink.
pub mod diagnostic;

/// Module running checks over a unit.
pub mod dispatch;

/// Module defining the entry point logic shared by the binaries.
pub mod entry_point;

/// Module containing fix-it edits, their synthesis and application.
pub mod fix;

/// Module for rich CLI output formatting with colored text and tables.
pub mod output;

/// Module containing token-level source range helpers.
pub mod ranges;

/// Module for check and fixit registration and selection.
pub mod registry;

/// Module defining source locations, tokens and line mapping.
pub mod source;

/// Module for suppression comments.
pub mod suppression;
