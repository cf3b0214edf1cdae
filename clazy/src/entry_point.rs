use crate::analyzer::{AnalysisReport, Analyzer};
use crate::cli::Cli;
use crate::config::{Config, ConfigError};
use crate::constants::ENV_LOG;
use crate::output;
use crate::registry::{Registry, Selection};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Exit status when a level0 check fired.
const EXIT_WARNINGS: i32 = 1;
/// Exit status for bad arguments or configuration.
const EXIT_CONFIG: i32 = 2;

/// Installs the log subscriber once per process.
///
/// `CLAZY_LOG` selects the filter; `--verbose` forces `debug`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Resolves file, environment and command-line settings into a selection.
fn resolve_selection(
    cli: &Cli,
    config: &Config,
    registry: &Registry,
) -> Result<Selection, ConfigError> {
    let checks = cli
        .checks
        .clone()
        .or_else(|| config.clazy.checks.clone())
        .unwrap_or_default();
    let fixits = cli
        .fixits
        .clone()
        .or_else(|| config.clazy.fixits.clone())
        .unwrap_or_default();
    registry.select(checks, fixits)
}

/// Writes the fixed sources back to disk. Returns how many files changed.
fn apply_fixits(report: &AnalysisReport) -> Result<usize> {
    let mut written = 0;
    for file in &report.files {
        let fixed = file
            .apply_fixits()
            .with_context(|| format!("Failed to apply fix-its to {}", file.file.display()))?;
        if let Some(fixed) = fixed {
            std::fs::write(&file.file, fixed)
                .with_context(|| format!("Failed to write {}", file.file.display()))?;
            tracing::info!(file = %file.file.display(), "applied fix-its");
            written += 1;
        }
    }
    Ok(written)
}

/// Runs the check runner with the given arguments.
///
/// # Errors
///
/// Returns an error if writing output or applying fix-its fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run clazy with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if writing output or applying fix-its fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["clazy".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => {
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    write!(writer, "{e}")?;
                    writer.flush()?;
                    return Ok(0);
                }
                _ => {
                    eprint!("{e}");
                    return Ok(EXIT_CONFIG);
                }
            }
        }
    };
    init_tracing(cli.output.verbose);

    let registry = match Registry::builtin() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(EXIT_CONFIG);
        }
    };
    if cli.list_checks {
        output::print_check_list(writer, &registry)?;
        return Ok(0);
    }

    let config_path = cli.paths.first().map_or(Path::new("."), std::path::PathBuf::as_path);
    let config = match Config::load_from_path(config_path) {
        Ok(config) => config.with_env_overrides(),
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(EXIT_CONFIG);
        }
    };
    let selection = match resolve_selection(&cli, &config, &registry) {
        Ok(selection) => selection,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(EXIT_CONFIG);
        }
    };
    if cli.apply && !selection.has_fixits() {
        tracing::warn!("--apply given but no fixits are enabled; nothing will be rewritten");
    }
    tracing::debug!(
        checks = ?selection.checks().iter().map(|c| c.name).collect::<Vec<_>>(),
        threads = rayon::current_num_threads(),
        "starting analysis"
    );

    let analyzer = Analyzer::new(selection)
        .with_scan_limit(
            cli.scan_limit
                .or(config.clazy.scan_limit)
                .unwrap_or(crate::constants::DEFAULT_SCAN_LIMIT),
        )
        .with_excludes(config.clazy.exclude_folders.clone().unwrap_or_default());
    let report = analyzer.analyze_paths(&cli.paths);

    if cli.output.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        output::print_report(writer, &report)?;
    }

    if cli.apply {
        let written = apply_fixits(&report)?;
        if !cli.output.json {
            writeln!(writer, "Applied fix-its to {written} file(s)")?;
        }
    }

    if report.summary.level0_count > 0 {
        Ok(EXIT_WARNINGS)
    } else {
        Ok(0)
    }
}
