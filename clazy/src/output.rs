use crate::analyzer::{AnalysisReport, AnalysisSummary, FileReport, LoadFailure};
use crate::diagnostic::Diagnostic;
use crate::fix::TextEdit;
use crate::registry::{CheckLevel, Registry};
use crate::source::LineIndex;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use std::io::Write;

/// Helper to create a styled table
fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

/// Helper to map a check level to a Comfy Table Color
fn get_level_color(level: CheckLevel) -> Color {
    match level {
        CheckLevel::Level0 => Color::Green,
        CheckLevel::Level1 => Color::Yellow,
        CheckLevel::Level2 => Color::Red,
        CheckLevel::Hidden => Color::DarkGrey,
    }
}

/// Print every registered check with its level and fixits.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_check_list(writer: &mut impl Write, registry: &Registry) -> std::io::Result<()> {
    let mut table = create_table(vec!["Check", "Level", "Fixits", "Description"]);
    for check in registry.checks() {
        let fixits = check
            .fixits
            .iter()
            .map(|f| f.name)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(check.name).add_attribute(Attribute::Bold),
            Cell::new(check.level).fg(get_level_color(check.level)),
            Cell::new(fixits).add_attribute(Attribute::Dim),
            Cell::new(check.description),
        ]);
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

fn describe_edit(edit: &TextEdit, lines: &LineIndex) -> String {
    let position = |offset: u32| {
        let offset = offset as usize;
        format!("{}:{}", lines.line_index(offset), lines.column_index(offset))
    };
    match edit {
        TextEdit::Insertion { at, text } => {
            format!("insert \"{text}\" at {}", position(*at))
        }
        TextEdit::Replacement { start, end, text } => format!(
            "replace {}-{} with \"{text}\"",
            position(*start),
            position(*end)
        ),
    }
}

/// Print one diagnostic in compiler style, followed by its fix-its.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_diagnostic(
    writer: &mut impl Write,
    report: &FileReport,
    lines: &LineIndex,
    diagnostic: &Diagnostic,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{}:{}:{}: {} {} {}",
        report.file.display(),
        diagnostic.line,
        diagnostic.column,
        "warning:".yellow().bold(),
        diagnostic.message.bold(),
        format!("[-Wclazy-{}]", diagnostic.check).dimmed()
    )?;
    for edit in &diagnostic.fixits {
        writeln!(writer, "    {} {}", "fix-it:".green(), describe_edit(edit, lines))?;
    }
    if let Some(fixit) = diagnostic.manual_fixit {
        writeln!(
            writer,
            "    {} `{fixit}` requires manual intervention",
            "note:".cyan()
        )?;
    }
    Ok(())
}

/// Print a list of dumps that failed to load.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_load_errors(writer: &mut impl Write, errors: &[LoadFailure]) -> std::io::Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", "Load Errors".bold().underline().red())?;

    let mut table = create_table(vec!["Dump", "Error"]);
    for e in errors {
        table.add_row(vec![
            Cell::new(e.dump.display()).add_attribute(Attribute::Bold),
            Cell::new(&e.error).fg(Color::Red),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print the analysis summary line.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(writer: &mut impl Write, summary: &AnalysisSummary) -> std::io::Result<()> {
    fn pill(label: &str, count: usize) -> String {
        if count == 0 {
            format!("{}: {}", label, count.to_string().green())
        } else {
            format!("{}: {}", label, count.to_string().red().bold())
        }
    }

    writeln!(
        writer,
        "{}",
        format!(
            "Analyzed {} translation units",
            summary.total_units.to_string().bold()
        )
        .dimmed()
    )?;
    writeln!(
        writer,
        "{}  {}  {}  {}",
        pill("Warnings", summary.total_diagnostics),
        pill("Level0", summary.level0_count),
        pill("Fixable", summary.fixable_count),
        pill("Load Errors", summary.load_errors_count),
    )?;
    Ok(())
}

/// Print the full report.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
pub fn print_report(writer: &mut impl Write, report: &AnalysisReport) -> std::io::Result<()> {
    for file in &report.files {
        let lines = LineIndex::new(&file.source);
        for diagnostic in &file.diagnostics {
            print_diagnostic(writer, file, &lines, diagnostic)?;
        }
    }
    print_load_errors(writer, &report.load_errors)?;
    if report.files.iter().all(|f| f.diagnostics.is_empty()) && report.load_errors.is_empty() {
        writeln!(writer, "{}", "✓ No warnings.".green())?;
    }
    writeln!(writer)?;
    print_summary(writer, &report.summary)
}
