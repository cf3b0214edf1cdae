use clap::{Args, Parser};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.clazy.toml):
  Searched for from the first path upwards.

  [clazy]
  checks = [\"level1\", \"no-rule-of-three\"]
  fixits = [\"fix-qgetenv\"]
  scan_limit = 10000           # Max tokens a forward token scan inspects
  exclude_folders = [\"build\"]

ENVIRONMENT:
  CLAZY_CHECKS   Comma-separated check list, overrides the file
  CLAZY_FIXIT    Comma-separated fixit list, overrides the file
  CLAZY_LOG      Log filter (default: warn)
";

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Command line interface of the check runner.
#[derive(Parser, Debug)]
#[command(
    name = "clazy",
    version,
    about = "Runs Qt-oriented C++ checks over translation-unit dumps",
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Dumps (`*.ast.json`) or directories containing them.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Comma-separated checks: level names, check names, `no-<check>`.
    #[arg(long, value_delimiter = ',')]
    pub checks: Option<Vec<String>>,

    /// Comma-separated fixits to enable.
    #[arg(long, value_delimiter = ',')]
    pub fixits: Option<Vec<String>>,

    /// Write enabled fix-its back to the analyzed sources.
    #[arg(long)]
    pub apply: bool,

    /// List registered checks and exit.
    #[arg(long)]
    pub list_checks: bool,

    /// Maximum number of tokens a forward token scan may inspect.
    #[arg(long)]
    pub scan_limit: Option<usize>,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,
}
