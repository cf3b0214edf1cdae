use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{CONFIG_FILENAME, ENV_CHECKS, ENV_FIXITS};

/// Fatal configuration problems, reported before any translation unit is analyzed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two checks registered under one name.
    #[error("check `{0}` is registered twice")]
    DuplicateCheck(String),
    /// Two fixits registered under one toggle name.
    #[error("fixit `{0}` is registered twice")]
    DuplicateFixit(String),
    /// One check declares two fixits with the same id.
    #[error("check `{check}` declares fixit id {id} twice")]
    DuplicateFixitId {
        /// Owning check.
        check: String,
        /// Repeated id.
        id: u8,
    },
    /// A fixit is registered by a check other than its declared owner.
    #[error("fixit `{fixit}` belongs to `{owner}` but was registered by `{check}`")]
    FixitOwnerMismatch {
        /// Fixit name.
        fixit: String,
        /// Declared owner.
        owner: String,
        /// Registering check.
        check: String,
    },
    /// A selected check or level does not exist.
    #[error("unknown check `{0}`")]
    UnknownCheck(String),
    /// A selected fixit does not exist.
    #[error("unknown fixit `{0}`")]
    UnknownFixit(String),
    /// The configuration file cannot be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The `[clazy]` section.
    pub clazy: ClazyConfig,
    /// The path to the configuration file this was loaded from.
    /// `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
/// Options of the `[clazy]` section.
pub struct ClazyConfig {
    /// Check selection: level names, check names and `no-<check>` entries.
    pub checks: Option<Vec<String>>,
    /// Fixit toggle names to enable.
    pub fixits: Option<Vec<String>>,
    /// Maximum number of tokens a forward token scan may inspect.
    pub scan_limit: Option<usize>,
    /// Extra folder names to skip when looking for dumps.
    pub exclude_folders: Option<Vec<String>>,
}

/// Splits a comma-separated list, dropping blanks.
#[must_use]
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

impl Config {
    /// Loads configuration starting from a specific path and traversing up.
    ///
    /// Returns the default configuration if no `.clazy.toml` is found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`] if the first
    /// configuration file found cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                let content = fs::read_to_string(&candidate).map_err(|source| ConfigError::Io {
                    path: candidate.clone(),
                    source,
                })?;
                let mut config =
                    toml::from_str::<Config>(&content).map_err(|source| ConfigError::Parse {
                        path: candidate.clone(),
                        source,
                    })?;
                tracing::debug!(path = %candidate.display(), "loaded configuration");
                config.config_file_path = Some(candidate);
                return Ok(config);
            }

            if !current.pop() {
                break;
            }
        }

        Ok(Config::default())
    }

    /// Applies `CLAZY_CHECKS` / `CLAZY_FIXIT` from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies environment-style overrides looked up through `var`.
    #[must_use]
    pub fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(checks) = var(ENV_CHECKS) {
            self.clazy.checks = Some(split_list(&checks));
        }
        if let Some(fixits) = var(ENV_FIXITS) {
            self.clazy.fixits = Some(split_list(&fixits));
        }
        self
    }
}
