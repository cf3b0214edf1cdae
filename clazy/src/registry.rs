//! Check and fixit registration, and selection of what runs.
//!
//! The registry is built once by [`Registry::builtin`] (or a
//! [`RegistryBuilder`] for custom sets) and never changes afterwards. A
//! [`Selection`] is the resolved answer to "which checks run, which fixits
//! apply" for one configuration.

use crate::checks::{self, Check};
use crate::config::ConfigError;
use crate::constants::DEFAULT_CHECK_LEVEL;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How safe and certain a check's diagnostics are. Ordered from always-on to opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckLevel {
    /// Very stable, no false positives.
    Level0,
    /// Similar to level0, with occasional false positives.
    Level1,
    /// Might be noisy or opinionated.
    Level2,
    /// Enabled only by name.
    Hidden,
}

impl CheckLevel {
    /// Name used in check lists and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Level0 => "level0",
            Self::Level1 => "level1",
            Self::Level2 => "level2",
            Self::Hidden => "hidden",
        }
    }
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "level0" => Ok(Self::Level0),
            "level1" => Ok(Self::Level1),
            "level2" => Ok(Self::Level2),
            "hidden" => Ok(Self::Hidden),
            _ => Err(ConfigError::UnknownCheck(s.to_owned())),
        }
    }
}

/// Which node families a check wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Interest {
    /// Declarations only.
    Decls,
    /// Statements and expressions only.
    Stmts,
    /// Both.
    DeclsAndStmts,
}

impl Interest {
    /// Returns `true` if declarations are delivered.
    #[must_use]
    pub const fn wants_decls(self) -> bool {
        matches!(self, Self::Decls | Self::DeclsAndStmts)
    }

    /// Returns `true` if statements and expressions are delivered.
    #[must_use]
    pub const fn wants_stmts(self) -> bool {
        matches!(self, Self::Stmts | Self::DeclsAndStmts)
    }
}

/// A fixit id, unique within its check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FixitId(pub u8);

/// A fix-it a check can emit, with the name it is toggled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixitDescriptor {
    /// Check-local id.
    pub id: FixitId,
    /// Toggle name, e.g. `fix-qgetenv`.
    pub name: &'static str,
    /// Name of the owning check.
    pub check: &'static str,
}

/// Builds a fresh instance of a check for one translation unit.
pub type CheckFactory = fn() -> Box<dyn Check>;

/// Everything the registry knows about one check.
#[derive(Debug, Clone, Copy)]
pub struct CheckDescriptor {
    /// Unique name, e.g. `qdatetime-utc`.
    pub name: &'static str,
    /// Severity tier.
    pub level: CheckLevel,
    /// Which nodes it is handed.
    pub interest: Interest,
    /// One-line summary for listings.
    pub description: &'static str,
    /// Instance constructor.
    pub factory: CheckFactory,
    /// Fixits it may emit.
    pub fixits: &'static [FixitDescriptor],
}

/// Immutable table of registered checks.
#[derive(Debug, Default)]
pub struct Registry {
    checks: Vec<CheckDescriptor>,
    by_name: FxHashMap<&'static str, usize>,
    fixits: FxHashMap<&'static str, FixitDescriptor>,
}

/// Accumulates descriptors, rejecting inconsistent ones.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a check and its fixits.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a duplicate check name, a duplicate
    /// fixit name or id, or a fixit owned by another check.
    pub fn register(mut self, descriptor: CheckDescriptor) -> Result<Self, ConfigError> {
        let registry = &mut self.registry;
        if registry.by_name.contains_key(descriptor.name) {
            return Err(ConfigError::DuplicateCheck(descriptor.name.to_owned()));
        }

        let mut ids = FxHashSet::default();
        for fixit in descriptor.fixits {
            if fixit.check != descriptor.name {
                return Err(ConfigError::FixitOwnerMismatch {
                    fixit: fixit.name.to_owned(),
                    owner: fixit.check.to_owned(),
                    check: descriptor.name.to_owned(),
                });
            }
            if registry.fixits.contains_key(fixit.name) {
                return Err(ConfigError::DuplicateFixit(fixit.name.to_owned()));
            }
            if !ids.insert(fixit.id) {
                return Err(ConfigError::DuplicateFixitId {
                    check: descriptor.name.to_owned(),
                    id: fixit.id.0,
                });
            }
        }

        for fixit in descriptor.fixits {
            registry.fixits.insert(fixit.name, *fixit);
        }
        registry
            .by_name
            .insert(descriptor.name, registry.checks.len());
        registry.checks.push(descriptor);
        Ok(self)
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        self.registry
    }
}

impl Registry {
    /// The registry of every check shipped with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the builtin table itself is inconsistent.
    pub fn builtin() -> Result<Self, ConfigError> {
        checks::builtin_descriptors()
            .into_iter()
            .try_fold(RegistryBuilder::new(), RegistryBuilder::register)
            .map(RegistryBuilder::build)
    }

    /// All checks, in registration order.
    #[must_use]
    pub fn checks(&self) -> &[CheckDescriptor] {
        &self.checks
    }

    /// A check by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CheckDescriptor> {
        self.by_name.get(name).map(|&i| &self.checks[i])
    }

    /// A fixit by toggle name.
    #[must_use]
    pub fn fixit(&self, name: &str) -> Option<&FixitDescriptor> {
        self.fixits.get(name)
    }

    /// Every check at or below `level`, in registration order.
    pub fn checks_for_level(&self, level: CheckLevel) -> impl Iterator<Item = &CheckDescriptor> {
        self.checks.iter().filter(move |c| c.level <= level)
    }

    /// Resolves check and fixit lists into a [`Selection`].
    ///
    /// Check entries are `level0`/`level1`/`level2`, check names, or
    /// `no-<check>`. Hidden checks only run when named. Without any enabling
    /// entry, `level1` is selected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCheck`] or [`ConfigError::UnknownFixit`]
    /// for names that are not registered.
    pub fn select<C, F>(&self, checks: C, fixits: F) -> Result<Selection, ConfigError>
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        let mut enabled: FxHashSet<&'static str> = FxHashSet::default();
        let mut disabled: FxHashSet<&'static str> = FxHashSet::default();
        let mut any_enabling = false;

        for entry in checks {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            if let Some(name) = entry.strip_prefix("no-") {
                disabled.insert(self.require_check(name)?.name);
            } else if entry.starts_with("level") {
                let level: CheckLevel = entry.parse()?;
                enabled.extend(self.checks_for_level(level).map(|c| c.name));
                any_enabling = true;
            } else {
                enabled.insert(self.require_check(entry)?.name);
                any_enabling = true;
            }
        }
        if !any_enabling {
            let level: CheckLevel = DEFAULT_CHECK_LEVEL.parse()?;
            enabled.extend(self.checks_for_level(level).map(|c| c.name));
        }

        let checks: Vec<CheckDescriptor> = self
            .checks
            .iter()
            .filter(|c| enabled.contains(c.name) && !disabled.contains(c.name))
            .copied()
            .collect();

        let mut enabled_fixits = FxHashSet::default();
        for name in fixits {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let fixit = self
                .fixit(name)
                .ok_or_else(|| ConfigError::UnknownFixit(name.to_owned()))?;
            enabled_fixits.insert((fixit.check, fixit.id));
        }

        Ok(Selection {
            checks,
            fixits: enabled_fixits,
        })
    }

    fn require_check(&self, name: &str) -> Result<&CheckDescriptor, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownCheck(name.to_owned()))
    }
}

/// The checks and fixits enabled for a run.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    checks: Vec<CheckDescriptor>,
    fixits: FxHashSet<(&'static str, FixitId)>,
}

impl Selection {
    /// Enabled checks, in registration order.
    #[must_use]
    pub fn checks(&self) -> &[CheckDescriptor] {
        &self.checks
    }

    /// Returns `true` if the check will run.
    #[must_use]
    pub fn is_check_enabled(&self, check: &str) -> bool {
        self.checks.iter().any(|c| c.name == check)
    }

    /// Returns `true` only if both the check and this fixit of it were enabled.
    #[must_use]
    pub fn is_fixit_enabled(&self, check: &str, id: FixitId) -> bool {
        let fixits: &FxHashSet<(&str, FixitId)> = &self.fixits;
        self.is_check_enabled(check) && fixits.contains(&(check, id))
    }

    /// Returns `true` if any fixit of an enabled check is enabled.
    #[must_use]
    pub fn has_fixits(&self) -> bool {
        self.fixits
            .iter()
            .any(|&(check, _)| self.is_check_enabled(check))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::ids::{CHECK_QDATETIME_UTC, CHECK_QGETENV, CHECK_QT4_QSTRING_FROM_ARRAY};

    struct Noop;
    impl Check for Noop {
        fn name(&self) -> &'static str {
            "noop"
        }
    }

    fn noop() -> Box<dyn Check> {
        Box::new(Noop)
    }

    const NOOP_FIXITS: &[FixitDescriptor] = &[FixitDescriptor {
        id: FixitId(1),
        name: "fix-noop",
        check: "noop",
    }];

    fn descriptor(name: &'static str, fixits: &'static [FixitDescriptor]) -> CheckDescriptor {
        CheckDescriptor {
            name,
            level: CheckLevel::Level0,
            interest: Interest::Stmts,
            description: "",
            factory: noop,
            fixits,
        }
    }

    #[test]
    fn test_duplicate_check_is_fatal() {
        let result = RegistryBuilder::new()
            .register(descriptor("noop", &[]))
            .and_then(|b| b.register(descriptor("noop", &[])));
        assert!(matches!(result, Err(ConfigError::DuplicateCheck(name)) if name == "noop"));
    }

    #[test]
    fn test_fixit_owner_mismatch_is_fatal() {
        let result = RegistryBuilder::new().register(descriptor("other", NOOP_FIXITS));
        assert!(matches!(result, Err(ConfigError::FixitOwnerMismatch { .. })));
    }

    #[test]
    fn test_duplicate_fixit_id_is_fatal() {
        const TWICE: &[FixitDescriptor] = &[
            FixitDescriptor {
                id: FixitId(1),
                name: "fix-a",
                check: "noop",
            },
            FixitDescriptor {
                id: FixitId(1),
                name: "fix-b",
                check: "noop",
            },
        ];
        let result = RegistryBuilder::new().register(descriptor("noop", TWICE));
        assert!(matches!(result, Err(ConfigError::DuplicateFixitId { id: 1, .. })));
    }

    #[test]
    fn test_builtin_registry_is_consistent() {
        let registry = Registry::builtin().unwrap();
        assert_eq!(registry.checks().len(), 6);
        assert!(registry.get(CHECK_QDATETIME_UTC).is_some());
        assert_eq!(
            registry.fixit("fix-qgetenv").map(|f| f.check),
            Some(CHECK_QGETENV)
        );
    }

    #[test]
    fn test_levels_are_cumulative_and_exclude_hidden() {
        let registry = Registry::builtin().unwrap();
        let level0: Vec<_> = registry
            .checks_for_level(CheckLevel::Level0)
            .map(|c| c.level)
            .collect();
        assert!(level0.iter().all(|&l| l == CheckLevel::Level0));

        let selection = registry.select(["level2"], Vec::<String>::new()).unwrap();
        assert!(!selection.is_check_enabled(CHECK_QT4_QSTRING_FROM_ARRAY));
        assert!(selection.is_check_enabled(CHECK_QDATETIME_UTC));

        let selection = registry
            .select([CHECK_QT4_QSTRING_FROM_ARRAY], Vec::<String>::new())
            .unwrap();
        assert!(selection.is_check_enabled(CHECK_QT4_QSTRING_FROM_ARRAY));
        assert_eq!(selection.checks().len(), 1);
    }

    #[test]
    fn test_empty_selection_defaults_to_level1_and_no_prefix_disables() {
        let registry = Registry::builtin().unwrap();
        let selection = registry
            .select(["no-qgetenv"], Vec::<String>::new())
            .unwrap();
        assert!(!selection.is_check_enabled(CHECK_QGETENV));
        assert!(selection.is_check_enabled(CHECK_QDATETIME_UTC));
        assert!(selection
            .checks()
            .iter()
            .all(|c| c.level <= CheckLevel::Level1));
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let registry = Registry::builtin().unwrap();
        assert!(matches!(
            registry.select(["qfoo"], Vec::<String>::new()),
            Err(ConfigError::UnknownCheck(_))
        ));
        assert!(matches!(
            registry.select(["level7"], Vec::<String>::new()),
            Err(ConfigError::UnknownCheck(_))
        ));
        assert!(matches!(
            registry.select(["level0"], ["fix-nothing"]),
            Err(ConfigError::UnknownFixit(_))
        ));
    }

    #[test]
    fn test_fixit_requires_its_check() {
        let registry = Registry::builtin().unwrap();
        let id = registry.fixit("fix-qgetenv").unwrap().id;

        let selection = registry.select(["level0"], ["fix-qgetenv"]).unwrap();
        assert!(selection.is_fixit_enabled(CHECK_QGETENV, id));
        assert!(selection.has_fixits());

        let selection = registry
            .select(["level0", "no-qgetenv"], ["fix-qgetenv"])
            .unwrap();
        assert!(!selection.is_fixit_enabled(CHECK_QGETENV, id));
        assert!(!selection.has_fixits());

        let selection = registry.select(["level0"], Vec::<String>::new()).unwrap();
        assert!(!selection.is_fixit_enabled(CHECK_QGETENV, id));
    }

    #[test]
    fn test_fixit_lookup_is_keyed_by_check() {
        let registry = Registry::builtin().unwrap();
        let qgetenv = registry.fixit("fix-qgetenv").unwrap().id;
        let datetime = registry.fixit("fix-qdatetime-utc").unwrap().id;

        let selection = registry
            .select(["level0"], ["fix-qgetenv", "fix-qdatetime-utc"])
            .unwrap();
        assert!(selection.is_fixit_enabled(CHECK_QGETENV, qgetenv));
        assert!(selection.is_fixit_enabled(CHECK_QDATETIME_UTC, datetime));

        // Ids are per check: the same id under another check stays off
        assert_eq!(qgetenv, datetime);
        let selection = registry.select(["level0"], ["fix-qgetenv"]).unwrap();
        assert!(!selection.is_fixit_enabled(CHECK_QDATETIME_UTC, datetime));
    }
}
