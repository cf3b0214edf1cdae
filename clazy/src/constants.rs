use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Name of the project configuration file searched for from the analyzed path upwards.
pub const CONFIG_FILENAME: &str = ".clazy.toml";

/// Suffix identifying translation-unit dumps when walking directories.
pub const DUMP_SUFFIX: &str = ".ast.json";

/// Environment variable overriding the configured check list.
pub const ENV_CHECKS: &str = "CLAZY_CHECKS";

/// Environment variable overriding the configured fixit list.
pub const ENV_FIXITS: &str = "CLAZY_FIXIT";

/// Environment variable holding the log filter.
pub const ENV_LOG: &str = "CLAZY_LOG";

/// Default number of tokens a forward token scan may inspect.
pub const DEFAULT_SCAN_LIMIT: usize = 10_000;

/// Level enabled when no check list is given anywhere.
pub const DEFAULT_CHECK_LEVEL: &str = "level1";

/// Regex for `// clazy:skip`, which silences the whole file.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_skip_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r"//\s*clazy:skip\b").expect("Invalid skip regex pattern"))
}

/// Regex for `// clazy:excludeall=a,b`, which silences checks for the whole file.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_exclude_all_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"//\s*clazy:excludeall=([\w,-]+)").expect("Invalid excludeall regex pattern")
    })
}

/// Regex for `// clazy:exclude=a,b`, which silences checks on its own line.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_exclude_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"//\s*clazy:exclude=([\w,-]+)").expect("Invalid exclude regex pattern")
    })
}

/// Set of folders never descended into when looking for dumps.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert(".git");
        s.insert(".cache");
        s.insert("CMakeFiles");
        s.insert("node_modules");
        s
    })
}

/// Records the rule-of-three check leaves alone: Qt value types and iterators
/// whose partial copy semantics are deliberate.
pub fn get_rule_of_three_blacklist() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert("QAtomicInt");
        s.insert("QBasicAtomicInteger");
        s.insert("QAtomicInteger");
        s.insert("QBasicAtomicPointer");
        s.insert("QAtomicPointer");
        s.insert("QList::iterator");
        s.insert("QList::const_iterator");
        s.insert("QTextBlock::iterator");
        s.insert("QtPrivate::ConverterMemberFunction");
        s.insert("QtPrivate::ConverterMemberFunctionOk");
        s.insert("QtPrivate::ConverterFunctor");
        s.insert("QtMetaTypePrivate::VariantData");
        s.insert("QScopedArrayPointer");
        s.insert("QtPrivate::AlignOfHelper");
        s.insert("QColor");
        s.insert("QCharRef");
        s.insert("QByteRef");
        s.insert("QObjectPrivate::Connection");
        s.insert("QMutableListIterator");
        s.insert("QStringList");
        s.insert("QVariant::Private");
        s.insert("QSet::iterator");
        s.insert("QSet::const_iterator");
        s.insert("QUrlQuery");
        s
    })
}

pub use get_default_exclude_folders as DEFAULT_EXCLUDE_FOLDERS;
pub use get_exclude_all_re as EXCLUDE_ALL_RE;
pub use get_exclude_line_re as EXCLUDE_LINE_RE;
pub use get_rule_of_three_blacklist as RULE_OF_THREE_BLACKLIST;
pub use get_skip_file_re as SKIP_FILE_RE;
