//! Centralized check and fixit names.

/// `QDateTime::currentDateTime()` converted to UTC or epoch time.
pub const CHECK_QDATETIME_UTC: &str = "qdatetime-utc";
/// `qgetenv()` allocations that only test or convert the value.
pub const CHECK_QGETENV: &str = "qgetenv";
/// `QSet::intersect()` used only to test for emptiness.
pub const CHECK_QSET_INTERSECTS: &str = "qset-intersects";
/// Records implementing only part of the rule of three.
pub const CHECK_RULE_OF_THREE: &str = "rule-of-three";
/// `QObject` subclasses whose constructors take no parent.
pub const CHECK_CTOR_MISSING_PARENT_ARGUMENT: &str = "ctor-missing-parent-argument";
/// Implicit `QString` conversions from `const char *` and `QByteArray`.
pub const CHECK_QT4_QSTRING_FROM_ARRAY: &str = "qt4-qstring-from-array";

/// Fixit of [`CHECK_QDATETIME_UTC`].
pub const FIXIT_QDATETIME_UTC: &str = "fix-qdatetime-utc";
/// Fixit of [`CHECK_QGETENV`].
pub const FIXIT_QGETENV: &str = "fix-qgetenv";
/// Fixit of [`CHECK_QT4_QSTRING_FROM_ARRAY`].
pub const FIXIT_QT4_QSTRING_FROM_ARRAY: &str = "fix-qt4-qstring-from-array";
