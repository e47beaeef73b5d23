//! The process-wide logger registry.
//!
//! One mutex guards the key→logger map, the rule set and the default
//! level/format together; the level resolution that happens during creation
//! and the insertion of the new entry are therefore a single atomic step,
//! and two racing first uses of a key cannot both construct a logger.
//! Nothing behind the mutex performs I/O (sink construction is
//! allocation-only by [`SinkFactory`](crate::SinkFactory) contract), so
//! every critical section is short and bounded.
//!
//! Entry levels live *outside* the lock, as an atomic on each
//! [`SourceLogger`], because they are read on every log statement in the
//! process.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use crate::level::LevelFilter;
use crate::logger::{SinkFactory, SourceLogger};
use crate::rules::RuleSet;
use crate::sink::{DEFAULT_FORMAT, StderrFactory};

/// Level assigned to keys that match no rule, until
/// [`Registry::set_default`] says otherwise.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Registry of per-source-key loggers.
///
/// Keys are arbitrary strings; by convention they are source file paths, as
/// produced by `file!()` in the [`vlog!`](crate::vlog) macro. Entries are
/// created lazily, exactly once per key, and are never removed: later level
/// changes mutate the existing entry in place, so every handle handed out
/// earlier keeps working and reflects the change.
///
/// Most programs use the shared [`global()`] instance; tests construct their
/// own with [`with_factory`](Self::with_factory) to observe emission without
/// touching process streams.
///
/// # Examples
///
/// ```
/// use verbosity::{LevelFilter, Registry};
///
/// let registry = Registry::new();
/// registry.update_verbosity([("conn", 6), ("src/io/*", 2)]);
///
/// let logger = registry.get_or_create("src/net/conn.rs");
/// assert_eq!(logger.level(), LevelFilter::Trace);
/// assert_eq!(registry.resolve_level("src/io/file.rs"), LevelFilter::Error);
///
/// // Unknown keys are reported, not created.
/// assert!(!registry.set_level("src/never/logged.rs", LevelFilter::Off));
/// ```
pub struct Registry {
    factory: Box<dyn SinkFactory>,
    inner: Mutex<Inner>,
}

struct Inner {
    loggers: HashMap<String, Arc<SourceLogger>>,
    rules: RuleSet,
    default_level: LevelFilter,
    default_format: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry whose loggers write to stderr via [`StderrFactory`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(Box::new(StderrFactory))
    }

    /// Registry with a caller-supplied backend factory.
    #[must_use]
    pub fn with_factory(factory: Box<dyn SinkFactory>) -> Self {
        Self {
            factory,
            inner: Mutex::new(Inner {
                loggers: HashMap::new(),
                rules: RuleSet::default(),
                default_level: DEFAULT_LEVEL,
                default_format: DEFAULT_FORMAT.to_owned(),
            }),
        }
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the logger registered for `key`, creating it on first use.
    ///
    /// The effective level of a new logger comes from the rule set, falling
    /// back to the registry default. Concurrent first uses of the same key
    /// yield the same entry; whichever call wins the lock constructs it and
    /// the rest observe it.
    pub fn get_or_create(&self, key: &str) -> Arc<SourceLogger> {
        let mut inner = self.locked();
        if let Some(existing) = inner.loggers.get(key) {
            return Arc::clone(existing);
        }
        let level = inner.rules.resolve(key).unwrap_or(inner.default_level);
        let sink = self.factory.create(key, &inner.default_format);
        let logger = Arc::new(SourceLogger::new(key.to_owned(), level, sink));
        inner.loggers.insert(key.to_owned(), Arc::clone(&logger));
        logger
    }

    /// Looks up an existing logger without creating one.
    pub fn get(&self, key: &str) -> Option<Arc<SourceLogger>> {
        self.locked().loggers.get(key).cloned()
    }

    /// Sets the level of an already-registered key in place.
    ///
    /// Returns `false` without side effects when the key has never logged;
    /// this operation does not create entries.
    pub fn set_level(&self, key: &str, level: LevelFilter) -> bool {
        match self.locked().loggers.get(key) {
            Some(logger) => {
                logger.set_level(level);
                true
            }
            None => false,
        }
    }

    /// Sets every registered logger to `level`, ignoring the rule set.
    ///
    /// The sweep is an explicit operator override: it sticks until the next
    /// explicit set on a key, since entries are never re-created.
    pub fn set_all_levels(&self, level: LevelFilter) {
        for logger in self.locked().loggers.values() {
            logger.set_level(level);
        }
    }

    /// Replaces the default level and sink format applied to keys that match
    /// no rule. Existing loggers are not revisited.
    pub fn set_default(&self, level: LevelFilter, format: &str) {
        let mut inner = self.locked();
        inner.default_level = level;
        inner.default_format = format.to_owned();
    }

    /// Discards the current rule set and installs `rules` in its place.
    ///
    /// Replacement is atomic with respect to concurrent resolution and
    /// creation: readers see the old set or the new one, never a mixture.
    /// Existing loggers keep their current levels; the new rules apply only
    /// to keys registered after this call. Operators wanting an immediate
    /// sweep call [`set_all_levels`](Self::set_all_levels) as well.
    pub fn replace_rules(&self, rules: RuleSet) {
        self.locked().rules = rules;
    }

    /// Rebuilds the rule set from `(pattern, verbosity)` pairs, in order.
    ///
    /// Patterns containing `/` match whole keys; others match basename
    /// stems. Verbosity numbers are clamped to `0..=6`. Semantics are
    /// otherwise those of [`replace_rules`](Self::replace_rules).
    pub fn update_verbosity<'a, I>(&self, updates: I)
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        // Built outside the critical section; installed atomically inside it.
        self.replace_rules(RuleSet::from_updates(updates));
    }

    /// Effective level the rule set currently assigns to `key`, with the
    /// default-level fallback applied.
    pub fn resolve_level(&self, key: &str) -> LevelFilter {
        let inner = self.locked();
        inner.rules.resolve(key).unwrap_or(inner.default_level)
    }

    /// Human-readable `key: level` listing of every registered logger,
    /// sorted by key. The format is stable: two spaces, the key, a colon,
    /// the level name, a newline.
    pub fn list(&self) -> String {
        let mut out = String::new();
        for (key, level) in self.snapshot_levels() {
            let _ = writeln!(out, "  {key}: {level}");
        }
        out
    }

    /// Complete key→level snapshot at a point in time, sorted by key.
    pub fn snapshot_levels(&self) -> BTreeMap<String, LevelFilter> {
        self.locked()
            .loggers
            .iter()
            .map(|(key, logger)| (key.clone(), logger.level()))
            .collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.locked();
        f.debug_struct("Registry")
            .field("loggers", &inner.loggers.len())
            .field("rules", &inner.rules.len())
            .field("default_level", &inner.default_level)
            .finish_non_exhaustive()
    }
}

/// The process-wide registry used by [`vlog!`](crate::vlog) and
/// [`vlog_flush!`](crate::vlog_flush).
pub fn global() -> &'static Registry {
    static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_returns_the_same_entry() {
        let registry = Registry::new();
        let first = registry.get_or_create("src/a.rs");
        let second = registry.get_or_create("src/a.rs");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn get_does_not_create() {
        let registry = Registry::new();
        assert!(registry.get("src/a.rs").is_none());
        registry.get_or_create("src/a.rs");
        assert!(registry.get("src/a.rs").is_some());
    }

    #[test]
    fn new_logger_level_comes_from_rules_then_default() {
        let registry = Registry::new();
        registry.update_verbosity([("a", 6)]);
        assert_eq!(
            registry.get_or_create("src/a.rs").level(),
            LevelFilter::Trace
        );
        assert_eq!(registry.get_or_create("src/b.rs").level(), DEFAULT_LEVEL);
    }

    #[test]
    fn resolve_level_falls_back_to_current_default() {
        let registry = Registry::new();
        assert_eq!(registry.resolve_level("src/a.rs"), DEFAULT_LEVEL);
        registry.set_default(LevelFilter::Error, DEFAULT_FORMAT);
        assert_eq!(registry.resolve_level("src/a.rs"), LevelFilter::Error);
    }

    #[test]
    fn global_returns_one_instance() {
        let first: *const Registry = global();
        let second: *const Registry = global();
        assert_eq!(first, second);
    }
}
