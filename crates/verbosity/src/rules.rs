//! crates/verbosity/src/rules.rs
//! Ordered glob rules mapping source keys to verbosity thresholds.

use crate::glob::wildcard_match;
use crate::level::LevelFilter;

/// One pattern→level override.
///
/// Patterns containing a `/` are matched against the full key; all others
/// are matched against the key's final path component with one trailing
/// `.suffix` removed, so the rule `"conn"` covers both `src/net/conn.rs`
/// and `legacy/conn.cc`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityRule {
    pattern: String,
    match_full_path: bool,
    level: LevelFilter,
}

impl VerbosityRule {
    /// Creates a rule, classifying it as a path rule iff `pattern` contains
    /// a `/`.
    pub fn new(pattern: impl Into<String>, level: LevelFilter) -> Self {
        let pattern = pattern.into();
        let match_full_path = pattern.contains('/');
        Self {
            pattern,
            match_full_path,
            level,
        }
    }

    /// The glob pattern as supplied.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// `true` when the rule is matched against whole keys rather than
    /// basename stems.
    pub const fn matches_full_path(&self) -> bool {
        self.match_full_path
    }

    /// Threshold assigned to keys this rule matches.
    pub const fn level(&self) -> LevelFilter {
        self.level
    }
}

/// Ordered, first-match-wins rule collection.
///
/// A `RuleSet` is immutable once built; the registry replaces its set
/// wholesale under its lock, so concurrent resolution sees either the old
/// rules or the new ones, never a mixture.
///
/// # Examples
///
/// ```
/// use verbosity::{LevelFilter, RuleSet};
///
/// let rules = RuleSet::from_updates([("foo", 2), ("f*", 5)]);
/// // First match wins: the literal rule shadows the broader glob.
/// assert_eq!(rules.resolve("src/foo.rs"), Some(LevelFilter::Error));
/// assert_eq!(rules.resolve("src/fuzz.rs"), Some(LevelFilter::Debug));
/// assert_eq!(rules.resolve("src/bar.rs"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<VerbosityRule>,
}

impl RuleSet {
    /// Builds a set from already-classified rules, preserving their order.
    #[must_use]
    pub fn new(rules: Vec<VerbosityRule>) -> Self {
        Self { rules }
    }

    /// Builds a set from `(pattern, verbosity)` pairs in the operator wire
    /// form, preserving order. Verbosity numbers are clamped to `0..=6` via
    /// [`LevelFilter::from_verbosity`].
    #[must_use]
    pub fn from_updates<'a, I>(updates: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        Self {
            rules: updates
                .into_iter()
                .map(|(pattern, verbosity)| {
                    VerbosityRule::new(pattern, LevelFilter::from_verbosity(verbosity))
                })
                .collect(),
        }
    }

    /// Resolves `key` against the rules in insertion order; the first match
    /// decides. `None` means no rule applies and the caller should fall back
    /// to its default level.
    pub fn resolve(&self, key: &str) -> Option<LevelFilter> {
        for rule in &self.rules {
            let subject = if rule.match_full_path {
                key
            } else {
                basename_stem(key)
            };
            if wildcard_match(&rule.pattern, subject) {
                return Some(rule.level);
            }
        }
        None
    }

    /// Number of rules in the set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `true` when no rules are stored.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rules in match order.
    pub fn rules(&self) -> &[VerbosityRule] {
        &self.rules
    }
}

/// Final `/`-delimited component of `key` with one trailing suffix removed.
fn basename_stem(key: &str) -> &str {
    let base = match key.rfind('/') {
        Some(slash) => &key[slash + 1..],
        None => key,
    };
    match base.rfind('.') {
        Some(dot) => &base[..dot],
        None => base,
    }
}
