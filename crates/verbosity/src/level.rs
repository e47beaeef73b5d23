//! crates/verbosity/src/level.rs
//! Severity and threshold types for per-source verbosity control.
//!
//! Both enums share one numeric scale, `0..=6`, with off/critical at the low
//! end and trace at the high end. Higher numbers always mean more output:
//! a record is emitted when `level as u8 <= filter as u8`, and the raw
//! verbosity integers accepted from operators map directly onto
//! [`LevelFilter`] discriminants. This is the single documented convention
//! for the whole crate; there is no second, inverted numbering anywhere.

use std::fmt;
use std::str::FromStr;

/// Severity of an individual log record.
///
/// Discriminants occupy `1..=6` on the shared scale. [`LevelFilter`] extends
/// it downward with [`Off`](LevelFilter::Off) at `0`, which is why `Off` has
/// no counterpart here: records cannot be emitted "at off".
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    /// Failures an operator must see. Enabled at every threshold except
    /// [`LevelFilter::Off`].
    Critical = 1,
    /// Errors the process can continue past.
    Error = 2,
    /// Suspicious conditions that are not yet errors.
    Warn = 3,
    /// Routine operational messages.
    Info = 4,
    /// Diagnostics for debugging a specific subsystem.
    Debug = 5,
    /// High-volume tracing output.
    Trace = 6,
}

impl Level {
    /// Lowercase name, as produced by `Display` and accepted by `FromStr`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// One-letter tag used by the `%L` format specifier.
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Critical => "C",
            Self::Error => "E",
            Self::Warn => "W",
            Self::Info => "I",
            Self::Debug => "D",
            Self::Trace => "T",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s {
            s if s.eq_ignore_ascii_case("critical") => Self::Critical,
            s if s.eq_ignore_ascii_case("error") => Self::Error,
            s if s.eq_ignore_ascii_case("warn") => Self::Warn,
            s if s.eq_ignore_ascii_case("info") => Self::Info,
            s if s.eq_ignore_ascii_case("debug") => Self::Debug,
            s if s.eq_ignore_ascii_case("trace") => Self::Trace,
            other => return Err(ParseLevelError(other.to_owned())),
        };
        Ok(level)
    }
}

/// Per-logger verbosity threshold.
///
/// A filter *enables* every severity whose discriminant is less than or
/// equal to its own, so [`Off`](Self::Off) silences a logger entirely and
/// [`Trace`](Self::Trace) lets everything through.
///
/// # Examples
///
/// ```
/// use verbosity::{Level, LevelFilter};
///
/// assert!(LevelFilter::Info.enables(Level::Warn));
/// assert!(!LevelFilter::Info.enables(Level::Debug));
/// assert!(!LevelFilter::Off.enables(Level::Critical));
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelFilter {
    /// Nothing is emitted.
    Off = 0,
    /// Only [`Level::Critical`].
    Critical = 1,
    /// [`Level::Error`] and below.
    Error = 2,
    /// [`Level::Warn`] and below.
    Warn = 3,
    /// [`Level::Info`] and below.
    Info = 4,
    /// [`Level::Debug`] and below.
    Debug = 5,
    /// Everything.
    Trace = 6,
}

impl LevelFilter {
    /// Whether a record at `level` passes this threshold.
    #[inline]
    pub const fn enables(self, level: Level) -> bool {
        level as u8 <= self as u8
    }

    /// Maps a raw operator verbosity number onto a filter.
    ///
    /// Values outside `0..=6` are clamped to the nearest bound; out-of-range
    /// input is never rejected. `0` is [`Off`](Self::Off), `6` is
    /// [`Trace`](Self::Trace).
    pub const fn from_verbosity(raw: i64) -> Self {
        match raw {
            i64::MIN..=0 => Self::Off,
            1 => Self::Critical,
            2 => Self::Error,
            3 => Self::Warn,
            4 => Self::Info,
            5 => Self::Debug,
            6..=i64::MAX => Self::Trace,
        }
    }

    /// The filter's position on the numeric scale.
    pub const fn as_verbosity(self) -> u8 {
        self as u8
    }

    /// Inverse of [`as_verbosity`](Self::as_verbosity); `None` outside
    /// `0..=6`.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Off),
            1 => Some(Self::Critical),
            2 => Some(Self::Error),
            3 => Some(Self::Warn),
            4 => Some(Self::Info),
            5 => Some(Self::Debug),
            6 => Some(Self::Trace),
            _ => None,
        }
    }

    /// Lowercase name, as produced by `Display` and accepted by `FromStr`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Critical => Self::Critical,
            Level::Error => Self::Error,
            Level::Warn => Self::Warn,
            Level::Info => Self::Info,
            Level::Debug => Self::Debug,
            Level::Trace => Self::Trace,
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelFilter {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("off") {
            return Ok(Self::Off);
        }
        Level::from_str(s).map(Self::from)
    }
}

/// Error returned when a level name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized verbosity level {0:?}")]
pub struct ParseLevelError(pub(crate) String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_totally_ordered() {
        assert!(Level::Critical < Level::Error);
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
        assert!(Level::Debug < Level::Trace);
        assert!(LevelFilter::Off < LevelFilter::Critical);
        assert!(LevelFilter::Critical < LevelFilter::Trace);
    }

    #[test]
    fn numeric_bounds_are_zero_to_six() {
        assert_eq!(LevelFilter::Off.as_verbosity(), 0);
        assert_eq!(LevelFilter::Trace.as_verbosity(), 6);
        assert_eq!(Level::Critical as u8, 1);
        assert_eq!(Level::Trace as u8, 6);
    }

    #[test]
    fn enables_matches_numeric_comparison() {
        let levels = [
            Level::Critical,
            Level::Error,
            Level::Warn,
            Level::Info,
            Level::Debug,
            Level::Trace,
        ];
        for verbosity in 0..=6 {
            let filter = LevelFilter::from_u8(verbosity).expect("in range");
            for level in levels {
                assert_eq!(filter.enables(level), level as u8 <= verbosity);
            }
        }
    }

    #[test]
    fn off_enables_nothing() {
        assert!(!LevelFilter::Off.enables(Level::Critical));
        assert!(!LevelFilter::Off.enables(Level::Trace));
    }

    #[test]
    fn from_verbosity_clamps_out_of_range_input() {
        assert_eq!(LevelFilter::from_verbosity(-1), LevelFilter::Off);
        assert_eq!(LevelFilter::from_verbosity(i64::MIN), LevelFilter::Off);
        assert_eq!(LevelFilter::from_verbosity(7), LevelFilter::Trace);
        assert_eq!(LevelFilter::from_verbosity(i64::MAX), LevelFilter::Trace);
    }

    #[test]
    fn from_verbosity_maps_in_range_input_directly() {
        for verbosity in 0..=6_i64 {
            let filter = LevelFilter::from_verbosity(verbosity);
            assert_eq!(i64::from(filter.as_verbosity()), verbosity);
        }
    }

    #[test]
    fn from_u8_rejects_out_of_range_input() {
        assert_eq!(LevelFilter::from_u8(7), None);
        assert_eq!(LevelFilter::from_u8(255), None);
    }

    #[test]
    fn display_and_parse_round_trip() {
        for filter in [
            LevelFilter::Off,
            LevelFilter::Critical,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
            LevelFilter::Trace,
        ] {
            let parsed: LevelFilter = filter.to_string().parse().expect("round trip");
            assert_eq!(parsed, filter);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("WARN".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("Off".parse::<LevelFilter>(), Ok(LevelFilter::Off));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "verbose".parse::<Level>().unwrap_err();
        assert!(err.to_string().contains("verbose"));
        assert!("off".parse::<Level>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&LevelFilter::Debug).expect("serialize");
        let back: LevelFilter = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, LevelFilter::Debug);

        let json = serde_json::to_string(&Level::Warn).expect("serialize");
        let back: Level = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Level::Warn);
    }
}
