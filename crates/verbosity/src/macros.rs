//! Call-site macros over the global registry.

/// Logs through the registry logger for the current source file.
///
/// The first expansion at a call site registers `file!()` with
/// [`global()`](crate::global) and parks the handle in a `static OnceLock`,
/// so the steady-state cost of a suppressed statement is one atomic load and
/// one level comparison; the registry lock is only ever taken once per
/// call site.
///
/// # Examples
///
/// ```
/// use verbosity::{Level, vlog};
///
/// vlog!(Level::Info, "accepted {} connections", 3);
/// assert!(verbosity::global().get(file!()).is_some());
/// ```
#[macro_export]
macro_rules! vlog {
    ($level:expr, $($arg:tt)+) => {{
        static SITE: ::std::sync::OnceLock<::std::sync::Arc<$crate::SourceLogger>> =
            ::std::sync::OnceLock::new();
        let logger = SITE.get_or_init(|| $crate::global().get_or_create(file!()));
        let level = $level;
        if logger.enabled(level) {
            logger.log(level, file!(), line!(), module_path!(), format_args!($($arg)+));
        }
    }};
}

/// Flushes the registry logger for the current source file, if one has been
/// created.
#[macro_export]
macro_rules! vlog_flush {
    () => {{
        if let Some(logger) = $crate::global().get(file!()) {
            logger.flush();
        }
    }};
}
