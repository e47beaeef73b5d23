//! Logger entries and the backend seam they write through.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::level::{Level, LevelFilter};

/// One log event, handed to a [`Sink`] fully assembled.
///
/// Source-location fields are captured at the call site; [`vlog!`](crate::vlog)
/// fills them from `file!()`, `line!()` and `module_path!()`.
#[derive(Clone, Copy)]
pub struct Record<'a> {
    /// Severity of the message.
    pub level: Level,
    /// Registry key of the emitting logger.
    pub key: &'a str,
    /// Source file of the call site.
    pub file: &'static str,
    /// Source line of the call site.
    pub line: u32,
    /// Module path of the call site.
    pub module_path: &'static str,
    /// The message payload.
    pub args: fmt::Arguments<'a>,
}

/// Backend accepting formatted log events for one registry key.
///
/// Implementations must be internally synchronized: `log` and `flush` are
/// invoked concurrently from any number of threads with no external locking.
/// The registry never holds its own lock while calling into a sink.
pub trait Sink: Send + Sync {
    /// Emits one record.
    fn log(&self, record: &Record<'_>);

    /// Flushes any buffered output. Best effort; failures are not reported.
    fn flush(&self);
}

/// Constructs the backend for a newly registered key.
///
/// `create` runs inside the registry's critical section so that the level
/// lookup and the insertion are one atomic step. It may allocate, but it
/// must not perform I/O or otherwise block.
pub trait SinkFactory: Send + Sync {
    /// Builds a sink for `key` using the registry's current default
    /// `format` string.
    fn create(&self, key: &str, format: &str) -> Arc<dyn Sink>;
}

/// A registered logger: one per key, created on first use and never dropped
/// for the life of the process.
///
/// Handles are shared as `Arc<SourceLogger>`; administrative level changes
/// mutate the entry in place, so a handle obtained before a change observes
/// the new threshold on its next [`enabled`](Self::enabled) check.
pub struct SourceLogger {
    key: String,
    level: AtomicU8,
    sink: Arc<dyn Sink>,
}

impl SourceLogger {
    pub(crate) fn new(key: String, level: LevelFilter, sink: Arc<dyn Sink>) -> Self {
        Self {
            key,
            level: AtomicU8::new(level.as_verbosity()),
            sink,
        }
    }

    /// The registry key this logger was created for.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current threshold, sampled with a relaxed load. A log statement
    /// already in flight may still use the previous value; visibility of
    /// changes is best-effort-immediate, not synchronized.
    pub fn level(&self) -> LevelFilter {
        LevelFilter::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or(LevelFilter::Trace)
    }

    pub(crate) fn set_level(&self, level: LevelFilter) {
        self.level.store(level.as_verbosity(), Ordering::Relaxed);
    }

    /// Whether a record at `level` would currently be emitted.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        self.level().enables(level)
    }

    /// Forwards a record to the sink unconditionally. Call sites normally go
    /// through [`vlog!`](crate::vlog), which checks [`enabled`](Self::enabled)
    /// first.
    pub fn log(
        &self,
        level: Level,
        file: &'static str,
        line: u32,
        module_path: &'static str,
        args: fmt::Arguments<'_>,
    ) {
        self.sink.log(&Record {
            level,
            key: &self.key,
            file,
            line,
            module_path,
            args,
        });
    }

    /// Flushes the backing sink.
    pub fn flush(&self) {
        self.sink.flush();
    }
}

impl fmt::Debug for SourceLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceLogger")
            .field("key", &self.key)
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct NullSink {
        logged: Mutex<Vec<String>>,
    }

    impl Sink for NullSink {
        fn log(&self, record: &Record<'_>) {
            self.logged
                .lock()
                .expect("sink lock")
                .push(record.args.to_string());
        }

        fn flush(&self) {}
    }

    fn entry(level: LevelFilter) -> (Arc<NullSink>, SourceLogger) {
        let sink = Arc::new(NullSink {
            logged: Mutex::new(Vec::new()),
        });
        let shared: Arc<dyn Sink> = sink.clone();
        let logger = SourceLogger::new("src/x.rs".to_owned(), level, shared);
        (sink, logger)
    }

    #[test]
    fn enabled_tracks_in_place_level_changes() {
        let (_sink, logger) = entry(LevelFilter::Info);
        assert!(logger.enabled(Level::Info));
        assert!(!logger.enabled(Level::Debug));

        logger.set_level(LevelFilter::Trace);
        assert!(logger.enabled(Level::Debug));

        logger.set_level(LevelFilter::Off);
        assert!(!logger.enabled(Level::Critical));
    }

    #[test]
    fn log_forwards_the_formatted_message() {
        let (sink, logger) = entry(LevelFilter::Trace);
        logger.log(
            Level::Info,
            file!(),
            line!(),
            module_path!(),
            format_args!("answer {}", 42),
        );
        assert_eq!(
            sink.logged.lock().expect("sink lock").as_slice(),
            ["answer 42"]
        );
    }

    #[test]
    fn debug_output_names_the_key() {
        let (_sink, logger) = entry(LevelFilter::Warn);
        let rendered = format!("{logger:?}");
        assert!(rendered.contains("src/x.rs"));
        assert!(rendered.contains("Warn"));
    }
}
