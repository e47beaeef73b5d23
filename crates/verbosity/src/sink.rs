//! Built-in sinks: a pattern formatter, a writer-backed sink, and the
//! stderr default used by the process-wide registry.
//!
//! These exist so the registry always has something concrete to hand a new
//! key; anything heavier (files, rotation, syslog) belongs to the embedding
//! application, which supplies its own [`SinkFactory`].

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::logger::{Record, Sink, SinkFactory};

/// Line pattern applied when no other format has been configured:
/// `[level][key] [file:line] message`.
pub const DEFAULT_FORMAT: &str = "[%l][%k] [%s:%#] %v";

/// A compiled format string for the built-in sinks.
///
/// Specifiers: `%l` level name, `%L` one-letter level, `%k` logger key,
/// `%s` source file, `%#` source line, `%m` module path, `%v` message and
/// `%%` a literal percent. Unrecognized specifiers are copied through
/// verbatim, so compilation cannot fail and any operator-supplied string is
/// usable as a format.
///
/// # Examples
///
/// ```
/// use verbosity::{FormatPattern, Level, Record};
///
/// let pattern = FormatPattern::parse("%L %k: %v");
/// let line = pattern.render(&Record {
///     level: Level::Warn,
///     key: "src/net/conn.rs",
///     file: "src/net/conn.rs",
///     line: 41,
///     module_path: "net::conn",
///     args: format_args!("listener saturated"),
/// });
/// assert_eq!(line, "W src/net/conn.rs: listener saturated");
/// ```
#[derive(Clone, Debug)]
pub struct FormatPattern {
    segments: Vec<Segment>,
}

#[derive(Clone, Debug)]
enum Segment {
    Literal(String),
    Level,
    ShortLevel,
    Key,
    File,
    Line,
    Module,
    Message,
}

impl FormatPattern {
    /// Compiles `format` into a reusable pattern.
    #[must_use]
    pub fn parse(format: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let Some(spec) = chars.next() else {
                // Trailing lone percent.
                literal.push('%');
                break;
            };
            let segment = match spec {
                'l' => Segment::Level,
                'L' => Segment::ShortLevel,
                'k' => Segment::Key,
                's' => Segment::File,
                '#' => Segment::Line,
                'm' => Segment::Module,
                'v' => Segment::Message,
                '%' => {
                    literal.push('%');
                    continue;
                }
                other => {
                    literal.push('%');
                    literal.push(other);
                    continue;
                }
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(segment);
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { segments }
    }

    /// Renders `record` into a single line, without a trailing newline.
    #[must_use]
    pub fn render(&self, record: &Record<'_>) -> String {
        use std::fmt::Write as _;

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Level => out.push_str(record.level.as_str()),
                Segment::ShortLevel => out.push_str(record.level.short_name()),
                Segment::Key => out.push_str(record.key),
                Segment::File => out.push_str(record.file),
                Segment::Line => {
                    let _ = write!(out, "{}", record.line);
                }
                Segment::Module => out.push_str(record.module_path),
                Segment::Message => {
                    let _ = write!(out, "{}", record.args);
                }
            }
        }
        out
    }
}

/// Sink writing newline-terminated lines into an owned writer.
///
/// The writer sits behind a mutex, so one sink may back any number of
/// concurrent call sites. Write failures are swallowed: diagnostics must not
/// introduce a failure path into the code being diagnosed.
pub struct WriterSink {
    pattern: FormatPattern,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl WriterSink {
    /// Creates a sink rendering with `format` into `writer`.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, format: &str) -> Self {
        Self {
            pattern: FormatPattern::parse(format),
            writer: Mutex::new(writer),
        }
    }
}

impl Sink for WriterSink {
    fn log(&self, record: &Record<'_>) {
        let line = self.pattern.render(record);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "{line}");
    }

    fn flush(&self) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}

/// Sink writing to the process stderr stream.
pub struct StderrSink {
    pattern: FormatPattern,
}

impl StderrSink {
    /// Creates a stderr sink rendering with `format`.
    #[must_use]
    pub fn new(format: &str) -> Self {
        Self {
            pattern: FormatPattern::parse(format),
        }
    }
}

impl Sink for StderrSink {
    fn log(&self, record: &Record<'_>) {
        let line = self.pattern.render(record);
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{line}");
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Default factory: every key logs to the shared process stderr stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrFactory;

impl SinkFactory for StderrFactory {
    fn create(&self, _key: &str, format: &str) -> Arc<dyn Sink> {
        Arc::new(StderrSink::new(format))
    }
}
