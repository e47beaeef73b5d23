#![deny(unsafe_code)]
#![deny(missing_docs)]

//! Shared test utilities for the verbosity workspace.
//!
//! Provides a capturing [`Sink`]/[`SinkFactory`] pair so integration tests
//! can assert on exactly what a registry emitted, and what its factory was
//! asked to create, without touching process streams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use verbosity::{Level, Record, Sink, SinkFactory};

type Shared<T> = Arc<Mutex<T>>;

fn locked<T>(shared: &Shared<T>) -> std::sync::MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One captured log event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedRecord {
    /// Registry key of the emitting logger.
    pub key: String,
    /// Severity of the message.
    pub level: Level,
    /// Rendered message text.
    pub message: String,
    /// Call-site file.
    pub file: String,
    /// Call-site line.
    pub line: u32,
}

/// Sink that appends every record to a buffer shared with its factory.
pub struct CaptureSink {
    records: Shared<Vec<CapturedRecord>>,
    flushes: Arc<AtomicUsize>,
}

impl Sink for CaptureSink {
    fn log(&self, record: &Record<'_>) {
        let captured = CapturedRecord {
            key: record.key.to_owned(),
            level: record.level,
            message: record.args.to_string(),
            file: record.file.to_owned(),
            line: record.line,
        };
        locked(&self.records).push(captured);
    }

    fn flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }
}

/// Factory handing every key a [`CaptureSink`] feeding one shared buffer.
///
/// Clones share the buffer, so a test keeps one clone for assertions and
/// boxes the other into `Registry::with_factory`.
#[derive(Clone, Default)]
pub struct CaptureFactory {
    records: Shared<Vec<CapturedRecord>>,
    created: Shared<Vec<(String, String)>>,
    flushes: Arc<AtomicUsize>,
}

impl CaptureFactory {
    /// New factory with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record captured so far, in emission order.
    #[must_use]
    pub fn records(&self) -> Vec<CapturedRecord> {
        locked(&self.records).clone()
    }

    /// `(key, format)` pairs passed to `create`, in call order.
    #[must_use]
    pub fn created(&self) -> Vec<(String, String)> {
        locked(&self.created).clone()
    }

    /// Total flush calls across all sinks built by this factory.
    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::Relaxed)
    }
}

impl SinkFactory for CaptureFactory {
    fn create(&self, key: &str, format: &str) -> Arc<dyn Sink> {
        locked(&self.created).push((key.to_owned(), format.to_owned()));
        Arc::new(CaptureSink {
            records: Arc::clone(&self.records),
            flushes: Arc::clone(&self.flushes),
        })
    }
}
