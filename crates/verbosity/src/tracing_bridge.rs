//! crates/verbosity/src/tracing_bridge.rs
//! Routes `tracing` events through the per-source verbosity registry.
//!
//! The event's source file becomes the registry key, so operator verbosity
//! updates, per-key level sets and bulk sweeps apply to code using standard
//! `tracing` macros exactly as they do to [`vlog!`](crate::vlog) call sites.
//!
//! # Usage
//!
//! ```rust,ignore
//! verbosity::init_registry_layer();
//!
//! // Filtered per file by the registry from here on.
//! tracing::info!("transfer started");
//! tracing::debug!("basis window {}", 16);
//! ```

use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::level::Level;
use crate::registry::{Registry, global};

/// A `tracing-subscriber` layer filtered by the verbosity registry.
pub struct RegistryLayer {
    registry: &'static Registry,
}

impl RegistryLayer {
    /// Layer backed by the process-wide registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: global(),
        }
    }

    /// Layer backed by a caller-owned registry. Tests lean on this together
    /// with a capturing sink factory.
    #[must_use]
    pub const fn with_registry(registry: &'static Registry) -> Self {
        Self { registry }
    }

    /// Maps a `tracing` level onto the registry's severity scale. `tracing`
    /// has no critical level, so [`Level::Critical`] is only reachable
    /// through [`vlog!`](crate::vlog).
    const fn severity(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::TRACE => Level::Trace,
        }
    }
}

impl Default for RegistryLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for RegistryLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Events without file metadata have no key to register under.
        let Some(file) = metadata.file() else { return };

        let logger = self.registry.get_or_create(file);
        let level = Self::severity(metadata.level());
        if !logger.enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            logger.log(
                level,
                file,
                metadata.line().unwrap_or(0),
                metadata.module_path().unwrap_or_else(|| metadata.target()),
                format_args!("{message}"),
            );
        }
    }
}

/// Extracts the `message` field from an event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Installs a [`RegistryLayer`] over the process-wide registry as the global
/// default subscriber.
pub fn init_registry_layer() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(RegistryLayer::new())
        .init();
}
