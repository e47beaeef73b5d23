#![cfg(feature = "tracing")]

//! Integration tests for the tracing bridge: events are keyed by their
//! source file and filtered through a registry just like `vlog!` sites.

use test_support::CaptureFactory;
use tracing_subscriber::layer::SubscriberExt;
use verbosity::{Level, LevelFilter, Registry, RegistryLayer};

fn leaked_registry(factory: &CaptureFactory) -> &'static Registry {
    Box::leak(Box::new(Registry::with_factory(Box::new(factory.clone()))))
}

/// An info event passes the default threshold and lands in the capture sink
/// under this file's key; a trace event is dropped until the key is opened.
#[test]
fn tracing_events_flow_through_the_registry() {
    let factory = CaptureFactory::new();
    let registry = leaked_registry(&factory);

    let subscriber =
        tracing_subscriber::registry().with(RegistryLayer::with_registry(registry));
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("transfer started");
        tracing::trace!("dropped at the default threshold");
    });

    let records = factory.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Info);
    assert_eq!(records[0].message, "transfer started");
    assert_eq!(records[0].key, file!());

    assert!(registry.set_level(file!(), LevelFilter::Trace));
    let subscriber =
        tracing_subscriber::registry().with(RegistryLayer::with_registry(registry));
    tracing::subscriber::with_default(subscriber, || {
        tracing::trace!("audible now");
    });

    let records = factory.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].level, Level::Trace);
    assert_eq!(records[1].message, "audible now");
}
