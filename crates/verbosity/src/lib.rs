#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `verbosity` is a runtime-adjustable, per-source-file log verbosity
//! registry. Every logging call site is associated with a *key*, by
//! convention the call site's `file!()` path, and the registry lazily
//! creates one logger per unique key. Operators change how chatty any file
//! or group of files is while the process runs, with no restart and no
//! recompile, by submitting glob-pattern verbosity updates.
//!
//! # Design
//!
//! The crate is a small set of pieces layered bottom-up:
//!
//! - [`wildcard_match`] -- anchored `*`/`?` glob matching where wildcards
//!   cross `/`, implemented as an iterative two-pointer scan bounded at
//!   O(pattern × text).
//! - [`VerbosityRule`] / [`RuleSet`] -- an ordered, first-match-wins table
//!   mapping patterns to [`LevelFilter`] thresholds. Patterns containing a
//!   `/` match whole keys; the rest match the key's basename with one
//!   trailing suffix stripped.
//! - [`Registry`] -- the concurrent key→logger map. One mutex covers the
//!   map, the rule set and the default level/format, which makes creation
//!   (level resolution + sink construction + insertion) a single atomic
//!   step and rule replacement linearizable.
//! - [`vlog!`] -- the call-site front end. Each expansion caches its
//!   [`SourceLogger`] handle in a `static OnceLock`, so after first use a
//!   suppressed statement costs an atomic load and a comparison.
//!
//! # Invariants
//!
//! - A key's entry is created at most once and never removed; every handle
//!   ever returned for a key refers to the same entry.
//! - Level changes mutate entries in place through an atomic field, so they
//!   are visible through previously distributed handles without
//!   resynchronization. A log statement already past its level check may
//!   still emit with the level it sampled.
//! - Rule-set replacement is all-or-nothing: concurrent resolution sees the
//!   old table or the new table, never a mixture.
//! - The registry performs no I/O while holding its lock.
//!
//! # Errors
//!
//! Normal operation has no failure path. Any string is a valid pattern, so
//! rule compilation cannot fail; out-of-range verbosity numbers are clamped
//! to `0..=6`; setting the level of an unknown key reports `false` rather
//! than erroring; sinks swallow write failures. The only fallible surface
//! is parsing level *names*, which returns [`ParseLevelError`].
//!
//! # Examples
//!
//! ```
//! use verbosity::{Level, LevelFilter, global, vlog};
//!
//! // Route all connection code to trace, and everything under src/io/ to
//! // errors only. First match wins.
//! global().update_verbosity([("conn*", 6), ("src/io/*", 2)]);
//!
//! vlog!(Level::Info, "worker {} online", 4);
//!
//! // This file's logger now exists and can be steered individually.
//! assert!(global().set_level(file!(), LevelFilter::Debug));
//! assert!(global().list().contains(file!()));
//! ```
//!
//! # Feature flags
//!
//! - `serde` -- `Serialize`/`Deserialize` on [`Level`], [`LevelFilter`] and
//!   [`VerbosityRule`], for admin surfaces that decode update requests.
//! - `tracing` -- [`RegistryLayer`], a `tracing-subscriber` layer that keys
//!   `tracing` events by source file and filters them through the registry.

mod glob;
mod level;
mod logger;
mod macros;
mod registry;
mod rules;
mod sink;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use glob::wildcard_match;
pub use level::{Level, LevelFilter, ParseLevelError};
pub use logger::{Record, Sink, SinkFactory, SourceLogger};
pub use registry::{DEFAULT_LEVEL, Registry, global};
pub use rules::{RuleSet, VerbosityRule};
pub use sink::{DEFAULT_FORMAT, FormatPattern, StderrFactory, StderrSink, WriterSink};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{RegistryLayer, init_registry_layer};
