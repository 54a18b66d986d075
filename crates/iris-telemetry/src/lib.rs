//! # Iris Telemetry
//!
//! Structured logging and observability snapshots for Iris.
//!
//! This crate has two halves:
//!
//! - [`logging`] — initialization of the `tracing-subscriber` stack
//!   (JSON or pretty format, env-filter levels, span events) for hosts
//!   that let Iris own log setup.
//! - [`snapshot`] — producers of the key/value snapshots that concrete
//!   sinks consume: `{log key -> masked-or-raw value}` for structured
//!   logs, `{metric tag -> value}` filtered by cardinality tier for a
//!   metrics registry, and `{span tag -> value}` for a trace exporter.
//!
//! The concrete backends (log shipper, metrics registry, trace
//! exporter) live outside Iris; this crate only ever hands them pairs.
//! Sensitive fields are always represented by their masked rendition —
//! the raw value never reaches a sink.

#![doc(html_root_url = "https://docs.rs/iris-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;
pub mod snapshot;

pub use error::TelemetryError;

/// Result type alias for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
