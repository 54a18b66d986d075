//! # Iris Core
//!
//! Core types for the Iris context propagation framework.
//!
//! Iris carries named "context fields" (request id, tenant id, user claims,
//! correlation ids) across the lifecycle of an inbound HTTP request:
//! extraction from heterogeneous sources, forwarding to downstream calls,
//! capture from downstream responses, and emission to outbound responses
//! and observability sinks.
//!
//! This crate holds the pieces every other Iris crate builds on:
//!
//! - [`FieldDefinition`] / [`FieldCatalog`] — the static, process-wide
//!   description of every field, validated once at startup.
//! - [`Context`] — the per-request value store, attached to the request
//!   object and shared across every continuation serving it.
//! - [`GeneratorKind`], [`MaskPattern`], [`TransformKind`] — pure value
//!   utilities for generating, masking, and normalizing field values.
//! - [`ConfigError`] / [`ExtractionError`] — the error taxonomy separating
//!   startup-fatal configuration problems from per-request failures.
//!
//! ## Example
//!
//! ```rust
//! use iris_core::{
//!     Context, FieldCatalog, FieldDefinition, InboundSource, SourceKind,
//! };
//!
//! let field = FieldDefinition::builder("request_id")
//!     .inbound(InboundSource::new(SourceKind::Header, "X-Request-ID"))
//!     .build();
//!
//! let catalog = FieldCatalog::new(vec![field]).unwrap();
//! assert!(catalog.field("request_id").is_some());
//!
//! let ctx = Context::new();
//! ctx.insert("request_id", "abc-123");
//! assert_eq!(ctx.get("request_id").as_deref(), Some("abc-123"));
//! ```

#![doc(html_root_url = "https://docs.rs/iris-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod field;
mod generate;
mod mask;
mod transform;

pub use context::{Context, Phase, PropagationEntry};
pub use error::{ConfigError, CoreResult, ExtractionError};
pub use field::{
    CardinalityTier, Capability, DownstreamRequestEnrichment, DownstreamResponseExtraction,
    FallbackSource, FieldCatalog, FieldDefinition, FieldDefinitionBuilder, InboundSource,
    MetricSpec, ObservabilitySpec, ResponseEnrichment, SourceKind,
};
pub use generate::GeneratorKind;
pub use mask::{MaskPattern, MaskPatternError, FULL_MASK};
pub use transform::{TransformKind, TransformParseError};
