//! # Iris
//!
//! **Context-field propagation for HTTP services**
//!
//! Iris carries named context fields (request id, tenant id, user
//! claims, correlation ids) across the lifecycle of an inbound HTTP
//! request:
//!
//! - 🧲 **Multi-source extraction** – headers, cookies, query
//!   parameters, principal claims, path variables, and JSON bodies,
//!   read in phases as host state becomes available
//! - 🔁 **Directional propagation** – forward selected fields to
//!   downstream calls (filtered per target system), capture fields back
//!   from their responses, and echo fields on the outbound response
//! - 🫙 **Single-consumption safety** – downstream response bodies are
//!   buffered exactly once when body extraction is configured, so the
//!   pipeline never races application code for the stream
//! - 🎭 **Masking & generation** – sensitive values are masked for
//!   every observability sink; absent values can be generated (UUID,
//!   sortable id, sequence, timestamp, compact id)
//!
//! ## Quick start
//!
//! ```rust
//! use iris::prelude::*;
//! use std::sync::Arc;
//!
//! // Declare fields (or load them from TOML with iris-config).
//! let catalog = FieldCatalog::new(vec![FieldDefinition::builder("request_id")
//!     .inbound(
//!         InboundSource::new(SourceKind::Header, "X-Request-ID")
//!             .generate(GeneratorKind::Uuid),
//!     )
//!     .response(ResponseEnrichment::new(SourceKind::Header, "X-Request-ID"))
//!     .downstream_request(DownstreamRequestEnrichment::new(
//!         SourceKind::Header,
//!         "X-Request-ID",
//!     ))
//!     .build()])
//! .unwrap();
//!
//! let catalog = Arc::new(catalog);
//! let registry = Arc::new(HandlerRegistry::with_defaults());
//! let extraction = ExtractionPipeline::new(catalog.clone(), registry.clone());
//! let propagation = PropagationPipeline::new(catalog, registry);
//!
//! // Per request: attach one Context to the request object and run the
//! // phases as host state becomes available.
//! let ctx = Context::new();
//! let request = RequestView::builder().build();
//! extraction.run_pre_auth(&ctx, &request).unwrap();
//!
//! let request_id = ctx.get("request_id").unwrap();
//!
//! // Every downstream call and the outbound response carry the id.
//! let mut call = DownstreamRequest::new();
//! propagation.enrich_downstream(&ctx, "billing", &mut call);
//! assert_eq!(call.header("x-request-id"), Some(request_id.as_str()));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! inbound request ──► ExtractionPipeline (PreAuth ► PostAuth ► Body)
//!                                │
//!                        Context (request-attached)
//!                          │            │
//!        PropagationPipeline            iris-telemetry snapshots
//!        ├─ enrich_downstream ──► downstream call
//!        ├─ capture ◄──────────── downstream response (buffered)
//!        └─ enrich_response ──► outbound response
//! ```

#![doc(html_root_url = "https://docs.rs/iris/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use iris_core as core;

// Re-export handler types
pub use iris_handlers as handlers;

// Re-export pipeline types
pub use iris_pipeline as pipeline;

// Re-export telemetry types
pub use iris_telemetry as telemetry;

// Re-export configuration loading
pub use iris_config as config;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use iris::prelude::*;
/// ```
pub mod prelude {
    pub use iris_config::{load_fields, parse_fields};
    pub use iris_core::{
        CardinalityTier, Context, DownstreamRequestEnrichment, DownstreamResponseExtraction,
        FallbackSource, FieldCatalog, FieldDefinition, GeneratorKind, InboundSource, MaskPattern,
        ObservabilitySpec, Phase, PropagationEntry, ResponseEnrichment, SourceKind, TransformKind,
    };
    pub use iris_handlers::{
        DownstreamRequest, DownstreamResponse, DownstreamResponseHandle, HandlerRegistry,
        RequestView, ResponseView, SourceHandler,
    };
    pub use iris_pipeline::{BufferedResponse, CapturedResponse, ExtractionPipeline, PropagationPipeline};
    pub use iris_telemetry::snapshot::{log_fields, metric_tags, span_tags};
}
