//! # Iris Pipeline
//!
//! The request-lifecycle pipelines of the Iris context propagation
//! framework.
//!
//! Two pipelines cover the four data-flow legs:
//!
//! - [`ExtractionPipeline`] — inbound extraction, run in three phases as
//!   host state becomes available: `PreAuth` (headers, query, cookies),
//!   `PostAuth` (path variables, claims), `BodyProcessing` (parsed JSON
//!   body). Phases run strictly forward and re-runs are idempotent.
//! - [`PropagationPipeline`] — outbound response enrichment, per-call
//!   downstream request enrichment with target-system filtering, and
//!   capture of values from downstream responses back into the same
//!   [`Context`](iris_core::Context).
//!
//! [`BufferedResponse`] solves the single-consumption problem for
//! downstream bodies: when any field reads a downstream response body,
//! every response is drained exactly once into memory and re-exposed as
//! a repeatable view, so pipeline extraction never races application
//! code for the stream. When no such field is configured the buffering
//! is skipped entirely.
//!
//! ## Control flow
//!
//! ```text
//! inbound request
//!   └─ ExtractionPipeline::run_pre_auth
//!        [host: authentication, routing]
//!   └─ ExtractionPipeline::run_post_auth
//!        [host: JSON body parsing, if any]
//!   └─ ExtractionPipeline::run_body
//!   └─ business logic (reads Context)
//!        └─ per downstream call:
//!             PropagationPipeline::enrich_downstream
//!             [host: network call]
//!             PropagationPipeline::capture
//!   └─ PropagationPipeline::enrich_response
//! ```

#![doc(html_root_url = "https://docs.rs/iris-pipeline/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod buffer;
mod extraction;
mod propagation;

pub use buffer::{BufferedResponse, CapturedResponse};
pub use extraction::ExtractionPipeline;
pub use propagation::PropagationPipeline;
