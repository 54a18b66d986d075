//! # Iris Handlers
//!
//! Source handlers and boundary views for the Iris context propagation
//! framework.
//!
//! Every context field names a [`SourceKind`](iris_core::SourceKind); this
//! crate provides the handler for each kind and the registry that
//! dispatches to them. A handler implements the subset of the
//! five-operation contract its kind supports:
//!
//! | Kind   | inbound | inbound body | response | downstream req | downstream resp |
//! |--------|---------|--------------|----------|----------------|-----------------|
//! | Header | ✔       | ✘            | ✔        | ✔              | ✔               |
//! | Cookie | ✔       | ✘            | ✔        | ✘              | ✘               |
//! | Query  | ✔       | ✘            | ✘        | ✔              | ✘               |
//! | Claim  | ✔       | ✘            | ✘        | ✘              | ✘               |
//! | Path   | ✔       | ✘            | ✘        | ✘              | ✘               |
//! | Body   | ✘       | ✔            | ✘        | ✘              | ✔               |
//!
//! Unimplemented operations report [`Handled::Unsupported`] /
//! [`Applied::Unsupported`] rather than failing: direction support is a
//! declared property of the kind, not an error condition.
//!
//! The crate also defines the views at the host boundary:
//! [`RequestView`] over the inbound request, [`ResponseView`] for
//! outbound enrichment, [`DownstreamRequest`] for outgoing calls, and
//! [`DownstreamResponse`] (with its single-consumption body) for what
//! comes back.

#![doc(html_root_url = "https://docs.rs/iris-handlers/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod body;
mod claim;
mod cookie;
mod handler;
mod header;
mod path;
mod query;
mod registry;
mod selector;
mod view;

pub use body::BodyHandler;
pub use claim::ClaimHandler;
pub use cookie::{CookieHandler, SetCookie};
pub use handler::{Applied, Handled, SourceHandler};
pub use header::HeaderHandler;
pub use path::PathHandler;
pub use query::QueryHandler;
pub use registry::HandlerRegistry;
pub use selector::{select, select_text};
pub use view::{
    DownstreamRequest, DownstreamResponse, DownstreamResponseHandle, RequestView,
    RequestViewBuilder, ResponseView,
};
