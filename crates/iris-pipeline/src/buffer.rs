//! Downstream response body buffering.
//!
//! A downstream response body is a single-consumption stream: once the
//! capture pipeline reads it for a body selector, application code
//! reading the same response afterward would find it spent. The
//! [`BufferedResponse`] adapter drains the stream exactly once into
//! memory and re-exposes an equivalent, repeatable response view.
//!
//! Buffering costs memory, so it is opt-in at the catalog level: the
//! capture pipeline wraps responses only when at least one field
//! declares a Body downstream extraction
//! ([`FieldCatalog::needs_response_buffering`](iris_core::FieldCatalog::needs_response_buffering)).

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use iris_handlers::{DownstreamResponse, DownstreamResponseHandle};

/// A downstream response whose body has been drained into memory.
///
/// Unlike [`DownstreamResponse`], the body can be read any number of
/// times; the pipeline and the application never contend for the stream.
///
/// # Example
///
/// ```rust
/// use iris_handlers::{DownstreamResponse, DownstreamResponseHandle};
/// use iris_pipeline::BufferedResponse;
/// use http::{HeaderMap, StatusCode};
///
/// let raw = DownstreamResponse::new(StatusCode::OK, HeaderMap::new(), r#"{"a":1}"#);
/// let buffered = BufferedResponse::buffer(raw);
///
/// // Both reads see the same content; neither errors.
/// assert_eq!(buffered.body_text().as_deref(), Some(r#"{"a":1}"#));
/// assert_eq!(buffered.body_text().as_deref(), Some(r#"{"a":1}"#));
/// ```
#[derive(Debug)]
pub struct BufferedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl BufferedResponse {
    /// Drains the response body exactly once and builds the repeatable
    /// view.
    #[must_use]
    pub fn buffer(response: DownstreamResponse) -> Self {
        let body = response.take_body();
        Self {
            status: DownstreamResponseHandle::status(&response),
            headers: response.headers().clone(),
            body,
        }
    }

    /// Returns the buffered body bytes, if a body was present.
    #[must_use]
    pub fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl DownstreamResponseHandle for BufferedResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    }

    fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

/// The response handed back to the caller after capture.
///
/// Buffered when the catalog has Body downstream extractions, raw
/// passthrough otherwise. Either way it satisfies
/// [`DownstreamResponseHandle`], so application code reads it the same
/// way — with the caveat that a raw body is still single-consumption.
#[derive(Debug)]
pub enum CapturedResponse {
    /// The body was drained into memory and reads repeat.
    Buffered(BufferedResponse),
    /// The response passed through untouched.
    Raw(DownstreamResponse),
}

impl DownstreamResponseHandle for CapturedResponse {
    fn status(&self) -> StatusCode {
        match self {
            Self::Buffered(response) => DownstreamResponseHandle::status(response),
            Self::Raw(response) => DownstreamResponseHandle::status(response),
        }
    }

    fn header(&self, name: &str) -> Option<String> {
        match self {
            Self::Buffered(response) => response.header(name),
            Self::Raw(response) => DownstreamResponseHandle::header(response, name),
        }
    }

    fn body_text(&self) -> Option<String> {
        match self {
            Self::Buffered(response) => response.body_text(),
            Self::Raw(response) => DownstreamResponseHandle::body_text(response),
        }
    }
}
