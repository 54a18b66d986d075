//! The source-handler capability contract.
//!
//! Every source kind implements a subset of five operations. The trait
//! provides default bodies that report "unsupported" — a handler only
//! overrides the operations its kind actually serves, and callers treat
//! [`Handled::Unsupported`] as a diagnostic, never as a failure.

use crate::view::{DownstreamRequest, DownstreamResponseHandle, RequestView, ResponseView};
use iris_core::SourceKind;

/// Outcome of an extraction operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// The source produced a value.
    Value(String),
    /// The source was consulted and had no value.
    Absent,
    /// The operation is not part of this kind's capability set.
    Unsupported,
}

impl Handled {
    /// Wraps an optional lookup result.
    #[must_use]
    pub fn from_option(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }

    /// Returns the value, treating absent and unsupported alike.
    #[must_use]
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Unsupported => None,
        }
    }

    /// Returns whether the operation was outside the kind's capabilities.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported)
    }
}

/// Outcome of an enrichment operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The value was written.
    Applied,
    /// The operation is not part of this kind's capability set.
    Unsupported,
}

impl Applied {
    /// Returns whether the operation was outside the kind's capabilities.
    #[must_use]
    pub fn is_unsupported(self) -> bool {
        matches!(self, Self::Unsupported)
    }
}

/// The five-operation contract every source kind implements a subset of.
///
/// Implementations are stateless and process-wide; all per-request state
/// lives in the views and the [`Context`](iris_core::Context).
///
/// # Example
///
/// ```rust
/// use iris_handlers::{Handled, HeaderHandler, RequestView, SourceHandler};
///
/// let view = RequestView::builder()
///     .header("x-tenant", "acme")
///     .build();
///
/// let handler = HeaderHandler;
/// assert_eq!(
///     handler.extract_inbound(&view, "x-tenant"),
///     Handled::Value("acme".to_string())
/// );
/// // Headers are not an inbound-body source.
/// let body = serde_json::json!({});
/// assert!(handler.extract_inbound_body(&body, "$.x").is_unsupported());
/// ```
pub trait SourceHandler: Send + Sync {
    /// The kind this handler serves.
    fn kind(&self) -> SourceKind;

    /// Reads a value from the inbound request.
    fn extract_inbound(&self, _request: &RequestView, _selector: &str) -> Handled {
        Handled::Unsupported
    }

    /// Reads a value from the parsed inbound JSON body.
    fn extract_inbound_body(&self, _body: &serde_json::Value, _selector: &str) -> Handled {
        Handled::Unsupported
    }

    /// Writes a value onto the outbound response.
    fn enrich_response(&self, _response: &mut ResponseView, _key: &str, _value: &str) -> Applied {
        Applied::Unsupported
    }

    /// Writes a value onto an outgoing downstream request.
    fn enrich_downstream(
        &self,
        _request: &mut DownstreamRequest,
        _key: &str,
        _value: &str,
    ) -> Applied {
        Applied::Unsupported
    }

    /// Reads a value back from a downstream response.
    fn extract_downstream(
        &self,
        _response: &dyn DownstreamResponseHandle,
        _selector: &str,
    ) -> Handled {
        Handled::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NopHandler;

    impl SourceHandler for NopHandler {
        fn kind(&self) -> SourceKind {
            SourceKind::Path
        }
    }

    #[test]
    fn test_default_operations_report_unsupported() {
        let handler = NopHandler;
        let view = RequestView::builder().build();
        let body = serde_json::json!({});
        let mut response = ResponseView::new();
        let mut downstream = DownstreamRequest::new();

        assert!(handler.extract_inbound(&view, "x").is_unsupported());
        assert!(handler.extract_inbound_body(&body, "$.x").is_unsupported());
        assert!(handler.enrich_response(&mut response, "k", "v").is_unsupported());
        assert!(handler
            .enrich_downstream(&mut downstream, "k", "v")
            .is_unsupported());
    }

    #[test]
    fn test_handled_conversions() {
        assert_eq!(
            Handled::from_option(Some("v".to_string())),
            Handled::Value("v".to_string())
        );
        assert_eq!(Handled::from_option(None), Handled::Absent);
        assert_eq!(Handled::Value("v".to_string()).into_option().as_deref(), Some("v"));
        assert_eq!(Handled::Absent.into_option(), None);
        assert_eq!(Handled::Unsupported.into_option(), None);
    }
}
