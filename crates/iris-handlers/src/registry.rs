//! Source-handler registry.
//!
//! The registry is the single point of access for all five handler
//! operations: the pipeline never talks to a handler directly. It fails
//! loudly when two handlers claim the same kind (a startup configuration
//! error) and degrades gracefully when a kind has no handler at request
//! time — the lookup logs and reports absent so every other field keeps
//! progressing.

use crate::body::BodyHandler;
use crate::claim::ClaimHandler;
use crate::cookie::CookieHandler;
use crate::handler::{Applied, Handled, SourceHandler};
use crate::header::HeaderHandler;
use crate::path::PathHandler;
use crate::query::QueryHandler;
use crate::view::{DownstreamRequest, DownstreamResponseHandle, RequestView, ResponseView};
use iris_core::{ConfigError, SourceKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Dispatches handler operations by source kind.
///
/// Process-wide, read-mostly shared state: built once at startup and
/// shared behind an `Arc` by every pipeline.
///
/// # Example
///
/// ```rust
/// use iris_handlers::{Handled, HandlerRegistry, RequestView};
/// use iris_core::SourceKind;
///
/// let registry = HandlerRegistry::with_defaults();
/// let view = RequestView::builder().header("x-tenant", "acme").build();
///
/// assert_eq!(
///     registry.extract_inbound(SourceKind::Header, &view, "x-tenant"),
///     Handled::Value("acme".to_string())
/// );
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<SourceKind, Arc<dyn SourceHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with all six built-in handlers.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        // Registering distinct built-in kinds cannot collide.
        for handler in [
            Arc::new(HeaderHandler) as Arc<dyn SourceHandler>,
            Arc::new(CookieHandler),
            Arc::new(QueryHandler),
            Arc::new(ClaimHandler),
            Arc::new(PathHandler),
            Arc::new(BodyHandler),
        ] {
            let kind = handler.kind();
            registry.handlers.insert(kind, handler);
        }
        registry
    }

    /// Registers a handler for its declared kind.
    ///
    /// Fails if a handler for that kind is already registered.
    pub fn register(&mut self, handler: Arc<dyn SourceHandler>) -> Result<(), ConfigError> {
        let kind = handler.kind();
        if self.handlers.contains_key(&kind) {
            return Err(ConfigError::DuplicateHandler { kind });
        }
        self.handlers.insert(kind, handler);
        Ok(())
    }

    /// Returns the handler for a kind, if registered.
    #[must_use]
    pub fn get(&self, kind: SourceKind) -> Option<&dyn SourceHandler> {
        self.handlers.get(&kind).map(AsRef::as_ref)
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns whether no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn missing(&self, kind: SourceKind, operation: &'static str) -> Handled {
        tracing::warn!(%kind, operation, "no handler registered for source kind");
        Handled::Absent
    }

    /// Dispatches inbound request extraction.
    #[must_use]
    pub fn extract_inbound(
        &self,
        kind: SourceKind,
        request: &RequestView,
        selector: &str,
    ) -> Handled {
        match self.get(kind) {
            Some(handler) => {
                let outcome = handler.extract_inbound(request, selector);
                if outcome.is_unsupported() {
                    tracing::debug!(%kind, selector, "inbound extraction unsupported for kind");
                }
                outcome
            }
            None => self.missing(kind, "extract_inbound"),
        }
    }

    /// Dispatches inbound body extraction.
    #[must_use]
    pub fn extract_inbound_body(
        &self,
        kind: SourceKind,
        body: &serde_json::Value,
        selector: &str,
    ) -> Handled {
        match self.get(kind) {
            Some(handler) => {
                let outcome = handler.extract_inbound_body(body, selector);
                if outcome.is_unsupported() {
                    tracing::debug!(%kind, selector, "inbound body extraction unsupported for kind");
                }
                outcome
            }
            None => self.missing(kind, "extract_inbound_body"),
        }
    }

    /// Dispatches outbound response enrichment.
    pub fn enrich_response(
        &self,
        kind: SourceKind,
        response: &mut ResponseView,
        key: &str,
        value: &str,
    ) -> Applied {
        match self.get(kind) {
            Some(handler) => {
                let outcome = handler.enrich_response(response, key, value);
                if outcome.is_unsupported() {
                    tracing::debug!(%kind, key, "response enrichment unsupported for kind");
                }
                outcome
            }
            None => {
                tracing::warn!(%kind, key, "no handler registered for source kind");
                Applied::Unsupported
            }
        }
    }

    /// Dispatches downstream request enrichment.
    pub fn enrich_downstream(
        &self,
        kind: SourceKind,
        request: &mut DownstreamRequest,
        key: &str,
        value: &str,
    ) -> Applied {
        match self.get(kind) {
            Some(handler) => {
                let outcome = handler.enrich_downstream(request, key, value);
                if outcome.is_unsupported() {
                    tracing::debug!(%kind, key, "downstream enrichment unsupported for kind");
                }
                outcome
            }
            None => {
                tracing::warn!(%kind, key, "no handler registered for source kind");
                Applied::Unsupported
            }
        }
    }

    /// Dispatches downstream response extraction.
    #[must_use]
    pub fn extract_downstream(
        &self,
        kind: SourceKind,
        response: &dyn DownstreamResponseHandle,
        selector: &str,
    ) -> Handled {
        match self.get(kind) {
            Some(handler) => {
                let outcome = handler.extract_downstream(response, selector);
                if outcome.is_unsupported() {
                    tracing::debug!(%kind, selector, "downstream extraction unsupported for kind");
                }
                outcome
            }
            None => self.missing(kind, "extract_downstream"),
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&SourceKind> = self.handlers.keys().collect();
        kinds.sort_by_key(|k| k.name());
        f.debug_struct("HandlerRegistry").field("kinds", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults_registers_all_kinds() {
        let registry = HandlerRegistry::with_defaults();
        assert_eq!(registry.len(), 6);
        for kind in SourceKind::all() {
            assert!(registry.get(kind).is_some(), "missing handler for {kind}");
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = HandlerRegistry::with_defaults();
        let err = registry.register(Arc::new(HeaderHandler)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateHandler {
                kind: SourceKind::Header
            }
        ));
    }

    #[test]
    fn test_register_into_empty_registry() {
        let mut registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        registry.register(Arc::new(HeaderHandler)).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_handler_reports_absent() {
        let registry = HandlerRegistry::new();
        let view = RequestView::builder().header("x-a", "1").build();

        // No handler registered: absent, not a panic or error.
        assert_eq!(
            registry.extract_inbound(SourceKind::Header, &view, "x-a"),
            Handled::Absent
        );
    }

    #[test]
    fn test_dispatch_extract_inbound() {
        let registry = HandlerRegistry::with_defaults();
        let view = RequestView::builder()
            .header("x-a", "1")
            .header("cookie", "c=2")
            .uri(http::Uri::from_static("/?q=3"))
            .path_param("p", "4")
            .claim("sub", "5")
            .build();

        assert_eq!(
            registry.extract_inbound(SourceKind::Header, &view, "x-a"),
            Handled::Value("1".to_string())
        );
        assert_eq!(
            registry.extract_inbound(SourceKind::Cookie, &view, "c"),
            Handled::Value("2".to_string())
        );
        assert_eq!(
            registry.extract_inbound(SourceKind::Query, &view, "q"),
            Handled::Value("3".to_string())
        );
        assert_eq!(
            registry.extract_inbound(SourceKind::Path, &view, "p"),
            Handled::Value("4".to_string())
        );
        assert_eq!(
            registry.extract_inbound(SourceKind::Claim, &view, "sub"),
            Handled::Value("5".to_string())
        );
        // Body is not an inbound-request source; the unsupported
        // diagnostic is reported, not thrown.
        assert!(registry
            .extract_inbound(SourceKind::Body, &view, "$.a")
            .is_unsupported());
    }

    #[test]
    fn test_dispatch_enrichment() {
        let registry = HandlerRegistry::with_defaults();

        let mut response = ResponseView::new();
        assert_eq!(
            registry.enrich_response(SourceKind::Header, &mut response, "x-id", "abc"),
            Applied::Applied
        );
        assert!(registry
            .enrich_response(SourceKind::Query, &mut response, "q", "v")
            .is_unsupported());

        let mut downstream = DownstreamRequest::new();
        assert_eq!(
            registry.enrich_downstream(SourceKind::Query, &mut downstream, "tenant", "acme"),
            Applied::Applied
        );
        assert!(registry
            .enrich_downstream(SourceKind::Cookie, &mut downstream, "session", "s")
            .is_unsupported());
    }
}
